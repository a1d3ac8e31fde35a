//! Request input validation: emails, LinkedIn URLs, uploads, job descriptions.
//!
//! Validation failures are always `AppError::Validation` (400). Checks are
//! deliberately permissive; the goal is catching obviously wrong input, not
//! RFC-grade parsing.

use crate::errors::AppError;

pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub const RESUME_CONTENT_TYPES: &[&str] = &["application/pdf"];
pub const SCREENSHOT_CONTENT_TYPES: &[&str] = &["image/png", "image/jpeg", "image/webp"];

const MIN_JOB_DESCRIPTION_CHARS: usize = 30;
const MAX_JOB_DESCRIPTION_CHARS: usize = 20_000;

pub fn validate_email(email: &str) -> Result<(), AppError> {
    let email = email.trim();
    let valid = email.len() <= 254
        && !email.contains(char::is_whitespace)
        && matches!(email.split_once('@'), Some((local, domain))
            if !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !domain.contains('@'));

    if valid {
        Ok(())
    } else {
        Err(AppError::Validation("Invalid email address".to_string()))
    }
}

pub fn validate_linkedin_url(url: &str) -> Result<(), AppError> {
    let url = url.trim();
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .ok_or_else(|| {
            AppError::Validation("LinkedIn URL must start with http:// or https://".to_string())
        })?;

    let (host, path) = rest.split_once('/').unwrap_or((rest, ""));
    let host_ok = host == "linkedin.com" || host.ends_with(".linkedin.com");
    let path_ok = path.starts_with("in/") && path.len() > 3;

    if host_ok && path_ok {
        Ok(())
    } else {
        Err(AppError::Validation(
            "Expected a LinkedIn profile URL like https://linkedin.com/in/username".to_string(),
        ))
    }
}

pub fn validate_upload(
    content_type: &str,
    size: usize,
    allowed: &[&str],
) -> Result<(), AppError> {
    if size == 0 {
        return Err(AppError::Validation("Uploaded file is empty".to_string()));
    }
    if size > MAX_UPLOAD_BYTES {
        return Err(AppError::Validation(format!(
            "Uploaded file exceeds the {} MB limit",
            MAX_UPLOAD_BYTES / (1024 * 1024)
        )));
    }
    // Ignore charset and boundary parameters on the media type.
    let base_type = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    if !allowed.contains(&base_type.as_str()) {
        return Err(AppError::Validation(format!(
            "Unsupported file type '{base_type}'; expected one of: {}",
            allowed.join(", ")
        )));
    }
    Ok(())
}

pub fn validate_job_description(text: &str) -> Result<(), AppError> {
    let len = text.trim().chars().count();
    if len < MIN_JOB_DESCRIPTION_CHARS {
        return Err(AppError::Validation(
            "Job description is too short to tailor a resume against".to_string(),
        ));
    }
    if len > MAX_JOB_DESCRIPTION_CHARS {
        return Err(AppError::Validation(
            "Job description is too long".to_string(),
        ));
    }
    Ok(())
}
