//! POST /api/generate-resume — the main generation flow.
//!
//! Multipart request with:
//!   - `jobDescription` (required text)
//!   - `resume` (PDF file) or `linkedinUrl` (text); resume wins if both given
//!   - `email` (optional, for guest premium lookup and the ready notification)
//!
//! Flow: resolve caller → rate limit → extract resume text → LLM optimize →
//! PDF generate → S3 upload → log generation → fire-and-forget email →
//! respond with the PDF stream (the stored URL rides in `x-resume-url`).

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Multipart, State},
    http::{header, HeaderMap, HeaderValue},
    response::{IntoResponse, Response},
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth;
use crate::errors::AppError;
use crate::extract;
use crate::routes::client_ip;
use crate::state::AppState;
use crate::storage;
use crate::validators::{self, RESUME_CONTENT_TYPES};

const JOB_DESCRIPTION_SNIPPET_CHARS: usize = 200;

#[derive(Default)]
struct GenerateForm {
    job_description: String,
    linkedin_url: Option<String>,
    email: Option<String>,
    resume_file: Option<(String, Vec<u8>)>,
}

async fn read_form(mut multipart: Multipart) -> Result<GenerateForm, AppError> {
    let mut form = GenerateForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "jobDescription" => {
                form.job_description = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Unreadable field: {e}")))?;
            }
            "linkedinUrl" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Unreadable field: {e}")))?;
                if !value.trim().is_empty() {
                    form.linkedin_url = Some(value.trim().to_string());
                }
            }
            "email" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Unreadable field: {e}")))?;
                if !value.trim().is_empty() {
                    form.email = Some(value.trim().to_lowercase());
                }
            }
            "resume" => {
                let content_type = field.content_type().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Unreadable upload: {e}")))?;
                form.resume_file = Some((content_type, bytes.to_vec()));
            }
            other => warn!("ignoring unknown multipart field '{other}'"),
        }
    }

    Ok(form)
}

pub async fn handle_generate(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let form = read_form(multipart).await?;
    validators::validate_job_description(&form.job_description)?;
    if let Some(email) = &form.email {
        validators::validate_email(email)?;
    }

    let user = auth::current_user(&state, &headers).await?;

    let is_premium = match (&user, &form.email) {
        (Some(user), _) => user.is_premium,
        (None, Some(email)) => auth::premium_by_email(&state.db, email).await?,
        (None, None) => false,
    };

    let limiter_key = user
        .as_ref()
        .map(|u| u.id.to_string())
        .unwrap_or_else(|| client_ip(&headers, &addr));

    let limiter = state.limits.for_tier(is_premium);
    if !limiter.allow(&limiter_key) {
        return Err(AppError::RateLimited {
            retry_after: limiter.seconds_until_reset(&limiter_key),
        });
    }
    limiter.cleanup();

    let resume_text = match (&form.resume_file, &form.linkedin_url) {
        (Some((content_type, bytes)), _) => {
            validators::validate_upload(content_type, bytes.len(), RESUME_CONTENT_TYPES)?;
            extract::extract_pdf_text(bytes.clone()).await?
        }
        (None, Some(url)) => extract::fetch_linkedin_profile(&state.http, url).await?,
        (None, None) => {
            return Err(AppError::Validation(
                "Provide either a resume PDF upload or a LinkedIn profile URL".to_string(),
            ))
        }
    };

    let record = state
        .llm
        .optimize(&resume_text, &form.job_description)
        .await?;

    let template = crate::pdf::templates::default_for_tier(is_premium);
    let pdf_bytes = state.pdf.generate(template, &record, is_premium).await?;

    let key = format!("resumes/{}.pdf", Uuid::new_v4());
    let resume_url = storage::upload(
        &state.s3,
        &state.config,
        &key,
        pdf_bytes.clone(),
        "application/pdf",
    )
    .await?;

    let snippet: String = form
        .job_description
        .chars()
        .take(JOB_DESCRIPTION_SNIPPET_CHARS)
        .collect();
    let ip = client_ip(&headers, &addr);

    sqlx::query(
        r#"
        INSERT INTO generations (id, user_id, email, ip, job_description_snippet,
                                 resume_url, is_premium, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, now())
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user.as_ref().map(|u| u.id))
    .bind(&form.email)
    .bind(&ip)
    .bind(&snippet)
    .bind(&resume_url)
    .bind(is_premium)
    .execute(&state.db)
    .await?;

    if let Some(user) = &user {
        sqlx::query(
            "UPDATE users SET generation_count = generation_count + 1, last_generated = now() \
             WHERE id = $1",
        )
        .bind(user.id)
        .execute(&state.db)
        .await?;
    }

    let notify_email = user
        .as_ref()
        .map(|u| u.email.clone())
        .or_else(|| form.email.clone());
    if let Some(to) = notify_email {
        let mailer = state.mailer.clone();
        let url = resume_url.clone();
        tokio::spawn(async move {
            mailer.notify_resume_ready(&to, &url).await;
        });
    }

    info!(
        premium = is_premium,
        template,
        bytes = pdf_bytes.len(),
        "resume generated"
    );

    let mut response = (
        [
            (header::CONTENT_TYPE, "application/pdf"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"tailored_resume.pdf\"",
            ),
        ],
        pdf_bytes,
    )
        .into_response();
    if let Ok(value) = HeaderValue::from_str(&resume_url) {
        response.headers_mut().insert("x-resume-url", value);
    }
    Ok(response)
}
