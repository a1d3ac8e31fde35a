//! Resume text extraction from uploaded PDFs and LinkedIn profile URLs.
//!
//! Both paths produce plain text for the LLM prompt. PDF extraction runs on a
//! blocking thread because `pdf-extract` is CPU-bound. The LinkedIn path is a
//! plain fetch with a browser user agent; LinkedIn serves logged-out visitors
//! a thin public page at best, so a failed or useless fetch degrades to a
//! skeleton the LLM fills from the job description.

use reqwest::Client;
use tracing::{debug, warn};

use crate::errors::AppError;
use crate::validators;

const BROWSER_UA: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/120.0.0.0 Safari/537.36";

/// Minimum useful text length from a LinkedIn fetch before we give up and
/// use the skeleton.
const MIN_PROFILE_CHARS: usize = 200;

/// Extracts plain text from uploaded PDF bytes.
pub async fn extract_pdf_text(bytes: Vec<u8>) -> Result<String, AppError> {
    let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("PDF extraction task panicked: {e}")))?
        .map_err(|e| {
            warn!("PDF text extraction failed: {e}");
            AppError::Validation(
                "Could not extract text from the uploaded PDF. Please upload a text-based \
                 (not scanned) resume."
                    .to_string(),
            )
        })?;

    let cleaned: String = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    if cleaned.is_empty() {
        return Err(AppError::Validation(
            "The uploaded PDF contains no extractable text.".to_string(),
        ));
    }

    debug!("extracted {} chars from uploaded PDF", cleaned.len());
    Ok(format!(
        "RESUME CONTENT FROM PDF:\n{cleaned}\nEND OF RESUME CONTENT"
    ))
}

/// Fetches a LinkedIn profile page and reduces it to text. Logged-out
/// LinkedIn is unreliable; any failure falls back to a skeleton that names
/// the profile URL so the optimization step still has something to anchor on.
pub async fn fetch_linkedin_profile(http: &Client, url: &str) -> Result<String, AppError> {
    validators::validate_linkedin_url(url)?;

    let fetched = http
        .get(url)
        .header("user-agent", BROWSER_UA)
        .send()
        .await;

    match fetched {
        Ok(response) if response.status().is_success() => {
            let html = response.text().await.unwrap_or_default();
            let text = strip_tags(&html);
            if text.len() >= MIN_PROFILE_CHARS {
                debug!("LinkedIn fetch yielded {} chars", text.len());
                return Ok(format!(
                    "LINKEDIN PROFILE CONTENT:\n{text}\nEND OF PROFILE CONTENT"
                ));
            }
            warn!("LinkedIn fetch returned too little text, using skeleton");
        }
        Ok(response) => warn!("LinkedIn fetch returned {}", response.status()),
        Err(e) => warn!("LinkedIn fetch failed: {e}"),
    }

    Ok(profile_skeleton(url))
}

fn profile_skeleton(url: &str) -> String {
    format!(
        "LINKEDIN PROFILE URL: {url}\n\
         The profile page could not be read. Build the resume from the candidate's \
         profile URL and the job description, keeping all fields generic where no \
         information is available."
    )
}

/// Crude HTML-to-text reduction: drop script/style blocks, strip tags,
/// collapse whitespace. Good enough for prompt input.
fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len() / 4);
    let mut chars = html.char_indices().peekable();
    let mut skip_until: Option<&str> = None;

    while let Some((i, c)) = chars.next() {
        if let Some(closer) = skip_until {
            if c == '<' && html[i..].to_ascii_lowercase().starts_with(closer) {
                skip_until = None;
                // consume through the closing '>'
                for (_, c2) in chars.by_ref() {
                    if c2 == '>' {
                        break;
                    }
                }
            }
            continue;
        }

        if c == '<' {
            let rest = html[i..].to_ascii_lowercase();
            if rest.starts_with("<script") {
                skip_until = Some("</script");
                continue;
            }
            if rest.starts_with("<style") {
                skip_until = Some("</style");
                continue;
            }
            for (_, c2) in chars.by_ref() {
                if c2 == '>' {
                    break;
                }
            }
            out.push(' ');
            continue;
        }

        out.push(c);
    }

    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_tags_basic() {
        let html = "<html><body><h1>Jane Doe</h1><p>Engineer at Acme</p></body></html>";
        assert_eq!(strip_tags(html), "Jane Doe Engineer at Acme");
    }

    #[test]
    fn test_strip_tags_drops_scripts_and_styles() {
        let html = "<style>body { color: red }</style><script>var x = 1;</script><p>Visible</p>";
        assert_eq!(strip_tags(html), "Visible");
    }

    #[test]
    fn test_strip_tags_collapses_whitespace() {
        let html = "<div>  a \n\n  b  </div>";
        assert_eq!(strip_tags(html), "a b");
    }

    #[test]
    fn test_profile_skeleton_names_url() {
        let skeleton = profile_skeleton("https://linkedin.com/in/jane");
        assert!(skeleton.contains("https://linkedin.com/in/jane"));
    }

    #[tokio::test]
    async fn test_extract_pdf_text_rejects_garbage_bytes() {
        let result = extract_pdf_text(b"not a pdf at all".to_vec()).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
