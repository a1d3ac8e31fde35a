/// LLM Client — the single point of entry for all model calls in this service.
///
/// ARCHITECTURAL RULE: no other module may call the OpenRouter API directly.
/// All LLM interactions MUST go through this module.
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::errors::AppError;
use crate::models::resume::ResumeRecord;

pub mod prompts;

const OPENROUTER_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
/// The model used for resume optimization. Intentionally hardcoded to
/// prevent accidental drift between environments.
pub const MODEL: &str = "mistralai/mistral-7b-instruct:free";
const MAX_TOKENS: u32 = 4000;
const MAX_RETRIES: u32 = 3;

/// Cap for the summary text salvaged from an unparseable model response.
const MINIMAL_SUMMARY_CHARS: usize = 600;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    stream: bool,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Seam for handlers: anything that can turn raw resume text plus a job
/// description into a structured record. Lets tests exercise the generation
/// flow with a stub instead of a live model.
#[async_trait]
pub trait ResumeOptimizer: Send + Sync {
    async fn optimize(
        &self,
        resume_text: &str,
        job_description: &str,
    ) -> Result<ResumeRecord, AppError>;
}

/// OpenRouter chat-completions client with bounded retries and backoff.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
}

impl LlmClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
        }
    }

    /// Makes a raw chat call, returning the assistant text.
    /// Retries on 429 (rate limit) and 5xx errors with exponential backoff;
    /// other API errors fail fast.
    pub async fn call(&self, prompt: &str, system: &str) -> Result<String, LlmError> {
        let request_body = ChatRequest {
            model: MODEL,
            max_tokens: MAX_TOKENS,
            temperature: 0.7,
            stream: false,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
        };

        let mut last_error: Option<LlmError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s, 4s
                let delay = std::time::Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "LLM call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(OPENROUTER_API_URL)
                .header("authorization", format!("Bearer {}", self.api_key))
                .header("content-type", "application/json")
                .json(&request_body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("LLM API returned {}: {}", status, body);
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message: body,
                });
            }

            let chat_response: ChatResponse = response.json().await?;

            let text = chat_response
                .choices
                .into_iter()
                .next()
                .and_then(|c| c.message.content)
                .ok_or(LlmError::EmptyContent)?;

            debug!("LLM call succeeded: {} chars of content", text.len());

            return Ok(text);
        }

        Err(last_error.unwrap_or(LlmError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }
}

#[async_trait]
impl ResumeOptimizer for LlmClient {
    /// Optimizes `resume_text` against `job_description` into a structured
    /// record. Malformed JSON from the model degrades to a minimal record
    /// carrying the raw text as summary — the caller always gets a record.
    async fn optimize(
        &self,
        resume_text: &str,
        job_description: &str,
    ) -> Result<ResumeRecord, AppError> {
        let prompt = prompts::OPTIMIZE_PROMPT_TEMPLATE
            .replace("{resume_data}", resume_text)
            .replace("{job_description}", job_description);

        let text = self
            .call(&prompt, prompts::OPTIMIZE_SYSTEM)
            .await
            .map_err(|e| AppError::Llm(format!("Resume optimization call failed: {e}")))?;

        Ok(parse_record(&text))
    }
}

/// Parses the model's response into a record, tolerating fenced output.
/// Unparseable responses become a minimal record with just a summary.
fn parse_record(text: &str) -> ResumeRecord {
    let stripped = strip_json_fences(text);
    match serde_json::from_str::<ResumeRecord>(stripped) {
        Ok(record) => record,
        Err(e) => {
            warn!("LLM returned unparseable resume JSON ({e}); using minimal record");
            let summary: String = stripped.chars().take(MINIMAL_SUMMARY_CHARS).collect();
            ResumeRecord::minimal(summary.trim())
        }
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_parse_record_valid_json() {
        let text = r#"{"personalInfo": {"name": "Jane"}, "summary": "Engineer."}"#;
        let record = parse_record(text);
        assert_eq!(record.personal_info.name, "Jane");
        assert_eq!(record.summary, "Engineer.");
    }

    #[test]
    fn test_parse_record_fenced_json() {
        let text = "```json\n{\"summary\": \"Fenced.\"}\n```";
        assert_eq!(parse_record(text).summary, "Fenced.");
    }

    #[test]
    fn test_parse_record_malformed_becomes_minimal() {
        let text = "Sorry, I cannot produce JSON today.";
        let record = parse_record(text);
        assert_eq!(record.summary, text);
        assert!(record.skills.is_empty());
        assert!(record.personal_info.name.is_empty());
    }

    #[test]
    fn test_parse_record_minimal_summary_is_capped() {
        let text = "x".repeat(5000);
        let record = parse_record(&text);
        assert!(record.summary.chars().count() <= MINIMAL_SUMMARY_CHARS);
    }
}
