use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;
use sqlx::PgPool;

use crate::config::Config;
use crate::email::Mailer;
use crate::llm_client::ResumeOptimizer;
use crate::pdf::PdfGenerator;
use crate::ratelimit::SlidingWindowLimiter;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub s3: S3Client,
    /// Pluggable optimizer. Default: the OpenRouter client. Tests inject stubs.
    pub llm: Arc<dyn ResumeOptimizer>,
    /// Shared HTTP client for Google tokeninfo and LinkedIn fetches.
    pub http: reqwest::Client,
    pub mailer: Mailer,
    pub pdf: PdfGenerator,
    pub limits: RateLimits,
    pub config: Config,
}

/// The two limiter instances. Handlers pick one from the caller's premium
/// flag; keys inside each instance are user ids or client IPs.
#[derive(Clone)]
pub struct RateLimits {
    pub free: Arc<SlidingWindowLimiter>,
    pub premium: Arc<SlidingWindowLimiter>,
}

impl RateLimits {
    pub fn for_tier(&self, is_premium: bool) -> &SlidingWindowLimiter {
        if is_premium {
            &self.premium
        } else {
            &self.free
        }
    }
}
