use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub openrouter_api_key: String,
    pub google_client_id: String,
    pub admin_email: String,
    pub port: u16,
    pub rust_log: String,
    /// Requests per window for anonymous and free-tier callers.
    pub free_rate_limit: usize,
    /// Requests per window for premium callers.
    pub premium_rate_limit: usize,
    pub rate_limit_window: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            s3_bucket: require_env("S3_BUCKET")?,
            s3_endpoint: require_env("S3_ENDPOINT")?,
            aws_access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            openrouter_api_key: require_env("OPENROUTER_API_KEY")?,
            google_client_id: require_env("GOOGLE_CLIENT_ID")?,
            admin_email: std::env::var("ADMIN_EMAIL")
                .unwrap_or_else(|_| "admin@tailorcv.com".to_string()),
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            free_rate_limit: parse_env("FREE_RATE_LIMIT", 5)?,
            premium_rate_limit: parse_env("PREMIUM_RATE_LIMIT", 50)?,
            rate_limit_window: Duration::from_secs(
                parse_env::<u64>("RATE_LIMIT_WINDOW_MINUTES", 60)? * 60,
            ),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' is not a valid value")),
        Err(_) => Ok(default),
    }
}
