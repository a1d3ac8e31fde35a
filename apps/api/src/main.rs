mod auth;
mod config;
mod db;
mod email;
mod errors;
mod extract;
mod llm_client;
mod models;
mod pdf;
mod ratelimit;
mod routes;
mod state;
mod storage;
mod validators;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::email::Mailer;
use crate::llm_client::LlmClient;
use crate::pdf::PdfGenerator;
use crate::ratelimit::SlidingWindowLimiter;
use crate::routes::build_router;
use crate::state::{AppState, RateLimits};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting TailorCV API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Initialize S3 / MinIO
    let s3 = build_s3_client(&config).await;
    info!("S3 client initialized");

    // Initialize LLM client
    let llm = Arc::new(LlmClient::new(config.openrouter_api_key.clone()));
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Shared HTTP client for Google tokeninfo, LinkedIn fetches, email relay
    let http = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()?;

    let mailer = Mailer::new(http.clone(), config.admin_email.clone());

    // PDF generator (discovers pdflatex/xelatex at request time)
    let pdf = PdfGenerator::new();

    // Per-tier rate limiters
    let limits = RateLimits {
        free: Arc::new(SlidingWindowLimiter::new(
            config.free_rate_limit,
            config.rate_limit_window,
        )),
        premium: Arc::new(SlidingWindowLimiter::new(
            config.premium_rate_limit,
            config.rate_limit_window,
        )),
    };
    info!(
        "Rate limits: free {}/window, premium {}/window, window {}s",
        config.free_rate_limit,
        config.premium_rate_limit,
        config.rate_limit_window.as_secs()
    );

    // Build app state
    let state = AppState {
        db,
        s3,
        llm,
        http,
        mailer,
        pdf,
        limits,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "tailorcv-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .load()
        .await;

    aws_sdk_s3::Client::new(&s3_config)
}
