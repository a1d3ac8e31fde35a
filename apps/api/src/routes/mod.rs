pub mod auth;
pub mod generate;
pub mod health;
pub mod payment;
pub mod user;

use std::net::SocketAddr;

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderMap,
    routing::{get, post},
    Router,
};

use crate::state::AppState;
use crate::validators::MAX_UPLOAD_BYTES;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/auth/google", post(auth::handle_google_login))
        .route("/api/auth/logout", post(auth::handle_logout))
        .route("/api/auth/me", get(auth::handle_me))
        .route("/api/generate-resume", post(generate::handle_generate))
        .route("/api/payment/upload", post(payment::handle_payment_upload))
        .route("/api/user/status", get(user::handle_user_status))
        // Multipart bodies carry the resume PDF; leave headroom over the
        // per-file cap for the other form fields.
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + 64 * 1024))
        .with_state(state)
}

/// Resolves the client IP, preferring the first X-Forwarded-For hop (the
/// service runs behind a proxy in production).
pub(crate) fn client_ip(headers: &HeaderMap, addr: &SocketAddr) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|ip| ip.trim().to_string())
        .filter(|ip| !ip.is_empty())
        .unwrap_or_else(|| addr.ip().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_client_ip_prefers_forwarded_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.9, 10.0.0.1"),
        );
        let addr: SocketAddr = "127.0.0.1:9999".parse().unwrap();
        assert_eq!(client_ip(&headers, &addr), "203.0.113.9");
    }

    #[test]
    fn test_client_ip_falls_back_to_socket_addr() {
        let addr: SocketAddr = "192.0.2.4:1234".parse().unwrap();
        assert_eq!(client_ip(&HeaderMap::new(), &addr), "192.0.2.4");
    }
}
