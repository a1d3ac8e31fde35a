//! Authentication: Google sign-in, Postgres-backed sessions, and premium
//! status resolution.
//!
//! Authentication is optional on the generation endpoint (guests may
//! generate), so the bearer helper returns `Option<UserRow>` rather than
//! failing. Endpoints that require a user call `require_user`.

pub mod google;
pub mod sessions;

use axum::http::{header, HeaderMap};
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::UserRow;
use crate::state::AppState;

/// Extracts the bearer token from the Authorization header, if present.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Resolves the caller from the Authorization header. A missing header is
/// not an error; an invalid or expired token resolves to `None` too, so a
/// stale session degrades to guest access instead of breaking generation.
pub async fn current_user(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<Option<UserRow>, AppError> {
    let Some(token) = bearer_token(headers) else {
        return Ok(None);
    };
    sessions::verify_session(&state.db, token).await
}

pub async fn require_user(state: &AppState, headers: &HeaderMap) -> Result<UserRow, AppError> {
    current_user(state, headers)
        .await?
        .ok_or(AppError::Unauthorized)
}

/// Creates or refreshes the user row for a verified set of Google claims.
pub async fn upsert_google_user(
    db: &PgPool,
    claims: &google::GoogleClaims,
) -> Result<UserRow, AppError> {
    let user = sqlx::query_as::<_, UserRow>(
        r#"
        INSERT INTO users (id, google_id, email, name, profile_picture,
                           is_premium, generation_count, last_login, created_at)
        VALUES ($1, $2, $3, $4, $5, false, 0, $6, now())
        ON CONFLICT (google_id) DO UPDATE
            SET email = EXCLUDED.email,
                name = EXCLUDED.name,
                profile_picture = EXCLUDED.profile_picture,
                last_login = EXCLUDED.last_login
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&claims.sub)
    .bind(&claims.email)
    .bind(&claims.name)
    .bind(&claims.picture)
    .bind(Utc::now())
    .fetch_one(db)
    .await?;

    Ok(user)
}

/// Premium check for guests: an approved payment for this email grants
/// premium even without a user row.
pub async fn premium_by_email(db: &PgPool, email: &str) -> Result<bool, AppError> {
    let approved: Option<(Uuid,)> = sqlx::query_as(
        "SELECT id FROM payments WHERE email = $1 AND status = 'approved' LIMIT 1",
    )
    .bind(email)
    .fetch_optional(db)
    .await?;

    if approved.is_some() {
        return Ok(true);
    }

    let premium_user: Option<(bool,)> =
        sqlx::query_as("SELECT is_premium FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(db)
            .await?;

    Ok(premium_user.map(|(p,)| p).unwrap_or(false))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer abc123"),
        );
        assert_eq!(bearer_token(&headers), Some("abc123"));
    }

    #[test]
    fn test_bearer_token_missing_header() {
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn test_bearer_token_wrong_scheme() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Basic dXNlcjpwYXNz"),
        );
        assert_eq!(bearer_token(&headers), None);
    }

    #[test]
    fn test_bearer_token_empty_value() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&headers), None);
    }
}
