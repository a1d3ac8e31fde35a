//! Opaque session tokens stored in Postgres.
//!
//! A session is created on Google sign-in and lives for seven days. Tokens
//! are 64 hex characters of random material; the token itself carries no
//! claims, everything is looked up server-side. Expired sessions are deleted
//! lazily when a request presents them.

use chrono::{Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::{SessionRow, UserRow};

pub const SESSION_TTL_DAYS: i64 = 7;

/// 64 hex chars of randomness. Two v4 UUIDs give 122 bits of entropy each,
/// which is plenty for an unguessable bearer token.
fn new_session_token() -> String {
    format!(
        "{}{}",
        Uuid::new_v4().simple(),
        Uuid::new_v4().simple()
    )
}

pub async fn create_session(db: &PgPool, user_id: Uuid) -> Result<SessionRow, AppError> {
    let token = new_session_token();
    let expires_at = Utc::now() + Duration::days(SESSION_TTL_DAYS);

    let session = sqlx::query_as::<_, SessionRow>(
        r#"
        INSERT INTO sessions (id, user_id, session_token, expires_at, last_accessed, created_at)
        VALUES ($1, $2, $3, $4, now(), now())
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(&token)
    .bind(expires_at)
    .fetch_one(db)
    .await?;

    Ok(session)
}

/// Resolves a session token to its user. Expired sessions are deleted and
/// treated as absent; live ones get their `last_accessed` bumped.
pub async fn verify_session(db: &PgPool, token: &str) -> Result<Option<UserRow>, AppError> {
    let session = sqlx::query_as::<_, SessionRow>(
        "SELECT * FROM sessions WHERE session_token = $1",
    )
    .bind(token)
    .fetch_optional(db)
    .await?;

    let Some(session) = session else {
        return Ok(None);
    };

    if session.expires_at <= Utc::now() {
        sqlx::query("DELETE FROM sessions WHERE id = $1")
            .bind(session.id)
            .execute(db)
            .await?;
        return Ok(None);
    }

    sqlx::query("UPDATE sessions SET last_accessed = now() WHERE id = $1")
        .bind(session.id)
        .execute(db)
        .await?;

    let user = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = $1")
        .bind(session.user_id)
        .fetch_optional(db)
        .await?;

    Ok(user)
}

pub async fn delete_session(db: &PgPool, token: &str) -> Result<(), AppError> {
    sqlx::query("DELETE FROM sessions WHERE session_token = $1")
        .bind(token)
        .execute(db)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_token_is_64_hex_chars() {
        let token = new_session_token();
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_session_tokens_are_unique() {
        assert_ne!(new_session_token(), new_session_token());
    }
}
