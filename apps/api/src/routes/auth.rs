//! Google sign-in, logout, and current-user endpoints.

use axum::{extract::State, http::HeaderMap, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::auth;
use crate::errors::AppError;
use crate::models::user::UserRow;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GoogleLoginRequest {
    /// The Google ID token from the frontend sign-in flow.
    #[serde(alias = "idToken", alias = "credential")]
    pub token: String,
}

/// POST /api/auth/google
/// Verifies the Google ID token, creates/updates the user, opens a session.
pub async fn handle_google_login(
    State(state): State<AppState>,
    Json(body): Json<GoogleLoginRequest>,
) -> Result<Json<Value>, AppError> {
    let claims =
        auth::google::verify_id_token(&state.http, &state.config.google_client_id, &body.token)
            .await?;

    let user = auth::upsert_google_user(&state.db, &claims).await?;
    let session = auth::sessions::create_session(&state.db, user.id).await?;

    info!(user_id = %user.id, "user signed in via Google");

    Ok(Json(json!({
        "token": session.session_token,
        "user": user_payload(&user),
    })))
}

/// POST /api/auth/logout
/// Deletes the presented session. Idempotent; succeeds even without a token.
pub async fn handle_logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, AppError> {
    if let Some(token) = auth::bearer_token(&headers) {
        auth::sessions::delete_session(&state.db, token).await?;
    }
    Ok(Json(json!({ "success": true })))
}

/// GET /api/auth/me
pub async fn handle_me(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, AppError> {
    let user = auth::require_user(&state, &headers).await?;
    Ok(Json(json!({ "user": user_payload(&user) })))
}

fn user_payload(user: &UserRow) -> Value {
    json!({
        "id": user.id,
        "email": user.email,
        "name": user.name,
        "picture": user.profile_picture,
        "isPremium": user.is_premium,
        "generationCount": user.generation_count,
    })
}
