//! GET /api/user/status — premium status lookup by email.
//!
//! Exists for guests who paid without signing in: the frontend polls this to
//! discover when an operator has approved their payment.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth;
use crate::errors::AppError;
use crate::state::AppState;
use crate::validators;

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub email: String,
}

pub async fn handle_user_status(
    State(state): State<AppState>,
    Query(query): Query<StatusQuery>,
) -> Result<Json<Value>, AppError> {
    let email = query.email.trim().to_lowercase();
    validators::validate_email(&email)?;

    let (known,): (bool,) = sqlx::query_as(
        "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1) \
             OR EXISTS(SELECT 1 FROM payments WHERE email = $1)",
    )
    .bind(&email)
    .fetch_one(&state.db)
    .await?;

    if !known {
        return Err(AppError::NotFound(
            "No account or payment found for this email".to_string(),
        ));
    }

    let is_premium = auth::premium_by_email(&state.db, &email).await?;

    Ok(Json(json!({
        "email": email,
        "isPremium": is_premium,
    })))
}
