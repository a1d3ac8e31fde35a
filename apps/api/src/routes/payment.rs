//! POST /api/payment/upload — premium payment screenshot submission.
//!
//! Payments are reviewed manually: the screenshot lands in S3, a pending row
//! is created, and the admin gets an email. Approval flips the row's status,
//! which `premium_by_email` picks up on the next generation.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;
use crate::storage;
use crate::validators::{self, SCREENSHOT_CONTENT_TYPES};

pub async fn handle_payment_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Value>, AppError> {
    let mut email: Option<String> = None;
    let mut screenshot: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        match field.name().unwrap_or_default() {
            "email" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Unreadable field: {e}")))?;
                email = Some(value.trim().to_lowercase());
            }
            "screenshot" => {
                let content_type = field.content_type().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Unreadable upload: {e}")))?;
                screenshot = Some((content_type, bytes.to_vec()));
            }
            _ => {}
        }
    }

    let email = email
        .filter(|e| !e.is_empty())
        .ok_or_else(|| AppError::Validation("Missing 'email' field".to_string()))?;
    validators::validate_email(&email)?;

    let (content_type, bytes) = screenshot
        .ok_or_else(|| AppError::Validation("Missing 'screenshot' file".to_string()))?;
    validators::validate_upload(&content_type, bytes.len(), SCREENSHOT_CONTENT_TYPES)?;

    let extension = match content_type.split(';').next().unwrap_or_default().trim() {
        "image/png" => "png",
        "image/webp" => "webp",
        _ => "jpg",
    };
    let key = format!("payments/{}.{extension}", Uuid::new_v4());
    let screenshot_url =
        storage::upload(&state.s3, &state.config, &key, bytes, &content_type).await?;

    sqlx::query(
        r#"
        INSERT INTO payments (id, email, screenshot_url, status, created_at, updated_at)
        VALUES ($1, $2, $3, 'pending', now(), now())
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&email)
    .bind(&screenshot_url)
    .execute(&state.db)
    .await?;

    info!(%email, "payment screenshot submitted for review");

    {
        let mailer = state.mailer.clone();
        let email = email.clone();
        let url = screenshot_url.clone();
        tokio::spawn(async move {
            mailer.notify_payment_submitted(&email, &url).await;
        });
    }

    Ok(Json(json!({
        "status": "pending",
        "message": "Payment submitted. Premium access is activated after review.",
        "screenshotUrl": screenshot_url,
    })))
}
