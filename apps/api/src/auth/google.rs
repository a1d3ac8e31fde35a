//! Google ID-token verification via the tokeninfo endpoint.
//!
//! The token arrives from the frontend's Google Sign-In flow. Verification is
//! delegated to Google: a valid, unexpired token makes tokeninfo return the
//! decoded claims with 200; anything else is a 4xx. We additionally check the
//! audience against our own client id so tokens minted for another app are
//! rejected.

use reqwest::Client;
use serde::Deserialize;
use tracing::warn;

use crate::errors::AppError;

const TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";

#[derive(Debug, Deserialize)]
pub struct GoogleClaims {
    /// Google's stable account id.
    pub sub: String,
    pub aud: String,
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub picture: String,
}

pub async fn verify_id_token(
    http: &Client,
    google_client_id: &str,
    id_token: &str,
) -> Result<GoogleClaims, AppError> {
    let response = http
        .get(TOKENINFO_URL)
        .query(&[("id_token", id_token)])
        .send()
        .await
        .map_err(|e| AppError::ServiceUnavailable(format!("Google tokeninfo unreachable: {e}")))?;

    if !response.status().is_success() {
        warn!("Google tokeninfo rejected token: {}", response.status());
        return Err(AppError::Unauthorized);
    }

    let claims: GoogleClaims = response.json().await.map_err(|e| {
        warn!("Google tokeninfo returned unparseable body: {e}");
        AppError::Unauthorized
    })?;

    if claims.aud != google_client_id {
        warn!("Google token audience mismatch");
        return Err(AppError::Unauthorized);
    }

    Ok(claims)
}
