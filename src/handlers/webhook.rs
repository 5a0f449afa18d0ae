//! Polka payment webhook

use serde::Deserialize;
use std::convert::Infallible;
use warp::http::{HeaderMap, StatusCode};
use warp::hyper::body::Bytes;
use warp::reply::Response;

use super::{empty_reply, error_reply, AppState};
use crate::auth::{extract_api_key, UserId};
use crate::error::{ChirpyError, Result};
use crate::security::constant_time_eq;
use crate::security_logger::{log_security_event, SecurityEvent};

const USER_UPGRADED: &str = "user.upgraded";

#[derive(Debug, Deserialize)]
pub struct WebhookData {
    pub user_id: UserId,
}

#[derive(Debug, Deserialize)]
pub struct WebhookEvent {
    pub event: String,
    pub data: WebhookData,
}

/// The API key is checked before the body is parsed
pub async fn polka_webhook(
    headers: HeaderMap,
    body: Bytes,
    state: AppState,
) -> std::result::Result<Response, Infallible> {
    Ok(match handle_event(&state, &headers, &body).await {
        Ok(()) => empty_reply(StatusCode::NO_CONTENT),
        Err(e) => error_reply(&e),
    })
}

fn check_api_key(state: &AppState, headers: &HeaderMap) -> Result<()> {
    let reject = |reason: &str| {
        log_security_event(&SecurityEvent::WebhookRejected {
            reason: reason.to_string(),
        });
        ChirpyError::Unauthorized
    };

    let expected = state
        .config
        .polka_key
        .as_deref()
        .ok_or_else(|| reject("no webhook key configured"))?;
    let presented = extract_api_key(headers).map_err(|e| reject(&e.to_string()))?;

    if !constant_time_eq(&presented, expected) {
        return Err(reject("api key mismatch"));
    }
    Ok(())
}

async fn handle_event(state: &AppState, headers: &HeaderMap, body: &[u8]) -> Result<()> {
    check_api_key(state, headers)?;

    let event: WebhookEvent = serde_json::from_slice(body)
        .map_err(|_| ChirpyError::ValidationError("Invalid JSON".to_string()))?;

    if event.event != USER_UPGRADED {
        log::debug!("Ignoring webhook event {}", event.event);
        return Ok(());
    }

    let user = state.users.upgrade_user(event.data.user_id).await?;
    log::info!("User {} upgraded to Chirpy Red", user.id);
    Ok(())
}
