//! Login and token lifecycle endpoints

use serde::Serialize;
use std::convert::Infallible;
use std::time::Duration;
use warp::http::{HeaderMap, StatusCode};
use warp::reply::Response;

use super::users::require_credentials;
use super::{empty_reply, error_reply, respond, unauthorized_unless_fault, AppState};
use crate::auth::{extract_bearer, UserId};
use crate::constants::MIN_LOGIN_FAILURE_MS;
use crate::core::{AuthenticatedUser, Credentials};
use crate::error::{ChirpyError, Result};
use crate::security::AuthTimer;
use crate::security_logger::{log_security_event, SecurityEvent};
use crate::storage::traits::StoredUser;

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub token: String,
}

pub async fn login(body: Credentials, state: AppState) -> std::result::Result<Response, Infallible> {
    respond(authenticate_credentials(&state, &body).await, StatusCode::OK)
}

async fn authenticate_credentials(state: &AppState, body: &Credentials) -> Result<AuthenticatedUser> {
    let (email, password) = require_credentials(body)?;

    let timer = AuthTimer::new(Duration::from_millis(MIN_LOGIN_FAILURE_MS));
    let user = match check_password(state, email, password).await {
        Ok(user) => user,
        Err(e) => {
            // Pad failures so unknown emails and wrong passwords look alike
            timer.wait().await;
            return Err(e);
        }
    };

    let token = state.tokens.issue(user.id)?;
    let refresh_token = state.refresh_tokens.issue(user.id).await?;

    log_security_event(&SecurityEvent::LoginSucceeded { user_id: user.id });
    Ok(AuthenticatedUser {
        user: user.into(),
        token,
        refresh_token,
    })
}

async fn check_password(state: &AppState, email: &str, password: &str) -> Result<StoredUser> {
    let user = match state.users.get_user_by_email(email).await? {
        Some(user) => user,
        None => {
            log_security_event(&SecurityEvent::LoginFailed {
                reason: "unknown email".to_string(),
            });
            return Err(ChirpyError::Unauthorized);
        }
    };

    let password = password.to_string();
    let hashed = user.hashed_password.clone();
    let verified = tokio::task::spawn_blocking(move || crate::auth::verify_password(&password, &hashed))
        .await
        .map_err(|e| ChirpyError::HashingError(e.to_string()))?;

    match verified {
        Ok(()) => Ok(user),
        Err(ChirpyError::PasswordMismatch) => {
            log_security_event(&SecurityEvent::LoginFailed {
                reason: format!("wrong password for user {}", user.id),
            });
            Err(ChirpyError::Unauthorized)
        }
        Err(e) => Err(e),
    }
}

/// Exchanges a refresh token (as bearer) for a new access token
pub async fn refresh(headers: HeaderMap, state: AppState) -> std::result::Result<Response, Infallible> {
    respond(refresh_access_token(&state, &headers).await, StatusCode::OK)
}

async fn refresh_access_token(state: &AppState, headers: &HeaderMap) -> Result<RefreshResponse> {
    let user_id = redeem_bearer(state, headers).await.map_err(unauthorized_unless_fault)?;
    let token = state.tokens.issue(user_id)?;
    Ok(RefreshResponse { token })
}

async fn redeem_bearer(state: &AppState, headers: &HeaderMap) -> Result<UserId> {
    let refresh_token = extract_bearer(headers)?;
    state.refresh_tokens.redeem(&refresh_token).await
}

/// Revokes the refresh token presented as bearer
pub async fn revoke(headers: HeaderMap, state: AppState) -> std::result::Result<Response, Infallible> {
    Ok(match revoke_bearer(&state, &headers).await {
        Ok(()) => empty_reply(StatusCode::NO_CONTENT),
        Err(e) => error_reply(&unauthorized_unless_fault(e)),
    })
}

async fn revoke_bearer(state: &AppState, headers: &HeaderMap) -> Result<()> {
    let refresh_token = extract_bearer(headers)?;
    state.refresh_tokens.revoke(&refresh_token).await
}
