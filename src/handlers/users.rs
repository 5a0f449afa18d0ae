//! Account registration and credential updates

use std::convert::Infallible;
use warp::http::{HeaderMap, StatusCode};
use warp::reply::Response;

use super::{respond, AppState};
use crate::core::{Credentials, User};
use crate::error::{ChirpyError, Result};

/// Rejects blank email or password
pub(crate) fn require_credentials(body: &Credentials) -> Result<(&str, &str)> {
    let email = body.email.trim();
    if email.is_empty() || body.password.is_empty() {
        return Err(ChirpyError::ValidationError(
            "Email and password are required".to_string(),
        ));
    }
    Ok((email, body.password.as_str()))
}

/// Argon2 is CPU-bound; keep it off the async workers
pub(crate) async fn hash_off_thread(password: &str) -> Result<String> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || crate::auth::hash_password(&password))
        .await
        .map_err(|e| ChirpyError::HashingError(e.to_string()))?
}

pub async fn create_user(body: Credentials, state: AppState) -> std::result::Result<Response, Infallible> {
    respond(register(&state, &body).await, StatusCode::CREATED)
}

async fn register(state: &AppState, body: &Credentials) -> Result<User> {
    let (email, password) = require_credentials(body)?;
    let hashed = hash_off_thread(password).await?;
    let user = state.users.create_user(email, &hashed).await?;
    log::info!("Registered user {}", user.id);
    Ok(user.into())
}

pub async fn update_user(
    headers: HeaderMap,
    body: Credentials,
    state: AppState,
) -> std::result::Result<Response, Infallible> {
    respond(update_credentials(&state, &headers, &body).await, StatusCode::OK)
}

async fn update_credentials(state: &AppState, headers: &HeaderMap, body: &Credentials) -> Result<User> {
    let user_id = state.guard.authenticate(headers)?;
    let (email, password) = require_credentials(body)?;
    let hashed = hash_off_thread(password).await?;
    let user = state.users.update_credentials(user_id, email, &hashed).await?;
    log::info!("Updated credentials for user {}", user.id);
    Ok(user.into())
}
