//! Admin endpoints: visit metrics and the dev-only reset

use serde::Serialize;
use std::convert::Infallible;
use warp::http::StatusCode;
use warp::reply::Response;
use warp::Reply;

use super::{respond, AppState};
use crate::error::{ChirpyError, Result};
use crate::metrics::render_metrics_page;

#[derive(Debug, Serialize)]
pub struct ResetResponse {
    pub message: String,
    pub users_deleted: usize,
}

pub fn metrics_page(state: AppState) -> Response {
    warp::reply::html(render_metrics_page(state.hits.load())).into_response()
}

pub async fn reset(state: AppState) -> std::result::Result<Response, Infallible> {
    respond(reset_all(&state).await, StatusCode::OK)
}

async fn reset_all(state: &AppState) -> Result<ResetResponse> {
    if !state.config.is_dev() {
        log::warn!("Rejected reset request outside the dev platform");
        return Err(ChirpyError::Forbidden);
    }

    let users_deleted = state.users.delete_all_users().await?;
    state.hits.reset();
    Ok(ResetResponse {
        message: "Metrics reset successfully and users deleted.".to_string(),
        users_deleted,
    })
}
