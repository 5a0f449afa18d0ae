//! Chirp endpoints. Creating and deleting require an access token; deleting
//! also requires owning the chirp.

use serde::Deserialize;
use std::convert::Infallible;
use uuid::Uuid;
use warp::http::{HeaderMap, StatusCode};
use warp::reply::Response;

use super::{empty_reply, error_reply, respond, AppState};
use crate::auth::{authorize_owner, UserId};
use crate::core::{validate_chirp, Chirp};
use crate::error::{ChirpyError, Result};

#[derive(Debug, Deserialize)]
pub struct CreateChirpRequest {
    #[serde(default)]
    pub body: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListChirpsQuery {
    pub author_id: Option<String>,
    pub sort: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SortOrder {
    Asc,
    Desc,
}

impl ListChirpsQuery {
    fn author(&self) -> Result<Option<UserId>> {
        match self.author_id.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => raw
                .parse::<UserId>()
                .map(Some)
                .map_err(|_| ChirpyError::ValidationError("Invalid author_id".to_string())),
        }
    }

    fn order(&self) -> Result<SortOrder> {
        match self.sort.as_deref() {
            None | Some("") => Ok(SortOrder::Asc),
            Some(s) if s.eq_ignore_ascii_case("asc") => Ok(SortOrder::Asc),
            Some(s) if s.eq_ignore_ascii_case("desc") => Ok(SortOrder::Desc),
            Some(_) => Err(ChirpyError::ValidationError(
                "sort must be 'asc' or 'desc'".to_string(),
            )),
        }
    }
}

fn parse_chirp_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ChirpyError::ValidationError("Invalid chirp id".to_string()))
}

pub async fn create_chirp(
    headers: HeaderMap,
    body: CreateChirpRequest,
    state: AppState,
) -> std::result::Result<Response, Infallible> {
    respond(post_chirp(&state, &headers, &body).await, StatusCode::CREATED)
}

async fn post_chirp(state: &AppState, headers: &HeaderMap, body: &CreateChirpRequest) -> Result<Chirp> {
    let user_id = state.guard.authenticate(headers)?;
    let cleaned = validate_chirp(&body.body)?;
    let chirp = state.chirps.create_chirp(user_id, &cleaned).await?;
    log::debug!("User {} posted chirp {}", user_id, chirp.id);
    Ok(chirp.into())
}

pub async fn list_chirps(query: ListChirpsQuery, state: AppState) -> std::result::Result<Response, Infallible> {
    respond(fetch_chirps(&state, &query).await, StatusCode::OK)
}

async fn fetch_chirps(state: &AppState, query: &ListChirpsQuery) -> Result<Vec<Chirp>> {
    let author = query.author()?;
    let order = query.order()?;

    let mut chirps: Vec<Chirp> = state
        .chirps
        .list_chirps(author)
        .await?
        .into_iter()
        .map(Chirp::from)
        .collect();
    if order == SortOrder::Desc {
        chirps.reverse();
    }
    Ok(chirps)
}

pub async fn get_chirp(chirp_id: String, state: AppState) -> std::result::Result<Response, Infallible> {
    respond(fetch_chirp(&state, &chirp_id).await, StatusCode::OK)
}

async fn fetch_chirp(state: &AppState, chirp_id: &str) -> Result<Chirp> {
    let id = parse_chirp_id(chirp_id)?;
    state
        .chirps
        .get_chirp(id)
        .await?
        .map(Chirp::from)
        .ok_or_else(|| ChirpyError::NotFound("Chirp".to_string()))
}

pub async fn delete_chirp(
    chirp_id: String,
    headers: HeaderMap,
    state: AppState,
) -> std::result::Result<Response, Infallible> {
    Ok(match remove_chirp(&state, &headers, &chirp_id).await {
        Ok(()) => empty_reply(StatusCode::NO_CONTENT),
        Err(e) => error_reply(&e),
    })
}

async fn remove_chirp(state: &AppState, headers: &HeaderMap, chirp_id: &str) -> Result<()> {
    let user_id = state.guard.authenticate(headers)?;
    let id = parse_chirp_id(chirp_id)?;

    let chirp = state
        .chirps
        .get_chirp(id)
        .await?
        .ok_or_else(|| ChirpyError::NotFound("Chirp".to_string()))?;
    authorize_owner(user_id, chirp.user_id)?;

    if !state.chirps.delete_chirp(id).await? {
        // deleted concurrently
        return Err(ChirpyError::NotFound("Chirp".to_string()));
    }
    log::info!("User {} deleted chirp {}", user_id, id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_defaults() {
        let query = ListChirpsQuery::default();
        assert_eq!(query.author().unwrap(), None);
        assert_eq!(query.order().unwrap(), SortOrder::Asc);
    }

    #[test]
    fn test_query_parsing() {
        let id = UserId::new();
        let query = ListChirpsQuery {
            author_id: Some(id.to_string()),
            sort: Some("DESC".to_string()),
        };
        assert_eq!(query.author().unwrap(), Some(id));
        assert_eq!(query.order().unwrap(), SortOrder::Desc);

        let bad = ListChirpsQuery {
            author_id: Some("nobody".to_string()),
            sort: Some("sideways".to_string()),
        };
        assert!(bad.author().is_err());
        assert!(bad.order().is_err());
    }
}
