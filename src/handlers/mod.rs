//! HTTP layer: warp filters wiring requests to the auth core and storage

pub mod admin;
pub mod auth;
pub mod chirps;
pub mod users;
pub mod webhook;

use serde::{de::DeserializeOwned, Serialize};
use std::convert::Infallible;
use std::sync::Arc;
use warp::http::StatusCode;
use warp::hyper::body::Bytes;
use warp::reply::Response;
use warp::{Filter, Rejection, Reply};

use crate::auth::{AuthGuard, RefreshTokenStore, TokenManager};
use crate::config::ServerConfig;
use crate::error::ChirpyError;
use crate::metrics::{AtomicHitCounter, SharedHitCounter};
use crate::security_logger::{log_security_event, SecurityEvent};
use crate::storage::traits::{ChirpStorage, RefreshTokenRepository, UserStorage};

const MAX_BODY_BYTES: u64 = 16 * 1024;

/// Everything a request handler needs, cheap to clone per request
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub tokens: Arc<TokenManager>,
    pub refresh_tokens: RefreshTokenStore,
    pub guard: AuthGuard,
    pub users: Arc<dyn UserStorage>,
    pub chirps: Arc<dyn ChirpStorage>,
    pub hits: SharedHitCounter,
}

impl AppState {
    /// Builds state over one backend that stores users, chirps and refresh
    /// tokens together
    pub fn new<S>(config: ServerConfig, storage: Arc<S>) -> Self
    where
        S: UserStorage + ChirpStorage + RefreshTokenRepository + 'static,
    {
        let tokens = Arc::new(TokenManager::new(&config.jwt_secret));
        let refresh_tokens = RefreshTokenStore::new(storage.clone(), config.store_timeout);
        Self {
            guard: AuthGuard::new(tokens.clone()),
            tokens,
            refresh_tokens,
            users: storage.clone(),
            chirps: storage,
            hits: Arc::new(AtomicHitCounter::new()),
            config: Arc::new(config),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

pub fn json_reply<T: Serialize>(value: &T, status: StatusCode) -> Response {
    warp::reply::with_status(warp::reply::json(value), status).into_response()
}

pub fn empty_reply(status: StatusCode) -> Response {
    warp::reply::with_status(warp::reply(), status).into_response()
}

/// Renders an error for the client. Server faults are logged with their
/// cause and shown as a generic message.
pub fn error_reply(err: &ChirpyError) -> Response {
    if err.is_server_fault() {
        log_security_event(&SecurityEvent::ServerFault {
            operation: "request".to_string(),
            error: err.to_string(),
        });
    }
    json_reply(
        &ErrorBody {
            error: err.client_message(),
        },
        err.status_code(),
    )
}

/// Collapses credential-level failures to `Unauthorized`, keeping server
/// faults as they are
pub fn unauthorized_unless_fault(err: ChirpyError) -> ChirpyError {
    if err.is_server_fault() {
        return err;
    }
    log_security_event(&SecurityEvent::AuthenticationFailed {
        reason: err.to_string(),
    });
    ChirpyError::Unauthorized
}

/// Turns a handler's result into a response
pub fn respond<T: Serialize>(
    result: crate::error::Result<T>,
    status: StatusCode,
) -> Result<Response, Infallible> {
    Ok(match result {
        Ok(value) => json_reply(&value, status),
        Err(e) => error_reply(&e),
    })
}

fn with_state(state: AppState) -> impl Filter<Extract = (AppState,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}

/// Body that could not be parsed as JSON
#[derive(Debug)]
struct InvalidJson;

impl warp::reject::Reject for InvalidJson {}

fn raw_body() -> impl Filter<Extract = (Bytes,), Error = Rejection> + Clone {
    warp::body::content_length_limit(MAX_BODY_BYTES).and(warp::body::bytes())
}

/// JSON body, parsed whatever content type the client declared
fn json_body<T: DeserializeOwned + Send>() -> impl Filter<Extract = (T,), Error = Rejection> + Clone {
    raw_body().and_then(|body: Bytes| async move {
        serde_json::from_slice::<T>(&body).map_err(|e| {
            log::debug!("Rejecting request body: {}", e);
            warp::reject::custom(InvalidJson)
        })
    })
}

fn count_hit(state: AppState) -> impl Filter<Extract = (), Error = Infallible> + Clone {
    warp::any()
        .map(move || {
            state.hits.increment();
        })
        .untuple_one()
}

/// All routes of the API
pub fn routes(state: AppState) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    let headers = warp::header::headers_cloned();

    let app = warp::path("app")
        .and(count_hit(state.clone()))
        .and(warp::fs::dir(state.config.filepath_root.clone()));

    let healthz = warp::get()
        .and(warp::path!("api" / "healthz"))
        .map(|| warp::reply::with_header("OK", "content-type", "text/plain; charset=utf-8"));

    let metrics = warp::get()
        .and(warp::path!("admin" / "metrics"))
        .and(with_state(state.clone()))
        .map(admin::metrics_page);

    let reset = warp::post()
        .and(warp::path!("admin" / "reset"))
        .and(with_state(state.clone()))
        .and_then(admin::reset);

    let create_user = warp::post()
        .and(warp::path!("api" / "users"))
        .and(json_body())
        .and(with_state(state.clone()))
        .and_then(users::create_user);

    let update_user = warp::put()
        .and(warp::path!("api" / "users"))
        .and(headers.clone())
        .and(json_body())
        .and(with_state(state.clone()))
        .and_then(users::update_user);

    let login = warp::post()
        .and(warp::path!("api" / "login"))
        .and(json_body())
        .and(with_state(state.clone()))
        .and_then(auth::login);

    let refresh = warp::post()
        .and(warp::path!("api" / "refresh"))
        .and(headers.clone())
        .and(with_state(state.clone()))
        .and_then(auth::refresh);

    let revoke = warp::post()
        .and(warp::path!("api" / "revoke"))
        .and(headers.clone())
        .and(with_state(state.clone()))
        .and_then(auth::revoke);

    let list_chirps = warp::get()
        .and(warp::path!("api" / "chirps"))
        .and(warp::query::<chirps::ListChirpsQuery>())
        .and(with_state(state.clone()))
        .and_then(chirps::list_chirps);

    let get_chirp = warp::get()
        .and(warp::path!("api" / "chirps" / String))
        .and(with_state(state.clone()))
        .and_then(chirps::get_chirp);

    let create_chirp = warp::post()
        .and(warp::path!("api" / "chirps"))
        .and(headers.clone())
        .and(json_body())
        .and(with_state(state.clone()))
        .and_then(chirps::create_chirp);

    let delete_chirp = warp::delete()
        .and(warp::path!("api" / "chirps" / String))
        .and(headers.clone())
        .and(with_state(state.clone()))
        .and_then(chirps::delete_chirp);

    let polka_webhook = warp::post()
        .and(warp::path!("api" / "polka" / "webhooks"))
        .and(headers)
        .and(raw_body())
        .and(with_state(state))
        .and_then(webhook::polka_webhook);

    app.or(healthz)
        .or(metrics)
        .or(reset)
        .or(create_user)
        .or(update_user)
        .or(login)
        .or(refresh)
        .or(revoke)
        .or(list_chirps)
        .or(get_chirp)
        .or(create_chirp)
        .or(delete_chirp)
        .or(polka_webhook)
        .recover(handle_rejection)
}

/// Maps warp rejections to the JSON error shape.
///
/// `find` searches every route the request was tried against, so a method
/// mismatch from a sibling route is only reported when nothing more
/// specific went wrong.
pub async fn handle_rejection(err: Rejection) -> Result<Response, Infallible> {
    let (status, message) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, "Not found")
    } else if err.find::<InvalidJson>().is_some() {
        (StatusCode::BAD_REQUEST, "Invalid JSON")
    } else if err.find::<warp::reject::InvalidQuery>().is_some() {
        (StatusCode::BAD_REQUEST, "Invalid query")
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large")
    } else if err.find::<warp::reject::LengthRequired>().is_some() {
        (StatusCode::LENGTH_REQUIRED, "Content-Length required")
    } else if err.find::<warp::reject::UnsupportedMediaType>().is_some() {
        (StatusCode::UNSUPPORTED_MEDIA_TYPE, "Unsupported media type")
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
    } else {
        log::error!("Unhandled rejection: {:?}", err);
        (StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong")
    };

    Ok(json_reply(
        &ErrorBody {
            error: message.to_string(),
        },
        status,
    ))
}
