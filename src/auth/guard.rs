//! Request authentication and ownership checks
//!
//! A request moves from unauthenticated to authenticated by presenting a
//! valid bearer access token, and from authenticated to authorized when the
//! resolved user owns the resource being mutated. Every failed step is
//! terminal.

use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::auth::bearer::{extract_bearer, HeaderSource};
use crate::auth::identity::UserId;
use crate::auth::token::TokenManager;
use crate::error::{ChirpyError, Result};
use crate::security_logger::{log_security_event, SecurityEvent};

#[derive(Clone)]
pub struct AuthGuard {
    tokens: Arc<TokenManager>,
}

impl AuthGuard {
    pub fn new(tokens: Arc<TokenManager>) -> Self {
        Self { tokens }
    }

    /// Resolves the user behind a request's bearer access token.
    ///
    /// Missing header, malformed header and bad token all surface as
    /// `Unauthorized`; the cause is only logged.
    pub fn authenticate<H: HeaderSource + ?Sized>(&self, headers: &H) -> Result<UserId> {
        self.authenticate_at(headers, Utc::now())
    }

    pub fn authenticate_at<H: HeaderSource + ?Sized>(
        &self,
        headers: &H,
        now: DateTime<Utc>,
    ) -> Result<UserId> {
        extract_bearer(headers)
            .and_then(|token| self.tokens.verify_at(&token, now))
            .map_err(|e| {
                log_security_event(&SecurityEvent::AuthenticationFailed {
                    reason: e.to_string(),
                });
                ChirpyError::Unauthorized
            })
    }
}

/// Permits a mutation only when the caller owns the resource
pub fn authorize_owner(user_id: UserId, owner_id: UserId) -> Result<()> {
    if user_id == owner_id {
        return Ok(());
    }
    log_security_event(&SecurityEvent::PermissionDenied {
        user_id,
        action: "mutate".to_string(),
        resource: format!("owned by {}", owner_id),
    });
    Err(ChirpyError::Forbidden)
}
