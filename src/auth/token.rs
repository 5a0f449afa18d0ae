use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::auth::identity::UserId;
use crate::constants::{ACCESS_TOKEN_TTL_SECS, TOKEN_ISSUER};
use crate::error::{ChirpyError, Result};

/// JWT Claims structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Issuer, always the service name
    pub iss: String,
    /// Subject (user ID)
    pub sub: String,
    /// Issued at (as UTC timestamp)
    pub iat: i64,
    /// Expiration time (as UTC timestamp)
    pub exp: i64,
}

impl Claims {
    /// Creates claims for a user, valid for one hour from `now`
    pub fn new(user_id: UserId, now: DateTime<Utc>) -> Self {
        let issued_at = now.timestamp();
        Self {
            iss: TOKEN_ISSUER.to_string(),
            sub: user_id.to_string(),
            iat: issued_at,
            exp: issued_at + ACCESS_TOKEN_TTL_SECS,
        }
    }

    /// A token is dead from the second its `exp` is reached
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }
}

/// Issues and verifies HS256 access tokens with a process-wide secret
pub struct TokenManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    has_key: bool,
}

impl TokenManager {
    /// Creates a new token manager with a secret
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against the caller's clock in `verify_at`
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_issuer(&[TOKEN_ISSUER]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            has_key: !secret.is_empty(),
        }
    }

    /// Issues an access token for `user_id`
    pub fn issue(&self, user_id: UserId) -> Result<String> {
        self.issue_at(user_id, Utc::now())
    }

    pub fn issue_at(&self, user_id: UserId, now: DateTime<Utc>) -> Result<String> {
        if !self.has_key {
            return Err(ChirpyError::SigningError("signing key is empty".to_string()));
        }
        let claims = Claims::new(user_id, now);
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| ChirpyError::SigningError(e.to_string()))
    }

    /// Verifies a token and returns the user it was issued to
    pub fn verify(&self, token: &str) -> Result<UserId> {
        self.verify_at(token, Utc::now())
    }

    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<UserId> {
        if !self.has_key {
            return Err(ChirpyError::InvalidToken("no verification key".to_string()));
        }

        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| ChirpyError::InvalidToken(e.to_string()))?
            .claims;

        if claims.is_expired_at(now) {
            return Err(ChirpyError::InvalidToken("token expired".to_string()));
        }

        claims
            .sub
            .parse::<UserId>()
            .map_err(|_| ChirpyError::InvalidToken("subject is not a user id".to_string()))
    }

    /// Lifetime of every issued access token
    pub fn ttl() -> Duration {
        Duration::seconds(ACCESS_TOKEN_TTL_SECS)
    }
}
