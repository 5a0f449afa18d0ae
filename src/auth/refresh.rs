//! Opaque refresh tokens
//!
//! Tokens are 32 random bytes, hex encoded, stored server-side with an
//! expiry and an optional revocation time. Redeeming does not consume the
//! token: it stays usable until it expires or is revoked. Expiry is only
//! checked at redemption; expired rows are never swept here.

use chrono::{DateTime, Duration, Utc};
use rand::rngs::OsRng;
use rand::RngCore;
use std::future::Future;
use std::sync::Arc;

use crate::auth::identity::UserId;
use crate::constants::{REFRESH_TOKEN_BYTES, REFRESH_TOKEN_TTL_DAYS};
use crate::error::{ChirpyError, Result};
use crate::security_logger::{log_security_event, token_fingerprint, SecurityEvent};
use crate::storage::traits::{RefreshTokenRecord, RefreshTokenRepository};

/// Shared reference to a refresh token repository
pub type SharedRefreshTokenRepository = Arc<dyn RefreshTokenRepository>;

/// Generates a new refresh token value from the OS entropy source
pub fn generate_refresh_token() -> Result<String> {
    let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| ChirpyError::GenerationError(e.to_string()))?;
    Ok(hex::encode(bytes))
}

/// Issues, redeems and revokes refresh tokens
#[derive(Clone)]
pub struct RefreshTokenStore {
    repository: SharedRefreshTokenRepository,
    timeout: std::time::Duration,
}

impl RefreshTokenStore {
    /// Every repository call is bounded by `timeout`
    pub fn new(repository: SharedRefreshTokenRepository, timeout: std::time::Duration) -> Self {
        Self {
            repository,
            timeout,
        }
    }

    /// Lifetime of every issued refresh token
    pub fn ttl() -> Duration {
        Duration::days(REFRESH_TOKEN_TTL_DAYS)
    }

    pub async fn issue(&self, user_id: UserId) -> Result<String> {
        self.issue_at(user_id, Utc::now()).await
    }

    pub async fn issue_at(&self, user_id: UserId, now: DateTime<Utc>) -> Result<String> {
        let token = generate_refresh_token()?;
        let record = RefreshTokenRecord {
            token: token.clone(),
            user_id,
            created_at: now,
            expires_at: now + Self::ttl(),
            revoked_at: None,
        };
        self.bounded(self.repository.insert(record)).await?;

        log::debug!(
            "Issued refresh token {} for user {}",
            token_fingerprint(&token),
            user_id
        );
        Ok(token)
    }

    /// Returns the user a token belongs to, if it is still live
    pub async fn redeem(&self, token: &str) -> Result<UserId> {
        self.redeem_at(token, Utc::now()).await
    }

    pub async fn redeem_at(&self, token: &str, now: DateTime<Utc>) -> Result<UserId> {
        let record = self
            .bounded(self.repository.find_by_token(token))
            .await?
            .ok_or(ChirpyError::TokenNotFound)?;

        if record.revoked_at.is_some() {
            return Err(ChirpyError::TokenRevoked);
        }
        if now >= record.expires_at {
            return Err(ChirpyError::TokenExpired);
        }
        Ok(record.user_id)
    }

    /// Revokes a token. Revoking twice succeeds and keeps the first
    /// revocation time.
    pub async fn revoke(&self, token: &str) -> Result<()> {
        self.revoke_at(token, Utc::now()).await
    }

    pub async fn revoke_at(&self, token: &str, now: DateTime<Utc>) -> Result<()> {
        let found = self
            .bounded(self.repository.mark_revoked(token, now))
            .await?;
        if !found {
            return Err(ChirpyError::TokenNotFound);
        }

        log_security_event(&SecurityEvent::TokenRevoked {
            token_id: token_fingerprint(token).to_string(),
        });
        Ok(())
    }

    async fn bounded<T>(&self, operation: impl Future<Output = Result<T>>) -> Result<T> {
        match tokio::time::timeout(self.timeout, operation).await {
            Ok(result) => result,
            Err(_) => {
                log::warn!("Refresh token store call exceeded {:?}", self.timeout);
                Err(ChirpyError::Canceled)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use async_trait::async_trait;

    fn store() -> RefreshTokenStore {
        RefreshTokenStore::new(
            Arc::new(MemoryStorage::new()),
            std::time::Duration::from_secs(5),
        )
    }

    /// Repository that never answers in time
    struct StalledRepository;

    #[async_trait]
    impl RefreshTokenRepository for StalledRepository {
        async fn insert(&self, _record: RefreshTokenRecord) -> Result<()> {
            tokio::time::sleep(std::time::Duration::from_secs(30)).await;
            Ok(())
        }

        async fn find_by_token(&self, _token: &str) -> Result<Option<RefreshTokenRecord>> {
            tokio::time::sleep(std::time::Duration::from_secs(30)).await;
            Ok(None)
        }

        async fn mark_revoked(&self, _token: &str, _at: DateTime<Utc>) -> Result<bool> {
            tokio::time::sleep(std::time::Duration::from_secs(30)).await;
            Ok(true)
        }
    }

    #[test]
    fn test_generated_token_shape() {
        let token = generate_refresh_token().unwrap();
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(token, generate_refresh_token().unwrap());
    }

    #[tokio::test]
    async fn test_redeem_is_repeatable() {
        let store = store();
        let user = UserId::new();
        let token = store.issue(user).await.unwrap();

        assert_eq!(store.redeem(&token).await.unwrap(), user);
        assert_eq!(store.redeem(&token).await.unwrap(), user);
    }

    #[tokio::test]
    async fn test_expiry_boundary() {
        let store = store();
        let user = UserId::new();
        let issued = Utc::now();
        let token = store.issue_at(user, issued).await.unwrap();

        let just_before = issued + RefreshTokenStore::ttl() - Duration::seconds(1);
        assert_eq!(store.redeem_at(&token, just_before).await.unwrap(), user);

        let at_expiry = issued + RefreshTokenStore::ttl();
        assert!(matches!(
            store.redeem_at(&token, at_expiry).await,
            Err(ChirpyError::TokenExpired)
        ));
    }

    #[tokio::test]
    async fn test_revoked_beats_expired() {
        let store = store();
        let issued = Utc::now();
        let token = store.issue_at(UserId::new(), issued).await.unwrap();
        store.revoke_at(&token, issued).await.unwrap();

        let later = issued + Duration::days(90);
        assert!(matches!(
            store.redeem_at(&token, later).await,
            Err(ChirpyError::TokenRevoked)
        ));
    }

    #[tokio::test]
    async fn test_revoke_unknown_token() {
        let store = store();
        assert!(matches!(
            store.revoke("deadbeef").await,
            Err(ChirpyError::TokenNotFound)
        ));
    }

    #[tokio::test]
    async fn test_stalled_repository_is_canceled() {
        let store = RefreshTokenStore::new(
            Arc::new(StalledRepository),
            std::time::Duration::from_millis(20),
        );

        assert!(matches!(
            store.issue(UserId::new()).await,
            Err(ChirpyError::Canceled)
        ));
        assert!(matches!(
            store.redeem("abc").await,
            Err(ChirpyError::Canceled)
        ));
        assert!(matches!(
            store.revoke("abc").await,
            Err(ChirpyError::Canceled)
        ));
    }
}
