//! Abstract storage interfaces for pluggable backends
//!
//! The auth core only ever talks to [`RefreshTokenRepository`]; user and
//! chirp storage belong to the HTTP layer.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::auth::identity::UserId;
use crate::error::Result;

/// User account row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredUser {
    pub id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub email: String,
    pub hashed_password: String,
    pub is_chirpy_red: bool,
}

/// Chirp row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredChirp {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub body: String,
    pub user_id: UserId,
}

/// Refresh token row, keyed by the token value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshTokenRecord {
    pub token: String,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
}

/// User account storage interface
#[async_trait]
pub trait UserStorage: Send + Sync {
    /// Create a user; emails are unique
    async fn create_user(&self, email: &str, hashed_password: &str) -> Result<StoredUser>;

    async fn get_user_by_email(&self, email: &str) -> Result<Option<StoredUser>>;

    /// Replace a user's email and password hash
    async fn update_credentials(
        &self,
        id: UserId,
        email: &str,
        hashed_password: &str,
    ) -> Result<StoredUser>;

    /// Mark a user as a Chirpy Red subscriber
    async fn upgrade_user(&self, id: UserId) -> Result<StoredUser>;

    /// Delete every user together with everything they own. Returns the
    /// number of users removed.
    async fn delete_all_users(&self) -> Result<usize>;
}

/// Chirp storage interface
#[async_trait]
pub trait ChirpStorage: Send + Sync {
    async fn create_chirp(&self, user_id: UserId, body: &str) -> Result<StoredChirp>;

    async fn get_chirp(&self, id: Uuid) -> Result<Option<StoredChirp>>;

    /// All chirps, optionally by one author, oldest first
    async fn list_chirps(&self, author: Option<UserId>) -> Result<Vec<StoredChirp>>;

    /// Returns false if no such chirp existed
    async fn delete_chirp(&self, id: Uuid) -> Result<bool>;
}

/// Refresh token persistence interface.
///
/// Each call must be atomic on its own; the refresh token store holds no
/// state besides what this returns.
#[async_trait]
pub trait RefreshTokenRepository: Send + Sync {
    async fn insert(&self, record: RefreshTokenRecord) -> Result<()>;

    async fn find_by_token(&self, token: &str) -> Result<Option<RefreshTokenRecord>>;

    /// Set `revoked_at` if it is not already set. Returns false if the token
    /// is unknown.
    async fn mark_revoked(&self, token: &str, at: DateTime<Utc>) -> Result<bool>;
}
