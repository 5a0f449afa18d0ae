//! In-memory storage implementation for development and testing
//!
//! Keeps users, chirps and refresh tokens behind one struct so deleting a
//! user cascades the way foreign keys would in a database.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::traits::*;
use crate::auth::identity::UserId;
use crate::error::{ChirpyError, Result};

#[derive(Default)]
struct Tables {
    users: HashMap<UserId, StoredUser>,
    // insertion order is creation order
    chirps: Vec<StoredChirp>,
    refresh_tokens: HashMap<String, RefreshTokenRecord>,
}

/// In-memory storage for all Chirpy data
pub struct MemoryStorage {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            tables: Arc::new(RwLock::new(Tables::default())),
        }
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

fn email_taken(tables: &Tables, email: &str, except: Option<UserId>) -> bool {
    tables
        .users
        .values()
        .any(|u| Some(u.id) != except && u.email.eq_ignore_ascii_case(email))
}

#[async_trait]
impl UserStorage for MemoryStorage {
    async fn create_user(&self, email: &str, hashed_password: &str) -> Result<StoredUser> {
        let mut tables = self.tables.write().await;
        if email_taken(&tables, email, None) {
            return Err(ChirpyError::Conflict("email already registered".to_string()));
        }

        let now = Utc::now();
        let user = StoredUser {
            id: UserId::new(),
            created_at: now,
            updated_at: now,
            email: email.to_string(),
            hashed_password: hashed_password.to_string(),
            is_chirpy_red: false,
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<StoredUser>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn update_credentials(
        &self,
        id: UserId,
        email: &str,
        hashed_password: &str,
    ) -> Result<StoredUser> {
        let mut tables = self.tables.write().await;
        if email_taken(&tables, email, Some(id)) {
            return Err(ChirpyError::Conflict("email already registered".to_string()));
        }

        let user = tables
            .users
            .get_mut(&id)
            .ok_or_else(|| ChirpyError::NotFound("User".to_string()))?;
        user.email = email.to_string();
        user.hashed_password = hashed_password.to_string();
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn upgrade_user(&self, id: UserId) -> Result<StoredUser> {
        let mut tables = self.tables.write().await;
        let user = tables
            .users
            .get_mut(&id)
            .ok_or_else(|| ChirpyError::NotFound("User".to_string()))?;
        user.is_chirpy_red = true;
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn delete_all_users(&self) -> Result<usize> {
        let mut tables = self.tables.write().await;
        let removed = tables.users.len();
        *tables = Tables::default();
        log::info!("Deleted {} users and their chirps and refresh tokens", removed);
        Ok(removed)
    }
}

#[async_trait]
impl ChirpStorage for MemoryStorage {
    async fn create_chirp(&self, user_id: UserId, body: &str) -> Result<StoredChirp> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&user_id) {
            return Err(ChirpyError::NotFound("User".to_string()));
        }

        let now = Utc::now();
        let chirp = StoredChirp {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            body: body.to_string(),
            user_id,
        };
        tables.chirps.push(chirp.clone());
        Ok(chirp)
    }

    async fn get_chirp(&self, id: Uuid) -> Result<Option<StoredChirp>> {
        let tables = self.tables.read().await;
        Ok(tables.chirps.iter().find(|c| c.id == id).cloned())
    }

    async fn list_chirps(&self, author: Option<UserId>) -> Result<Vec<StoredChirp>> {
        let tables = self.tables.read().await;
        let mut chirps: Vec<StoredChirp> = tables
            .chirps
            .iter()
            .filter(|c| author.map_or(true, |a| c.user_id == a))
            .cloned()
            .collect();
        chirps.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(chirps)
    }

    async fn delete_chirp(&self, id: Uuid) -> Result<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.chirps.len();
        tables.chirps.retain(|c| c.id != id);
        Ok(tables.chirps.len() != before)
    }
}

#[async_trait]
impl RefreshTokenRepository for MemoryStorage {
    async fn insert(&self, record: RefreshTokenRecord) -> Result<()> {
        let mut tables = self.tables.write().await;
        if tables.refresh_tokens.contains_key(&record.token) {
            return Err(ChirpyError::Conflict("refresh token already exists".to_string()));
        }
        tables.refresh_tokens.insert(record.token.clone(), record);
        Ok(())
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<RefreshTokenRecord>> {
        Ok(self.tables.read().await.refresh_tokens.get(token).cloned())
    }

    async fn mark_revoked(&self, token: &str, at: DateTime<Utc>) -> Result<bool> {
        let mut tables = self.tables.write().await;
        match tables.refresh_tokens.get_mut(token) {
            Some(record) => {
                // first revocation wins
                record.revoked_at.get_or_insert(at);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
