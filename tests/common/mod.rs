#![allow(dead_code)]

use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chirpy::config::{Platform, ServerConfig};
use chirpy::handlers::AppState;
use chirpy::storage::MemoryStorage;

pub const JWT_SECRET: &str = "integration-jwt-key-Zq81mNc4Lp0Wt7Rb";
pub const POLKA_KEY: &str = "f271c81ff7084ee5b99a5091b42d486e";

pub fn test_config(platform: Platform) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        jwt_secret: JWT_SECRET.to_string(),
        platform,
        polka_key: Some(POLKA_KEY.to_string()),
        filepath_root: PathBuf::from("."),
        store_timeout: Duration::from_secs(5),
    }
}

pub fn test_state() -> AppState {
    AppState::new(test_config(Platform::Dev), Arc::new(MemoryStorage::new()))
}

pub fn body_json(body: &[u8]) -> Value {
    serde_json::from_slice(body).expect("response body is JSON")
}
