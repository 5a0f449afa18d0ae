//! Chirpy - a small social-posting backend
//!
//! The interesting part is the `auth` module: password hashing, short-lived
//! JWT access tokens, long-lived opaque refresh tokens and the ownership
//! guard on mutations. Everything else is the HTTP plumbing around it.

pub mod auth;
pub mod config;
pub mod constants;
pub mod core;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod security;
pub mod security_logger;
pub mod storage;

// Re-export main components
pub use config::*;
pub use error::{ChirpyError, Result};
