//! Authentication and authorization module

pub mod bearer;
pub mod guard;
pub mod identity;
pub mod password;
pub mod refresh;
pub mod token;

// Re-export main components
pub use bearer::{extract_api_key, extract_bearer, HeaderSource};
pub use guard::{authorize_owner, AuthGuard};
pub use identity::UserId;
pub use password::{hash_password, verify_password};
pub use refresh::RefreshTokenStore;
pub use token::{Claims, TokenManager};
