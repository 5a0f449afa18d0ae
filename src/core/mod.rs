//! Resource models served by the API

pub mod account;
pub mod chirp;

pub use account::{AuthenticatedUser, Credentials, User};
pub use chirp::{censor, validate_chirp, Chirp};
