use std::error::Error;
use std::fmt;

use warp::http::StatusCode;

#[derive(Debug)]
pub enum ChirpyError {
    // Credential errors
    HashingError(String),
    PasswordMismatch,

    // Access token errors
    SigningError(String),
    InvalidToken(String),

    // Refresh token errors
    GenerationError(String),
    TokenNotFound,
    TokenExpired,
    TokenRevoked,

    // Header errors
    MissingHeader(String),
    MalformedHeader(String),

    // Guard outcomes
    Unauthorized,
    Forbidden,

    // Storage errors
    Canceled,
    StorageError(String),
    NotFound(String),
    Conflict(String),

    // Validation errors
    ValidationError(String),

    // Configuration errors
    ConfigError(String),
}

impl fmt::Display for ChirpyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HashingError(msg) => write!(f, "Password hashing failed: {}", msg),
            Self::PasswordMismatch => write!(f, "Password does not match"),
            Self::SigningError(msg) => write!(f, "Token signing failed: {}", msg),
            Self::InvalidToken(msg) => write!(f, "Invalid token: {}", msg),
            Self::GenerationError(msg) => write!(f, "Token generation failed: {}", msg),
            Self::TokenNotFound => write!(f, "Refresh token not found"),
            Self::TokenExpired => write!(f, "Refresh token expired"),
            Self::TokenRevoked => write!(f, "Refresh token revoked"),
            Self::MissingHeader(name) => write!(f, "Missing header: {}", name),
            Self::MalformedHeader(msg) => write!(f, "Malformed header: {}", msg),
            Self::Unauthorized => write!(f, "Unauthorized"),
            Self::Forbidden => write!(f, "Forbidden"),
            Self::Canceled => write!(f, "Storage operation canceled"),
            Self::StorageError(msg) => write!(f, "Storage error: {}", msg),
            Self::NotFound(what) => write!(f, "{} not found", what),
            Self::Conflict(msg) => write!(f, "Conflict: {}", msg),
            Self::ValidationError(msg) => write!(f, "{}", msg),
            Self::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl Error for ChirpyError {}

impl ChirpyError {
    /// HTTP status used when this error reaches a client.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::PasswordMismatch
            | Self::InvalidToken(_)
            | Self::TokenNotFound
            | Self::TokenExpired
            | Self::TokenRevoked
            | Self::MissingHeader(_)
            | Self::MalformedHeader(_)
            | Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::HashingError(_)
            | Self::SigningError(_)
            | Self::GenerationError(_)
            | Self::Canceled
            | Self::StorageError(_)
            | Self::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// True for failures caused by the server rather than the request.
    pub fn is_server_fault(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// Message safe to show a client. Authentication failures collapse to a
    /// single text and server faults never expose their cause.
    pub fn client_message(&self) -> String {
        match self.status_code() {
            StatusCode::UNAUTHORIZED => "Unauthorized".to_string(),
            StatusCode::FORBIDDEN => "Forbidden".to_string(),
            StatusCode::INTERNAL_SERVER_ERROR => "Something went wrong".to_string(),
            _ => self.to_string(),
        }
    }
}

// Generic result type for Chirpy
pub type Result<T> = std::result::Result<T, ChirpyError>;
