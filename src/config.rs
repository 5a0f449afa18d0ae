//! Server configuration module
//! Loads runtime parameters for the Chirpy API from the environment

use crate::constants::{DEFAULT_FILEPATH_ROOT, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_STORE_TIMEOUT_MS};
use crate::error::{ChirpyError, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Deployment platform. Destructive admin routes only exist on `Dev`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Dev,
    Production,
}

impl Platform {
    fn from_env_value(value: &str) -> Self {
        if value.eq_ignore_ascii_case("dev") {
            Platform::Dev
        } else {
            Platform::Production
        }
    }
}

/// Server configuration parameters
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// HMAC secret for access token signing/validation
    pub jwt_secret: String,
    pub platform: Platform,
    /// API key the payment provider presents on webhook calls
    pub polka_key: Option<String>,
    /// Directory served under /app/
    pub filepath_root: PathBuf,
    /// Deadline for each refresh-token store call
    pub store_timeout: Duration,
}

impl ServerConfig {
    /// Validate that a secret meets security requirements
    fn validate_secret(secret: &str) -> Result<()> {
        if secret.len() < 32 {
            return Err(ChirpyError::ConfigError(
                "JWT secret must be at least 32 characters long".to_string(),
            ));
        }

        // Check for insecure default or example values
        let insecure_patterns = [
            "your-secret-key",
            "change-this",
            "changeme",
            "default",
            "password",
            "12345",
        ];

        for pattern in &insecure_patterns {
            if secret.to_lowercase().contains(pattern) {
                return Err(ChirpyError::ConfigError(format!(
                    "JWT secret contains insecure pattern '{}'. Generate one with: openssl rand -base64 64",
                    pattern
                )));
            }
        }

        Ok(())
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let host = env::var("CHIRPY_HOST").unwrap_or(DEFAULT_HOST.to_string());
        let port = env::var("CHIRPY_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let jwt_secret = env::var("CHIRPY_JWT_SECRET")
            .or_else(|_| env::var("JWT_SECRET"))
            .or_else(|_| env::var("SECRET"))
            .map_err(|_| {
                ChirpyError::ConfigError(
                    "JWT_SECRET environment variable is required. \
                     Generate one with: openssl rand -base64 64"
                        .to_string(),
                )
            })?;
        Self::validate_secret(&jwt_secret)?;

        let platform = env::var("PLATFORM")
            .map(|v| Platform::from_env_value(&v))
            .unwrap_or(Platform::Production);

        let polka_key = env::var("POLKA_KEY").ok().filter(|k| !k.trim().is_empty());

        let filepath_root = env::var("CHIRPY_FILEPATH_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_FILEPATH_ROOT));

        let timeout_ms = env::var("CHIRPY_STORE_TIMEOUT_MS")
            .ok()
            .and_then(|t| t.parse().ok())
            .unwrap_or(DEFAULT_STORE_TIMEOUT_MS);

        Ok(Self {
            host,
            port,
            jwt_secret,
            platform,
            polka_key,
            filepath_root,
            store_timeout: Duration::from_millis(timeout_ms),
        })
    }

    pub fn is_dev(&self) -> bool {
        self.platform == Platform::Dev
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_secret_rejected() {
        let err = ServerConfig::validate_secret("short").unwrap_err();
        assert!(err.to_string().contains("at least 32 characters"));
    }

    #[test]
    fn test_placeholder_secret_rejected() {
        let err = ServerConfig::validate_secret("please-change-this-value-before-deploying")
            .unwrap_err();
        assert!(err.to_string().contains("change-this"));
    }

    #[test]
    fn test_random_secret_accepted() {
        assert!(ServerConfig::validate_secret("q8Xv2Lr9ZpT4mWc7Nb1Ks6Hd3Fj0Ye5Ug").is_ok());
    }

    #[test]
    fn test_platform_parsing() {
        assert_eq!(Platform::from_env_value("dev"), Platform::Dev);
        assert_eq!(Platform::from_env_value("DEV"), Platform::Dev);
        assert_eq!(Platform::from_env_value("prod"), Platform::Production);
    }
}
