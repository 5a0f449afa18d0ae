//! Security-focused logging of authentication and authorization events

use crate::auth::identity::UserId;

const SECURITY_TARGET: &str = "chirpy::security";

/// Types of security events to track
#[derive(Debug, Clone)]
pub enum SecurityEvent {
    // Authentication events
    AuthenticationFailed { reason: String },
    LoginFailed { reason: String },
    LoginSucceeded { user_id: UserId },
    TokenRevoked { token_id: String },

    // Authorization events
    PermissionDenied { user_id: UserId, action: String, resource: String },

    // Integrations
    WebhookRejected { reason: String },

    // System
    ServerFault { operation: String, error: String },
}

impl SecurityEvent {
    fn key(&self) -> &'static str {
        match self {
            SecurityEvent::AuthenticationFailed { .. } => "auth_failed",
            SecurityEvent::LoginFailed { .. } => "login_failed",
            SecurityEvent::LoginSucceeded { .. } => "login_succeeded",
            SecurityEvent::TokenRevoked { .. } => "token_revoked",
            SecurityEvent::PermissionDenied { .. } => "permission_denied",
            SecurityEvent::WebhookRejected { .. } => "webhook_rejected",
            SecurityEvent::ServerFault { .. } => "server_fault",
        }
    }

    fn level(&self) -> log::Level {
        match self {
            SecurityEvent::ServerFault { .. } => log::Level::Error,
            SecurityEvent::PermissionDenied { .. } | SecurityEvent::WebhookRejected { .. } => {
                log::Level::Warn
            }
            SecurityEvent::AuthenticationFailed { .. } | SecurityEvent::LoginFailed { .. } => {
                log::Level::Info
            }
            SecurityEvent::LoginSucceeded { .. } | SecurityEvent::TokenRevoked { .. } => {
                log::Level::Debug
            }
        }
    }

    fn describe(&self) -> String {
        match self {
            SecurityEvent::AuthenticationFailed { reason } => reason.clone(),
            SecurityEvent::LoginFailed { reason } => reason.clone(),
            SecurityEvent::LoginSucceeded { user_id } => format!("user={}", user_id),
            SecurityEvent::TokenRevoked { token_id } => format!("token={}", token_id),
            SecurityEvent::PermissionDenied {
                user_id,
                action,
                resource,
            } => format!("user={} action={} resource={}", user_id, action, resource),
            SecurityEvent::WebhookRejected { reason } => reason.clone(),
            SecurityEvent::ServerFault { operation, error } => {
                format!("operation={} error={}", operation, error)
            }
        }
    }
}

/// Log a security event on the `chirpy::security` target
pub fn log_security_event(event: &SecurityEvent) {
    log::log!(
        target: SECURITY_TARGET,
        event.level(),
        "[{}] {}",
        event.key(),
        event.describe()
    );
}

/// Short prefix of a token that is safe to write to logs
pub fn token_fingerprint(token: &str) -> &str {
    let end = token
        .char_indices()
        .nth(8)
        .map(|(i, _)| i)
        .unwrap_or(token.len());
    &token[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_truncates() {
        assert_eq!(token_fingerprint("0123456789abcdef"), "01234567");
        assert_eq!(token_fingerprint("abc"), "abc");
        assert_eq!(token_fingerprint(""), "");
        assert_eq!(token_fingerprint("ééééééééé"), "éééééééé");
    }

    #[test]
    fn test_event_levels() {
        let fault = SecurityEvent::ServerFault {
            operation: "login".to_string(),
            error: "boom".to_string(),
        };
        assert_eq!(fault.level(), log::Level::Error);
        assert_eq!(fault.key(), "server_fault");

        let denied = SecurityEvent::PermissionDenied {
            user_id: UserId::new(),
            action: "delete".to_string(),
            resource: "chirp".to_string(),
        };
        assert_eq!(denied.level(), log::Level::Warn);
        assert!(denied.describe().contains("action=delete"));
    }
}
