use chrono::{Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;

use chirpy::auth::{
    authorize_owner, extract_bearer, hash_password, verify_password, AuthGuard, TokenManager,
    UserId,
};
use chirpy::error::ChirpyError;

const KEY: &str = "auth-test-key-7Hq2Vn9Xc4Lm1Pz8Rk";

#[test]
fn test_password_hash_verifies_only_its_own_password() {
    let passwords = ["04234", "correct horse battery staple", "ünïcødé", ""];
    for password in passwords {
        let hash = hash_password(password).unwrap();
        assert!(verify_password(password, &hash).is_ok());
        assert!(matches!(
            verify_password(&format!("{}x", password), &hash),
            Err(ChirpyError::PasswordMismatch)
        ));
    }
}

#[test]
fn test_access_token_round_trip() {
    let manager = TokenManager::new(KEY);
    for _ in 0..5 {
        let user = UserId::new();
        let token = manager.issue(user).unwrap();
        assert_eq!(manager.verify(&token).unwrap(), user);
    }
}

#[test]
fn test_access_token_rejected_under_other_key() {
    let token = TokenManager::new(KEY).issue(UserId::new()).unwrap();
    let other = TokenManager::new("auth-test-other-key-3Jd8Wm2Qx5Nv0Tb");
    assert!(matches!(
        other.verify(&token),
        Err(ChirpyError::InvalidToken(_))
    ));
}

#[test]
fn test_access_token_expiry_boundary() {
    let manager = TokenManager::new(KEY);
    let user = UserId::new();
    let issued = Utc::now();
    let token = manager.issue_at(user, issued).unwrap();

    assert_eq!(manager.verify_at(&token, issued).unwrap(), user);
    assert_eq!(
        manager
            .verify_at(&token, issued + Duration::seconds(3599))
            .unwrap(),
        user
    );
    assert!(matches!(
        manager.verify_at(&token, issued + Duration::seconds(3600)),
        Err(ChirpyError::InvalidToken(_))
    ));
    assert!(matches!(
        manager.verify_at(&token, issued + Duration::hours(2)),
        Err(ChirpyError::InvalidToken(_))
    ));
}

#[test]
fn test_tampered_token_rejected() {
    let manager = TokenManager::new(KEY);
    let token = manager.issue(UserId::new()).unwrap();

    let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
    assert_eq!(parts.len(), 3);
    parts[1] = TokenManager::new(KEY)
        .issue(UserId::new())
        .unwrap()
        .split('.')
        .nth(1)
        .unwrap()
        .to_string();
    let spliced = parts.join(".");

    assert!(matches!(
        manager.verify(&spliced),
        Err(ChirpyError::InvalidToken(_))
    ));
    assert!(matches!(
        manager.verify("invalid.token.here"),
        Err(ChirpyError::InvalidToken(_))
    ));
    assert!(matches!(
        manager.verify(""),
        Err(ChirpyError::InvalidToken(_))
    ));
}

#[test]
fn test_extract_bearer_properties() {
    let mut headers = HashMap::new();
    headers.insert("Authorization".to_string(), "Bearer abc123".to_string());
    assert_eq!(extract_bearer(&headers).unwrap(), "abc123");

    headers.insert("Authorization".to_string(), "bearer abc123".to_string());
    assert_eq!(extract_bearer(&headers).unwrap(), "abc123");

    headers.insert("Authorization".to_string(), "Basic abc".to_string());
    assert!(matches!(
        extract_bearer(&headers),
        Err(ChirpyError::MalformedHeader(_))
    ));

    let empty: HashMap<String, String> = HashMap::new();
    assert!(matches!(
        extract_bearer(&empty),
        Err(ChirpyError::MissingHeader(_))
    ));
}

#[test]
fn test_guard_and_owner_check() {
    let tokens = Arc::new(TokenManager::new(KEY));
    let guard = AuthGuard::new(tokens.clone());
    let owner = UserId::new();

    let mut headers = HashMap::new();
    headers.insert(
        "authorization".to_string(),
        format!("Bearer {}", tokens.issue(owner).unwrap()),
    );

    let caller = guard.authenticate(&headers).unwrap();
    assert!(authorize_owner(caller, owner).is_ok());
    assert!(matches!(
        authorize_owner(caller, UserId::new()),
        Err(ChirpyError::Forbidden)
    ));
}
