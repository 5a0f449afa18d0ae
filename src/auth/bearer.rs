//! Credential extraction from the `Authorization` header

use std::borrow::Cow;
use std::collections::HashMap;

use warp::http::HeaderMap;

use crate::constants::{API_KEY_SCHEME, AUTHORIZATION_HEADER, BEARER_SCHEME};
use crate::error::{ChirpyError, Result};

/// Read access to request headers, by case-insensitive name
pub trait HeaderSource {
    fn header(&self, name: &str) -> Option<Cow<'_, str>>;
}

impl HeaderSource for HeaderMap {
    fn header(&self, name: &str) -> Option<Cow<'_, str>> {
        // Non-UTF-8 bytes survive as replacement characters and fail later
        self.get(name)
            .map(|value| String::from_utf8_lossy(value.as_bytes()))
    }
}

impl HeaderSource for HashMap<String, String> {
    fn header(&self, name: &str) -> Option<Cow<'_, str>> {
        self.iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| Cow::Borrowed(value.as_str()))
    }
}

/// Extracts the credential following `scheme` in the Authorization header.
///
/// The scheme is matched case-insensitively; the credential is trimmed.
pub fn extract_credential<H: HeaderSource + ?Sized>(headers: &H, scheme: &str) -> Result<String> {
    let raw = headers
        .header(AUTHORIZATION_HEADER)
        .ok_or_else(|| ChirpyError::MissingHeader("Authorization".to_string()))?;

    let value = raw.trim();
    if value.is_empty() {
        return Err(ChirpyError::MissingHeader("Authorization".to_string()));
    }

    let malformed = || ChirpyError::MalformedHeader(format!("expected '{} <credential>'", scheme));

    let (given_scheme, credential) = value.split_once(char::is_whitespace).ok_or_else(malformed)?;
    if !given_scheme.eq_ignore_ascii_case(scheme) {
        return Err(malformed());
    }

    let credential = credential.trim();
    if credential.is_empty() {
        return Err(malformed());
    }
    Ok(credential.to_string())
}

/// Extracts a bearer token
pub fn extract_bearer<H: HeaderSource + ?Sized>(headers: &H) -> Result<String> {
    extract_credential(headers, BEARER_SCHEME)
}

/// Extracts an `ApiKey` credential, as sent by the payment webhook
pub fn extract_api_key<H: HeaderSource + ?Sized>(headers: &H) -> Result<String> {
    extract_credential(headers, API_KEY_SCHEME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use warp::http::HeaderValue;

    fn headers(value: &str) -> HashMap<String, String> {
        let mut map = HashMap::new();
        map.insert("Authorization".to_string(), value.to_string());
        map
    }

    #[test]
    fn test_scheme_case_variants() {
        for value in ["Bearer abc123", "bearer abc123", "BEARER abc123", "BeArEr abc123"] {
            assert_eq!(extract_bearer(&headers(value)).unwrap(), "abc123");
        }
    }

    #[test]
    fn test_credential_is_trimmed() {
        assert_eq!(extract_bearer(&headers("  Bearer   abc123  ")).unwrap(), "abc123");
        assert_eq!(extract_bearer(&headers("Bearer\tabc123")).unwrap(), "abc123");
    }

    #[test]
    fn test_missing_header() {
        let empty: HashMap<String, String> = HashMap::new();
        assert!(matches!(
            extract_bearer(&empty),
            Err(ChirpyError::MissingHeader(_))
        ));
        assert!(matches!(
            extract_bearer(&headers("   ")),
            Err(ChirpyError::MissingHeader(_))
        ));
    }

    #[test]
    fn test_wrong_or_incomplete_scheme() {
        for value in ["Basic abc", "Bearer", "Bearer    ", "Bearerabc123", "abc123"] {
            assert!(
                matches!(extract_bearer(&headers(value)), Err(ChirpyError::MalformedHeader(_))),
                "{value:?} should be malformed"
            );
        }
    }

    #[test]
    fn test_api_key_scheme() {
        assert_eq!(extract_api_key(&headers("ApiKey f271c8")).unwrap(), "f271c8");
        assert!(matches!(
            extract_api_key(&headers("Bearer f271c8")),
            Err(ChirpyError::MalformedHeader(_))
        ));
    }

    #[test]
    fn test_header_map_lookup() {
        let mut map = HeaderMap::new();
        map.insert("authorization", HeaderValue::from_static("Bearer xyz"));
        assert_eq!(extract_bearer(&map).unwrap(), "xyz");
    }
}
