use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::identity::UserId;
use crate::constants::{CENSOR_MASK, MAX_CHIRP_LENGTH, PROFANE_WORDS};
use crate::error::{ChirpyError, Result};
use crate::storage::traits::StoredChirp;

/// Chirp as returned to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chirp {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub body: String,
    pub user_id: UserId,
}

impl From<StoredChirp> for Chirp {
    fn from(chirp: StoredChirp) -> Self {
        Self {
            id: chirp.id,
            created_at: chirp.created_at,
            updated_at: chirp.updated_at,
            body: chirp.body,
            user_id: chirp.user_id,
        }
    }
}

/// Replaces profane words with a mask. Only whole space-separated words
/// match; "Kerfuffle!" is left alone.
pub fn censor(body: &str) -> String {
    body.split(' ')
        .map(|word| {
            let lowered = word.to_lowercase();
            if PROFANE_WORDS.contains(&lowered.as_str()) {
                CENSOR_MASK
            } else {
                word
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Checks the length limit and returns the censored body
pub fn validate_chirp(body: &str) -> Result<String> {
    if body.chars().count() > MAX_CHIRP_LENGTH {
        return Err(ChirpyError::ValidationError("Chirp is too long".to_string()));
    }
    Ok(censor(body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_censor_is_case_insensitive() {
        assert_eq!(
            censor("I had something interesting for breakfast Kerfuffle"),
            "I had something interesting for breakfast ****"
        );
        assert_eq!(censor("SHARBERT and fornax"), "**** and ****");
    }

    #[test]
    fn test_censor_skips_punctuated_words() {
        assert_eq!(censor("Sharbert! is fine"), "Sharbert! is fine");
    }

    #[test]
    fn test_length_limit() {
        let exactly = "a".repeat(MAX_CHIRP_LENGTH);
        assert_eq!(validate_chirp(&exactly).unwrap(), exactly);

        let too_long = "a".repeat(MAX_CHIRP_LENGTH + 1);
        assert!(matches!(
            validate_chirp(&too_long),
            Err(ChirpyError::ValidationError(_))
        ));
    }
}
