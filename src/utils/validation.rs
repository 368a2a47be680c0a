//! Centralized validation and helper functions.

use std::collections::HashSet;

use crate::core::types::MatchField;

/// Maximum number of records read from a single table (DOS protection)
pub const MAX_RECORDS: usize = 5_000_000;

/// Is `s` a canonical reference-table entry: non-empty, only `A-Z`, `0-9`
/// and `#`?
///
/// # Examples
///
/// ```
/// use addr_match::utils::validation::is_canonical_token;
///
/// assert!(is_canonical_token("BLVD"));
/// assert!(is_canonical_token("#"));
/// assert!(!is_canonical_token("Blvd"));
/// assert!(!is_canonical_token(""));
/// ```
#[must_use]
pub fn is_canonical_token(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '#')
}

/// Check if adding another record would exceed the maximum allowed.
///
/// Call this with the current count BEFORE adding a new record.
/// Returns an error message if adding would exceed the limit, None if safe to add.
#[must_use]
pub fn check_record_limit(count: usize) -> Option<String> {
    if count >= MAX_RECORDS {
        Some(format!(
            "Too many records: adding another would exceed maximum of {MAX_RECORDS}"
        ))
    } else {
        None
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ValidationError {
    #[error("Jaro threshold must be within [0, 1], got {0}")]
    InvalidThreshold(f64),
    #[error("At least one hard key is required")]
    NoHardKeys,
    #[error("Key '{0}' is listed as both a hard and a soft key")]
    KeyConflict(MatchField),
    #[error("Key '{0}' is listed more than once")]
    DuplicateKey(MatchField),
}

/// Validate a Jaro similarity threshold
///
/// # Errors
///
/// Returns `ValidationError::InvalidThreshold` for values outside `[0, 1]`
/// (including NaN).
pub fn validate_threshold(threshold: f64) -> Result<f64, ValidationError> {
    if (0.0..=1.0).contains(&threshold) {
        Ok(threshold)
    } else {
        Err(ValidationError::InvalidThreshold(threshold))
    }
}

/// Validate hard and soft key lists
///
/// # Errors
///
/// Returns a `ValidationError` if no hard key is given, a key repeats within
/// a list, or a key appears in both lists.
pub fn validate_keys(hard: &[MatchField], soft: &[MatchField]) -> Result<(), ValidationError> {
    if hard.is_empty() {
        return Err(ValidationError::NoHardKeys);
    }

    for keys in [hard, soft] {
        let mut seen = HashSet::new();
        if let Some(&dup) = keys.iter().find(|k| !seen.insert(**k)) {
            return Err(ValidationError::DuplicateKey(dup));
        }
    }

    if let Some(&conflict) = soft.iter().find(|k| hard.contains(k)) {
        return Err(ValidationError::KeyConflict(conflict));
    }

    Ok(())
}
