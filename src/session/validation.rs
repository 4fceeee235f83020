//! Input validation and truncation
//!
//! Truncation is silent and always runs before validation. Lengths are
//! counted in `char`s so a cut never lands inside a code point.

use super::error::ValidationError;

/// Default cap on the input text, in characters
pub const MAX_LENGTH: usize = 300;

/// Reject input that is empty once surrounding whitespace is trimmed
pub fn validate(text: &str) -> Result<(), ValidationError> {
    if text.trim().is_empty() {
        return Err(ValidationError::EmptyInput);
    }
    Ok(())
}

/// Keep the first `max` characters of `text`
pub fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}

/// Number of characters in `text` (the unit `MAX_LENGTH` is measured in)
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}
