//! Short code generation and validation utilities.
//!
//! Codes are drawn from the 62-character alphanumeric alphabet
//! (`a-z`, `A-Z`, `0-9`) using the thread-local, OS-seeded generator.

use rand::Rng;
use rand::distr::Alphanumeric;
use regex::Regex;
use std::ops::RangeInclusive;
use std::sync::LazyLock;

/// Allowed short code lengths.
pub const CODE_LENGTH_RANGE: RangeInclusive<usize> = 4..=10;

/// Compiled pattern every stored short code matches.
static SHORT_CODE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9]{4,10}$").expect("short code pattern is a valid regex")
});

/// Generates a random alphanumeric short code of exactly `length` characters.
///
/// Characters are sampled uniformly with replacement. Callers are expected to
/// pass a length within [`CODE_LENGTH_RANGE`]; the generator itself does not
/// enforce it.
///
/// # Examples
///
/// ```ignore
/// let code = generate_code(6);
/// assert_eq!(code.len(), 6);
/// assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
/// ```
pub fn generate_code(length: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// Returns true if `length` is an allowed short code length.
pub fn is_valid_length(length: usize) -> bool {
    CODE_LENGTH_RANGE.contains(&length)
}

/// Returns true if `code` could be a stored short code.
///
/// Used on the redirect path to reject garbage before touching storage.
pub fn is_valid_code(code: &str) -> bool {
    SHORT_CODE_REGEX.is_match(code)
}
