//! Scheme-prefix validation for URLs submitted for shortening.
//!
//! Only the prefix is checked; the rest of the URL is stored as given.

/// Longest URL accepted for storage.
pub const MAX_URL_LENGTH: usize = 2083;

const ALLOWED_PREFIXES: [&str; 2] = ["http://", "https://"];

/// Returns true if `url` starts with `http://` or `https://`.
pub fn has_http_scheme(url: &str) -> bool {
    ALLOWED_PREFIXES.iter().any(|prefix| url.starts_with(prefix))
}

/// Returns true if `url` can be stored: an http(s) prefix and at most
/// [`MAX_URL_LENGTH`] characters.
pub fn is_acceptable_url(url: &str) -> bool {
    has_http_scheme(url) && url.chars().count() <= MAX_URL_LENGTH
}
