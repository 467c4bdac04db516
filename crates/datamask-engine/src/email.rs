//! Email shape matching

use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9+_.-]+@([A-Za-z0-9.-]+\.[A-Za-z]{2,})$")
        .expect("email pattern is a valid regex")
});

/// Split a well-formed email into `(local, domain)`.
///
/// Returns `None` when the whole value does not look like an email.
pub(crate) fn split(value: &str) -> Option<(&str, &str)> {
    if !EMAIL_REGEX.is_match(value) {
        return None;
    }
    value.split_once('@')
}
