//! Recipient address check.

use once_cell::sync::Lazy;
use regex::Regex;

/// `local@domain.tld`, no whitespace, exactly one `@`.
static ADDRESS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid address regex"));

/// Whether `address` is shaped like `local@domain.tld`.
///
/// This is a shape check only. It does not trim and does not try to follow
/// any RFC.
#[must_use]
pub fn is_valid_address(address: &str) -> bool {
    ADDRESS_RE.is_match(address)
}
