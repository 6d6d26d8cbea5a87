//! Test helpers for generating unique test data
//!
//! ULID-backed values keep tests isolated when several of them share a
//! database or run in parallel.

use ulid::Ulid;

/// Generate a unique string with the given prefix, `{prefix}-{ulid}`.
///
/// ```
/// use backend_test_support::unique_helpers::unique_str;
///
/// let a = unique_str("venue");
/// let b = unique_str("venue");
/// assert_ne!(a, b);
/// assert!(a.starts_with("venue-"));
/// ```
pub fn unique_str(prefix: &str) -> String {
    format!("{}-{}", prefix, Ulid::new())
}

/// Generate a unique username that fits the backend's 64 character limit.
///
/// ```
/// use backend_test_support::unique_helpers::unique_username;
///
/// let name = unique_username("alice");
/// assert!(name.starts_with("alice_"));
/// assert!(name.chars().count() <= 64);
/// ```
pub fn unique_username(prefix: &str) -> String {
    let ulid = Ulid::new().to_string().to_lowercase();
    let prefix: String = prefix.chars().take(32).collect();
    format!("{prefix}_{ulid}")
}
