/// Checks if a host matches a wildcard pattern
///
/// This function supports two types of patterns:
/// 1. Exact match: "blokcrafters.io" matches only "blokcrafters.io"
/// 2. Wildcard match: "*.blokcrafters.io" matches the bare host and any subdomain
///
/// Both sides are expected to be lowercase already.
///
/// # Examples
///
/// ```
/// use snapshot_scout::url::matches_wildcard;
///
/// assert!(matches_wildcard("github.com", "github.com"));
/// assert!(!matches_wildcard("github.com", "gist.github.com"));
///
/// assert!(matches_wildcard("*.blokcrafters.io", "blokcrafters.io"));
/// assert!(matches_wildcard("*.blokcrafters.io", "wax.blokcrafters.io"));
/// assert!(!matches_wildcard("*.blokcrafters.io", "notblokcrafters.io"));
/// ```
pub fn matches_wildcard(pattern: &str, candidate: &str) -> bool {
    if let Some(base) = pattern.strip_prefix("*.") {
        candidate == base || candidate.ends_with(&format!(".{}", base))
    } else {
        candidate == pattern
    }
}
