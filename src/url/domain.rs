use url::Url;

/// Extracts the domain from a URL
///
/// This function retrieves the host portion of a URL and converts it to lowercase.
/// If the URL has no host, it returns None.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use snapshot_scout::url::extract_domain;
///
/// let url = Url::parse("https://Snapshots.Example.COM/wax/").unwrap();
/// assert_eq!(extract_domain(&url), Some("snapshots.example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns the registrable part of a host: its last two labels
///
/// This is a label count, not a public-suffix lookup, so `a.example.co.uk`
/// and `b.other.co.uk` share `co.uk`.
///
/// ```
/// use snapshot_scout::url::registrable_domain;
///
/// assert_eq!(registrable_domain("snapshots.eossweden.org"), "eossweden.org");
/// assert_eq!(registrable_domain("localhost"), "localhost");
/// ```
pub fn registrable_domain(host: &str) -> String {
    let labels: Vec<&str> = host.split('.').collect();
    let start = labels.len().saturating_sub(2);
    labels[start..].join(".")
}
