use crate::{UrlError, UrlResult};
use url::Url;

/// Strips the wrapping parentheses and whitespace some registry entries carry
///
/// ```
/// use snapshot_scout::url::clean_provider_url;
///
/// assert_eq!(
///     clean_provider_url("((https://snapshots.example.com/)) "),
///     "https://snapshots.example.com/"
/// );
/// ```
pub fn clean_provider_url(raw: &str) -> String {
    raw.trim()
        .trim_start_matches('(')
        .trim_end_matches(')')
        .trim()
        .to_string()
}

/// Parses a URL and requires an http(s) scheme and a host
pub fn parse_http_url(raw: &str) -> UrlResult<Url> {
    let url = Url::parse(raw).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingDomain);
    }

    Ok(url)
}
