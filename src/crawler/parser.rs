//! HTML parser for extracting candidate links
//!
//! This module turns a fetched page into the deduplicated, same-site
//! [`Link`]s the locator ranks and classifies.

use crate::crawler::Link;
use crate::url::SitePolicy;
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Extracts same-site links from an HTML document
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` tags
/// - `<link rel="alternate" href="...">`
///
/// **Exclude:**
/// - empty hrefs, `#`, and `javascript:` links
/// - hrefs that fail to resolve against `base_url`, or resolve to a non-HTTP(S) URL
/// - links the [`SitePolicy`] considers off-site
///
/// Links are deduplicated by resolved href; the first anchor text seen wins.
///
/// # Example
///
/// ```
/// use snapshot_scout::crawler::extract_links;
/// use snapshot_scout::url::SitePolicy;
/// use url::Url;
///
/// let html = r#"<a href="wax/">WAX</a><a href="https://github.com/x">code</a>"#;
/// let base = Url::parse("https://snapshots.example.com/").unwrap();
/// let links = extract_links(html, &base, &SitePolicy::default());
/// assert_eq!(links.len(), 1);
/// assert_eq!(links[0].href, "https://snapshots.example.com/wax/");
/// ```
pub fn extract_links(html: &str, base_url: &Url, policy: &SitePolicy) -> Vec<Link> {
    let document = Html::parse_document(html);
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    let Ok(selector) = Selector::parse(r#"a, link[rel="alternate"]"#) else {
        return links;
    };

    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        let Some(resolved) = resolve_link(href, base_url) else {
            continue;
        };

        if !policy.is_same_site(base_url, &resolved) {
            continue;
        }

        let href = resolved.to_string();
        if seen.insert(href.clone()) {
            let text = element.text().collect::<String>().trim().to_string();
            links.push(Link { text, href });
        }
    }

    links
}

/// Extracts the `href` of the first anchor in an HTML fragment
///
/// Used for index entries that embed a link as markup, e.g.
/// `<a href='wax-snapshot.bin'>wax-snapshot.bin</a>`.
pub fn first_anchor_href(fragment: &str) -> Option<String> {
    let fragment = Html::parse_fragment(fragment);
    let selector = Selector::parse("a").ok()?;

    fragment
        .select(&selector)
        .next()
        .and_then(|element| element.value().attr("href"))
        .map(str::to_string)
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - empty, `#`, and `javascript:` hrefs
/// - hrefs that cannot be resolved
/// - non-HTTP(S) URLs after resolution
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href == "#" || href.starts_with("javascript:") {
        return None;
    }

    let absolute_url = base_url.join(href).ok()?;
    if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
        Some(absolute_url)
    } else {
        None
    }
}
