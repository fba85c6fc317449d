//! Page sources
//!
//! Most providers serve a plain HTML directory listing. Some publish a JSON
//! index instead; each such format is a [`PageSource`] that turns its response
//! into the same [`Document`] model, so the locator never needs to know
//! which one produced a page.

use crate::crawler::parser::{extract_links, first_anchor_href};
use crate::crawler::Link;
use crate::url::{extract_domain, matches_wildcard, SitePolicy};
use futures::future::{BoxFuture, FutureExt};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Response};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use url::Url;

const HTML_ACCEPT: &str = "text/html,application/xhtml+xml";
const JSON_ACCEPT: &str = "application/json";

/// Index location, relative to the requested page
pub const JSON_INDEX_PATH: &str = "data/snapshots.json";

/// Anchor text given to every link read from a JSON index
pub const JSON_INDEX_LINK_TEXT: &str = "wax-snapshot";

/// Reasons a page could not be loaded
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP {0}")]
    Status(u16),

    #[error("Expected HTML, got {0}")]
    ContentType(String),

    #[error("Invalid snapshot index: {0}")]
    Index(#[from] serde_json::Error),

    #[error("Invalid index URL: {0}")]
    IndexUrl(#[from] url::ParseError),

    #[error("Timed out after {0:?}")]
    Timeout(Duration),
}

/// A fetched page, reduced to its URL and markup
#[derive(Debug, Clone)]
pub struct Document {
    url: Url,
    html: String,
}

impl Document {
    /// Wraps HTML fetched from `url`
    pub fn from_html(url: Url, html: String) -> Self {
        Self { url, html }
    }

    /// Builds a minimal page holding one anchor per `(href, text)` pair
    pub fn synthesized<'a>(
        url: Url,
        anchors: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        let mut html = String::from("<html><body>");
        for (href, text) in anchors {
            html.push_str(&format!(
                r#"<a href="{}">{}</a>"#,
                escape_html(href),
                escape_html(text)
            ));
        }
        html.push_str("</body></html>");
        Self { url, html }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    /// Same-site links on this page, resolved against the page URL
    pub fn links(&self, policy: &SitePolicy) -> Vec<Link> {
        extract_links(&self.html, &self.url, policy)
    }
}

/// A way of turning a URL into a [`Document`]
pub trait PageSource: Send + Sync + std::fmt::Debug {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Returns true if this source knows how to load `url`
    fn handles(&self, url: &Url) -> bool;

    /// Fetches `url` and builds its document
    fn fetch<'a>(
        &'a self,
        client: &'a Client,
        url: &'a Url,
    ) -> BoxFuture<'a, Result<Document, LoadError>>;
}

/// Standard HTML pages, for any host
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlSource;

impl PageSource for HtmlSource {
    fn name(&self) -> &'static str {
        "html"
    }

    fn handles(&self, _url: &Url) -> bool {
        true
    }

    fn fetch<'a>(
        &'a self,
        client: &'a Client,
        url: &'a Url,
    ) -> BoxFuture<'a, Result<Document, LoadError>> {
        async move {
            let response = client
                .get(url.clone())
                .header(ACCEPT, HTML_ACCEPT)
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                return Err(LoadError::Status(status.as_u16()));
            }

            // A missing Content-Type is given the benefit of the doubt
            if let Some(content_type) = content_type(&response) {
                if !is_html(&content_type) {
                    return Err(LoadError::ContentType(content_type));
                }
            }

            let body = response.text().await?;
            Ok(Document::from_html(url.clone(), body))
        }
        .boxed()
    }
}

/// Hosts that list their snapshots in `data/snapshots.json`
///
/// Each index entry carries an anchor tag in its `name` field; the anchors
/// are resolved against the requested URL and exposed as a synthetic page.
#[derive(Debug, Clone, Default)]
pub struct JsonIndexSource {
    hosts: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct IndexEntry {
    #[serde(default)]
    name: Option<String>,
}

impl JsonIndexSource {
    /// Creates a source for the given host patterns (exact or `*.`-wildcard)
    pub fn new(hosts: Vec<String>) -> Self {
        Self { hosts }
    }

    /// Creates a source for the JSON-index hosts of a policy
    pub fn from_policy(policy: &SitePolicy) -> Self {
        Self::new(policy.json_index_hosts().to_vec())
    }
}

impl PageSource for JsonIndexSource {
    fn name(&self) -> &'static str {
        "json-index"
    }

    fn handles(&self, url: &Url) -> bool {
        extract_domain(url)
            .is_some_and(|host| self.hosts.iter().any(|pattern| matches_wildcard(pattern, &host)))
    }

    fn fetch<'a>(
        &'a self,
        client: &'a Client,
        url: &'a Url,
    ) -> BoxFuture<'a, Result<Document, LoadError>> {
        async move {
            let index_url = url.join(JSON_INDEX_PATH)?;
            let response = client
                .get(index_url)
                .header(ACCEPT, JSON_ACCEPT)
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                return Err(LoadError::Status(status.as_u16()));
            }

            let body = response.text().await?;
            let entries: Vec<IndexEntry> = serde_json::from_str(&body)?;
            Ok(index_document(url, &entries))
        }
        .boxed()
    }
}

fn index_document(url: &Url, entries: &[IndexEntry]) -> Document {
    let hrefs: Vec<String> = entries
        .iter()
        .filter_map(|entry| entry.name.as_deref())
        .filter_map(first_anchor_href)
        .filter_map(|href| url.join(&href).ok())
        .map(|resolved| resolved.to_string())
        .collect();

    Document::synthesized(
        url.clone(),
        hrefs.iter().map(|href| (href.as_str(), JSON_INDEX_LINK_TEXT)),
    )
}

fn content_type(response: &Response) -> Option<String> {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn is_html(content_type: &str) -> bool {
    let content_type = content_type.to_lowercase();
    content_type.contains("text/html") || content_type.contains("application/xhtml+xml")
}

fn escape_html(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
