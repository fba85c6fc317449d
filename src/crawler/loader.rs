//! Page loader
//!
//! This module handles every page request the crawler makes:
//! - Building the HTTP client with a browser-like user agent
//! - Picking the [`PageSource`] that matches the requested host
//! - Enforcing the per-request deadline
//! - Converting every failure into "no page"

use crate::config::CrawlerConfig;
use crate::crawler::source::{Document, HtmlSource, JsonIndexSource, LoadError, PageSource};
use crate::url::SitePolicy;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use url::Url;

/// Builds the HTTP client used for page requests
///
/// # Example
///
/// ```no_run
/// use snapshot_scout::config::CrawlerConfig;
/// use snapshot_scout::crawler::build_http_client;
///
/// let client = build_http_client(&CrawlerConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &CrawlerConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches pages and yields documents, or nothing
///
/// Sources are tried in order among those that handle the URL; the HTML
/// source handles everything and comes last, so a failing specialised
/// source falls through to plain HTML. The loader keeps no memory of what it
/// fetched: cycle avoidance is the caller's job.
#[derive(Debug)]
pub struct PageLoader {
    client: Client,
    timeout: Duration,
    sources: Vec<Box<dyn PageSource>>,
}

impl PageLoader {
    /// Creates a loader with the JSON-index source of `policy` and the HTML source
    pub fn new(client: Client, timeout: Duration, policy: &SitePolicy) -> Self {
        Self::with_sources(
            client,
            timeout,
            vec![
                Box::new(JsonIndexSource::from_policy(policy)),
                Box::new(HtmlSource),
            ],
        )
    }

    /// Creates a loader with an explicit, ordered list of sources
    pub fn with_sources(
        client: Client,
        timeout: Duration,
        sources: Vec<Box<dyn PageSource>>,
    ) -> Self {
        Self {
            client,
            timeout,
            sources,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Loads a page
    ///
    /// Returns `None` on network failure, non-success status, non-HTML
    /// content, or when the deadline expires; the in-flight request is
    /// dropped (and its connection released) on expiry.
    pub async fn load(&self, url: &Url) -> Option<Document> {
        for source in self.sources.iter().filter(|source| source.handles(url)) {
            match self.fetch_with_deadline(source.as_ref(), url).await {
                Ok(document) => {
                    tracing::debug!("Loaded {} via {} source", url, source.name());
                    return Some(document);
                }
                Err(e) => {
                    tracing::debug!("{} source failed for {}: {}", source.name(), url, e);
                }
            }
        }

        None
    }

    async fn fetch_with_deadline(
        &self,
        source: &dyn PageSource,
        url: &Url,
    ) -> Result<Document, LoadError> {
        tokio::time::timeout(self.timeout, source.fetch(&self.client, url))
            .await
            .map_err(|_| LoadError::Timeout(self.timeout))?
    }
}
