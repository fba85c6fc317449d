//! Snapshot locator - bounded-depth search for a provider's snapshot archive
//!
//! Starting from a provider's entry URL, the locator:
//! 1. Refuses pages past the depth limit or on avoided hosts
//! 2. Tries the canonical site of a legacy mirror first
//! 3. Loads the page and ranks its same-site links
//! 4. Accepts the best high-confidence archive link
//! 5. Otherwise descends into directory-like links, first success wins
//! 6. Otherwise accepts the best low-confidence archive link
//!
//! Every failure (bad URL, fetch error, timeout) degrades to "nothing here"
//! for that page only; sibling exploration continues.

use crate::config::CrawlerConfig;
use crate::crawler::{build_http_client, Link, LinkScorer, PageLoader, PatternClassifier};
use crate::url::{extract_domain, SitePolicy};
use futures::future::{BoxFuture, FutureExt};
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;
use url::Url;

/// Other networks and non-snapshot services a directory must not mention
pub const AVOIDED_PATHS: &str =
    r"(?i)hyperion|light_api|jungle|telos|fio|libre|near|qry|test|ultra|kylin|volt|proton|daobet";

static AVOIDED_PATHS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(AVOIDED_PATHS).expect("avoided path pattern should be valid"));

/// Per-provider crawl state
///
/// One context belongs to exactly one provider's crawl. It is never shared
/// between providers, so a URL visited for one provider is still fetched for
/// the next.
#[derive(Debug, Clone)]
pub struct CrawlContext {
    visited: HashSet<String>,
    max_depth: u32,
}

impl CrawlContext {
    pub fn new(max_depth: u32) -> Self {
        Self {
            visited: HashSet::new(),
            max_depth,
        }
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Records a URL as visited; returns false if it already was
    pub fn mark_visited(&mut self, url: &str) -> bool {
        self.visited.insert(url.to_string())
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }
}

/// Finds the most probable snapshot URL on a provider's site
#[derive(Debug)]
pub struct SnapshotLocator {
    loader: PageLoader,
    classifier: PatternClassifier,
    scorer: LinkScorer,
    policy: SitePolicy,
    max_depth: u32,
}

impl SnapshotLocator {
    /// Creates a locator with the built-in classifier and scorer
    pub fn new(config: &CrawlerConfig, policy: SitePolicy) -> Result<Self, reqwest::Error> {
        let client = build_http_client(config)?;
        let loader = PageLoader::new(client, config.page_timeout(), &policy);
        Ok(Self::from_parts(
            loader,
            PatternClassifier::default(),
            LinkScorer::default(),
            policy,
            config.max_depth,
        ))
    }

    pub fn from_parts(
        loader: PageLoader,
        classifier: PatternClassifier,
        scorer: LinkScorer,
        policy: SitePolicy,
        max_depth: u32,
    ) -> Self {
        Self {
            loader,
            classifier,
            scorer,
            policy,
            max_depth,
        }
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Searches a provider's site with a fresh crawl context
    pub async fn locate(&self, start_url: &str) -> Option<String> {
        let mut context = CrawlContext::new(self.max_depth);
        self.locate_in(&mut context, start_url).await
    }

    /// Searches a provider's site, recording visits in `context`
    pub async fn locate_in(&self, context: &mut CrawlContext, start_url: &str) -> Option<String> {
        self.search(context, start_url.to_string(), 0).await
    }

    fn search<'a>(
        &'a self,
        context: &'a mut CrawlContext,
        url: String,
        depth: u32,
    ) -> BoxFuture<'a, Option<String>> {
        async move {
            if depth > context.max_depth() {
                tracing::trace!("Depth limit reached at {}", url);
                return None;
            }

            let parsed = match Url::parse(&url) {
                Ok(parsed) => parsed,
                Err(e) => {
                    tracing::debug!("Skipping malformed URL {}: {}", url, e);
                    return None;
                }
            };

            let host = extract_domain(&parsed).unwrap_or_default();
            if self.policy.is_avoided(&host) {
                tracing::debug!("Skipping avoided host {}", host);
                return None;
            }

            if depth == 0 {
                if let Some(replacement) = self.policy.alias_for(&host) {
                    tracing::debug!("Trying {} before legacy mirror {}", replacement, url);
                    let found = self
                        .search(context, replacement.to_string(), depth + 1)
                        .await;
                    if found.is_some() {
                        return found;
                    }
                }
            }

            if !context.mark_visited(parsed.as_str()) {
                return None;
            }

            let document = self.loader.load(&parsed).await?;
            let mut links = document.links(&self.policy);
            self.scorer.rank(&mut links);

            let primary = links
                .iter()
                .find(|link| self.classifier.classify(&link.href, true));
            if let Some(link) = primary {
                tracing::info!("Found snapshot: {}", link.href);
                return Some(link.href.clone());
            }

            for directory in directory_candidates(&links) {
                tracing::debug!("Descending into {} (depth {})", directory.href, depth + 1);
                if let Some(found) = self.search(context, directory.href.clone(), depth + 1).await {
                    return Some(found);
                }
            }

            let fallback = links
                .iter()
                .find(|link| self.classifier.classify(&link.href, false))?;
            tracing::info!("Found snapshot: {}", fallback.href);
            Some(fallback.href.clone())
        }
        .boxed()
    }
}

/// Directory-like links worth descending into, WAX-related ones first
///
/// The partition is stable, so within each group the ranked order holds.
pub fn directory_candidates(links: &[Link]) -> Vec<&Link> {
    let (mut wax, other): (Vec<&Link>, Vec<&Link>) = links
        .iter()
        .filter(|link| is_directory_candidate(link))
        .partition(|link| mentions_wax(link));
    wax.extend(other);
    wax
}

fn is_directory_candidate(link: &Link) -> bool {
    let href = link.href.to_lowercase();
    let hinted = mentions_wax(link) || href.contains("mainnet") || href.contains("snapshot");
    // a path rather than a file
    let directory_like = link.href.ends_with('/') || !link.href.contains('.');
    hinted && directory_like && !AVOIDED_PATHS_RE.is_match(&href)
}

fn mentions_wax(link: &Link) -> bool {
    link.href.to_lowercase().contains("wax") || link.text.to_lowercase().contains("wax")
}
