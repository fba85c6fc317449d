//! Crawler module for locating snapshot archives
//!
//! This module contains the artifact-locating crawler, including:
//! - Snapshot URL classification at two confidence tiers
//! - Link relevance scoring
//! - Page loading with host-specific page sources
//! - Link extraction and same-site scoping
//! - The bounded-depth locator that ties them together

mod classifier;
mod loader;
mod locator;
mod parser;
mod scorer;
mod source;

pub use classifier::{PatternClassifier, EXCLUDED_NETWORKS, FALLBACK_PATTERNS, PRIMARY_PATTERNS};
pub use loader::{build_http_client, PageLoader};
pub use locator::{directory_candidates, CrawlContext, SnapshotLocator, AVOIDED_PATHS};
pub use parser::{extract_links, first_anchor_href};
pub use scorer::{Field, LinkScorer, RuleSpec, SCORE_RULES};
pub use source::{
    Document, HtmlSource, JsonIndexSource, LoadError, PageSource, JSON_INDEX_LINK_TEXT,
    JSON_INDEX_PATH,
};

use serde::Serialize;

/// An absolute, same-site link discovered on a page
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Link {
    /// Trimmed anchor text
    pub text: String,
    /// Absolute URL the link resolves to
    pub href: String,
}

/// A provider paired with the best snapshot URL found on its site
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotCandidate {
    pub name: String,
    pub snapshot_url: Option<String>,
}

impl SnapshotCandidate {
    pub fn new(name: impl Into<String>, snapshot_url: Option<String>) -> Self {
        Self {
            name: name.into(),
            snapshot_url,
        }
    }

    /// Returns true if a snapshot URL was found
    pub fn is_found(&self) -> bool {
        self.snapshot_url.is_some()
    }
}
