//! URL handling module for Snapshot-Scout
//!
//! This module provides host extraction, wildcard host matching, provider URL
//! cleaning, and the [`SitePolicy`] that scopes a crawl to a provider's site.

mod clean;
mod domain;
mod matcher;

use url::Url;

// Re-export main functions
pub use clean::{clean_provider_url, parse_http_url};
pub use domain::{extract_domain, registrable_domain};
pub use matcher::matches_wildcard;

/// Code-hosting sites that never distribute snapshots
pub const AVOIDED_DOMAINS: &[&str] = &["github.com", "gitlab.com", "bitbucket.org"];

/// Hosts that publish their snapshot listing as `data/snapshots.json`
pub const JSON_INDEX_HOSTS: &[&str] = &["*.blokcrafters.io"];

/// A legacy mirror host whose canonical site is tried first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostAlias {
    /// Host of the legacy mirror
    pub host: String,
    /// Entry URL of the canonical replacement site
    pub replacement: String,
}

/// Hosts allowed to link to each other even though their domains differ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostPairing {
    /// Pages on any of these hosts...
    pub sources: Vec<String>,
    /// ...may link to any of these hosts
    pub targets: Vec<String>,
}

impl HostPairing {
    fn allows(&self, base_host: &str, resolved_host: &str) -> bool {
        self.sources.iter().any(|h| h == base_host)
            && self.targets.iter().any(|h| h == resolved_host)
    }
}

/// Scope and host-specific rules applied while crawling a provider
///
/// The default policy carries the known provider quirks; tests and other
/// deployments can start from [`SitePolicy::empty`] and add their own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitePolicy {
    avoided_domains: Vec<String>,
    aliases: Vec<HostAlias>,
    pairings: Vec<HostPairing>,
    json_index_hosts: Vec<String>,
}

impl Default for SitePolicy {
    fn default() -> Self {
        Self::empty()
            .with_avoided_domains(AVOIDED_DOMAINS.iter().copied())
            .with_alias("snapshots.eossweden.org", "https://snapshots.waxsweden.org/")
            .with_pairing(
                ["snapshots.waxsweden.org", "snapshots.eossweden.org"],
                ["snapshots-cdn.eossweden.org", "snapshots.waxsweden.org"],
            )
            .with_json_index_hosts(JSON_INDEX_HOSTS.iter().copied())
    }
}

impl SitePolicy {
    /// A policy with no avoided domains, aliases, pairings, or JSON-index hosts
    pub fn empty() -> Self {
        Self {
            avoided_domains: Vec::new(),
            aliases: Vec::new(),
            pairings: Vec::new(),
            json_index_hosts: Vec::new(),
        }
    }

    pub fn with_avoided_domains<'a>(mut self, domains: impl IntoIterator<Item = &'a str>) -> Self {
        self.avoided_domains
            .extend(domains.into_iter().map(str::to_lowercase));
        self
    }

    pub fn with_alias(mut self, host: &str, replacement: &str) -> Self {
        self.aliases.push(HostAlias {
            host: host.to_lowercase(),
            replacement: replacement.to_string(),
        });
        self
    }

    pub fn with_pairing<'a>(
        mut self,
        sources: impl IntoIterator<Item = &'a str>,
        targets: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        self.pairings.push(HostPairing {
            sources: sources.into_iter().map(str::to_lowercase).collect(),
            targets: targets.into_iter().map(str::to_lowercase).collect(),
        });
        self
    }

    /// Adds host patterns (exact or `*.`-wildcard) served by the JSON index source
    pub fn with_json_index_hosts<'a>(mut self, hosts: impl IntoIterator<Item = &'a str>) -> Self {
        self.json_index_hosts
            .extend(hosts.into_iter().map(str::to_lowercase));
        self
    }

    /// Returns true if the host is on the avoid-list
    pub fn is_avoided(&self, host: &str) -> bool {
        self.avoided_domains.iter().any(|d| d == host)
    }

    /// Returns the canonical replacement entry URL for a legacy mirror host
    pub fn alias_for(&self, host: &str) -> Option<&str> {
        self.aliases
            .iter()
            .find(|alias| alias.host == host)
            .map(|alias| alias.replacement.as_str())
    }

    /// Host patterns whose pages should be read from a JSON index
    pub fn json_index_hosts(&self) -> &[String] {
        &self.json_index_hosts
    }

    /// Decides whether a link resolved from `base` stays on the provider's site
    ///
    /// A link is same-site when:
    /// 1. its host is paired with the page's host, or
    /// 2. both hosts share a registrable domain, or
    /// 3. the link textually extends the page URL.
    pub fn is_same_site(&self, base: &Url, resolved: &Url) -> bool {
        let base_host = extract_domain(base).unwrap_or_default();
        let resolved_host = extract_domain(resolved).unwrap_or_default();

        if self
            .pairings
            .iter()
            .any(|pairing| pairing.allows(&base_host, &resolved_host))
        {
            return true;
        }

        registrable_domain(&base_host) == registrable_domain(&resolved_host)
            || resolved.as_str().starts_with(base.as_str())
    }
}
