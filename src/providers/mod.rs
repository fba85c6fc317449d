//! Snapshot provider sources
//!
//! Providers come either from the configuration file or from the on-chain
//! producer registry. Both sources yield the same [`Provider`] records with
//! their entry URLs already cleaned.

mod registry;

pub use registry::{parse_rows, ProducerRegistry, RegistryError, PRODUCER_TABLE};

use crate::config::ProviderEntry;
use crate::url::clean_provider_url;
use futures::future::{BoxFuture, FutureExt};
use serde::Serialize;

/// A candidate snapshot provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Provider {
    pub name: String,
    pub url: String,
}

impl Provider {
    /// Creates a provider, cleaning the entry URL
    pub fn new(name: impl Into<String>, url: &str) -> Self {
        Self {
            name: name.into(),
            url: clean_provider_url(url),
        }
    }
}

/// Somewhere a provider list can be read from
pub trait ProviderSource: Send + Sync {
    /// Short description used in logs
    fn describe(&self) -> String;

    fn fetch(&self) -> BoxFuture<'_, Result<Vec<Provider>, RegistryError>>;
}

/// Providers listed in the configuration file
#[derive(Debug, Clone, Default)]
pub struct StaticProviders {
    providers: Vec<Provider>,
}

impl StaticProviders {
    pub fn new(providers: Vec<Provider>) -> Self {
        Self { providers }
    }

    pub fn from_entries(entries: &[ProviderEntry]) -> Self {
        Self::new(
            entries
                .iter()
                .map(|entry| Provider::new(entry.name.clone(), &entry.url))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl ProviderSource for StaticProviders {
    fn describe(&self) -> String {
        format!("{} configured providers", self.providers.len())
    }

    fn fetch(&self) -> BoxFuture<'_, Result<Vec<Provider>, RegistryError>> {
        let providers = self.providers.clone();
        async move { Ok(providers) }.boxed()
    }
}
