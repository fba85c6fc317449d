//! On-chain producer registry
//!
//! Block producers publish a JSON document in the `producerjson` contract
//! table; its `org.chain_resources` field points at the producer's snapshot
//! site. One table query returns up to `limit` rows, each holding that
//! document as a JSON string.

use crate::config::RegistryConfig;
use crate::providers::{Provider, ProviderSource};
use futures::future::{BoxFuture, FutureExt};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Contract, scope, and table holding producer metadata
pub const PRODUCER_TABLE: &str = "producerjson";

const TABLE_ROWS_PATH: &str = "v1/chain/get_table_rows";

/// Errors reading the provider list
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Invalid registry endpoint: {0}")]
    Endpoint(#[from] url::ParseError),

    #[error("Registry request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Registry returned HTTP {0}")]
    Status(u16),

    #[error("Malformed registry response: {0}")]
    Response(#[from] serde_json::Error),
}

#[derive(Debug, Serialize)]
struct TableRowsRequest<'a> {
    json: bool,
    code: &'a str,
    scope: &'a str,
    table: &'a str,
    lower_bound: &'a str,
    upper_bound: &'a str,
    limit: u32,
    reverse: bool,
}

#[derive(Debug, Deserialize)]
struct TableRows {
    #[serde(default)]
    rows: Vec<TableRow>,
}

#[derive(Debug, Deserialize)]
struct TableRow {
    #[serde(default)]
    json: String,
}

#[derive(Debug, Deserialize)]
struct ProducerJson {
    producer_account_name: String,
    #[serde(default)]
    org: Option<ProducerOrg>,
}

#[derive(Debug, Deserialize)]
struct ProducerOrg {
    #[serde(default)]
    chain_resources: Option<String>,
}

/// Reads providers from the `producerjson` table of a chain API node
#[derive(Debug, Clone)]
pub struct ProducerRegistry {
    client: Client,
    endpoint: Url,
    limit: u32,
}

impl ProducerRegistry {
    pub fn new(config: &RegistryConfig, user_agent: &str) -> Result<Self, RegistryError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(30))
            .build()?;
        Self::with_client(client, &config.endpoint, config.limit)
    }

    pub fn with_client(client: Client, endpoint: &str, limit: u32) -> Result<Self, RegistryError> {
        Ok(Self {
            client,
            endpoint: Url::parse(endpoint)?,
            limit,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn query(&self) -> Result<Vec<Provider>, RegistryError> {
        let url = self.endpoint.join(TABLE_ROWS_PATH)?;
        let request = TableRowsRequest {
            json: true,
            code: PRODUCER_TABLE,
            scope: PRODUCER_TABLE,
            table: PRODUCER_TABLE,
            lower_bound: "",
            upper_bound: "",
            limit: self.limit,
            reverse: false,
        };

        tracing::debug!("Querying producer registry at {}", url);
        let response = self.client.post(url).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RegistryError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        parse_rows(&body)
    }
}

impl ProviderSource for ProducerRegistry {
    fn describe(&self) -> String {
        format!("producer registry at {}", self.endpoint)
    }

    fn fetch(&self) -> BoxFuture<'_, Result<Vec<Provider>, RegistryError>> {
        self.query().boxed()
    }
}

/// Extracts providers from a `get_table_rows` response body
///
/// Rows whose embedded document does not parse are skipped with a warning;
/// producers without a `chain_resources` URL are dropped.
pub fn parse_rows(body: &str) -> Result<Vec<Provider>, RegistryError> {
    let table: TableRows = serde_json::from_str(body)?;

    let providers = table
        .rows
        .iter()
        .filter_map(|row| match serde_json::from_str::<ProducerJson>(&row.json) {
            Ok(producer) => Some(producer),
            Err(e) => {
                tracing::warn!("Skipping unreadable producer row: {}", e);
                None
            }
        })
        .filter_map(|producer| {
            let resources = producer.org?.chain_resources?;
            if resources.trim().is_empty() {
                return None;
            }
            Some(Provider::new(producer.producer_account_name, &resources))
        })
        .collect();

    Ok(providers)
}
