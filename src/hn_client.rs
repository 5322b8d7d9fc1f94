use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::models::Item;

const DEFAULT_BASE_URL: &str = "https://hacker-news.firebaseio.com/v0";

/// Where the ranked item ids and the item records come from.
///
/// The production implementation talks to the Firebase API; tests
/// substitute stub sources with scripted listings, latencies and failures.
#[async_trait]
pub trait ItemSource: Send + Sync {
    /// The current top item ids, best ranked first.
    async fn top_items(&self) -> Result<Vec<u64>>;

    /// Resolve a single id to its item record.
    async fn item(&self, id: u64) -> Result<Item>;
}

pub struct HackerNewsClient {
    client: Client,
    base_url: String,
}

impl HackerNewsClient {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Point the client somewhere else, e.g. a local fixture server.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("hn-top-links/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl ItemSource for HackerNewsClient {
    async fn top_items(&self) -> Result<Vec<u64>> {
        let url = format!("{}/topstories.json", self.base_url);
        let ids = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<u64>>()
            .await
            .context("malformed top story listing")?;

        Ok(ids)
    }

    async fn item(&self, id: u64) -> Result<Item> {
        let url = format!("{}/item/{}.json", self.base_url, id);
        // The API answers `null` (not a 404) for ids it does not know.
        let item = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json::<Option<Item>>()
            .await
            .with_context(|| format!("malformed record for item {}", id))?
            .ok_or_else(|| anyhow!("item {} does not exist", id))?;

        Ok(item)
    }
}
