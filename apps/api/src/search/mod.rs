//! Public code / Q&A search APIs used by the parallel aggregation tier.
//!
//! Best-effort only: any transport error, non-2xx status or undecodable body is a
//! `SearchError`, which the aggregator turns into an empty category.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::models::resource::Resource;

pub mod github;
pub mod stackoverflow;

pub use github::GithubSearch;
pub use stackoverflow::StackOverflowSearch;

/// Results requested from each upstream search.
pub const RESULTS_PER_QUERY: u32 = 5;

const USER_AGENT: &str = concat!("mentor-api/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("search API returned status {status}")]
    Status { status: u16 },

    #[error("could not decode search response: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub snippet: Option<String>,
}

impl SearchHit {
    pub fn into_resource(self, platform: &str, price: Option<&str>) -> Resource {
        Resource::new(self.title, self.url)
            .with_description(self.snippet.unwrap_or_default())
            .with_platform(platform)
            .with_price(price.unwrap_or_default())
    }
}

#[async_trait]
pub trait SearchClient: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, SearchError>;

    /// Label used as the resource platform.
    fn platform(&self) -> &'static str;
}
