use std::time::Duration;

use boltbot_core::{Article, CoreError, FetchError, Source};
use reqwest::Client;
use tracing::debug;

use crate::parser::parse_feed;
use crate::FeedFetcher;

const USER_AGENT: &str = concat!("boltbot/", env!("CARGO_PKG_VERSION"));

/// HTTP feed fetcher
pub struct FeedClient {
    client: Client,
}

impl FeedClient {
    /// Create a client with a 30 second timeout
    pub fn new() -> Result<Self, CoreError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self { client })
    }

    /// Create a new FeedClient with a custom reqwest Client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl FeedFetcher for FeedClient {
    async fn fetch(&self, source: &Source) -> Result<Vec<Article>, CoreError> {
        let url = &source.feed_url;
        debug!("Fetching feed from: {}", url);

        let request_failed = |e: reqwest::Error| FetchError::Request {
            source_name: source.name.clone(),
            reason: e.to_string(),
        };

        let response = self.client.get(url).send().await.map_err(request_failed)?;
        let status = response.status();

        if !status.is_success() {
            return Err(FetchError::Http {
                source_name: source.name.clone(),
                status: status.as_u16(),
            }
            .into());
        }

        let bytes = response.bytes().await.map_err(request_failed)?;
        let articles = parse_feed(&bytes, &source.name)?;

        debug!("Parsed {} entries from {}", articles.len(), source.name);
        Ok(articles)
    }
}
