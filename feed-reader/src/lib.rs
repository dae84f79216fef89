//! RSS/Atom feed reader.
//!
//! Fetches each configured source, converts its entries into [`Article`]s and
//! keeps the ones relevant to that source's keywords.
//!
//! # Example
//!
//! ```rust,ignore
//! use feed_reader::{collect_relevant, FeedClient};
//!
//! let client = FeedClient::new()?;
//! let articles = collect_relevant(&client, &config.sources).await;
//! ```

mod client;
mod parser;

pub use client::FeedClient;
pub use parser::parse_feed;

use boltbot_core::filter;
use boltbot_core::{Article, CoreError, ErrorExt, Source};
use tracing::{info, warn};

/// Anything that can turn a [`Source`] into the articles currently in its feed.
#[allow(async_fn_in_trait)]
pub trait FeedFetcher {
    async fn fetch(&self, source: &Source) -> Result<Vec<Article>, CoreError>;
}

/// Fetches every source in order and returns the articles matching each
/// source's keywords. A failing source is logged and contributes nothing.
pub async fn collect_relevant<F: FeedFetcher>(fetcher: &F, sources: &[Source]) -> Vec<Article> {
    let mut relevant = Vec::new();

    for source in sources {
        info!("Fetching news from {}", source.name);

        let articles = match fetcher.fetch(source).await {
            Ok(articles) => articles,
            Err(e) => {
                e.log_warn();
                warn!("Skipping {}: {}", source.name, e.user_friendly_message());
                continue;
            }
        };

        let total = articles.len();
        let before = relevant.len();
        relevant.extend(
            articles
                .into_iter()
                .filter(|article| filter::matches(article, &source.keywords)),
        );

        info!(
            "Found {} articles from {} ({} relevant)",
            total,
            source.name,
            relevant.len() - before
        );
    }

    relevant
}
