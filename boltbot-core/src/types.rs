use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier the social platform assigns to a published post.
pub type PostId = String;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub title: String,
    pub link: String,
    pub summary: String,
    pub published_at: Option<DateTime<Utc>>,
    pub source_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub name: String,
    #[serde(rename = "url")]
    pub feed_url: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl Source {
    pub fn new(name: &str, feed_url: &str, keywords: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            feed_url: feed_url.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// Feeds the bot watches when no sources file is configured.
pub fn default_sources() -> Vec<Source> {
    vec![
        Source::new(
            "ESPN",
            "https://www.espn.com/espn/rss/nfl/news?team=SD",
            &["chargers", "herbert"],
        ),
        Source::new(
            "PFF",
            "https://www.pff.com/feed/teams/27",
            &["chargers", "herbert"],
        ),
        Source::new(
            "LA Daily News",
            "https://www.dailynews.com/sports/nfl/los-angeles-chargers/feed/",
            &["chargers", "herbert"],
        ),
    ]
}

/// A message drafted for an article but not published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    pub article: Article,
    pub message: String,
}
