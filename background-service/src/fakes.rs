//! In-memory stand-ins for the network-facing traits.

use crate::SchedulerState;
use boltbot_core::{
    Article, CoreError, FetchError, GenerationError, PostId, PublishError, Source,
};
use chrono::{DateTime, Utc};
use feed_reader::FeedFetcher;
use llm_interface::TextProvider;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::sync::watch;
use x_client::Publisher;

pub fn article(title: &str, link: &str, published_at: Option<DateTime<Utc>>) -> Article {
    Article {
        title: title.to_string(),
        link: link.to_string(),
        summary: String::new(),
        published_at,
        source_name: "ESPN".to_string(),
    }
}

pub fn espn() -> Source {
    Source::new("ESPN", "https://www.espn.com/espn/rss/nfl/news", &["Chargers", "Justin Herbert"])
}

pub fn temp_store_path() -> PathBuf {
    std::env::temp_dir().join(format!("test_pipeline_{}.txt", uuid::Uuid::new_v4()))
}

/// Serves fixed articles per source name. A source named "Broken" fails.
#[derive(Default)]
pub struct FakeFetcher {
    articles: RefCell<Vec<Article>>,
    fresh_each_fetch: bool,
    pub fetches: Cell<usize>,
    pub state_rx: RefCell<Option<watch::Receiver<SchedulerState>>>,
    pub observed_states: RefCell<Vec<SchedulerState>>,
}

impl FakeFetcher {
    pub fn with_articles(articles: Vec<Article>) -> Self {
        Self {
            articles: RefCell::new(articles),
            ..Default::default()
        }
    }

    /// Every fetch returns one new, never-seen article.
    pub fn fresh_each_fetch() -> Self {
        Self {
            fresh_each_fetch: true,
            ..Default::default()
        }
    }
}

impl FeedFetcher for FakeFetcher {
    async fn fetch(&self, source: &Source) -> Result<Vec<Article>, CoreError> {
        let fetch_number = self.fetches.get() + 1;
        self.fetches.set(fetch_number);

        if let Some(rx) = self.state_rx.borrow().as_ref() {
            self.observed_states.borrow_mut().push(*rx.borrow());
        }

        if source.name == "Broken" {
            return Err(FetchError::Http {
                source_name: source.name.clone(),
                status: 503,
            }
            .into());
        }

        if self.fresh_each_fetch {
            return Ok(vec![article(
                &format!("Chargers practice report {}", fetch_number),
                &format!("http://x/{}", fetch_number),
                None,
            )]);
        }

        Ok(self
            .articles
            .borrow()
            .iter()
            .filter(|a| a.source_name == source.name)
            .cloned()
            .collect())
    }
}

/// Records every post and fails the calls it was told to fail.
#[derive(Default)]
pub struct FakePublisher {
    pub calls: RefCell<Vec<(String, Option<String>)>>,
    failures: RefCell<HashMap<usize, PublishError>>,
}

impl FakePublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the `call`-th publish attempt (1-based) fail with `error`.
    pub fn fail_on(self, call: usize, error: PublishError) -> Self {
        self.failures.borrow_mut().insert(call, error);
        self
    }

    pub fn texts(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|(text, _)| text.clone()).collect()
    }

    fn attempt(&self, text: &str, reply_to: Option<&str>) -> Result<PostId, CoreError> {
        let call_number = {
            let mut calls = self.calls.borrow_mut();
            calls.push((text.to_string(), reply_to.map(str::to_string)));
            calls.len()
        };

        if let Some(error) = self.failures.borrow_mut().remove(&call_number) {
            return Err(error.into());
        }
        Ok(format!("id-{}", call_number))
    }
}

impl Publisher for FakePublisher {
    async fn post(&self, text: &str) -> Result<PostId, CoreError> {
        self.attempt(text, None)
    }

    async fn reply(&self, text: &str, in_reply_to: &str) -> Result<PostId, CoreError> {
        self.attempt(text, Some(in_reply_to))
    }
}

/// Returns a canned response and remembers the prompts it was given.
pub struct ScriptedProvider {
    response: Result<String, GenerationError>,
    pub prompts: RefCell<Vec<String>>,
}

impl ScriptedProvider {
    pub fn replying(text: impl Into<String>) -> Self {
        Self {
            response: Ok(text.into()),
            prompts: RefCell::new(Vec::new()),
        }
    }

    pub fn failing(error: GenerationError) -> Self {
        Self {
            response: Err(error),
            prompts: RefCell::new(Vec::new()),
        }
    }
}

impl TextProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn submit(&self, prompt: &str) -> Result<String, CoreError> {
        self.prompts.borrow_mut().push(prompt.to_string());
        self.response.clone().map_err(CoreError::from)
    }
}
