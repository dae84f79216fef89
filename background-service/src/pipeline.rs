use boltbot_core::filter;
use boltbot_core::format::format_post;
use boltbot_core::{
    CoreError, Draft, ErrorRecovery, ErrorReporter, PostId, RecoveryStrategy, Source,
};
use chrono::Utc;
use dedup_store::PostedStore;
use feed_reader::{collect_relevant, FeedFetcher};
use std::collections::HashSet;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};
use x_client::Publisher;

pub const DEFAULT_POST_SPACING: Duration = Duration::from_secs(30);
pub const DEFAULT_MAX_AGE_HOURS: i64 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassMode {
    /// Publish every new, recent, relevant article and record it
    Normal,
    /// Same selection as `Normal`, but only draft the messages
    DryRun,
    /// Publish the newest relevant article, ignoring age and history
    ForceTest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedPost {
    pub link: String,
    pub post_id: PostId,
}

/// What one pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassReport {
    pub relevant: usize,
    pub already_posted: usize,
    pub too_old: usize,
    pub failed: usize,
    pub published: Vec<PublishedPost>,
    pub drafts: Vec<Draft>,
}

pub struct NewsPipeline<F, P> {
    fetcher: F,
    publisher: P,
    store: PostedStore,
    sources: Vec<Source>,
    max_age: chrono::Duration,
    post_spacing: Duration,
    reporter: ErrorReporter,
}

impl<F: FeedFetcher, P: Publisher> NewsPipeline<F, P> {
    pub fn new(fetcher: F, publisher: P, store: PostedStore, sources: Vec<Source>) -> Self {
        Self {
            fetcher,
            publisher,
            store,
            sources,
            max_age: chrono::Duration::hours(DEFAULT_MAX_AGE_HOURS),
            post_spacing: DEFAULT_POST_SPACING,
            reporter: ErrorReporter::new(),
        }
    }

    pub fn with_max_age(mut self, max_age: chrono::Duration) -> Self {
        self.max_age = max_age;
        self
    }

    pub fn with_post_spacing(mut self, post_spacing: Duration) -> Self {
        self.post_spacing = post_spacing;
        self
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn publisher(&self) -> &P {
        &self.publisher
    }

    pub fn store(&self) -> &PostedStore {
        &self.store
    }

    /// Runs one fetch, filter, dedup, format and publish pass.
    ///
    /// Per-source and per-article failures are logged and skipped. Only
    /// errors whose recovery strategy is `Fail` (bad credentials, missing
    /// permission) end the pass early.
    pub async fn run_pass(&mut self, mode: PassMode) -> Result<PassReport, CoreError> {
        info!("Starting {:?} pass over {} sources", mode, self.sources.len());

        let mut articles = collect_relevant(&self.fetcher, &self.sources).await;
        filter::newest_first(&mut articles);

        let mut report = PassReport {
            relevant: articles.len(),
            ..Default::default()
        };

        if mode == PassMode::ForceTest {
            let Some(article) = articles.into_iter().next() else {
                info!("No relevant articles found");
                return Ok(report);
            };

            let message = format_post(&article);
            info!("Force-publishing: {}", article.title);
            let post_id = self.publisher.post(&message).await?;
            report.published.push(PublishedPost {
                link: article.link,
                post_id,
            });
            return Ok(report);
        }

        let now = Utc::now();
        let mut seen_this_pass = HashSet::new();
        let mut attempted = 0usize;

        for article in articles {
            if self.store.contains(&article.link) || !seen_this_pass.insert(article.link.clone()) {
                debug!("Already posted: {}", article.link);
                report.already_posted += 1;
                continue;
            }

            if !filter::is_recent(&article, now, self.max_age) {
                debug!("Too old: {}", article.title);
                report.too_old += 1;
                continue;
            }

            let message = format_post(&article);

            if mode == PassMode::DryRun {
                report.drafts.push(Draft { article, message });
                continue;
            }

            if attempted > 0 {
                debug!("Waiting {:?} before the next post", self.post_spacing);
                sleep(self.post_spacing).await;
            }
            attempted += 1;

            match self.publisher.post(&message).await {
                Ok(post_id) => {
                    info!("Posted {} as {}", article.link, post_id);
                    if let Err(e) = self.store.record(&article.link) {
                        self.reporter.report_warning(&e);
                    }
                    report.published.push(PublishedPost {
                        link: article.link,
                        post_id,
                    });
                }
                Err(e) => match ErrorRecovery::determine_strategy(&e) {
                    RecoveryStrategy::Fail => {
                        self.reporter.report_error(&e);
                        return Err(e);
                    }
                    _ => {
                        self.reporter.report_warning(&e);
                        warn!("Skipping {}", article.link);
                        report.failed += 1;
                    }
                },
            }
        }

        info!(
            "Pass finished: {} relevant, {} published, {} drafted, {} already posted, {} too old, {} failed",
            report.relevant,
            report.published.len(),
            report.drafts.len(),
            report.already_posted,
            report.too_old,
            report.failed
        );
        Ok(report)
    }
}
