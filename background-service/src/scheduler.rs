use crate::pipeline::{NewsPipeline, PassMode, PassReport};
use boltbot_core::{CoreError, ErrorExt};
use feed_reader::FeedFetcher;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::sleep;
use tracing::{error, info};
use x_client::Publisher;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Sleeping until the next pass
    Idle,
    /// A pass is in progress
    Running,
}

/// Runs a normal pass right away and then once per interval, forever.
///
/// Passes never overlap: the interval is slept after a pass completes, so a
/// slow pass pushes the next one back rather than being skipped.
pub struct BackgroundService<F, P> {
    pipeline: NewsPipeline<F, P>,
    interval: Duration,
    state: watch::Sender<SchedulerState>,
    passes_completed: u64,
}

impl<F: FeedFetcher, P: Publisher> BackgroundService<F, P> {
    pub fn new(pipeline: NewsPipeline<F, P>, interval: Duration) -> Self {
        let (state, _) = watch::channel(SchedulerState::Idle);
        Self {
            pipeline,
            interval,
            state,
            passes_completed: 0,
        }
    }

    pub fn state(&self) -> SchedulerState {
        *self.state.borrow()
    }

    /// Follows state changes from elsewhere.
    pub fn subscribe(&self) -> watch::Receiver<SchedulerState> {
        self.state.subscribe()
    }

    pub fn passes_completed(&self) -> u64 {
        self.passes_completed
    }

    pub fn pipeline(&self) -> &NewsPipeline<F, P> {
        &self.pipeline
    }

    /// Runs exactly one pass, moving Idle -> Running -> Idle.
    pub async fn tick(&mut self) -> Result<PassReport, CoreError> {
        self.state.send_replace(SchedulerState::Running);
        let result = self.pipeline.run_pass(PassMode::Normal).await;
        self.state.send_replace(SchedulerState::Idle);
        self.passes_completed += 1;
        result
    }

    /// Loops until the process is stopped. A failed pass is logged and the
    /// schedule carries on.
    pub async fn start(&mut self) {
        info!("Scheduler started, checking every {:?}", self.interval);

        loop {
            match self.tick().await {
                Ok(report) => info!(
                    "Pass {} complete: {} published",
                    self.passes_completed,
                    report.published.len()
                ),
                Err(e) => {
                    e.log_error();
                    error!("Pass {} failed: {}", self.passes_completed, e.user_friendly_message());
                }
            }

            info!("Next check in {:?}", self.interval);
            sleep(self.interval).await;
        }
    }
}
