//! The bot's long-running behaviour: news passes, the schedule that drives
//! them, and on-demand thread generation.

pub mod pipeline;
pub mod scheduler;
pub mod thread;

#[cfg(test)]
mod fakes;

pub use pipeline::{NewsPipeline, PassMode, PassReport, PublishedPost};
pub use scheduler::{BackgroundService, SchedulerState};
pub use thread::{ThreadGenerator, ThreadOutcome};
