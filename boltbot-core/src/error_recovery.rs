//! Error recovery strategies for the bot's error taxonomy.
//!
//! Every failure the pipeline sees is mapped to one of a few outcomes: wait
//! and retry (rate limits), skip the current source or article, degrade to a
//! reduced mode (an unreadable history becomes an empty one), or fail the
//! whole invocation.

use crate::{CoreError, ErrorExt, PublishError, StorageError};
use std::time::Duration;

/// Default wait when a rate limit response carries no reset hint.
pub const DEFAULT_RATE_LIMIT_WAIT: Duration = Duration::from_secs(60);

/// Recovery strategy for handling errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecoveryStrategy {
    /// Block for `delay`, then try the same operation again. The caller
    /// bounds how many times.
    WaitAndRetry { delay: Duration },
    /// Log and move on to the next source or article
    Skip,
    /// Continue with reduced functionality
    Degrade,
    /// Abort the current invocation
    Fail,
}

impl RecoveryStrategy {
    /// Returns true if the invocation has to stop
    pub fn is_fatal(&self) -> bool {
        matches!(self, RecoveryStrategy::Fail)
    }
}

/// Error recovery handler that provides strategies for different error types
pub struct ErrorRecovery;

impl ErrorRecovery {
    /// Determine the appropriate recovery strategy for a given error
    pub fn determine_strategy(error: &CoreError) -> RecoveryStrategy {
        match error {
            // A broken feed only costs that source
            CoreError::Fetch(_) => RecoveryStrategy::Skip,

            CoreError::Publish(publish_error) => match publish_error {
                // Credentials and permissions need user intervention
                PublishError::AuthenticationFailed { .. } | PublishError::Forbidden { .. } => {
                    RecoveryStrategy::Fail
                }
                PublishError::RateLimitExceeded { .. } => RecoveryStrategy::WaitAndRetry {
                    delay: error.retry_after().unwrap_or(DEFAULT_RATE_LIMIT_WAIT),
                },
                PublishError::ThreadInterrupted { .. } => RecoveryStrategy::Fail,
                // Transient failures abort this post attempt only
                PublishError::RequestTimeout
                | PublishError::Network { .. }
                | PublishError::ServerError { .. }
                | PublishError::InvalidResponse { .. } => RecoveryStrategy::Skip,
            },

            CoreError::Storage(storage_error) => match storage_error {
                StorageError::ReadFailed { .. } => RecoveryStrategy::Degrade,
                StorageError::WriteFailed { .. } => RecoveryStrategy::Skip,
            },

            CoreError::Generation(_) | CoreError::Config(_) | CoreError::Internal { .. } => {
                RecoveryStrategy::Fail
            }

            CoreError::Network(_)
            | CoreError::Io(_)
            | CoreError::Serialization(_)
            | CoreError::InvalidInput { .. } => RecoveryStrategy::Skip,
        }
    }
}
