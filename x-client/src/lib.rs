pub mod api;
pub mod auth;
pub mod rate_limiter;
pub mod retry;


pub use api::XClient;
pub use auth::OAuth1Signer;
pub use rate_limiter::{RateLimitConfig, RateLimitStatus, RateLimiter};
pub use retry::{RetryConfig, RetryExecutor};

use boltbot_core::{CoreError, ErrorExt, PostId, PublishError};
use tracing::info;

/// Something that can put text on the platform.
#[allow(async_fn_in_trait)]
pub trait Publisher {
    /// Publishes a standalone post.
    async fn post(&self, text: &str) -> Result<PostId, CoreError>;

    /// Publishes a post replying to `in_reply_to`.
    async fn reply(&self, text: &str, in_reply_to: &str) -> Result<PostId, CoreError>;

    /// Publishes `bodies` as a chain: the first standalone, each next one
    /// replying to the previous. Stops at the first failure; posts already
    /// made stay up.
    async fn publish_thread(&self, bodies: &[String]) -> Result<Vec<PostId>, CoreError> {
        if bodies.is_empty() {
            return Err(CoreError::InvalidInput {
                message: "A thread needs at least one post".to_string(),
            });
        }

        let total = bodies.len();
        let mut posted: Vec<PostId> = Vec::with_capacity(total);

        for (index, body) in bodies.iter().enumerate() {
            let result = match posted.last() {
                None => self.post(body).await,
                Some(previous) => self.reply(body, previous).await,
            };

            match result {
                Ok(id) => {
                    info!("Posted thread segment {}/{}: {}", index + 1, total, id);
                    posted.push(id);
                }
                Err(e) => {
                    e.log_error();
                    return Err(PublishError::ThreadInterrupted {
                        segment: index + 1,
                        total,
                        posted,
                        reason: e.to_string(),
                    }
                    .into());
                }
            }
        }

        Ok(posted)
    }
}
