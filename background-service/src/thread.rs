use boltbot_core::{CoreError, GenerationError, PostId};
use llm_interface::{split_segments, TextProvider, ThreadPrompt};
use tracing::{info, warn};
use x_client::Publisher;

/// A thread needs at least this many posts to be worth publishing.
pub const MIN_THREAD_SEGMENTS: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThreadOutcome {
    Drafted(Vec<String>),
    Published {
        segments: Vec<String>,
        post_ids: Vec<PostId>,
    },
}

impl ThreadOutcome {
    pub fn segments(&self) -> &[String] {
        match self {
            ThreadOutcome::Drafted(segments) => segments,
            ThreadOutcome::Published { segments, .. } => segments,
        }
    }
}

/// Asks a text provider for a thread and optionally publishes it.
pub struct ThreadGenerator<T> {
    provider: T,
}

impl<T: TextProvider> ThreadGenerator<T> {
    pub fn new(provider: T) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &T {
        &self.provider
    }

    pub async fn generate(&self, subject: &str) -> Result<Vec<String>, CoreError> {
        let prompt = ThreadPrompt::new(subject);
        info!(
            "Generating a thread about {} with {}",
            prompt.subject,
            self.provider.name()
        );

        let text = self.provider.submit(&prompt.render()).await?;
        let segments = split_segments(&text);

        if segments.len() < MIN_THREAD_SEGMENTS {
            return Err(GenerationError::TooFewSegments {
                expected_min: MIN_THREAD_SEGMENTS,
                actual: segments.len(),
            }
            .into());
        }

        if segments.len() < prompt.min_segments || segments.len() > prompt.max_segments {
            warn!(
                "Provider returned {} segments, asked for {} to {}",
                segments.len(),
                prompt.min_segments,
                prompt.max_segments
            );
        }

        info!("Generated {} segments", segments.len());
        Ok(segments)
    }

    /// Generates a thread, then returns the drafts (`dry_run`) or publishes
    /// them as a reply chain.
    pub async fn run<P: Publisher>(
        &self,
        subject: &str,
        publisher: &P,
        dry_run: bool,
    ) -> Result<ThreadOutcome, CoreError> {
        let segments = self.generate(subject).await?;

        if dry_run {
            return Ok(ThreadOutcome::Drafted(segments));
        }

        let post_ids = publisher.publish_thread(&segments).await?;
        info!("Published a {} post thread", post_ids.len());
        Ok(ThreadOutcome::Published { segments, post_ids })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::{FakePublisher, ScriptedProvider};
    use boltbot_core::PublishError;

    fn ten_segment_reply() -> String {
        (1..=10)
            .map(|n| format!("{}/10 Part {} of the story.", n, n))
            .collect::<Vec<_>>()
            .join("\n---\n")
    }

    #[tokio::test]
    async fn test_ten_segments_become_ten_chained_posts() {
        let generator = ThreadGenerator::new(ScriptedProvider::replying(ten_segment_reply()));
        let publisher = FakePublisher::new();

        let outcome = generator.run("the Epic in Miami", &publisher, false).await.unwrap();

        let ThreadOutcome::Published { segments, post_ids } = outcome else {
            panic!("expected a published thread");
        };
        assert_eq!(segments.len(), 10);
        assert_eq!(segments[0], "Part 1 of the story.");
        assert_eq!(post_ids.len(), 10);

        let calls = publisher.calls.borrow();
        assert_eq!(calls.len(), 10);
        assert_eq!(calls[0].1, None);
        for n in 1..10 {
            assert_eq!(calls[n].1.as_deref(), Some(post_ids[n - 1].as_str()));
        }
    }

    #[tokio::test]
    async fn test_failure_at_segment_four_abandons_the_rest() {
        let generator = ThreadGenerator::new(ScriptedProvider::replying(ten_segment_reply()));
        let publisher =
            FakePublisher::new().fail_on(4, PublishError::ServerError { status_code: 503 });

        let result = generator.run("the Epic in Miami", &publisher, false).await;
        assert!(matches!(
            result,
            Err(CoreError::Publish(PublishError::ThreadInterrupted {
                segment: 4,
                total: 10,
                ..
            }))
        ));
        assert_eq!(publisher.calls.borrow().len(), 4);
    }

    #[tokio::test]
    async fn test_dry_run_never_publishes() {
        let generator = ThreadGenerator::new(ScriptedProvider::replying(ten_segment_reply()));
        let publisher = FakePublisher::new();

        let outcome = generator.run("the Epic in Miami", &publisher, true).await.unwrap();
        assert!(matches!(outcome, ThreadOutcome::Drafted(ref s) if s.len() == 10));
        assert_eq!(outcome.segments().len(), 10);
        assert!(publisher.calls.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_prompt_names_the_subject() {
        let generator = ThreadGenerator::new(ScriptedProvider::replying("a\n---\nb"));
        generator.generate("the 1994 AFC Championship").await.unwrap();

        let prompts = generator.provider().prompts.borrow();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("the 1994 AFC Championship"));
    }

    #[tokio::test]
    async fn test_single_segment_is_too_few() {
        let generator = ThreadGenerator::new(ScriptedProvider::replying("only one post"));
        let result = generator.generate("anything").await;
        assert!(matches!(
            result,
            Err(CoreError::Generation(GenerationError::TooFewSegments {
                expected_min: 2,
                actual: 1
            }))
        ));
    }

    #[tokio::test]
    async fn test_provider_failure_is_surfaced() {
        let generator = ThreadGenerator::new(ScriptedProvider::failing(
            GenerationError::QuotaExceeded {
                provider: "groq".to_string(),
            },
        ));
        let publisher = FakePublisher::new();

        let result = generator.run("anything", &publisher, false).await;
        assert!(matches!(
            result,
            Err(CoreError::Generation(GenerationError::QuotaExceeded { .. }))
        ));
        assert!(publisher.calls.borrow().is_empty());
    }
}
