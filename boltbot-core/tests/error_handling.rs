use boltbot_core::{
    ConfigError, CoreError, ErrorExt, ErrorReporter, FetchError, GenerationError, PublishError,
    StorageError,
};
use std::time::Duration;

#[test]
fn test_error_codes() {
    let fetch_error = CoreError::Fetch(FetchError::Parse {
        source_name: "PFF".to_string(),
        reason: "unexpected eof".to_string(),
    });
    assert_eq!(fetch_error.error_code(), "FETCH");

    let publish_error = CoreError::Publish(PublishError::RequestTimeout);
    assert_eq!(publish_error.error_code(), "PUBLISH");

    let storage_error = CoreError::Storage(StorageError::WriteFailed {
        path: "posted_articles.txt".to_string(),
        reason: "disk full".to_string(),
    });
    assert_eq!(storage_error.error_code(), "STORAGE");

    let generation_error = CoreError::Generation(GenerationError::InvalidApiKey {
        provider: "openai".to_string(),
    });
    assert_eq!(generation_error.error_code(), "GENERATION");

    let config_error = CoreError::Config(ConfigError::MissingEnvironmentVariable {
        var_name: "TWITTER_API_KEY".to_string(),
    });
    assert_eq!(config_error.error_code(), "CONFIG");
}

#[test]
fn test_retryable_errors() {
    let retryable_error = CoreError::Publish(PublishError::RateLimitExceeded { retry_after: 60 });
    assert!(retryable_error.is_retryable());

    let non_retryable_error = CoreError::Publish(PublishError::AuthenticationFailed {
        reason: "Could not authenticate you".to_string(),
    });
    assert!(!non_retryable_error.is_retryable());

    let storage_error = CoreError::Storage(StorageError::ReadFailed {
        path: "posted_articles.txt".to_string(),
        reason: "permission denied".to_string(),
    });
    assert!(!storage_error.is_retryable());
}

#[test]
fn test_retry_after() {
    let rate_limit_error = CoreError::Publish(PublishError::RateLimitExceeded { retry_after: 60 });
    assert_eq!(
        rate_limit_error.retry_after(),
        Some(Duration::from_secs(60))
    );

    let forbidden = CoreError::Publish(PublishError::Forbidden {
        reason: "duplicate content".to_string(),
    });
    assert_eq!(forbidden.retry_after(), None);
}

#[test]
fn test_thread_interruption_message() {
    let error = CoreError::Publish(PublishError::ThreadInterrupted {
        segment: 4,
        total: 10,
        posted: vec!["1".to_string(), "2".to_string(), "3".to_string()],
        reason: "Server error: 503".to_string(),
    });
    assert!(error.to_string().contains("segment 4 of 10 after 3 posts"));
    assert!(error.user_friendly_message().contains("post 4 of 10"));
}

#[test]
fn test_user_friendly_messages() {
    let publish_error = CoreError::Publish(PublishError::AuthenticationFailed {
        reason: "bad signature".to_string(),
    });
    let message = publish_error.user_friendly_message();
    assert!(message.contains("check your API keys"));

    let config_error = CoreError::Config(ConfigError::MissingEnvironmentVariable {
        var_name: "GROQ_API_KEY".to_string(),
    });
    let message = config_error.user_friendly_message();
    assert!(message.contains("GROQ_API_KEY"));
}

#[test]
fn test_error_reporter() {
    let reporter = ErrorReporter::new()
        .with_error_reporting(true)
        .with_warning_reporting(true);
    let error = CoreError::Publish(PublishError::RequestTimeout);

    // This test just ensures the methods don't panic
    reporter.report_error(&error);
    reporter.report_warning(&error);
}
