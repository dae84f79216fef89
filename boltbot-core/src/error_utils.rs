use crate::error::*;
use std::time::Duration;
use tracing::{error, info, warn};

pub trait ErrorExt {
    fn log_error(&self) -> &Self;
    fn log_warn(&self) -> &Self;
    fn is_retryable(&self) -> bool;
    fn retry_after(&self) -> Option<Duration>;
    fn user_friendly_message(&self) -> String;
    fn error_code(&self) -> String;
}

impl ErrorExt for CoreError {
    fn log_error(&self) -> &Self {
        error!("CoreError: {}", self);
        match self {
            CoreError::Fetch(e) => {
                error!("Feed error details: {:?}", e);
            }
            CoreError::Publish(e) => {
                error!("Publish error details: {:?}", e);
            }
            CoreError::Storage(e) => {
                error!("Storage error details: {:?}", e);
            }
            CoreError::Generation(e) => {
                error!("Generation error details: {:?}", e);
            }
            CoreError::Config(e) => {
                error!("Configuration error details: {:?}", e);
            }
            _ => {}
        }
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("CoreError (warning): {}", self);
        self
    }

    fn is_retryable(&self) -> bool {
        match self {
            CoreError::Fetch(e) => e.is_retryable(),
            CoreError::Publish(e) => e.is_retryable(),
            CoreError::Storage(e) => e.is_retryable(),
            CoreError::Generation(e) => e.is_retryable(),
            CoreError::Network(_) => true,
            _ => false,
        }
    }

    fn retry_after(&self) -> Option<Duration> {
        match self {
            CoreError::Publish(e) => e.retry_after(),
            CoreError::Generation(e) => e.retry_after(),
            _ if self.is_retryable() => Some(Duration::from_secs(5)),
            _ => None,
        }
    }

    fn user_friendly_message(&self) -> String {
        match self {
            CoreError::Fetch(e) => e.user_friendly_message(),
            CoreError::Publish(e) => e.user_friendly_message(),
            CoreError::Storage(e) => e.user_friendly_message(),
            CoreError::Generation(e) => e.user_friendly_message(),
            CoreError::Config(e) => e.user_friendly_message(),
            CoreError::Network(_) => {
                "Network connection error. Please check your internet connection.".to_string()
            }
            CoreError::InvalidInput { message } => format!("Invalid input: {}", message),
            _ => "An unexpected error occurred. Please try again later.".to_string(),
        }
    }

    fn error_code(&self) -> String {
        match self {
            CoreError::Fetch(_) => "FETCH".to_string(),
            CoreError::Publish(_) => "PUBLISH".to_string(),
            CoreError::Storage(_) => "STORAGE".to_string(),
            CoreError::Generation(_) => "GENERATION".to_string(),
            CoreError::Config(_) => "CONFIG".to_string(),
            CoreError::Io(_) => "IO".to_string(),
            CoreError::Serialization(_) => "SERIALIZATION".to_string(),
            CoreError::Network(_) => "NETWORK".to_string(),
            CoreError::InvalidInput { .. } => "INVALID_INPUT".to_string(),
            CoreError::Internal { .. } => "INTERNAL".to_string(),
        }
    }
}

impl ErrorExt for FetchError {
    fn log_error(&self) -> &Self {
        error!("FetchError: {}", self);
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("FetchError (warning): {}", self);
        self
    }

    fn is_retryable(&self) -> bool {
        match self {
            FetchError::Http { status, .. } => *status >= 500,
            FetchError::Request { .. } => true,
            FetchError::Parse { .. } => false,
        }
    }

    fn retry_after(&self) -> Option<Duration> {
        if self.is_retryable() {
            Some(Duration::from_secs(30))
        } else {
            None
        }
    }

    fn user_friendly_message(&self) -> String {
        match self {
            FetchError::Http {
                source_name,
                status,
            } => format!("{} returned HTTP {}. Skipping this source.", source_name, status),
            FetchError::Request { source_name, .. } => {
                format!("Could not reach {}. Skipping this source.", source_name)
            }
            FetchError::Parse { source_name, .. } => {
                format!("The feed from {} could not be read.", source_name)
            }
        }
    }

    fn error_code(&self) -> String {
        match self {
            FetchError::Http { .. } => "FETCH_HTTP".to_string(),
            FetchError::Request { .. } => "FETCH_REQUEST".to_string(),
            FetchError::Parse { .. } => "FETCH_PARSE".to_string(),
        }
    }
}

impl ErrorExt for PublishError {
    fn log_error(&self) -> &Self {
        error!("PublishError: {}", self);
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("PublishError (warning): {}", self);
        self
    }

    fn is_retryable(&self) -> bool {
        matches!(self, PublishError::RateLimitExceeded { .. })
    }

    fn retry_after(&self) -> Option<Duration> {
        match self {
            PublishError::RateLimitExceeded { retry_after } => {
                Some(Duration::from_secs(*retry_after))
            }
            _ => None,
        }
    }

    fn user_friendly_message(&self) -> String {
        match self {
            PublishError::AuthenticationFailed { .. } => {
                "Authentication with the platform failed. Please check your API keys.".to_string()
            }
            PublishError::Forbidden { reason } => format!(
                "The platform refused the post ({}). Check app permissions or duplicate content.",
                reason
            ),
            PublishError::RateLimitExceeded { retry_after } => format!(
                "Too many requests. Please wait {} seconds before trying again.",
                retry_after
            ),
            PublishError::RequestTimeout => {
                "Request to the platform timed out. Please try again.".to_string()
            }
            PublishError::ThreadInterrupted {
                segment, total, ..
            } => format!(
                "The thread stopped at post {} of {}. Earlier posts were left in place.",
                segment, total
            ),
            _ => "Publishing failed. Please try again later.".to_string(),
        }
    }

    fn error_code(&self) -> String {
        match self {
            PublishError::AuthenticationFailed { .. } => "PUBLISH_AUTH_FAILED".to_string(),
            PublishError::Forbidden { .. } => "PUBLISH_FORBIDDEN".to_string(),
            PublishError::RateLimitExceeded { .. } => "PUBLISH_RATE_LIMIT".to_string(),
            PublishError::RequestTimeout => "PUBLISH_TIMEOUT".to_string(),
            PublishError::Network { .. } => "PUBLISH_NETWORK".to_string(),
            PublishError::ServerError { .. } => "PUBLISH_SERVER_ERROR".to_string(),
            PublishError::InvalidResponse { .. } => "PUBLISH_INVALID_RESPONSE".to_string(),
            PublishError::ThreadInterrupted { .. } => "PUBLISH_THREAD_INTERRUPTED".to_string(),
        }
    }
}

impl ErrorExt for StorageError {
    fn log_error(&self) -> &Self {
        error!("StorageError: {}", self);
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("StorageError (warning): {}", self);
        self
    }

    fn is_retryable(&self) -> bool {
        false
    }

    fn retry_after(&self) -> Option<Duration> {
        None
    }

    fn user_friendly_message(&self) -> String {
        match self {
            StorageError::ReadFailed { path, .. } => {
                format!("Could not read {}. Starting with an empty history.", path)
            }
            StorageError::WriteFailed { path, .. } => format!(
                "Could not save to {}. The article may be posted again on the next run.",
                path
            ),
        }
    }

    fn error_code(&self) -> String {
        match self {
            StorageError::ReadFailed { .. } => "STORAGE_READ_FAILED".to_string(),
            StorageError::WriteFailed { .. } => "STORAGE_WRITE_FAILED".to_string(),
        }
    }
}

impl ErrorExt for GenerationError {
    fn log_error(&self) -> &Self {
        error!("GenerationError: {}", self);
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("GenerationError (warning): {}", self);
        self
    }

    fn is_retryable(&self) -> bool {
        matches!(
            self,
            GenerationError::QuotaExceeded { .. } | GenerationError::ServiceUnavailable { .. }
        )
    }

    fn retry_after(&self) -> Option<Duration> {
        if self.is_retryable() {
            Some(Duration::from_secs(10))
        } else {
            None
        }
    }

    fn user_friendly_message(&self) -> String {
        match self {
            GenerationError::UnknownProvider { name } => format!(
                "Unknown AI provider '{}'. Use openai, groq or gemini.",
                name
            ),
            GenerationError::InvalidApiKey { provider } => format!(
                "Invalid API key for {}. Please update your credentials.",
                provider
            ),
            GenerationError::QuotaExceeded { provider } => {
                format!("Quota exceeded for {}. Please wait and try again.", provider)
            }
            GenerationError::ServiceUnavailable { provider } => format!(
                "{} service is temporarily unavailable. Please try again later.",
                provider
            ),
            GenerationError::TooFewSegments { actual, .. } => format!(
                "The AI response only contained {} usable posts.",
                actual
            ),
            _ => "AI service error occurred. Please try again later.".to_string(),
        }
    }

    fn error_code(&self) -> String {
        match self {
            GenerationError::UnknownProvider { .. } => "GEN_UNKNOWN_PROVIDER".to_string(),
            GenerationError::InvalidApiKey { .. } => "GEN_INVALID_API_KEY".to_string(),
            GenerationError::QuotaExceeded { .. } => "GEN_QUOTA_EXCEEDED".to_string(),
            GenerationError::ServiceUnavailable { .. } => "GEN_SERVICE_UNAVAILABLE".to_string(),
            GenerationError::RequestFailed { .. } => "GEN_REQUEST_FAILED".to_string(),
            GenerationError::InvalidResponseFormat { .. } => "GEN_INVALID_RESPONSE".to_string(),
            GenerationError::EmptyResponse { .. } => "GEN_EMPTY_RESPONSE".to_string(),
            GenerationError::TooFewSegments { .. } => "GEN_TOO_FEW_SEGMENTS".to_string(),
        }
    }
}

impl ErrorExt for ConfigError {
    fn log_error(&self) -> &Self {
        error!("ConfigError: {}", self);
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("ConfigError (warning): {}", self);
        self
    }

    fn is_retryable(&self) -> bool {
        false // Config errors are typically not retryable
    }

    fn retry_after(&self) -> Option<Duration> {
        None
    }

    fn user_friendly_message(&self) -> String {
        match self {
            ConfigError::FileNotFound { path } => {
                format!("Configuration file '{}' not found.", path)
            }
            ConfigError::InvalidValue { field, .. } => {
                format!("Invalid value for configuration field '{}'.", field)
            }
            ConfigError::MissingEnvironmentVariable { var_name } => format!(
                "Environment variable '{}' is required but not set.",
                var_name
            ),
            ConfigError::Parse(_) => {
                "Configuration file format is invalid. Please check the settings.".to_string()
            }
        }
    }

    fn error_code(&self) -> String {
        match self {
            ConfigError::FileNotFound { .. } => "CONFIG_FILE_NOT_FOUND".to_string(),
            ConfigError::InvalidValue { .. } => "CONFIG_INVALID_VALUE".to_string(),
            ConfigError::MissingEnvironmentVariable { .. } => "CONFIG_MISSING_ENV_VAR".to_string(),
            ConfigError::Parse(_) => "CONFIG_PARSE_ERROR".to_string(),
        }
    }
}

pub struct ErrorReporter {
    report_errors: bool,
    report_warnings: bool,
}

impl ErrorReporter {
    pub fn new() -> Self {
        Self {
            report_errors: true,
            report_warnings: true,
        }
    }

    pub fn with_error_reporting(mut self, enabled: bool) -> Self {
        self.report_errors = enabled;
        self
    }

    pub fn with_warning_reporting(mut self, enabled: bool) -> Self {
        self.report_warnings = enabled;
        self
    }

    pub fn report_error(&self, error: &CoreError) {
        if self.report_errors {
            error.log_error();
            info!("Error code: {}", error.error_code());
            info!("User message: {}", error.user_friendly_message());
            if error.is_retryable() {
                if let Some(retry_after) = error.retry_after() {
                    info!("Error is retryable. Retry after: {:?}", retry_after);
                }
            }
        }
    }

    pub fn report_warning(&self, error: &CoreError) {
        if self.report_warnings {
            error.log_warn();
            info!("Error code: {}", error.error_code());
        }
    }
}

impl Default for ErrorReporter {
    fn default() -> Self {
        Self::new()
    }
}
