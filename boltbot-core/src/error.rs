use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Feed error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Publish error: {0}")]
    Publish(#[from] PublishError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

#[derive(Error, Debug, Clone)]
pub enum FetchError {
    #[error("HTTP {status} when fetching {source_name}")]
    Http { source_name: String, status: u16 },

    #[error("Request to {source_name} failed: {reason}")]
    Request { source_name: String, reason: String },

    #[error("Failed to parse feed from {source_name}: {reason}")]
    Parse { source_name: String, reason: String },
}

#[derive(Error, Debug, Clone)]
pub enum PublishError {
    #[error("Authentication failed: {reason}")]
    AuthenticationFailed { reason: String },

    #[error("Forbidden: {reason}")]
    Forbidden { reason: String },

    #[error("Rate limit exceeded. Retry after {retry_after} seconds")]
    RateLimitExceeded { retry_after: u64 },

    #[error("Request timeout")]
    RequestTimeout,

    #[error("Network failure: {reason}")]
    Network { reason: String },

    #[error("Server error: {status_code}")]
    ServerError { status_code: u16 },

    #[error("Invalid API response: {details}")]
    InvalidResponse { details: String },

    #[error("Thread interrupted at segment {segment} of {total} after {} posts: {reason}", .posted.len())]
    ThreadInterrupted {
        segment: usize,
        total: usize,
        posted: Vec<String>,
        reason: String,
    },
}

#[derive(Error, Debug, Clone)]
pub enum StorageError {
    #[error("Failed to read {path}: {reason}")]
    ReadFailed { path: String, reason: String },

    #[error("Failed to write {path}: {reason}")]
    WriteFailed { path: String, reason: String },
}

#[derive(Error, Debug, Clone)]
pub enum GenerationError {
    #[error("Unknown provider: {name}")]
    UnknownProvider { name: String },

    #[error("API key invalid or missing for {provider}")]
    InvalidApiKey { provider: String },

    #[error("Quota exceeded for {provider}")]
    QuotaExceeded { provider: String },

    #[error("Provider service unavailable: {provider}")]
    ServiceUnavailable { provider: String },

    #[error("Request to {provider} failed: {reason}")]
    RequestFailed { provider: String, reason: String },

    #[error("Invalid response format from {provider}: {details}")]
    InvalidResponseFormat { provider: String, details: String },

    #[error("Empty response from {provider}")]
    EmptyResponse { provider: String },

    #[error("Expected at least {expected_min} segments, got {actual}")]
    TooFewSegments { expected_min: usize, actual: usize },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    #[error("Environment variable not set: {var_name}")]
    MissingEnvironmentVariable { var_name: String },

    #[error("Configuration parsing error: {0}")]
    Parse(#[from] toml::de::Error),
}
