//! Generative-text providers and the thread prompt/response conventions.

pub mod chat;
pub mod gemini;
pub mod prompt;
pub mod segments;


pub use chat::{GroqProvider, OpenAiProvider};
pub use gemini::GeminiProvider;
pub use prompt::{ThreadPrompt, SEGMENT_DELIMITER};
pub use segments::split_segments;

use boltbot_core::{CoreError, GenerationError, ProviderKind, ProviderSettings};
use reqwest::StatusCode;
use std::time::Duration;

const USER_AGENT: &str = concat!("boltbot/", env!("CARGO_PKG_VERSION"));

/// A service that turns a prompt into text.
#[allow(async_fn_in_trait)]
pub trait TextProvider {
    fn name(&self) -> &str;

    async fn submit(&self, prompt: &str) -> Result<String, CoreError>;
}

/// The provider picked from configuration at startup.
#[derive(Debug)]
pub enum AnyProvider {
    OpenAi(OpenAiProvider),
    Groq(GroqProvider),
    Gemini(GeminiProvider),
}

impl AnyProvider {
    pub fn from_settings(settings: ProviderSettings) -> Result<Self, CoreError> {
        let ProviderSettings {
            kind,
            api_key,
            model,
        } = settings;

        Ok(match kind {
            ProviderKind::OpenAi => AnyProvider::OpenAi(OpenAiProvider::new(api_key, model)?),
            ProviderKind::Groq => AnyProvider::Groq(GroqProvider::new(api_key, model)?),
            ProviderKind::Gemini => AnyProvider::Gemini(GeminiProvider::new(api_key, model)?),
        })
    }
}

impl TextProvider for AnyProvider {
    fn name(&self) -> &str {
        match self {
            AnyProvider::OpenAi(provider) => provider.name(),
            AnyProvider::Groq(provider) => provider.name(),
            AnyProvider::Gemini(provider) => provider.name(),
        }
    }

    async fn submit(&self, prompt: &str) -> Result<String, CoreError> {
        match self {
            AnyProvider::OpenAi(provider) => provider.submit(prompt).await,
            AnyProvider::Groq(provider) => provider.submit(prompt).await,
            AnyProvider::Gemini(provider) => provider.submit(prompt).await,
        }
    }
}

pub(crate) fn http_client() -> Result<reqwest::Client, CoreError> {
    // Generation can take a while on compound models
    Ok(reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(120))
        .build()?)
}

/// Maps a provider's error status into the generation taxonomy.
pub fn map_status(provider: &str, status: StatusCode, body: &str) -> GenerationError {
    let provider = provider.to_string();
    match status.as_u16() {
        401 | 403 => GenerationError::InvalidApiKey { provider },
        429 => GenerationError::QuotaExceeded { provider },
        _ if status.is_server_error() => GenerationError::ServiceUnavailable { provider },
        code => GenerationError::RequestFailed {
            provider,
            reason: format!("HTTP {}: {}", code, body.chars().take(200).collect::<String>()),
        },
    }
}

pub(crate) fn map_transport(provider: &str, e: reqwest::Error) -> GenerationError {
    GenerationError::RequestFailed {
        provider: provider.to_string(),
        reason: e.to_string(),
    }
}
