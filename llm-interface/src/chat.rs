//! OpenAI-compatible chat completions (OpenAI itself and Groq).

use crate::{http_client, map_status, map_transport, TextProvider};
use boltbot_core::{CoreError, GenerationError};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub const OPENAI_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const GROQ_ENDPOINT: &str = "https://api.groq.com/openai/v1/chat/completions";

const SYSTEM_PROMPT: &str =
    "You are a sports historian who writes accurate, engaging social media threads.";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Extracts the first choice's content from a chat completions body.
pub fn parse_chat_response(provider: &str, body: &str) -> Result<String, CoreError> {
    let parsed: ChatResponse =
        serde_json::from_str(body).map_err(|e| GenerationError::InvalidResponseFormat {
            provider: provider.to_string(),
            details: e.to_string(),
        })?;

    let content = parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .unwrap_or_default();

    if content.is_empty() {
        return Err(GenerationError::EmptyResponse {
            provider: provider.to_string(),
        }
        .into());
    }
    Ok(content)
}

#[derive(Debug)]
struct ChatCompletions {
    name: &'static str,
    endpoint: String,
    api_key: String,
    model: String,
    http_client: Client,
}

impl ChatCompletions {
    fn new(name: &'static str, endpoint: &str, api_key: String, model: String) -> Result<Self, CoreError> {
        Ok(Self {
            name,
            endpoint: endpoint.to_string(),
            api_key,
            model,
            http_client: http_client()?,
        })
    }

    async fn submit(&self, prompt: &str) -> Result<String, CoreError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: 0.7,
        };

        info!("Requesting completion from {} ({})", self.name, self.model);
        let response = self
            .http_client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| map_transport(self.name, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| map_transport(self.name, e))?;
        debug!("{} responded with {} ({} bytes)", self.name, status, body.len());

        if !status.is_success() {
            return Err(map_status(self.name, status, &body).into());
        }
        parse_chat_response(self.name, &body)
    }
}

/// OpenAI chat completions
#[derive(Debug)]
pub struct OpenAiProvider {
    inner: ChatCompletions,
}

impl OpenAiProvider {
    pub fn new(api_key: String, model: String) -> Result<Self, CoreError> {
        Ok(Self {
            inner: ChatCompletions::new("openai", OPENAI_ENDPOINT, api_key, model)?,
        })
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.inner.endpoint = endpoint.into();
        self
    }
}

impl TextProvider for OpenAiProvider {
    fn name(&self) -> &str {
        self.inner.name
    }

    async fn submit(&self, prompt: &str) -> Result<String, CoreError> {
        self.inner.submit(prompt).await
    }
}

/// Groq's OpenAI-compatible endpoint
#[derive(Debug)]
pub struct GroqProvider {
    inner: ChatCompletions,
}

impl GroqProvider {
    pub fn new(api_key: String, model: String) -> Result<Self, CoreError> {
        Ok(Self {
            inner: ChatCompletions::new("groq", GROQ_ENDPOINT, api_key, model)?,
        })
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.inner.endpoint = endpoint.into();
        self
    }
}

impl TextProvider for GroqProvider {
    fn name(&self) -> &str {
        self.inner.name
    }

    async fn submit(&self, prompt: &str) -> Result<String, CoreError> {
        self.inner.submit(prompt).await
    }
}
