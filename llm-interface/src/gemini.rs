use crate::{http_client, map_status, map_transport, TextProvider};
use boltbot_core::{CoreError, GenerationError};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

/// Joins the text parts of the first candidate.
pub fn parse_generate_response(body: &str) -> Result<String, CoreError> {
    let parsed: GenerateResponse =
        serde_json::from_str(body).map_err(|e| GenerationError::InvalidResponseFormat {
            provider: "gemini".to_string(),
            details: e.to_string(),
        })?;

    let text = parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<String>()
        })
        .unwrap_or_default();

    let text = text.trim();
    if text.is_empty() {
        return Err(GenerationError::EmptyResponse {
            provider: "gemini".to_string(),
        }
        .into());
    }
    Ok(text.to_string())
}

/// Google Gemini `generateContent`
#[derive(Debug)]
pub struct GeminiProvider {
    api_base: String,
    api_key: String,
    model: String,
    http_client: Client,
}

impl GeminiProvider {
    pub fn new(api_key: String, model: String) -> Result<Self, CoreError> {
        Ok(Self {
            api_base: GEMINI_API_BASE.to_string(),
            api_key,
            model,
            http_client: http_client()?,
        })
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_base, self.model)
    }
}

impl TextProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn submit(&self, prompt: &str) -> Result<String, CoreError> {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        info!("Requesting completion from gemini ({})", self.model);
        let response = self
            .http_client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| map_transport(self.name(), e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| map_transport(self.name(), e))?;
        debug!("gemini responded with {} ({} bytes)", status, body.len());

        if !status.is_success() {
            // Gemini reports a bad key as 400 API_KEY_INVALID
            if body.contains("API_KEY_INVALID") {
                return Err(GenerationError::InvalidApiKey {
                    provider: self.name().to_string(),
                }
                .into());
            }
            return Err(map_status(self.name(), status, &body).into());
        }
        parse_generate_response(&body)
    }
}
