use crate::auth::OAuth1Signer;
use crate::rate_limiter::{RateLimitConfig, RateLimitStatus, RateLimiter};
use crate::retry::{RetryConfig, RetryExecutor, RetryMetrics};
use crate::Publisher;
use boltbot_core::{CoreError, PostId, PublishError, XCredentials};
use reqwest::header::{HeaderMap, AUTHORIZATION};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info, warn};

pub const X_API_BASE: &str = "https://api.twitter.com";
const CREATE_POST_ENDPOINT: &str = "/2/tweets";
const USER_AGENT: &str = concat!("boltbot/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Serialize)]
pub struct CreatePostRequest<'a> {
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply: Option<ReplySettings<'a>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReplySettings<'a> {
    pub in_reply_to_tweet_id: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePostResponse {
    pub data: CreatedPost,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatedPost {
    pub id: String,
    #[serde(default)]
    pub text: String,
}

/// Problem body the platform returns alongside error statuses
#[derive(Debug, Clone, Default, Deserialize)]
struct ApiProblem {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    detail: Option<String>,
}

impl ApiProblem {
    fn describe(body: &str) -> String {
        match serde_json::from_str::<ApiProblem>(body) {
            Ok(ApiProblem {
                detail: Some(detail),
                ..
            }) => detail,
            Ok(ApiProblem {
                title: Some(title),
                ..
            }) => title,
            _ => body.chars().take(200).collect(),
        }
    }
}

/// Maps a non-success status into the publish error taxonomy.
pub fn map_status(status: StatusCode, retry_after: u64, detail: String) -> PublishError {
    match status.as_u16() {
        401 => PublishError::AuthenticationFailed { reason: detail },
        403 => PublishError::Forbidden { reason: detail },
        429 => PublishError::RateLimitExceeded { retry_after },
        code if status.is_server_error() => PublishError::ServerError { status_code: code },
        code => PublishError::InvalidResponse {
            details: format!("HTTP {}: {}", code, detail),
        },
    }
}

fn map_transport(e: reqwest::Error) -> PublishError {
    if e.is_timeout() {
        PublishError::RequestTimeout
    } else {
        PublishError::Network {
            reason: e.to_string(),
        }
    }
}

/// Client for the platform's v2 write API
#[derive(Debug)]
pub struct XClient {
    http_client: Client,
    signer: OAuth1Signer,
    rate_limiter: RateLimiter,
    retry: RetryExecutor,
    base_url: String,
}

impl XClient {
    pub fn new(credentials: XCredentials) -> Result<Self, CoreError> {
        let http_client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http_client,
            signer: OAuth1Signer::new(credentials),
            rate_limiter: RateLimiter::new(RateLimitConfig::x_api()),
            retry: RetryExecutor::new(RetryConfig::default()),
            base_url: X_API_BASE.to_string(),
        })
    }

    /// Points the client at another host, e.g. a local test server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_retry_config(mut self, config: RetryConfig) -> Self {
        self.retry = RetryExecutor::new(config);
        self
    }

    pub fn with_rate_limit_config(mut self, config: RateLimitConfig) -> Self {
        self.rate_limiter = RateLimiter::new(config);
        self
    }

    /// Creates a post, waiting out rate limits.
    pub async fn create_post(&self, text: &str, reply_to: Option<&str>) -> Result<PostId, CoreError> {
        self.retry
            .execute("create_post", || self.send_create_post(text, reply_to))
            .await
    }

    async fn send_create_post(&self, text: &str, reply_to: Option<&str>) -> Result<PostId, CoreError> {
        let _permit = self.rate_limiter.acquire_permit().await;

        let url = format!("{}{}", self.base_url, CREATE_POST_ENDPOINT);
        let body = CreatePostRequest {
            text,
            reply: reply_to.map(|id| ReplySettings {
                in_reply_to_tweet_id: id,
            }),
        };
        let authorization = self.signer.authorization_header("POST", &url, &[]);

        debug!("POST {} ({} chars, reply_to={:?})", url, text.chars().count(), reply_to);
        let response = self
            .http_client
            .post(&url)
            .header(AUTHORIZATION, authorization)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!("Network error for POST {}: {}", CREATE_POST_ENDPOINT, e);
                map_transport(e)
            })?;

        let status = response.status();
        let headers = response.headers().clone();
        self.rate_limiter.update_from_headers(&headers).await;

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(self.status_error(status, &headers, &body).into());
        }

        let created: CreatePostResponse = response.json().await.map_err(|e| {
            error!("Failed to parse create post response: {}", e);
            PublishError::InvalidResponse {
                details: e.to_string(),
            }
        })?;

        info!("Created post {}", created.data.id);
        Ok(created.data.id)
    }

    fn status_error(&self, status: StatusCode, headers: &HeaderMap, body: &str) -> PublishError {
        let retry_after = if status == StatusCode::TOO_MANY_REQUESTS {
            let seconds = self.rate_limiter.retry_after_secs(headers);
            warn!("Rate limited, retry after {} seconds", seconds);
            seconds
        } else {
            0
        };

        let detail = ApiProblem::describe(body);
        error!("Request failed with status {}: {}", status, detail);
        map_status(status, retry_after, detail)
    }

    pub async fn get_rate_limit_status(&self) -> RateLimitStatus {
        self.rate_limiter.get_rate_limit_status().await
    }

    pub fn get_retry_metrics(&self) -> RetryMetrics {
        self.retry.get_metrics()
    }
}

impl Publisher for XClient {
    async fn post(&self, text: &str) -> Result<PostId, CoreError> {
        self.create_post(text, None).await
    }

    async fn reply(&self, text: &str, in_reply_to: &str) -> Result<PostId, CoreError> {
        self.create_post(text, Some(in_reply_to)).await
    }
}
