use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};

#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Upper bound on any single rate-limit pause
    pub max_wait: Duration,
    /// Pause used when a 429 carries no usable reset hint
    pub default_wait: Duration,
    /// Added to the reset time to absorb clock skew
    pub safety_margin: Duration,
}

impl RateLimitConfig {
    pub fn x_api() -> Self {
        Self {
            max_wait: Duration::from_secs(15 * 60 + 5), // X windows are 15 minutes
            default_wait: Duration::from_secs(60),
            safety_margin: Duration::from_secs(1),
        }
    }
}

/// Snapshot of the `x-rate-limit-*` response headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitWindow {
    pub limit: Option<u32>,
    pub remaining: u32,
    /// Unix timestamp (seconds) at which the window resets
    pub reset_at: i64,
}

impl RateLimitWindow {
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let remaining = header_value::<u32>(headers, "x-rate-limit-remaining")?;
        let reset_at = header_value::<i64>(headers, "x-rate-limit-reset")?;
        Some(Self {
            limit: header_value(headers, "x-rate-limit-limit"),
            remaining,
            reset_at,
        })
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }

    /// Time until the window resets, if it is still in the future.
    pub fn time_until_reset(&self, now_epoch: i64) -> Option<Duration> {
        let seconds = self.reset_at - now_epoch;
        if seconds > 0 {
            Some(Duration::from_secs(seconds as u64))
        } else {
            None
        }
    }
}

fn header_value<T: std::str::FromStr>(headers: &HeaderMap, name: &str) -> Option<T> {
    headers.get(name)?.to_str().ok()?.trim().parse().ok()
}

fn now_epoch() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Pauses outbound posts while the platform says the window is used up.
#[derive(Debug)]
pub struct RateLimiter {
    config: RateLimitConfig,
    window: Mutex<Option<RateLimitWindow>>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            window: Mutex::new(None),
        }
    }

    /// Waits for the last known window to reset if it has no requests left.
    pub async fn acquire_permit(&self) -> RateLimitPermit {
        let start_time = Instant::now();
        let mut window = self.window.lock().await;

        if let Some(current) = *window {
            if current.is_exhausted() {
                if let Some(wait) = current.time_until_reset(now_epoch()) {
                    let wait = (wait + self.config.safety_margin).min(self.config.max_wait);
                    tracing::warn!("Rate limit window exhausted, sleeping for {:?}", wait);
                    sleep(wait).await;
                }
                *window = None;
            }
        }

        RateLimitPermit {
            queue_wait_time: start_time.elapsed(),
        }
    }

    pub async fn update_from_headers(&self, headers: &HeaderMap) {
        if let Some(parsed) = RateLimitWindow::from_headers(headers) {
            tracing::debug!(
                "Rate limit: {} remaining, resets at {}",
                parsed.remaining,
                parsed.reset_at
            );
            *self.window.lock().await = Some(parsed);
        }
    }

    /// Seconds to wait after a 429, from `x-rate-limit-reset`, then
    /// `retry-after`, then the configured default.
    pub fn retry_after_secs(&self, headers: &HeaderMap) -> u64 {
        let margin = self.config.safety_margin.as_secs();

        if let Some(wait) = RateLimitWindow::from_headers(headers)
            .and_then(|window| window.time_until_reset(now_epoch()))
        {
            return (wait.as_secs() + margin).min(self.config.max_wait.as_secs());
        }

        if let Some(seconds) = header_value::<u64>(headers, "retry-after") {
            return seconds.min(self.config.max_wait.as_secs());
        }

        self.config.default_wait.as_secs()
    }

    pub async fn get_rate_limit_status(&self) -> RateLimitStatus {
        let window = *self.window.lock().await;
        let now = now_epoch();

        RateLimitStatus {
            limit: window.and_then(|w| w.limit),
            remaining: window.map(|w| w.remaining),
            reset_at: window.map(|w| w.reset_at),
            is_exhausted: window.map(|w| w.is_exhausted()).unwrap_or(false),
            estimated_wait_time: window
                .filter(|w| w.is_exhausted())
                .and_then(|w| w.time_until_reset(now)),
        }
    }
}

#[derive(Debug)]
pub struct RateLimitPermit {
    pub queue_wait_time: Duration,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitStatus {
    pub limit: Option<u32>,
    pub remaining: Option<u32>,
    pub reset_at: Option<i64>,
    pub is_exhausted: bool,
    pub estimated_wait_time: Option<Duration>,
}
