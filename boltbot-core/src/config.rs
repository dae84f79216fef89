use crate::{default_sources, ConfigError, CoreError, GenerationError, Source};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

pub const DEFAULT_POSTED_ARTICLES_FILE: &str = "posted_articles.txt";

/// OAuth 1.0a user-context credentials for the platform's write API.
#[derive(Clone)]
pub struct XCredentials {
    pub api_key: String,
    pub api_secret: String,
    pub access_token: String,
    pub access_token_secret: String,
}

impl fmt::Debug for XCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XCredentials")
            .field("api_key", &"<redacted>")
            .field("access_token", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    OpenAi,
    Groq,
    Gemini,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Groq => "groq",
            ProviderKind::Gemini => "gemini",
        }
    }
}

impl FromStr for ProviderKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(ProviderKind::OpenAi),
            "groq" => Ok(ProviderKind::Groq),
            "gemini" => Ok(ProviderKind::Gemini),
            other => Err(GenerationError::UnknownProvider {
                name: other.to_string(),
            }
            .into()),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The one generative-text provider selected for this run.
#[derive(Clone)]
pub struct ProviderSettings {
    pub kind: ProviderKind,
    pub api_key: String,
    pub model: String,
}

impl fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("kind", &self.kind)
            .field("model", &self.model)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct BotConfig {
    pub twitter_api_key: Option<String>,
    pub twitter_api_secret: Option<String>,
    pub twitter_access_token: Option<String>,
    pub twitter_access_token_secret: Option<String>,
    pub twitter_bearer_token: Option<String>,

    pub ai_provider: String,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub groq_api_key: Option<String>,
    pub groq_model: String,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,

    pub check_interval_hours: u64,
    pub debug: bool,
    pub max_article_age_hours: i64,
    pub post_spacing_seconds: u64,
    pub posted_articles_file: PathBuf,
    pub sources: Vec<Source>,
}

impl BotConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let get_or = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let sources = match get("SOURCES_FILE") {
            Some(path) => load_sources(Path::new(&path))?,
            None => default_sources(),
        };

        let config = Self {
            twitter_api_key: get("TWITTER_API_KEY"),
            twitter_api_secret: get("TWITTER_API_SECRET"),
            twitter_access_token: get("TWITTER_ACCESS_TOKEN"),
            twitter_access_token_secret: get("TWITTER_ACCESS_TOKEN_SECRET"),
            twitter_bearer_token: get("TWITTER_BEARER_TOKEN"),

            ai_provider: get_or("AI_PROVIDER", "groq"),
            openai_api_key: get("OPENAI_API_KEY"),
            openai_model: get_or("OPENAI_MODEL", "gpt-3.5-turbo"),
            groq_api_key: get("GROQ_API_KEY"),
            groq_model: get_or("GROQ_MODEL", "groq/compound"),
            gemini_api_key: get("GEMINI_API_KEY"),
            gemini_model: get_or("GEMINI_MODEL", "gemini-pro"),

            check_interval_hours: parse_number("CHECK_INTERVAL_HOURS", get("CHECK_INTERVAL_HOURS"), 6)?,
            debug: get("DEBUG")
                .map(|value| value.trim().eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            max_article_age_hours: parse_number(
                "MAX_ARTICLE_AGE_HOURS",
                get("MAX_ARTICLE_AGE_HOURS"),
                24,
            )?,
            post_spacing_seconds: parse_number("POST_SPACING_SECONDS", get("POST_SPACING_SECONDS"), 30)?,
            posted_articles_file: PathBuf::from(get_or(
                "POSTED_ARTICLES_FILE",
                DEFAULT_POSTED_ARTICLES_FILE,
            )),
            sources,
        };

        if config.check_interval_hours == 0
            || config.check_interval_hours.checked_mul(3600).is_none()
        {
            return Err(invalid_value("CHECK_INTERVAL_HOURS", config.check_interval_hours));
        }
        if config.max_article_age_hours < 0
            || chrono::Duration::try_hours(config.max_article_age_hours).is_none()
        {
            return Err(invalid_value("MAX_ARTICLE_AGE_HOURS", config.max_article_age_hours));
        }

        debug!(
            "Loaded configuration: {} sources, interval {}h, provider {}",
            config.sources.len(),
            config.check_interval_hours,
            config.ai_provider
        );
        Ok(config)
    }

    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval_hours.saturating_mul(3600))
    }

    pub fn max_article_age(&self) -> chrono::Duration {
        chrono::Duration::try_hours(self.max_article_age_hours).unwrap_or(chrono::Duration::MAX)
    }

    pub fn post_spacing(&self) -> Duration {
        Duration::from_secs(self.post_spacing_seconds)
    }

    /// Returns the platform credentials, or names every missing variable.
    pub fn validate_publishing(&self) -> Result<XCredentials, CoreError> {
        let required = [
            ("TWITTER_API_KEY", &self.twitter_api_key),
            ("TWITTER_API_SECRET", &self.twitter_api_secret),
            ("TWITTER_ACCESS_TOKEN", &self.twitter_access_token),
            ("TWITTER_ACCESS_TOKEN_SECRET", &self.twitter_access_token_secret),
        ];

        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, value)| value.is_none())
            .map(|(name, _)| *name)
            .collect();

        if !missing.is_empty() {
            return Err(ConfigError::MissingEnvironmentVariable {
                var_name: missing.join(", "),
            }
            .into());
        }

        Ok(XCredentials {
            api_key: self.twitter_api_key.clone().unwrap_or_default(),
            api_secret: self.twitter_api_secret.clone().unwrap_or_default(),
            access_token: self.twitter_access_token.clone().unwrap_or_default(),
            access_token_secret: self.twitter_access_token_secret.clone().unwrap_or_default(),
        })
    }

    /// Resolves `AI_PROVIDER` to a provider with its key and model.
    pub fn provider_settings(&self) -> Result<ProviderSettings, CoreError> {
        let kind: ProviderKind = self.ai_provider.parse()?;
        let (key_var, api_key, model) = match kind {
            ProviderKind::OpenAi => ("OPENAI_API_KEY", &self.openai_api_key, &self.openai_model),
            ProviderKind::Groq => ("GROQ_API_KEY", &self.groq_api_key, &self.groq_model),
            ProviderKind::Gemini => ("GEMINI_API_KEY", &self.gemini_api_key, &self.gemini_model),
        };

        let api_key = api_key
            .clone()
            .ok_or_else(|| ConfigError::MissingEnvironmentVariable {
                var_name: key_var.to_string(),
            })?;

        Ok(ProviderSettings {
            kind,
            api_key,
            model: model.clone(),
        })
    }
}

fn invalid_value(field: &str, value: impl fmt::Display) -> CoreError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
    }
    .into()
}

fn parse_number<T: FromStr>(field: &str, raw: Option<String>, default: T) -> Result<T, CoreError> {
    match raw {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| {
            ConfigError::InvalidValue {
                field: field.to_string(),
                value,
            }
            .into()
        }),
    }
}

#[derive(Debug, Deserialize)]
struct SourcesFile {
    #[serde(default)]
    sources: Vec<Source>,
}

/// Loads `[[sources]]` tables from a TOML file and checks every feed URL.
pub fn load_sources(path: &Path) -> Result<Vec<Source>, CoreError> {
    let contents = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.display().to_string(),
    })?;

    let file: SourcesFile = toml::from_str(&contents).map_err(ConfigError::from)?;

    for source in &file.sources {
        url::Url::parse(&source.feed_url).map_err(|_| ConfigError::InvalidValue {
            field: format!("sources.{}.url", source.name),
            value: source.feed_url.clone(),
        })?;
    }

    info!("Loaded {} sources from {}", file.sources.len(), path.display());
    Ok(file.sources)
}
