//! Client configuration management
//!
//! Builds the [`ClientConfig`] record the shared client is constructed from.
//! Values come from the process environment (after `.env` loading) layered
//! over an optional TOML file. Everything is validated up front so startup
//! fails before the client exists.

use crate::core::constants::{self, endpoint, env as var};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Default request timeout in seconds
const DEFAULT_REQUEST_TIMEOUT: u64 = 30;

/// Default logging level
const DEFAULT_LOG_LEVEL: &str = "info";

/// Errors raised while assembling a [`ClientConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Environment variable {0} is set but empty")]
    EmptyVar(&'static str),

    #[error("Invalid value for {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },

    #[error("Failed to load configuration file {path}: {message}")]
    File { path: String, message: String },
}

#[derive(Debug, Default, Deserialize)]
struct EventsSection {
    base_url: Option<String>,
    dev: Option<bool>,
    env: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct GeminiSection {
    base_url: Option<String>,
    default_model: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RequestSection {
    timeout: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingSection {
    level: Option<String>,
}

/// Non-secret settings read from the TOML file named by `CONFIG_PATH`
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    events: EventsSection,
    #[serde(default)]
    gemini: GeminiSection,
    #[serde(default)]
    request: RequestSection,
    #[serde(default)]
    logging: LoggingSection,
}

impl FileConfig {
    fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let file_error = |message: String| ConfigError::File {
            path: path.display().to_string(),
            message,
        };

        let content = fs::read_to_string(path).map_err(|e| file_error(e.to_string()))?;
        toml::from_str(&content).map_err(|e| file_error(e.to_string()))
    }
}

/// Gemini provider settings
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key sent with every inference request
    pub api_key: SecretString,

    /// API base URL, without a trailing slash
    pub base_url: String,

    /// Model used when a request does not name one
    pub default_model: String,
}

/// AI provider settings
#[derive(Debug, Clone)]
pub struct AiConfig {
    pub gemini: GeminiConfig,
}

/// Event API settings
#[derive(Debug, Clone)]
pub struct EventApiConfig {
    /// Event key; optional until the first event is sent
    pub event_key: Option<SecretString>,

    /// Event API base URL, without a trailing slash
    pub base_url: String,

    /// Talk to a local dev server instead of the hosted API
    pub dev: bool,

    /// Branch environment name
    pub env: Option<String>,
}

impl EventApiConfig {
    /// Event key to put in the request path.
    ///
    /// Dev servers accept any key, so a placeholder is used there when none
    /// was configured.
    pub fn resolved_event_key(&self) -> Option<&str> {
        match &self.event_key {
            Some(key) => Some(key.expose_secret().as_str()),
            None if self.dev => Some(constants::DEV_EVENT_KEY),
            None => None,
        }
    }
}

/// Configuration record the shared client is built from
///
/// The service identifier is not a field anyone can set: it is always
/// [`constants::SERVICE_ID`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    id: &'static str,

    /// AI provider settings
    pub ai: AiConfig,

    /// Event API settings
    pub events: EventApiConfig,

    /// Timeout applied to every outbound HTTP request
    pub request_timeout: Duration,

    /// Logging level
    pub log_level: String,
}

impl ClientConfig {
    /// Start building a configuration around a Gemini API key
    pub fn builder(gemini_api_key: impl Into<String>) -> ClientConfigBuilder {
        ClientConfigBuilder::new(gemini_api_key)
    }

    /// Load configuration from `.env`, the process environment and the
    /// optional `CONFIG_PATH` file
    ///
    /// # Errors
    ///
    /// Returns error if `GEMINI_API_KEY` is missing or blank, if a value
    /// cannot be parsed, or if the configuration file cannot be read.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenv::dotenv() {
            tracing::debug!("Loaded environment from {}", path.display());
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    ///
    /// `from_env` delegates here with `std::env::var`; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file = match lookup(var::CONFIG_PATH) {
            Some(path) if !path.trim().is_empty() => FileConfig::load(path.trim())?,
            _ => FileConfig::default(),
        };

        let api_key = match lookup(var::GEMINI_API_KEY) {
            None => return Err(ConfigError::MissingVar(var::GEMINI_API_KEY)),
            Some(key) => key,
        };

        let (dev, dev_url) = match non_empty(&lookup, var::DEV) {
            Some(value) => parse_dev_flag(&value)?,
            None => (file.events.dev.unwrap_or(false), None),
        };

        let mut builder = Self::builder(api_key).dev(dev);

        if let Some(url) = non_empty(&lookup, var::EVENT_API_BASE_URL)
            .or_else(|| non_empty(&lookup, var::BASE_URL))
            .or(dev_url)
            .or(file.events.base_url)
        {
            builder = builder.event_api_base_url(url);
        }
        if let Some(key) = non_empty(&lookup, var::EVENT_KEY) {
            builder = builder.event_key(key);
        }
        if let Some(env) = non_empty(&lookup, var::ENVIRONMENT).or(file.events.env) {
            builder = builder.environment(env);
        }
        if let Some(url) = non_empty(&lookup, var::GEMINI_BASE_URL).or(file.gemini.base_url) {
            builder = builder.gemini_base_url(url);
        }
        if let Some(model) = non_empty(&lookup, var::GEMINI_MODEL).or(file.gemini.default_model) {
            builder = builder.gemini_model(model);
        }

        let timeout = match non_empty(&lookup, var::REQUEST_TIMEOUT) {
            Some(value) => value
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidValue {
                    name: var::REQUEST_TIMEOUT,
                    value,
                })?,
            None => file.request.timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT),
        };
        builder = builder.request_timeout(Duration::from_secs(timeout));

        if let Some(level) = non_empty(&lookup, var::LOG_LEVEL).or(file.logging.level) {
            builder = builder.log_level(level);
        }

        builder.build()
    }

    /// Service identifier, always `"ajlist"`
    pub fn id(&self) -> &'static str {
        self.id
    }

    /// Whether events go to a local dev server
    pub fn is_dev(&self) -> bool {
        self.events.dev
    }
}

/// Builder for [`ClientConfig`]
pub struct ClientConfigBuilder {
    gemini_api_key: String,
    gemini_base_url: Option<String>,
    gemini_model: Option<String>,
    event_key: Option<String>,
    event_api_base_url: Option<String>,
    dev: bool,
    environment: Option<String>,
    request_timeout: Duration,
    log_level: String,
}

impl ClientConfigBuilder {
    fn new(gemini_api_key: impl Into<String>) -> Self {
        Self {
            gemini_api_key: gemini_api_key.into(),
            gemini_base_url: None,
            gemini_model: None,
            event_key: None,
            event_api_base_url: None,
            dev: false,
            environment: None,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }

    pub fn gemini_base_url(mut self, url: impl Into<String>) -> Self {
        self.gemini_base_url = Some(url.into());
        self
    }

    pub fn gemini_model(mut self, model: impl Into<String>) -> Self {
        self.gemini_model = Some(model.into());
        self
    }

    pub fn event_key(mut self, key: impl Into<String>) -> Self {
        self.event_key = Some(key.into());
        self
    }

    pub fn event_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.event_api_base_url = Some(url.into());
        self
    }

    pub fn dev(mut self, dev: bool) -> Self {
        self.dev = dev;
        self
    }

    pub fn environment(mut self, env: impl Into<String>) -> Self {
        self.environment = Some(env.into());
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Validate and produce the configuration
    ///
    /// # Errors
    ///
    /// Returns error if the Gemini key is blank, a URL is malformed, or the
    /// timeout is zero.
    pub fn build(self) -> Result<ClientConfig, ConfigError> {
        let api_key = self.gemini_api_key.trim();
        if api_key.is_empty() {
            return Err(ConfigError::EmptyVar(var::GEMINI_API_KEY));
        }

        if self.request_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                name: var::REQUEST_TIMEOUT,
                value: "0".to_string(),
            });
        }

        let default_event_url = if self.dev {
            endpoint::DEV_SERVER
        } else {
            endpoint::EVENT_API
        };
        let event_base_url = normalize_url(
            var::EVENT_API_BASE_URL,
            self.event_api_base_url.as_deref().unwrap_or(default_event_url),
        )?;
        let gemini_base_url = normalize_url(
            var::GEMINI_BASE_URL,
            self.gemini_base_url.as_deref().unwrap_or(endpoint::GEMINI),
        )?;

        let event_key = self
            .event_key
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .map(SecretString::new);

        Ok(ClientConfig {
            id: constants::SERVICE_ID,
            ai: AiConfig {
                gemini: GeminiConfig {
                    api_key: SecretString::new(api_key.to_string()),
                    base_url: gemini_base_url,
                    default_model: self
                        .gemini_model
                        .unwrap_or_else(|| constants::DEFAULT_GEMINI_MODEL.to_string()),
                },
            },
            events: EventApiConfig {
                event_key,
                base_url: event_base_url,
                dev: self.dev,
                env: self.environment.filter(|env| !env.trim().is_empty()),
            },
            request_timeout: self.request_timeout,
            log_level: self.log_level,
        })
    }
}

/// Look up a variable, treating blank values as unset
fn non_empty<F>(lookup: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Parse `INNGEST_DEV`: a boolean flag, or the URL of a dev server
fn parse_dev_flag(value: &str) -> Result<(bool, Option<String>), ConfigError> {
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok((true, None)),
        "0" | "false" | "no" | "off" => Ok((false, None)),
        lower if lower.starts_with("http://") || lower.starts_with("https://") => {
            Ok((true, Some(value.to_string())))
        }
        _ => Err(ConfigError::InvalidValue {
            name: var::DEV,
            value: value.to_string(),
        }),
    }
}

/// Check that `value` is an absolute http(s) URL and strip trailing slashes
fn normalize_url(name: &'static str, value: &str) -> Result<String, ConfigError> {
    let invalid = || ConfigError::InvalidValue {
        name,
        value: value.to_string(),
    };

    let url = reqwest::Url::parse(value.trim()).map_err(|_| invalid())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid());
    }

    Ok(value.trim().trim_end_matches('/').to_string())
}
