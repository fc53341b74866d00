//! Event client
//!
//! [`Client`] is the single entry point the rest of the program uses to talk
//! to the event API and to the configured AI provider. Constructing it does
//! not touch the network; the first request does.

use crate::core::config::{ClientConfig, ConfigError};
use crate::core::constants::{self, header};
use crate::core::event::{Event, SendEventResponse};
use crate::core::provider::{AiProvider, InferenceRequest, InferenceResponse, ProviderError};
use crate::core::providers::GeminiProvider;
use reqwest::Client as HttpClient;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Error types that can occur while building or using the client
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Shared client is already initialized")]
    AlreadyInitialized,

    #[error("No event key configured; set INNGEST_EVENT_KEY or enable dev mode with INNGEST_DEV")]
    MissingEventKey,

    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Invalid event API URL: {0}")]
    InvalidUrl(String),

    /// Transport failure; the URL is stripped because it carries the event key
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    #[error("AI provider error: {0}")]
    Provider(#[from] ProviderError),
}

/// Client for the event API, carrying the service identity and AI settings
pub struct Client {
    config: Arc<ClientConfig>,
    http: HttpClient,
    gemini: GeminiProvider,
}

impl Client {
    /// Construct a client from an already loaded configuration
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http = HttpClient::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ClientError::Http(e.without_url()))?;
        let gemini = GeminiProvider::new(&config.ai.gemini, http.clone());

        debug!(
            "Constructed client {} (dev: {}, event API: {})",
            config.id(),
            config.is_dev(),
            config.events.base_url
        );

        Ok(Self {
            config: Arc::new(config),
            http,
            gemini,
        })
    }

    /// Load configuration from the environment and construct a client
    pub fn from_env() -> Result<Self, ClientError> {
        Self::new(ClientConfig::from_env()?)
    }

    /// Service identifier, always `"ajlist"`
    pub fn id(&self) -> &'static str {
        self.config.id()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The configured AI provider
    pub fn ai(&self) -> &dyn AiProvider {
        &self.gemini
    }

    /// Run inference against the configured AI provider
    pub async fn infer(&self, request: &InferenceRequest) -> Result<InferenceResponse, ClientError> {
        Ok(self.ai().infer(request).await?)
    }

    /// Publish one event
    pub async fn send(&self, event: Event) -> Result<SendEventResponse, ClientError> {
        self.send_many(vec![event]).await
    }

    /// Publish a batch of events in one request
    ///
    /// An empty batch returns an empty response without contacting the API.
    pub async fn send_many(&self, events: Vec<Event>) -> Result<SendEventResponse, ClientError> {
        if events.is_empty() {
            return Ok(SendEventResponse::default());
        }

        let event_key = self
            .config
            .events
            .resolved_event_key()
            .ok_or(ClientError::MissingEventKey)?;

        let now_ms = chrono::Utc::now().timestamp_millis();
        let events = events
            .into_iter()
            .map(|event| event.prepare(now_ms))
            .collect::<Result<Vec<_>, _>>()
            .map_err(ClientError::InvalidEvent)?;

        let url = self.event_url(event_key)?;
        let mut req_builder = self
            .http
            .post(url)
            .header(header::SDK, constants::SDK_HEADER_VALUE);
        if let Some(env) = &self.config.events.env {
            req_builder = req_builder.header(header::ENVIRONMENT, env);
        }

        debug!("Sending {} event(s) to the event API", events.len());
        let response = req_builder
            .json(&events)
            .send()
            .await
            .map_err(|e| ClientError::Http(e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!("Event API rejected send (status {}): {}", status, error_text);

            return Err(match status.as_u16() {
                401 => ClientError::Authentication(error_text),
                429 => ClientError::RateLimit(error_text),
                400 => ClientError::BadRequest(error_text),
                _ => ClientError::ApiError {
                    status: status.as_u16(),
                    message: error_text,
                },
            });
        }

        let mut sent: SendEventResponse = response
            .json()
            .await
            .map_err(|e| ClientError::Http(e.without_url()))?;
        if sent.status == 0 {
            sent.status = status.as_u16();
        }
        info!("Sent {} event(s)", sent.ids.len());

        Ok(sent)
    }

    /// `{base}/e/{event_key}`, with the key escaped as a single path segment
    fn event_url(&self, event_key: &str) -> Result<reqwest::Url, ClientError> {
        let base = &self.config.events.base_url;
        let invalid = || ClientError::InvalidUrl(base.clone());

        let mut url = reqwest::Url::parse(base).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .push("e")
            .push(event_key);
        Ok(url)
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("id", &self.id())
            .field("config", &self.config)
            .finish()
    }
}
