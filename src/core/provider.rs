//! AI provider abstraction
//!
//! The client exposes inference through the [`AiProvider`] trait so callers
//! do not depend on a particular vendor's wire format. Gemini is the only
//! provider configured for this service.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error types for provider operations
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl ProviderError {
    /// Map a non-success HTTP status and body to an error
    pub(crate) fn from_status(status: u16, message: String) -> Self {
        match status {
            401 | 403 => ProviderError::Authentication(message),
            429 => ProviderError::RateLimit(message),
            400 | 404 => ProviderError::BadRequest(message),
            _ => ProviderError::ApiError { status, message },
        }
    }
}

/// Who authored a message in an inference conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceMessage {
    pub role: Role,
    pub content: String,
}

impl InferenceMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Provider-neutral inference request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InferenceRequest {
    /// Model name; the provider's configured default when unset
    pub model: Option<String>,
    pub system: Option<String>,
    pub messages: Vec<InferenceMessage>,
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<u32>,
}

impl InferenceRequest {
    /// Single-turn request with one user prompt
    pub fn prompt(text: impl Into<String>) -> Self {
        Self {
            messages: vec![InferenceMessage::user(text)],
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub total_tokens: u32,
}

/// Provider-neutral inference response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceResponse {
    pub model: String,
    pub text: String,
    pub finish_reason: Option<String>,
    pub usage: Option<TokenUsage>,
}

/// Trait for AI inference providers
#[async_trait]
pub trait AiProvider: Send + Sync {
    /// Run a single inference request
    async fn infer(&self, request: &InferenceRequest) -> Result<InferenceResponse, ProviderError>;

    /// Get the provider name
    fn provider_name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            ProviderError::from_status(401, "no".into()),
            ProviderError::Authentication(_)
        ));
        assert!(matches!(
            ProviderError::from_status(403, "no".into()),
            ProviderError::Authentication(_)
        ));
        assert!(matches!(
            ProviderError::from_status(429, "slow down".into()),
            ProviderError::RateLimit(_)
        ));
        assert!(matches!(
            ProviderError::from_status(404, "no such model".into()),
            ProviderError::BadRequest(_)
        ));
        assert!(matches!(
            ProviderError::from_status(503, "down".into()),
            ProviderError::ApiError { status: 503, .. }
        ));
    }

    #[test]
    fn test_prompt_request() {
        let request = InferenceRequest::prompt("hello");
        assert_eq!(request.messages, vec![InferenceMessage::user("hello")]);
        assert!(request.model.is_none());
    }
}
