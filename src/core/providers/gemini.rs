//! Gemini provider implementation

use crate::core::config::GeminiConfig;
use crate::core::constants::header;
use crate::core::provider::{
    AiProvider, InferenceRequest, InferenceResponse, ProviderError, Role, TokenUsage,
};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Gemini provider using API key authentication
pub struct GeminiProvider {
    client: Client,
    api_key: SecretString,
    base_url: String,
    default_model: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GeminiGenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    usage_metadata: Option<GeminiUsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
    #[serde(default)]
    total_token_count: u32,
}

impl GeminiProvider {
    /// Create a Gemini provider that sends requests through `client`
    pub fn new(config: &GeminiConfig, client: Client) -> Self {
        Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
            default_model: config.default_model.clone(),
        }
    }

    fn convert_request(request: &InferenceRequest) -> GeminiRequest {
        let contents = request
            .messages
            .iter()
            .map(|msg| GeminiContent {
                role: Some(
                    match msg.role {
                        Role::User => "user",
                        Role::Assistant => "model",
                    }
                    .to_string(),
                ),
                parts: vec![GeminiPart {
                    text: msg.content.clone(),
                }],
            })
            .collect();

        let system_instruction = request.system.as_ref().map(|text| GeminiContent {
            role: None,
            parts: vec![GeminiPart { text: text.clone() }],
        });

        let generation_config =
            if request.temperature.is_some() || request.max_output_tokens.is_some() {
                Some(GeminiGenerationConfig {
                    temperature: request.temperature,
                    max_output_tokens: request.max_output_tokens,
                })
            } else {
                None
            };

        GeminiRequest {
            contents,
            system_instruction,
            generation_config,
        }
    }

    fn convert_response(response: GeminiResponse, model: &str) -> InferenceResponse {
        let (text, finish_reason) = match response.candidates.into_iter().next() {
            Some(candidate) => {
                let text = candidate
                    .content
                    .map(|content| {
                        content
                            .parts
                            .into_iter()
                            .map(|p| p.text)
                            .collect::<Vec<_>>()
                            .join("")
                    })
                    .unwrap_or_default();
                (text, candidate.finish_reason)
            }
            None => {
                warn!("Gemini returned no candidates for model {}", model);
                (String::new(), None)
            }
        };

        InferenceResponse {
            model: model.to_string(),
            text,
            finish_reason,
            usage: response.usage_metadata.map(|u| TokenUsage {
                input_tokens: u.prompt_token_count,
                output_tokens: u.candidates_token_count,
                total_tokens: u.total_token_count,
            }),
        }
    }

    fn endpoint_url(&self, model: &str) -> String {
        let model = model.strip_prefix("models/").unwrap_or(model);
        format!("{}/models/{}:generateContent", self.base_url, model)
    }

    /// Pull the `error.message` field out of a Gemini error body
    fn extract_error_message(body: &str) -> String {
        serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| {
                v.get("error")
                    .and_then(|e| e.get("message"))
                    .and_then(|m| m.as_str())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| body.to_string())
    }
}

#[async_trait]
impl AiProvider for GeminiProvider {
    async fn infer(&self, request: &InferenceRequest) -> Result<InferenceResponse, ProviderError> {
        if request.messages.is_empty() {
            return Err(ProviderError::BadRequest(
                "inference request has no messages".to_string(),
            ));
        }

        let model = request
            .model
            .as_deref()
            .map(|m| m.trim())
            .map(|m| m.strip_prefix("models/").unwrap_or(m))
            .filter(|m| !m.is_empty())
            .unwrap_or(&self.default_model);
        let url = self.endpoint_url(model);
        debug!("Sending Gemini inference request to model {}", model);

        let response = self
            .client
            .post(&url)
            .header(header::GOOG_API_KEY, self.api_key.expose_secret().as_str())
            .json(&Self::convert_request(request))
            .send()
            .await
            .map_err(|e| ProviderError::Unexpected(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ProviderError::from_status(
                status.as_u16(),
                Self::extract_error_message(&error_text),
            ));
        }

        let gemini_response: GeminiResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Unexpected(format!("Failed to parse response: {}", e)))?;

        Ok(Self::convert_response(gemini_response, model))
    }

    fn provider_name(&self) -> &str {
        "gemini"
    }
}
