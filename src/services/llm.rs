//! Text-generation provider integration
//!
//! Wraps the OpenAI Responses API behind the [`FeedbackProvider`] trait so
//! the rest of the pipeline can be exercised without a network call.

use crate::error::{CoachError, Result};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::env;
use tracing::{debug, warn};

#[cfg(test)]
use mockall::automock;

/// Environment variable holding the provider credential
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
/// Environment variable overriding the model
pub const MODEL_VAR: &str = "OPENAI_MODEL";
/// Environment variable overriding the API base URL
pub const BASE_URL_VAR: &str = "OPENAI_BASE_URL";

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Message used when the provider gives no error text of its own
pub const GENERIC_PROVIDER_ERROR: &str = "OpenAI request failed";

/// Sampling settings for a feedback call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationOptions {
    pub model: String,
    /// Kept low so feedback tracks the rubric rather than varying run to run
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl GenerationOptions {
    pub fn for_model(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            temperature: 0.3,
            max_output_tokens: 900,
        }
    }
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self::for_model(DEFAULT_MODEL)
    }
}

/// Raw provider reply
///
/// Text arrives either in the `output_text` convenience field or spread
/// across `output[].content[].text` segments.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProviderReply {
    #[serde(default)]
    pub output_text: Option<String>,
    #[serde(default)]
    pub output: Option<Vec<OutputItem>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OutputItem {
    #[serde(default)]
    pub content: Option<Vec<ContentPart>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ContentPart {
    #[serde(default)]
    pub text: Option<String>,
}

impl ProviderReply {
    /// Reply carrying only the convenience field
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            output_text: Some(text.into()),
            output: None,
        }
    }

    /// Reply carrying one output item per group of segments
    pub fn with_segments<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = Vec<S>>,
        S: Into<String>,
    {
        let output = items
            .into_iter()
            .map(|parts| OutputItem {
                content: Some(
                    parts
                        .into_iter()
                        .map(|text| ContentPart {
                            text: Some(text.into()),
                        })
                        .collect(),
                ),
            })
            .collect();

        Self {
            output_text: None,
            output: Some(output),
        }
    }
}

/// Capability to run one two-message generation
#[cfg_attr(test, automock)]
#[async_trait]
pub trait FeedbackProvider: Send + Sync {
    /// Submit the style-setting message and the task message
    async fn submit(
        &self,
        role_text: &str,
        task_text: &str,
        options: &GenerationOptions,
    ) -> Result<ProviderReply>;
}

/// Provider settings read from the process environment
#[derive(Debug)]
pub struct ProviderSettings {
    pub api_key: SecretString,
    pub model: String,
    pub base_url: String,
}

impl ProviderSettings {
    /// Read settings, failing with a configuration error when no key is set
    pub fn from_env() -> Result<Self> {
        let api_key = env::var(API_KEY_VAR)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| CoachError::Configuration(format!("Missing {}", API_KEY_VAR)))?;

        let model = env::var(MODEL_VAR)
            .ok()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let base_url = env::var(BASE_URL_VAR)
            .ok()
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(Self {
            api_key: SecretString::new(api_key.into()),
            model,
            base_url,
        })
    }
}

/// Responses API request body
#[derive(Debug, Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    input: [InputMessage<'a>; 2],
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Serialize)]
struct InputMessage<'a> {
    role: &'static str,
    content: &'a str,
}

/// Error envelope returned by the API on failure
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: Option<String>,
}

/// OpenAI Responses API client
pub struct OpenAiProvider {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
}

impl OpenAiProvider {
    pub fn new(client: reqwest::Client, api_key: SecretString, base_url: impl Into<String>) -> Self {
        Self {
            client,
            api_key,
            base_url: base_url.into(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/responses", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl FeedbackProvider for OpenAiProvider {
    async fn submit(
        &self,
        role_text: &str,
        task_text: &str,
        options: &GenerationOptions,
    ) -> Result<ProviderReply> {
        debug!("Calling OpenAI Responses API with model {}", options.model);

        let request = ResponsesRequest {
            model: &options.model,
            input: [
                InputMessage {
                    role: "system",
                    content: role_text,
                },
                InputMessage {
                    role: "user",
                    content: task_text,
                },
            ],
            temperature: options.temperature,
            max_output_tokens: options.max_output_tokens,
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(self.api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| CoachError::Provider(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("OpenAI request failed with status {}", status);
            return Err(CoachError::Provider(provider_error_message(&body)));
        }

        response
            .json::<ProviderReply>()
            .await
            .map_err(|e| CoachError::Provider(format!("Failed to parse response: {}", e)))
    }
}

/// Provider's own error text when the body carries one
fn provider_error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .and_then(|b| b.error.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| GENERIC_PROVIDER_ERROR.to_string())
}
