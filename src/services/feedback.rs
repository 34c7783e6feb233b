//! Essay feedback gateway
//!
//! Composes the prompt for a validated request, makes exactly one provider
//! call and normalizes the reply into a single trimmed string.

use super::llm::{
    FeedbackProvider, GenerationOptions, OpenAiProvider, ProviderReply, ProviderSettings,
};
use crate::error::{CoachError, Result};
use crate::prompts;
use crate::types::{EssayFeedbackRequest, EssayFeedbackResult};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Provider plus the options every call is made with
#[derive(Clone)]
pub struct FeedbackGateway {
    provider: Arc<dyn FeedbackProvider>,
    options: GenerationOptions,
}

impl FeedbackGateway {
    pub fn new(provider: Arc<dyn FeedbackProvider>, options: GenerationOptions) -> Self {
        Self { provider, options }
    }

    pub fn options(&self) -> &GenerationOptions {
        &self.options
    }

    /// Generate feedback for a validated request
    pub async fn generate(&self, request: &EssayFeedbackRequest) -> Result<EssayFeedbackResult> {
        let prompt = prompts::compose(request);
        debug!(
            "Composed prompt: role {} chars, task {} chars",
            prompt.role.len(),
            prompt.task.len()
        );

        let reply = self
            .provider
            .submit(&prompt.role, &prompt.task, &self.options)
            .await?;

        let result = EssayFeedbackResult::new(normalize_reply(&reply));
        info!(
            "Feedback generated for unit {} {} ({} chars)",
            request.unit_id,
            request.essay_type,
            result.output.len()
        );
        Ok(result)
    }
}

/// Collapse a provider reply into one trimmed string
///
/// The convenience field wins when present; otherwise every text segment is
/// concatenated in emission order. No text at all yields an empty string.
pub fn normalize_reply(reply: &ProviderReply) -> String {
    if let Some(text) = &reply.output_text {
        return text.trim().to_string();
    }

    let joined: String = reply
        .output
        .iter()
        .flatten()
        .flat_map(|item| item.content.iter().flatten())
        .filter_map(|part| part.text.as_deref())
        .collect();

    joined.trim().to_string()
}

/// Produces a gateway for each request
///
/// Implementations decide where credentials come from; the HTTP layer only
/// sees a configuration error when none are available.
pub trait GatewaySource: Send + Sync {
    fn gateway(&self) -> Result<FeedbackGateway>;
}

impl GatewaySource for FeedbackGateway {
    fn gateway(&self) -> Result<FeedbackGateway> {
        Ok(self.clone())
    }
}

/// Reads provider settings from the environment on every call
pub struct EnvGatewaySource {
    client: reqwest::Client,
}

impl EnvGatewaySource {
    /// `timeout` bounds each provider call; `None` leaves it to the client
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(CoachError::Http)?;
        Ok(Self { client })
    }
}

impl GatewaySource for EnvGatewaySource {
    fn gateway(&self) -> Result<FeedbackGateway> {
        let settings = ProviderSettings::from_env()?;
        let provider = OpenAiProvider::new(self.client.clone(), settings.api_key, settings.base_url);
        Ok(FeedbackGateway::new(
            Arc::new(provider),
            GenerationOptions::for_model(settings.model),
        ))
    }
}
