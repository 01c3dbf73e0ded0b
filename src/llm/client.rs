use crate::completion::CompletionModel;
use crate::config::ApiSettings;
use crate::error::{CampaignError, Result};
use crate::llm::types::*;
use crate::prompts::{wrap_for_completion, SYSTEM_INSTRUCTION};
use log::{debug, info};
use reqwest::Client;

const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com/v1";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Completion client for the Anthropic Messages API.
///
/// Each campaign prompt is sent as a single user message wrapped in the JSON-only
/// framing, with the marketing system instruction.
#[derive(Clone)]
pub struct AnthropicClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl AnthropicClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: ANTHROPIC_BASE_URL.to_string(),
        }
    }

    pub fn from_settings(settings: &ApiSettings) -> Result<Self> {
        let api_key = settings.require_api_key()?;
        Ok(Self::new(api_key, settings.model.clone()))
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn model_name(&self) -> &str {
        &self.model
    }

    /// Sends a minimal request to confirm the key and model are usable.
    pub async fn check_connection(&self) -> Result<()> {
        let reply = self
            .send_messages(None, "Respond with OK", 10, 0.0)
            .await?;
        info!("Connection to {} verified ({:?})", self.model, reply.trim());
        Ok(())
    }

    async fn send_messages(
        &self,
        system: Option<&str>,
        user_content: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String> {
        let url = format!("{}/messages", self.base_url);
        let payload = MessagesRequest {
            model: &self.model,
            max_tokens,
            temperature,
            system,
            messages: vec![Message::user(user_content)],
        };

        let res = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&payload)
            .send()
            .await
            .map_err(|e| CampaignError::ExternalCall(e.to_string()))?;
        let status = res.status();

        if !status.is_success() {
            let err_text = res.text().await.unwrap_or_default();
            return Err(CampaignError::ExternalCall(format!(
                "Anthropic API Error (status {}): {}",
                status, err_text
            )));
        }

        let body: MessagesResponse = res
            .json()
            .await
            .map_err(|e| CampaignError::ExternalCall(format!("unreadable response: {}", e)))?;

        let text = body.text();
        if text.trim().is_empty() {
            return Err(CampaignError::ExternalCall(
                "Model returned no text content".to_string(),
            ));
        }

        debug!(
            "Model {} replied with {} chars (stop reason {:?})",
            self.model,
            text.len(),
            body.stop_reason
        );
        Ok(text)
    }
}

impl CompletionModel for AnthropicClient {
    async fn complete(&self, prompt: &str, max_tokens: u32, temperature: f32) -> Result<String> {
        self.send_messages(
            Some(SYSTEM_INSTRUCTION),
            &wrap_for_completion(prompt),
            max_tokens,
            temperature,
        )
        .await
    }
}
