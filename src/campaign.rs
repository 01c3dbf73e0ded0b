use crate::brand::BRAND_GUIDELINES_VERSION;
use crate::completion::CompletionModel;
use crate::config::{ApiSettings, CampaignType};
use crate::error::{CampaignError, Result};
use crate::export::CampaignExport;
use crate::extraction::extract_json_content;
use crate::insights::generate_customer_insights;
use crate::performance::estimate_campaign_performance;
use crate::prompts::build_campaign_prompt_for;
use crate::schema::{CampaignContent, CampaignMetadata, CustomerRecord, Persona};
use crate::validation::into_campaign_content;
use chrono::Utc;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;
use tokio::sync::mpsc::Sender;

/// Campaign type recorded in metadata when no specific angle was requested.
pub const DEFAULT_CAMPAIGN_TYPE: &str = "personalized_banking";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum CampaignEvent {
    Starting { customer_id: String },
    FormattingPersona,
    BuildingPrompt,
    AwaitingCompletion,
    Extracting,
    Validating,
    Success,
    Failed { reason: String },
}

/// Runs one campaign request end to end:
/// persona, prompt, completion, extraction, validation.
///
/// Each call works on its own persona and content, so one generator can serve
/// concurrent requests. Failures are terminal for the request and never retried.
pub struct CampaignGenerator<M> {
    model: M,
    settings: ApiSettings,
    campaign_type: Option<CampaignType>,
    timeout: Option<Duration>,
}

impl<M: CompletionModel> CampaignGenerator<M> {
    /// The completion call is bounded by `settings.timeout` unless changed with
    /// [`CampaignGenerator::with_timeout`].
    pub fn new(model: M, settings: ApiSettings) -> Self {
        let timeout = Some(settings.timeout);
        Self {
            model,
            settings,
            campaign_type: None,
            timeout,
        }
    }

    pub fn with_campaign_type(mut self, campaign_type: CampaignType) -> Self {
        self.campaign_type = Some(campaign_type);
        self
    }

    /// `None` waits on the model indefinitely.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub async fn generate(
        &self,
        customer: &CustomerRecord,
        progress: Option<Sender<CampaignEvent>>,
    ) -> Result<CampaignContent> {
        self.send_event(
            &progress,
            CampaignEvent::Starting {
                customer_id: customer.id.clone(),
            },
        )
        .await;

        match self.generate_inner(customer, &progress).await {
            Ok(content) => {
                info!("Campaign generated for customer {}", customer.id);
                self.send_event(&progress, CampaignEvent::Success).await;
                Ok(content)
            }
            Err(e) => {
                warn!("Campaign generation failed for customer {}: {}", customer.id, e);
                self.send_event(
                    &progress,
                    CampaignEvent::Failed {
                        reason: e.to_string(),
                    },
                )
                .await;
                Err(e)
            }
        }
    }

    /// Generates the campaign and bundles it with insights and a performance estimate
    /// into the export document.
    pub async fn run(
        &self,
        customer: &CustomerRecord,
        progress: Option<Sender<CampaignEvent>>,
    ) -> Result<CampaignExport> {
        let content = self.generate(customer, progress).await?;
        let insights = generate_customer_insights(customer)?;
        let metrics = estimate_campaign_performance(&content, customer);

        Ok(CampaignExport::new(
            content,
            customer.clone(),
            Some(insights),
            metrics,
        ))
    }

    async fn generate_inner(
        &self,
        customer: &CustomerRecord,
        progress: &Option<Sender<CampaignEvent>>,
    ) -> Result<CampaignContent> {
        // 1. Persona
        self.send_event(progress, CampaignEvent::FormattingPersona).await;
        let persona = Persona::from_customer(customer)?;

        // 2. Prompt
        self.send_event(progress, CampaignEvent::BuildingPrompt).await;
        let prompt = build_campaign_prompt_for(&persona, self.campaign_type)?;

        // 3. Single completion call
        self.send_event(progress, CampaignEvent::AwaitingCompletion).await;
        let raw = self.call_model(&prompt).await?;

        // 4. Extraction
        self.send_event(progress, CampaignEvent::Extracting).await;
        let content = extract_json_content(&raw)?;

        // 5. Validation and metadata
        self.send_event(progress, CampaignEvent::Validating).await;
        finalize_campaign(
            content,
            &persona.behavioral.customer_segment,
            self.campaign_type,
        )
    }

    async fn call_model(&self, prompt: &str) -> Result<String> {
        debug!(
            "Requesting completion ({} chars, max_tokens {}, temperature {})",
            prompt.len(),
            self.settings.max_tokens,
            self.settings.temperature
        );

        let call = self
            .model
            .complete(prompt, self.settings.max_tokens, self.settings.temperature);

        let raw = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, call).await.map_err(|_| {
                CampaignError::ExternalCall(format!(
                    "completion timed out after {} ms",
                    limit.as_millis()
                ))
            })??,
            None => call.await?,
        };

        debug!("Completion returned {} chars", raw.len());
        Ok(raw)
    }

    async fn send_event(&self, sender: &Option<Sender<CampaignEvent>>, event: CampaignEvent) {
        if let Some(tx) = sender {
            let _ = tx.send(event).await;
        }
    }
}

pub fn campaign_metadata(
    customer_segment: &str,
    campaign_type: Option<CampaignType>,
) -> CampaignMetadata {
    CampaignMetadata {
        generated_at: Utc::now(),
        customer_segment: customer_segment.to_string(),
        brand_guidelines_version: BRAND_GUIDELINES_VERSION.to_string(),
        campaign_type: campaign_type
            .map(|kind| kind.key())
            .unwrap_or(DEFAULT_CAMPAIGN_TYPE)
            .to_string(),
    }
}

/// Extraction, validation and metadata for a raw model response, without the
/// completion call.
pub fn parse_campaign_response(
    raw: &str,
    customer_segment: &str,
    campaign_type: Option<CampaignType>,
) -> Result<CampaignContent> {
    let content = extract_json_content(raw)?;
    finalize_campaign(content, customer_segment, campaign_type)
}

fn finalize_campaign(
    content: Map<String, Value>,
    customer_segment: &str,
    campaign_type: Option<CampaignType>,
) -> Result<CampaignContent> {
    into_campaign_content(content, campaign_metadata(customer_segment, campaign_type))
}
