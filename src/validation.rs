use crate::brand::{DisclaimerKind, BRAND_GUIDELINES};
use crate::error::{CampaignError, Result};
use crate::schema::{
    CampaignContent, CampaignMetadata, ChannelStrategy, PersonalizationElements, ToneGuidelines,
    VisualElements,
};
use log::{debug, info, warn};
use serde_json::{Map, Value};

/// Top-level keys every campaign must carry, in the order they are checked.
pub const REQUIRED_KEYS: [&str; 6] = [
    "primary_message",
    "secondary_message",
    "visual_elements",
    "channel_strategy",
    "personalization_elements",
    "tone_guidelines",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentValidation {
    pub valid: bool,
    /// First required key found missing, if any.
    pub missing_key: Option<String>,
    pub disclaimer_added: bool,
}

impl ContentValidation {
    pub fn into_result(self) -> Result<()> {
        match self.missing_key {
            Some(key) => Err(CampaignError::MissingField(key)),
            None => Ok(()),
        }
    }
}

/// Checks the required keys and synthesizes the banking disclaimer when it is absent.
///
/// The disclaimer is the only field ever filled in here; a missing required key makes
/// the content invalid and nothing else is touched.
pub fn validate_campaign_content(content: &mut Map<String, Value>) -> ContentValidation {
    if let Some(key) = REQUIRED_KEYS.iter().find(|key| !content.contains_key(**key)) {
        warn!("Campaign content is missing required key '{}'", key);
        return ContentValidation {
            valid: false,
            missing_key: Some(key.to_string()),
            disclaimer_added: false,
        };
    }

    let has_disclaimer = matches!(
        content.get("legal_disclaimer"),
        Some(Value::String(text)) if !text.trim().is_empty()
    );

    if !has_disclaimer {
        info!("Adding default banking disclaimer to campaign content");
        content.insert(
            "legal_disclaimer".to_string(),
            Value::String(BRAND_GUIDELINES.legal_disclaimer(DisclaimerKind::Banking)),
        );
    }

    ContentValidation {
        valid: true,
        missing_key: None,
        disclaimer_added: !has_disclaimer,
    }
}

/// Converts validated content into the typed contract. `metadata` always replaces
/// whatever the model wrote under that key.
pub fn into_campaign_content(
    mut content: Map<String, Value>,
    metadata: CampaignMetadata,
) -> Result<CampaignContent> {
    validate_campaign_content(&mut content).into_result()?;

    if content.contains_key("metadata") {
        debug!("Discarding model-supplied metadata");
    }
    content.insert("metadata".to_string(), serde_json::to_value(&metadata)?);

    for key in REQUIRED_KEYS.iter().chain(["legal_disclaimer", "metadata"].iter()) {
        check_shape(key, &content[*key])?;
    }

    let campaign: CampaignContent =
        serde_json::from_value(Value::Object(content)).map_err(|e| {
            CampaignError::MalformedContent {
                field: "<campaign>".to_string(),
                details: e.to_string(),
            }
        })?;

    debug!(
        "Campaign content validated for segment {}",
        campaign.metadata.customer_segment
    );
    Ok(campaign)
}

/// Deserializes a single field so a shape error names the field it came from.
fn check_shape(key: &str, value: &Value) -> Result<()> {
    let outcome = match key {
        "primary_message" | "secondary_message" | "legal_disclaimer" => {
            serde_json::from_value::<String>(value.clone()).map(drop)
        }
        "visual_elements" => serde_json::from_value::<VisualElements>(value.clone()).map(drop),
        "channel_strategy" => serde_json::from_value::<ChannelStrategy>(value.clone()).map(drop),
        "personalization_elements" => {
            serde_json::from_value::<PersonalizationElements>(value.clone()).map(drop)
        }
        "tone_guidelines" => serde_json::from_value::<ToneGuidelines>(value.clone()).map(drop),
        "metadata" => serde_json::from_value::<CampaignMetadata>(value.clone()).map(drop),
        _ => Ok(()),
    };

    outcome.map_err(|e| CampaignError::MalformedContent {
        field: key.to_string(),
        details: e.to_string(),
    })
}
