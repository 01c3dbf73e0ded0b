use chrono::{DateTime, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, JsonSchema)]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "M",
            Self::Female => "F",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, JsonSchema)]
pub enum LifeStage {
    Student,
    #[serde(rename = "Young Professional")]
    YoungProfessional,
    #[serde(rename = "Family Builder")]
    FamilyBuilder,
    #[serde(rename = "Mid-Career")]
    MidCareer,
    #[serde(rename = "Pre-retirement")]
    PreRetirement,
    Retired,
}

impl LifeStage {
    /// The single age-to-life-stage rule shared by profile generation and persona formatting.
    pub fn from_age(age: u32) -> Self {
        match age {
            0..=22 => Self::Student,
            23..=30 => Self::YoungProfessional,
            31..=40 => Self::FamilyBuilder,
            41..=50 => Self::MidCareer,
            51..=65 => Self::PreRetirement,
            _ => Self::Retired,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "Student",
            Self::YoungProfessional => "Young Professional",
            Self::FamilyBuilder => "Family Builder",
            Self::MidCareer => "Mid-Career",
            Self::PreRetirement => "Pre-retirement",
            Self::Retired => "Retired",
        }
    }
}

impl fmt::Display for LifeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value tier. Declaration order gives the rank: Basic < Standard < Premium.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, JsonSchema,
)]
pub enum CustomerSegment {
    Basic,
    Standard,
    Premium,
}

impl CustomerSegment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "Basic",
            Self::Standard => "Standard",
            Self::Premium => "Premium",
        }
    }
}

impl fmt::Display for CustomerSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, JsonSchema)]
pub enum DigitalEngagement {
    High,
    Medium,
    Low,
}

impl DigitalEngagement {
    pub fn from_online_ratio(ratio: f64) -> Self {
        if ratio > 0.7 {
            Self::High
        } else if ratio > 0.4 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

impl fmt::Display for DigitalEngagement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A synthetic bank customer. Segment, engagement and life stage are always derived
/// by the generator from the other fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct CustomerRecord {
    pub id: String,
    pub age: u32,
    pub gender: Gender,
    pub location: String,
    pub income: f64,
    pub occupation: String,
    pub life_stage: LifeStage,
    pub customer_segment: CustomerSegment,
    pub relationship_tenure: u32,
    pub product_holdings: Vec<String>,
    pub num_products: usize,
    pub primary_interests: Vec<String>,
    pub preferred_channels: Vec<String>,
    pub digital_engagement: DigitalEngagement,
    pub transaction_frequency: u32,
    pub average_transaction: f64,
    pub online_transaction_ratio: f64,
    pub international_transaction_ratio: f64,
    pub credit_score: u32,
    pub last_interaction: NaiveDate,
    pub satisfaction_score: u32,
    #[serde(default)]
    pub engagement_score: f64,
    #[serde(default)]
    pub churn_risk: f64,
}

impl CustomerRecord {
    /// Label used when offering a customer for selection.
    pub fn display_label(&self, position: usize) -> String {
        format!(
            "Customer {} - {} Segment - {} years - {} - ${}/year",
            position + 1,
            self.customer_segment,
            self.age,
            self.occupation,
            crate::utils::format_thousands(self.income.round() as i64)
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Demographic {
    pub age: i64,
    pub gender: String,
    pub location: String,
    pub income: f64,
    pub occupation: String,
    pub life_stage: LifeStage,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Behavioral {
    pub transaction_frequency: i64,
    pub average_transaction: f64,
    pub digital_engagement: String,
    pub customer_segment: String,
    /// Number of products held.
    pub product_holdings: usize,
    pub relationship_tenure: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Psychographic {
    pub interests: Vec<String>,
    pub preferred_channels: Vec<String>,
}

/// Three-facet view of a customer used only to build the campaign prompt.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Persona {
    pub demographic: Demographic,
    pub behavioral: Behavioral,
    pub psychographic: Psychographic,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct VisualElements {
    #[serde(default, deserialize_with = "text_or_list")]
    #[schemars(description = "Brand colors to use, comma separated")]
    pub color_scheme: String,

    #[serde(default, deserialize_with = "text_or_list")]
    pub imagery: String,

    #[serde(default, deserialize_with = "text_or_list")]
    pub layout: String,

    #[serde(default, deserialize_with = "text_or_list")]
    pub style: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct ChannelStrategy {
    #[serde(default, deserialize_with = "list_or_text")]
    pub primary_channels: Vec<String>,

    #[serde(default, deserialize_with = "list_or_text")]
    pub secondary_channels: Vec<String>,

    #[serde(default, deserialize_with = "channel_notes")]
    #[schemars(description = "Per-channel adaptation notes keyed by channel name")]
    pub channel_specific_adaptations: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct PersonalizationElements {
    #[serde(default, deserialize_with = "list_or_text")]
    pub key_variables: Vec<String>,

    #[serde(default, deserialize_with = "list_or_text")]
    pub dynamic_content: Vec<String>,

    #[serde(default, deserialize_with = "text_or_list")]
    pub personalization_rules: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct ToneGuidelines {
    #[serde(default, deserialize_with = "text_or_list")]
    pub voice: String,

    #[serde(default, deserialize_with = "text_or_list")]
    pub style: String,

    #[serde(default, deserialize_with = "text_or_list")]
    pub language_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct CampaignMetadata {
    pub generated_at: DateTime<Utc>,
    pub customer_segment: String,
    pub brand_guidelines_version: String,
    pub campaign_type: String,
}

/// The validated campaign contract handed to render/export sinks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct CampaignContent {
    #[schemars(description = "Main campaign message, at most 150 words")]
    pub primary_message: String,

    #[schemars(description = "Follow-up message with a call to action, at most 50 words")]
    pub secondary_message: String,

    pub visual_elements: VisualElements,
    pub channel_strategy: ChannelStrategy,
    pub personalization_elements: PersonalizationElements,
    pub tone_guidelines: ToneGuidelines,
    pub legal_disclaimer: String,
    pub metadata: CampaignMetadata,
}

impl CampaignContent {
    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(CampaignContent)
    }

    pub fn schema_as_json() -> Result<String, serde_json::Error> {
        let schema = Self::generate_json_schema();
        serde_json::to_string_pretty(&schema)
    }
}

/// Flattens any JSON value into display text: lists are joined with ", ", nested
/// objects become `key: value` pairs joined with "; " and `null` is empty.
fn render_text(value: &serde_json::Value) -> String {
    use serde_json::Value;

    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Bool(_) | Value::Number(_) => value.to_string(),
        Value::Array(items) => items
            .iter()
            .map(render_text)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(fields) => fields
            .iter()
            .map(|(key, v)| format!("{}: {}", key, render_text(v)))
            .collect::<Vec<_>>()
            .join("; "),
    }
}

/// Accepts any shape and renders it as a single string.
fn text_or_list<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(render_text(&value))
}

/// Accepts a list or a single comma separated string; `null` is an empty list.
fn list_or_text<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde_json::Value;

    Ok(match Value::deserialize(deserializer)? {
        Value::Null => Vec::new(),
        Value::Array(items) => items
            .iter()
            .map(render_text)
            .filter(|s| !s.is_empty())
            .collect(),
        Value::String(text) => text
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        other => vec![render_text(&other)],
    })
}

/// Per-channel notes: each value is rendered to text, so nested objects are kept
/// as readable pairs. Anything other than an object yields no notes.
fn channel_notes<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Object(fields) => fields
            .iter()
            .map(|(channel, notes)| (channel.clone(), render_text(notes)))
            .collect(),
        _ => BTreeMap::new(),
    })
}
