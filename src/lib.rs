//! # Bank Campaign Builder
//!
//! A library for turning synthetic bank-customer profiles into validated, personalized
//! marketing campaign content produced by a language model.
//!
//! ## Core Concepts
//!
//! - **Customer Records**: Synthetic profiles whose segment, engagement level and life stage
//!   are derived from income, products, tenure and transaction behaviour
//! - **Personas**: A demographic / behavioral / psychographic view of a record, used only to
//!   build the prompt
//! - **Brand Guidelines**: Static, read-only tone, visual and legal reference data per segment
//! - **Campaign Content**: The JSON contract returned by the model, recovered from noisy
//!   output, checked for required keys and completed with a legal disclaimer and metadata
//! - **Performance Estimates**: Segment- and engagement-scaled scores for a campaign
//!
//! ## Example
//!
//! ```rust,ignore
//! use bank_campaign_builder::*;
//!
//! let settings = Settings::from_env()?;
//! let customers = CustomerDataGenerator::new(settings.data.clone()).generate_dataset(50)?;
//!
//! let client = AnthropicClient::from_settings(&settings.api)?;
//! let generator = CampaignGenerator::new(client, settings.api.clone());
//!
//! let export = generator.run(&customers[0], None).await?;
//! export.write_json(export_file_name(0))?;
//! ```

pub mod brand;
pub mod cache;
pub mod campaign;
pub mod completion;
pub mod config;
pub mod error;
pub mod export;
pub mod extraction;
pub mod filters;
pub mod generator;
pub mod insights;
pub mod performance;
pub mod persona;
pub mod prompts;
pub mod repair;
pub mod schema;
pub mod utils;
pub mod validation;

#[cfg(feature = "anthropic")]
pub mod llm;

pub use brand::{BrandGuidelines, DisclaimerKind, BRAND_GUIDELINES, BRAND_GUIDELINES_VERSION};
pub use cache::{CachedEntry, TimedCache, WorkspaceCache};
pub use campaign::{
    campaign_metadata, parse_campaign_response, CampaignEvent, CampaignGenerator,
    DEFAULT_CAMPAIGN_TYPE,
};
pub use completion::CompletionModel;
pub use config::{ApiSettings, CacheSettings, CampaignType, DataSettings, Settings};
pub use error::{CampaignError, ErrorKind, Result};
pub use export::{export_file_name, CampaignExport};
pub use extraction::extract_json_content;
pub use filters::{filter_customers, CustomerFilter};
pub use generator::{
    apply_engagement_scores, determine_segment, generate_synthetic_data, CustomerDataGenerator,
};
pub use insights::{generate_customer_insights, CustomerInsights, Recommendation};
pub use performance::{estimate_campaign_performance, PerformanceMetrics};
pub use persona::format_persona;
pub use prompts::{build_campaign_prompt, build_campaign_prompt_for, SYSTEM_INSTRUCTION};
pub use schema::*;
pub use validation::{validate_campaign_content, ContentValidation, REQUIRED_KEYS};

#[cfg(feature = "anthropic")]
pub use llm::AnthropicClient;

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_offline_pipeline() {
        let generator = CustomerDataGenerator::default();
        let customers = generator
            .generate_dataset_with(&mut StdRng::seed_from_u64(1), 25)
            .unwrap();
        let customer = &customers[0];

        let persona = Persona::from_customer(customer).unwrap();
        let prompt = build_campaign_prompt(&persona).unwrap();
        assert!(prompt.contains("\"primary_message\""));

        let raw = r##"Sure, here it is: {
            "primary_message": "Make every dollar count",
            "secondary_message": "Set a goal in the app",
            "visual_elements": {"color_scheme": "#FFCC00"},
            "channel_strategy": {"primary_channels": ["Email"]},
            "personalization_elements": {"key_variables": ["name"]},
            "tone_guidelines": {"voice": "Friendly"},
        }"##;
        let content = parse_campaign_response(
            raw,
            &persona.behavioral.customer_segment,
            None,
        )
        .unwrap();
        assert_eq!(content.primary_message, "Make every dollar count");
        assert!(!content.legal_disclaimer.is_empty());

        let metrics = estimate_campaign_performance(&content, customer);
        assert!(metrics.brand_alignment >= 85.0);
    }
}
