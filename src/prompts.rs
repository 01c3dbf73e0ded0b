//! Prompt text for the campaign generation request.

use crate::brand::{DisclaimerKind, BRAND_GUIDELINES};
use crate::config::CampaignType;
use crate::error::{CampaignError, Result};
use crate::schema::{
    ChannelStrategy, Persona, PersonalizationElements, ToneGuidelines, VisualElements,
};
use crate::utils::format_currency;
use log::debug;
use serde::Serialize;
use std::collections::BTreeMap;

pub const SYSTEM_INSTRUCTION: &str = r#"You are a specialized marketing AI assistant that generates JSON responses for a bank's marketing system. Your role is to:
1. Generate ONLY valid JSON marketing content
2. Never provide explanations or apologies
3. Never deviate from JSON format
4. Always complete the full JSON structure
5. Focus on professional banking services

Format all responses as valid JSON only."#;

const CAMPAIGN_REQUIREMENTS: &str = r#"Requirements:
1. Primary message should be max 150 words and focused on the customer's interests and life stage
2. Secondary message should be max 50 words and include a clear call to action
3. Visual elements should specify colors, imagery, and layout that appeal to this customer persona
4. Channel strategy should prioritize the customer's preferred channels
5. Include specific personalization elements based on the customer's data
6. Tone guidelines should match the bank's brand voice and the customer's segment"#;

const FORMATTING_CONSTRAINTS: &str = r#"CRITICAL INSTRUCTIONS:
1. Return ONLY valid JSON - no other text
2. Follow the exact structure shown above
3. Use appropriate banking terminology
4. Keep messages professional and clear
5. Include all required fields
6. Maintain consistent formatting"#;

/// The example object embedded in the prompt. Field order matches the campaign contract.
#[derive(Debug, Serialize)]
struct ExampleCampaign {
    primary_message: String,
    secondary_message: String,
    visual_elements: VisualElements,
    channel_strategy: ChannelStrategy,
    personalization_elements: PersonalizationElements,
    tone_guidelines: ToneGuidelines,
    legal_disclaimer: String,
}

pub fn build_campaign_prompt(persona: &Persona) -> Result<String> {
    build_campaign_prompt_for(persona, None)
}

/// Builds the full instruction text: an example JSON object interpolated from the
/// persona, the persona's banking details, authoring requirements and output rules.
pub fn build_campaign_prompt_for(
    persona: &Persona,
    campaign_type: Option<CampaignType>,
) -> Result<String> {
    check_persona(persona)?;

    let behavioral = &persona.behavioral;
    let psychographic = &persona.psychographic;
    let example = example_campaign(persona);
    let example_json = serde_json::to_string_pretty(&example)
        .map_err(|e| CampaignError::PromptBuild(format!("example JSON failed to serialize: {}", e)))?;

    let mut prompt = format!(
        "REQUIRED: Generate a marketing campaign as a JSON object following this EXACT structure:\n\n\
         {example}\n\n\
         You are an expert marketing specialist. Create a personalized marketing campaign for a bank customer.\n\
         Create the content based on these banking details:\n\
         Segment: {segment}\n\
         Life Stage: {life_stage}\n\
         Digital Usage: {engagement}\n\
         Monthly Transactions: {frequency}\n\
         Average Transaction: ${average}\n\
         Current Products: {products}\n\
         Banking History: {tenure} years\n\
         Preferred Channels: {channels}\n\
         Financial Interests: {interests}\n\n\
         {requirements}\n\n",
        example = example_json,
        segment = behavioral.customer_segment,
        life_stage = persona.demographic.life_stage,
        engagement = behavioral.digital_engagement,
        frequency = behavioral.transaction_frequency,
        average = format_currency(behavioral.average_transaction),
        products = behavioral.product_holdings,
        tenure = behavioral.relationship_tenure,
        channels = psychographic.preferred_channels.join(", "),
        interests = psychographic.interests.join(", "),
        requirements = CAMPAIGN_REQUIREMENTS,
    );

    if let Some(kind) = campaign_type {
        prompt.push_str(&format!(
            "Campaign Focus:\n- Type: {}\n- Tone: {}\n- Focus: {}\n- Must include: {}\n\n",
            kind.key(),
            kind.tone(),
            kind.focus(),
            kind.required_elements().join(", ")
        ));
    }

    prompt.push_str(FORMATTING_CONSTRAINTS);

    debug!(
        "Built campaign prompt for {} segment ({} chars)",
        behavioral.customer_segment,
        prompt.len()
    );

    Ok(prompt)
}

/// Surrounds a campaign prompt with the JSON-only framing sent to the completion model.
pub fn wrap_for_completion(prompt: &str) -> String {
    format!(
        "IMPORTANT: Your response must be a single valid JSON object.\n\
         DO NOT include any explanatory text, apologies, or additional content.\n\
         ONLY return the JSON object itself.\n\n\
         Required JSON structure and content:\n\
         {}\n\n\
         Remember: Return ONLY the JSON object. No other text allowed.",
        prompt
    )
}

fn check_persona(persona: &Persona) -> Result<()> {
    let behavioral = &persona.behavioral;

    if behavioral.customer_segment.trim().is_empty() {
        return Err(CampaignError::PromptBuild(
            "persona has an empty customer segment".into(),
        ));
    }
    if !behavioral.average_transaction.is_finite() || behavioral.average_transaction < 0.0 {
        return Err(CampaignError::PromptBuild(format!(
            "persona has an invalid average transaction: {}",
            behavioral.average_transaction
        )));
    }
    if behavioral.transaction_frequency < 0 || behavioral.relationship_tenure < 0 {
        return Err(CampaignError::PromptBuild(
            "persona has negative transaction frequency or tenure".into(),
        ));
    }
    if persona.psychographic.preferred_channels.is_empty() {
        return Err(CampaignError::PromptBuild(
            "persona has no preferred channels".into(),
        ));
    }
    if persona.psychographic.interests.is_empty() {
        return Err(CampaignError::PromptBuild("persona has no interests".into()));
    }

    Ok(())
}

fn example_campaign(persona: &Persona) -> ExampleCampaign {
    let segment = persona.behavioral.customer_segment.as_str();
    let guidelines = BRAND_GUIDELINES.segment(segment);
    let channels = BRAND_GUIDELINES.channel_recommendations(&persona.behavioral.digital_engagement);

    let mut adaptations = BTreeMap::new();
    adaptations.insert("CommBank App".to_string(), "Mobile-optimized format".to_string());
    adaptations.insert("Email".to_string(), "Responsive design layout".to_string());

    ExampleCampaign {
        primary_message: format!(
            "Discover banking solutions tailored to your {} needs",
            segment.to_lowercase()
        ),
        secondary_message:
            "Visit your nearest CommBank branch or login to NetBank to learn more".to_string(),
        visual_elements: VisualElements {
            color_scheme: BRAND_GUIDELINES.brand_colors(segment).join(", "),
            imagery: guidelines.visual.imagery.to_string(),
            layout: "Clean, modern layout".to_string(),
            style: guidelines.visual.style.to_string(),
        },
        channel_strategy: ChannelStrategy {
            primary_channels: channels.iter().map(|c| c.to_string()).collect(),
            secondary_channels: persona.psychographic.preferred_channels.clone(),
            channel_specific_adaptations: adaptations,
        },
        personalization_elements: PersonalizationElements {
            key_variables: vec!["products".into(), "transactions".into(), "preferences".into()],
            dynamic_content: vec!["offers".into(), "services".into(), "features".into()],
            personalization_rules: "Based on banking behavior and preferences".to_string(),
        },
        tone_guidelines: ToneGuidelines {
            voice: guidelines.tone.to_string(),
            style: guidelines.style.to_string(),
            language_level: "Professional and clear".to_string(),
        },
        legal_disclaimer: BRAND_GUIDELINES.legal_disclaimer(DisclaimerKind::Banking),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Behavioral, Demographic, LifeStage, Psychographic};
    use serde_json::Value;

    fn sample_persona() -> Persona {
        Persona {
            demographic: Demographic {
                age: 35,
                gender: "F".to_string(),
                location: "Sydney".to_string(),
                income: 85_000.0,
                occupation: "Software Engineer".to_string(),
                life_stage: LifeStage::FamilyBuilder,
            },
            behavioral: Behavioral {
                transaction_frequency: 15,
                average_transaction: 1200.0,
                digital_engagement: "High".to_string(),
                customer_segment: "Premium".to_string(),
                product_holdings: 3,
                relationship_tenure: 5,
            },
            psychographic: Psychographic {
                interests: vec!["Technology".into(), "Investment".into(), "Travel".into()],
                preferred_channels: vec!["Mobile App".into(), "Email".into()],
            },
        }
    }

    fn embedded_example(prompt: &str) -> Value {
        let start = prompt.find('{').unwrap();
        let end = prompt.find("\n\nYou are an expert").unwrap();
        serde_json::from_str(&prompt[start..end]).unwrap()
    }

    #[test]
    fn test_prompt_contains_persona_details() {
        let prompt = build_campaign_prompt(&sample_persona()).unwrap();
        assert!(prompt.starts_with("REQUIRED: Generate a marketing campaign"));
        assert!(prompt.contains("Segment: Premium"));
        assert!(prompt.contains("Life Stage: Family Builder"));
        assert!(prompt.contains("Average Transaction: $1,200.00"));
        assert!(prompt.contains("Current Products: 3"));
        assert!(prompt.contains("Banking History: 5 years"));
        assert!(prompt.contains("Preferred Channels: Mobile App, Email"));
        assert!(prompt.contains("Financial Interests: Technology, Investment, Travel"));
        assert!(prompt.contains("6. Tone guidelines should match"));
        assert!(prompt.ends_with("6. Maintain consistent formatting"));
        assert!(!prompt.contains("Campaign Focus"));
    }

    #[test]
    fn test_embedded_example_is_valid_and_interpolated() {
        let prompt = build_campaign_prompt(&sample_persona()).unwrap();
        let example = embedded_example(&prompt);

        assert_eq!(
            example["primary_message"],
            "Discover banking solutions tailored to your premium needs"
        );
        assert_eq!(example["visual_elements"]["color_scheme"], "#FDB813, #BE9B59, #000000");
        assert_eq!(example["visual_elements"]["style"], "Minimalist and elegant");
        assert_eq!(
            example["channel_strategy"]["primary_channels"],
            serde_json::json!(["CommBank App", "NetBank"])
        );
        assert_eq!(
            example["channel_strategy"]["secondary_channels"],
            serde_json::json!(["Mobile App", "Email"])
        );
        assert_eq!(
            example["tone_guidelines"]["voice"],
            "Sophisticated, exclusive, and personalized"
        );
        assert!(example["legal_disclaimer"]
            .as_str()
            .unwrap()
            .starts_with("Banking products"));
    }

    #[test]
    fn test_unknown_segment_uses_standard_guidelines() {
        let mut persona = sample_persona();
        persona.behavioral.customer_segment = "Platinum".to_string();
        persona.behavioral.digital_engagement = "Sometimes".to_string();

        let example = embedded_example(&build_campaign_prompt(&persona).unwrap());
        assert_eq!(example["tone_guidelines"]["style"], "Clear and professional");
        assert_eq!(
            example["channel_strategy"]["primary_channels"],
            serde_json::json!(["CommBank App", "NetBank", "Phone", "ATM"])
        );
    }

    #[test]
    fn test_campaign_type_section() {
        let prompt =
            build_campaign_prompt_for(&sample_persona(), Some(CampaignType::Retention)).unwrap();
        assert!(prompt.contains("Campaign Focus:"));
        assert!(prompt.contains("- Type: retention"));
        assert!(prompt.contains("Relationship recap, Exclusive benefits, Thank you message"));
    }

    #[test]
    fn test_malformed_persona_is_rejected() {
        let mut persona = sample_persona();
        persona.psychographic.preferred_channels.clear();
        assert!(matches!(
            build_campaign_prompt(&persona),
            Err(CampaignError::PromptBuild(_))
        ));

        let mut persona = sample_persona();
        persona.behavioral.average_transaction = f64::NAN;
        assert!(build_campaign_prompt(&persona).is_err());
    }

    #[test]
    fn test_wrap_for_completion() {
        let wrapped = wrap_for_completion("BODY");
        assert!(wrapped.contains("Required JSON structure and content:\nBODY\n"));
        assert!(wrapped.ends_with("No other text allowed."));
    }
}
