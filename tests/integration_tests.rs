use bank_campaign_builder::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Replies with a fixed response and counts calls.
struct CannedModel {
    response: String,
    calls: AtomicUsize,
}

impl CannedModel {
    fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            calls: AtomicUsize::new(0),
        }
    }
}

impl CompletionModel for CannedModel {
    async fn complete(&self, prompt: &str, max_tokens: u32, temperature: f32) -> Result<String> {
        assert!(prompt.contains("REQUIRED: Generate a marketing campaign"));
        assert_eq!(max_tokens, 1500);
        assert!((temperature - 0.7).abs() < f32::EPSILON);
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.response.clone())
    }
}

/// Answers like a chatty model: prose, a code fence, raw newlines inside strings,
/// unescaped quotes, a Windows path and trailing commas.
const NOISY_RESPONSE: &str = "Absolutely! Here's the campaign you asked for:\n```json\n{\n  \"primary_message\": \"Your \"future self\" will thank you. Start investing\nwith as little as $50 a month.\",\n  \"secondary_message\": \"Open an account in the CommBank app today\",\n  \"visual_elements\": {\n    \"color_scheme\": [\"#FFCC00\", \"#000000\"],\n    \"imagery\": \"Confident professional reviewing goals\",\n    \"layout\": \"Hero image with CTA\",\n    \"style\": \"Modern\",\n  },\n  \"channel_strategy\": {\n    \"primary_channels\": [\"CommBank App\", \"Email\"],\n    \"secondary_channels\": \"Branch, Phone Banking\",\n    \"channel_specific_adaptations\": {\"Email\": \"See C:\\Offers\\invest.pdf\"}\n  },\n  \"personalization_elements\": {\n    \"key_variables\": [\"first_name\", \"goal\"],\n    \"dynamic_content\": [\"projected balance\"],\n    \"personalization_rules\": \"Reference the customer's interests\",\n  },\n  \"tone_guidelines\": {\"voice\": \"Encouraging\", \"style\": \"Clear\", \"language_level\": \"Plain\"},\n}\n```\nLet me know if you want changes.";

fn dataset(seed: u64, n: usize) -> Vec<CustomerRecord> {
    CustomerDataGenerator::default()
        .generate_dataset_with(&mut StdRng::seed_from_u64(seed), n)
        .unwrap()
}

#[test]
fn test_dataset_invariants_across_seeds() {
    for seed in 0..5 {
        let customers = dataset(seed, 200);
        let ids: HashSet<_> = customers.iter().map(|c| c.id.clone()).collect();
        assert_eq!(ids.len(), customers.len());

        for c in &customers {
            assert!(c.relationship_tenure <= c.age - 18);
            assert!(c.product_holdings.iter().any(|p| p == "Savings Account"));
            assert!(c.product_holdings.iter().any(|p| p == "Checking Account"));
            assert_eq!(c.life_stage, LifeStage::from_age(c.age));
            assert_eq!(
                c.customer_segment,
                determine_segment(c.income, c.product_holdings.len(), c.relationship_tenure)
            );
        }
    }
}

#[test]
fn test_generation_bounds_from_settings() {
    let settings = Settings::from_lookup(|_| None).unwrap();
    let err = generate_synthetic_data(&settings.data, 9).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::GenerationRange);
    assert!(err.to_string().contains("between 10 and 1000"));
    assert_eq!(generate_synthetic_data(&settings.data, 1000).unwrap().len(), 1000);
}

#[test]
fn test_persona_from_exported_profile() {
    let customer = dataset(3, 10).remove(0);
    let row = serde_json::to_value(&customer).unwrap();
    let persona = format_persona(&row).unwrap();

    assert_eq!(persona.demographic.life_stage, customer.life_stage);
    assert_eq!(persona.behavioral.product_holdings, customer.product_holdings.len());

    let prompt = build_campaign_prompt(&persona).unwrap();
    for key in REQUIRED_KEYS {
        assert!(prompt.contains(&format!("\"{}\"", key)), "prompt lacks {key}");
    }
    assert!(prompt.contains(&format!("Life Stage: {}", customer.life_stage)));
}

#[test]
fn test_noisy_response_is_recovered() {
    let content = parse_campaign_response(NOISY_RESPONSE, "Premium", None).unwrap();

    assert_eq!(
        content.primary_message,
        "Your \"future self\" will thank you. Start investing with as little as $50 a month."
    );
    assert_eq!(content.visual_elements.color_scheme, "#FFCC00, #000000");
    assert_eq!(
        content.channel_strategy.secondary_channels,
        vec!["Branch", "Phone Banking"]
    );
    assert_eq!(
        content.channel_strategy.channel_specific_adaptations["Email"],
        "See C:\\Offers\\invest.pdf"
    );
    assert!(content
        .legal_disclaimer
        .contains("Banking products and services"));
    assert_eq!(content.metadata.customer_segment, "Premium");
}

#[test]
fn test_validator_properties() {
    let mut complete = extract_json_content(NOISY_RESPONSE).unwrap();
    complete.remove("legal_disclaimer");
    let result = validate_campaign_content(&mut complete);
    assert!(result.valid);
    assert!(complete["legal_disclaimer"]
        .as_str()
        .is_some_and(|text| !text.is_empty()));

    let mut partial = extract_json_content(r#"{"primary_message": "x"}"#).unwrap();
    assert!(!validate_campaign_content(&mut partial).valid);
}

#[test]
fn test_error_kinds_for_bad_responses() {
    let err = parse_campaign_response("not json at all", "Basic", None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Extraction);

    let err = parse_campaign_response("{\"a\": }", "Basic", None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Extraction);

    let err = parse_campaign_response(r#"{"primary_message": "x"}"#, "Basic", None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn test_end_to_end_with_scripted_model() -> anyhow::Result<()> {
    let customers = dataset(11, 30);
    let filter = CustomerFilter::new().with_age_range(18..=75);
    let customer = filter_customers(&customers, &filter)[0];

    let generator = CampaignGenerator::new(CannedModel::new(NOISY_RESPONSE), ApiSettings::default())
        .with_timeout(Some(Duration::from_secs(5)));
    let export = generator.run(customer, None).await?;
    assert_eq!(generator.model().calls.load(Ordering::SeqCst), 1);

    let json = export.to_json()?;
    let parsed = CampaignExport::from_json(&json)?;
    assert_eq!(parsed.campaign_content, export.campaign_content);
    assert_eq!(
        parsed.campaign_content.metadata.campaign_type,
        DEFAULT_CAMPAIGN_TYPE
    );
    assert_eq!(
        parsed.campaign_content.legal_disclaimer,
        BRAND_GUIDELINES.legal_disclaimer(DisclaimerKind::Banking)
    );
    assert_eq!(
        parsed.campaign_content.metadata.customer_segment,
        customer.customer_segment.as_str()
    );
    assert_eq!(parsed.customer_profile.id, customer.id);
    assert_eq!(
        parsed.insights.as_ref().map(|i| i.summary.products_held),
        Some(customer.product_holdings.len())
    );
    Ok(())
}

#[tokio::test]
async fn test_concurrent_requests_share_generator() -> anyhow::Result<()> {
    let customers = dataset(12, 10);
    let generator = CampaignGenerator::new(CannedModel::new(NOISY_RESPONSE), ApiSettings::default());

    let (a, b) = tokio::join!(
        generator.generate(&customers[0], None),
        generator.generate(&customers[1], None)
    );
    assert_eq!(a?.metadata.customer_segment, customers[0].customer_segment.as_str());
    assert_eq!(b?.metadata.customer_segment, customers[1].customer_segment.as_str());
    assert_eq!(generator.model().calls.load(Ordering::SeqCst), 2);
    Ok(())
}
