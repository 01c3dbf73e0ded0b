use bank_campaign_builder::{
    export_file_name, filter_customers, AnthropicClient, CampaignEvent, CampaignGenerator,
    CampaignType, CustomerDataGenerator, CustomerFilter, CustomerSegment, Settings,
    WorkspaceCache,
};
use std::error::Error;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let settings = Settings::from_env()?;

    println!("🏦 Personalized Campaign Workflow");
    println!("═══════════════════════════════════════════════════════════════\n");

    // 1. Customer data
    let cache = WorkspaceCache::new(&settings.cache);
    let data_generator = CustomerDataGenerator::new(settings.data.clone());
    let customers = cache.dataset(&data_generator, settings.data.default_records)?;
    println!("👥 Generated {} customers", customers.len());

    let filter = CustomerFilter::new().with_segments([CustomerSegment::Premium, CustomerSegment::Standard]);
    let candidates = filter_customers(&customers, &filter);
    let Some(customer) = candidates.first().copied() else {
        println!("⚠️  No Premium or Standard customers in this sample. Run again.");
        return Ok(());
    };
    let index = customers
        .iter()
        .position(|c| c.id == customer.id)
        .unwrap_or_default();
    println!("   Selected: {}\n", customer.display_label(index));

    let insights = cache.insights(customer)?;
    for rec in &insights.recommendations {
        println!("   💡 {}: {}", rec.title, rec.description);
    }
    println!();

    // 2. Campaign generation
    let client = AnthropicClient::from_settings(&settings.api)?;
    client.check_connection().await?;

    let generator = CampaignGenerator::new(client, settings.api.clone())
        .with_campaign_type(CampaignType::CrossSell);

    let (tx, mut rx) = mpsc::channel(16);
    let printer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match event {
                CampaignEvent::Starting { customer_id } => println!("🚀 Starting {}", customer_id),
                CampaignEvent::Failed { reason } => println!("❌ {}", reason),
                CampaignEvent::Success => println!("✅ Campaign ready"),
                other => println!("   … {:?}", other),
            }
        }
    });

    let export = generator.run(customer, Some(tx)).await;
    printer.await?;
    let export = export?;

    // 3. Results
    println!("\n📣 {}", export.campaign_content.primary_message);
    println!("   {}", export.campaign_content.secondary_message);
    println!(
        "   Channels: {}",
        export.campaign_content.channel_strategy.primary_channels.join(", ")
    );

    let metrics = &export.performance_metrics;
    println!("\n📈 Estimated performance");
    println!("   Engagement rate:       {:.1}%", metrics.engagement_rate);
    println!("   Channel optimization:  {:.1}%", metrics.channel_optimization);
    println!("   Personalization:       {:.1}%", metrics.personalization_score);
    println!("   Brand alignment:       {:.1}%", metrics.brand_alignment);
    println!("   Overall:               {:.1}", metrics.overall_score());

    let path = export_file_name(index);
    export.write_json(&path)?;
    println!("\n💾 Saved {}", path);

    Ok(())
}
