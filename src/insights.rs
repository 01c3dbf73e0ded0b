use crate::error::{CampaignError, Result};
use crate::generator::PRODUCTS;
use crate::schema::{CustomerRecord, CustomerSegment, DigitalEngagement};
use chrono::{DateTime, Utc};
use log::debug;
use rand::{thread_rng, Rng};
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

pub const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Peak-to-average swing of the yearly cycle.
const SEASONAL_AMPLITUDE: f64 = 0.2;
const MONTHLY_NOISE_SD: f64 = 0.1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonthlyAmount {
    pub month: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransactionTrend {
    /// The customer's average transaction, drawn as the reference line.
    pub baseline: f64,
    pub monthly: Vec<MonthlyAmount>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductUsage {
    pub product: String,
    pub score: f64,
}

/// Each axis is normalized to [0, 1].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngagementProfile {
    pub transaction_activity: f64,
    pub digital_engagement: f64,
    pub product_utilization: f64,
    pub relationship_tenure: f64,
    pub satisfaction: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationKind {
    Product,
    Service,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub kind: RecommendationKind,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomerMetrics {
    pub customer_value: f64,
    pub churn_risk: u32,
    pub opportunity_score: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InsightSummary {
    pub segment: CustomerSegment,
    pub engagement_level: DigitalEngagement,
    pub products_held: usize,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomerInsights {
    pub transaction_pattern: TransactionTrend,
    pub product_usage: Vec<ProductUsage>,
    pub engagement_profile: EngagementProfile,
    pub recommendations: Vec<Recommendation>,
    pub metrics: CustomerMetrics,
    pub summary: InsightSummary,
}

/// Twelve months of spend around the customer's average, following a sine-shaped
/// seasonal cycle with multiplicative noise.
pub fn transaction_trend_with<R: Rng + ?Sized>(
    rng: &mut R,
    customer: &CustomerRecord,
) -> Result<TransactionTrend> {
    let noise = Normal::new(1.0, MONTHLY_NOISE_SD)
        .map_err(|e| CampaignError::Config(format!("invalid noise distribution: {}", e)))?;
    let baseline = customer.average_transaction;

    let monthly = MONTHS
        .iter()
        .enumerate()
        .map(|(i, month)| {
            let seasonal = 1.0 + SEASONAL_AMPLITUDE * (2.0 * PI * i as f64 / 12.0).sin();
            MonthlyAmount {
                month: month.to_string(),
                amount: baseline * seasonal * noise.sample(rng),
            }
        })
        .collect();

    Ok(TransactionTrend { baseline, monthly })
}

pub fn product_usage_with<R: Rng + ?Sized>(
    rng: &mut R,
    customer: &CustomerRecord,
) -> Vec<ProductUsage> {
    let base = match customer.customer_segment {
        CustomerSegment::Premium => 0.8,
        CustomerSegment::Standard => 0.6,
        CustomerSegment::Basic => 0.4,
    };
    let engagement = engagement_factor(customer.digital_engagement);

    customer
        .product_holdings
        .iter()
        .map(|product| ProductUsage {
            product: product.clone(),
            score: (base * engagement * rng.gen_range(0.8..1.2)).min(1.0),
        })
        .collect()
}

pub fn engagement_profile(customer: &CustomerRecord) -> EngagementProfile {
    EngagementProfile {
        transaction_activity: (customer.transaction_frequency as f64 / 30.0).min(1.0),
        digital_engagement: match customer.digital_engagement {
            DigitalEngagement::High => 0.9,
            DigitalEngagement::Medium => 0.6,
            DigitalEngagement::Low => 0.3,
        },
        product_utilization: (customer.product_holdings.len() as f64 / PRODUCTS.len() as f64)
            .min(1.0),
        relationship_tenure: (customer.relationship_tenure as f64 / 20.0).min(1.0),
        satisfaction: (customer.satisfaction_score as f64 / 100.0).min(1.0),
    }
}

pub fn generate_recommendations(customer: &CustomerRecord) -> Vec<Recommendation> {
    let lacks = |product: &str| {
        PRODUCTS.contains(&product) && !customer.product_holdings.iter().any(|p| p == product)
    };
    let mut recommendations = Vec::new();

    if lacks("Investment Account") && customer.income > 80_000.0 {
        recommendations.push(Recommendation {
            kind: RecommendationKind::Product,
            title: "Investment Account".to_string(),
            description: "Based on your income level, you might benefit from our investment services.".to_string(),
        });
    }

    if lacks("Credit Card") && customer.credit_score > 700 {
        recommendations.push(Recommendation {
            kind: RecommendationKind::Product,
            title: "Premium Credit Card".to_string(),
            description: "Your excellent credit score qualifies you for our premium credit card.".to_string(),
        });
    }

    if customer.digital_engagement == DigitalEngagement::Low {
        recommendations.push(Recommendation {
            kind: RecommendationKind::Service,
            title: "Digital Banking".to_string(),
            description: "Discover the convenience of our CommBank app and NetBank services.".to_string(),
        });
    }

    if customer.international_transaction_ratio > 0.2 {
        recommendations.push(Recommendation {
            kind: RecommendationKind::Service,
            title: "International Banking".to_string(),
            description: "Our international banking services can help you save on overseas transactions.".to_string(),
        });
    }

    recommendations
}

/// Monthly value scaled by segment and engagement, plus rule-based churn risk and
/// cross-sell opportunity (both capped at 100).
pub fn calculate_metrics(customer: &CustomerRecord) -> CustomerMetrics {
    let monthly_value = customer.average_transaction * customer.transaction_frequency as f64;
    let segment = match customer.customer_segment {
        CustomerSegment::Premium => 1.5,
        CustomerSegment::Standard => 1.0,
        CustomerSegment::Basic => 0.8,
    };
    let products_held = customer.product_holdings.len();

    let mut churn_risk = 0;
    if customer.transaction_frequency < 10 {
        churn_risk += 30;
    }
    if customer.digital_engagement == DigitalEngagement::Low {
        churn_risk += 30;
    }
    if products_held < 2 {
        churn_risk += 20;
    }

    let mut opportunity: i64 = 0;
    if customer.income > 100_000.0 {
        opportunity += 30;
    }
    opportunity += (PRODUCTS.len() as i64 - products_held as i64) * 5;
    if customer.digital_engagement == DigitalEngagement::High {
        opportunity += 20;
    }

    CustomerMetrics {
        customer_value: monthly_value * segment * engagement_factor(customer.digital_engagement),
        churn_risk: churn_risk.min(100),
        opportunity_score: opportunity.clamp(0, 100) as u32,
    }
}

pub fn generate_customer_insights_with<R: Rng + ?Sized>(
    rng: &mut R,
    customer: &CustomerRecord,
) -> Result<CustomerInsights> {
    let insights = CustomerInsights {
        transaction_pattern: transaction_trend_with(rng, customer)?,
        product_usage: product_usage_with(rng, customer),
        engagement_profile: engagement_profile(customer),
        recommendations: generate_recommendations(customer),
        metrics: calculate_metrics(customer),
        summary: InsightSummary {
            segment: customer.customer_segment,
            engagement_level: customer.digital_engagement,
            products_held: customer.product_holdings.len(),
            generated_at: Utc::now(),
        },
    };

    debug!(
        "Insights for customer {}: {} recommendations, opportunity {}",
        customer.id,
        insights.recommendations.len(),
        insights.metrics.opportunity_score
    );
    Ok(insights)
}

pub fn generate_customer_insights(customer: &CustomerRecord) -> Result<CustomerInsights> {
    generate_customer_insights_with(&mut thread_rng(), customer)
}

fn engagement_factor(engagement: DigitalEngagement) -> f64 {
    match engagement {
        DigitalEngagement::High => 1.2,
        DigitalEngagement::Medium => 1.0,
        DigitalEngagement::Low => 0.8,
    }
}
