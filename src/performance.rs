use crate::schema::{CampaignContent, CustomerRecord};
use chrono::{DateTime, Utc};
use log::debug;
use rand::{thread_rng, Rng};
use serde::{Deserialize, Serialize};
use std::ops::Range;

const ENGAGEMENT_RANGE: Range<f64> = 15.0..35.0;
const OPTIMIZATION_RANGE: Range<f64> = 75.0..95.0;
const PERSONALIZATION_RANGE: Range<f64> = 80.0..98.0;
const ALIGNMENT_RANGE: Range<f64> = 85.0..97.0;

/// Estimated campaign performance, in percentage points.
///
/// Scores are scaled after drawing, so a Premium or High-engagement customer can score
/// above 100.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PerformanceMetrics {
    pub engagement_rate: f64,
    pub channel_optimization: f64,
    pub personalization_score: f64,
    pub brand_alignment: f64,
    pub timestamp: DateTime<Utc>,
}

impl PerformanceMetrics {
    /// Weighted blend: 0.3 engagement, 0.25 channel optimization, 0.25 personalization,
    /// 0.2 brand alignment.
    pub fn overall_score(&self) -> f64 {
        self.engagement_rate * 0.3
            + self.channel_optimization * 0.25
            + self.personalization_score * 0.25
            + self.brand_alignment * 0.2
    }
}

/// Applied to engagement rate and personalization score.
pub fn segment_multiplier(segment: &str) -> f64 {
    match segment {
        "Premium" => 1.2,
        "Standard" => 1.0,
        "Basic" => 0.8,
        _ => 1.0,
    }
}

/// Applied to channel optimization.
pub fn engagement_multiplier(engagement: &str) -> f64 {
    match engagement {
        "High" => 1.2,
        "Medium" => 1.0,
        "Low" => 0.8,
        _ => 1.0,
    }
}

/// Draws the four base scores and scales them. Depends only on the draw, the segment
/// and the engagement level.
pub fn estimate_performance_with<R: Rng + ?Sized>(
    rng: &mut R,
    segment: &str,
    engagement: &str,
) -> PerformanceMetrics {
    let segment_factor = segment_multiplier(segment);
    let engagement_factor = engagement_multiplier(engagement);

    PerformanceMetrics {
        engagement_rate: rng.gen_range(ENGAGEMENT_RANGE) * segment_factor,
        channel_optimization: rng.gen_range(OPTIMIZATION_RANGE) * engagement_factor,
        personalization_score: rng.gen_range(PERSONALIZATION_RANGE) * segment_factor,
        brand_alignment: rng.gen_range(ALIGNMENT_RANGE),
        timestamp: Utc::now(),
    }
}

/// The campaign text itself does not influence the estimate.
pub fn estimate_campaign_performance(
    _content: &CampaignContent,
    customer: &CustomerRecord,
) -> PerformanceMetrics {
    let metrics = estimate_performance_with(
        &mut thread_rng(),
        customer.customer_segment.as_str(),
        customer.digital_engagement.as_str(),
    );
    debug!(
        "Estimated performance for customer {}: overall {:.1}",
        customer.id,
        metrics.overall_score()
    );
    metrics
}
