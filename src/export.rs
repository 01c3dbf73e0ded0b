use crate::error::Result;
use crate::insights::CustomerInsights;
use crate::performance::PerformanceMetrics;
use crate::schema::{CampaignContent, CustomerRecord};
use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// The interchange document written for downstream consumers and audit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CampaignExport {
    pub campaign_content: CampaignContent,
    pub customer_profile: CustomerRecord,
    pub insights: Option<CustomerInsights>,
    pub performance_metrics: PerformanceMetrics,
    pub generated_at: DateTime<Utc>,
}

impl CampaignExport {
    pub fn new(
        campaign_content: CampaignContent,
        customer_profile: CustomerRecord,
        insights: Option<CustomerInsights>,
        performance_metrics: PerformanceMetrics,
    ) -> Self {
        Self {
            campaign_content,
            customer_profile,
            insights,
            performance_metrics,
            generated_at: Utc::now(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?)?;
        info!("Campaign exported to {}", path.display());
        Ok(())
    }

    pub fn read_json(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json(&fs::read_to_string(path)?)
    }
}

/// Conventional download name for the customer at `index` in the dataset.
pub fn export_file_name(index: usize) -> String {
    format!("campaign_customer_{}.json", index)
}
