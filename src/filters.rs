use crate::schema::{CustomerRecord, CustomerSegment, DigitalEngagement};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::ops::RangeInclusive;

/// Dataset selection. An empty set places no constraint on that attribute.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CustomerFilter {
    #[serde(default)]
    pub segments: BTreeSet<CustomerSegment>,
    #[serde(default)]
    pub engagement: HashSet<DigitalEngagement>,
    /// Inclusive bounds.
    #[serde(default)]
    pub age_range: Option<(u32, u32)>,
}

impl CustomerFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_segments(mut self, segments: impl IntoIterator<Item = CustomerSegment>) -> Self {
        self.segments.extend(segments);
        self
    }

    pub fn with_engagement(
        mut self,
        levels: impl IntoIterator<Item = DigitalEngagement>,
    ) -> Self {
        self.engagement.extend(levels);
        self
    }

    pub fn with_age_range(mut self, ages: RangeInclusive<u32>) -> Self {
        self.age_range = Some((*ages.start(), *ages.end()));
        self
    }

    pub fn matches(&self, customer: &CustomerRecord) -> bool {
        let segment_ok =
            self.segments.is_empty() || self.segments.contains(&customer.customer_segment);
        let engagement_ok =
            self.engagement.is_empty() || self.engagement.contains(&customer.digital_engagement);
        let age_ok = self
            .age_range
            .map_or(true, |(min, max)| (min..=max).contains(&customer.age));

        segment_ok && engagement_ok && age_ok
    }
}

pub fn filter_customers<'a>(
    customers: &'a [CustomerRecord],
    filter: &CustomerFilter,
) -> Vec<&'a CustomerRecord> {
    customers.iter().filter(|c| filter.matches(c)).collect()
}
