use crate::config::CacheSettings;
use crate::error::Result;
use crate::generator::CustomerDataGenerator;
use crate::insights::{generate_customer_insights, CustomerInsights};
use crate::schema::CustomerRecord;
use chrono::{DateTime, Utc};
use log::debug;
use moka::sync::Cache;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct CachedEntry<V> {
    pub value: V,
    pub cached_at: DateTime<Utc>,
}

/// Key to `(value, cached_at)` map with TTL eviction and a bounded entry count.
/// Cloning shares the underlying storage.
#[derive(Clone)]
pub struct TimedCache<K, V> {
    inner: Cache<K, CachedEntry<V>>,
    ttl: Duration,
}

impl<K, V> TimedCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    pub fn new(ttl: Duration, max_entries: u64) -> Self {
        let inner = Cache::builder()
            .time_to_live(ttl)
            .max_capacity(max_entries)
            .build();
        Self { inner, ttl }
    }

    pub fn from_settings(settings: &CacheSettings) -> Self {
        Self::new(settings.ttl, settings.max_entries)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn get(&self, key: &K) -> Option<CachedEntry<V>> {
        self.inner.get(key)
    }

    pub fn insert(&self, key: K, value: V) {
        self.inner.insert(
            key,
            CachedEntry {
                value,
                cached_at: Utc::now(),
            },
        );
    }

    /// Returns the cached value, or computes and stores it. Failed computations are
    /// not cached.
    pub fn get_or_insert_with<F>(&self, key: K, compute: F) -> Result<V>
    where
        F: FnOnce() -> Result<V>,
    {
        if let Some(entry) = self.inner.get(&key) {
            return Ok(entry.value);
        }

        let value = compute()?;
        self.insert(key, value.clone());
        Ok(value)
    }

    pub fn invalidate(&self, key: &K) {
        self.inner.invalidate(key);
    }

    pub fn clear(&self) {
        self.inner.invalidate_all();
    }
}

/// Caller-owned memoization for the interactive workflow: datasets keyed by record
/// count and insights keyed by customer id.
#[derive(Clone)]
pub struct WorkspaceCache {
    datasets: TimedCache<usize, Arc<Vec<CustomerRecord>>>,
    insights: TimedCache<String, Arc<CustomerInsights>>,
}

impl WorkspaceCache {
    pub fn new(settings: &CacheSettings) -> Self {
        Self {
            datasets: TimedCache::from_settings(settings),
            insights: TimedCache::from_settings(settings),
        }
    }

    pub fn dataset(
        &self,
        generator: &CustomerDataGenerator,
        num_records: usize,
    ) -> Result<Arc<Vec<CustomerRecord>>> {
        self.datasets.get_or_insert_with(num_records, || {
            debug!("Dataset cache miss for {} records", num_records);
            generator.generate_dataset(num_records).map(Arc::new)
        })
    }

    pub fn insights(&self, customer: &CustomerRecord) -> Result<Arc<CustomerInsights>> {
        self.insights.get_or_insert_with(customer.id.clone(), || {
            debug!("Insights cache miss for customer {}", customer.id);
            generate_customer_insights(customer).map(Arc::new)
        })
    }

    pub fn clear(&self) {
        self.datasets.clear();
        self.insights.clear();
    }
}
