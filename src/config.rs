use crate::error::{CampaignError, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_MODEL: &str = "claude-3-5-sonnet-latest";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DataSettings {
    pub min_records: usize,
    pub max_records: usize,
    pub default_records: usize,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            min_records: 10,
            max_records: 1000,
            default_records: 100,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiSettings {
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Upper bound on a single completion call; owned by the caller, never retried.
    pub timeout: Duration,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 1500,
            temperature: 0.7,
            timeout: Duration::from_secs(60),
        }
    }
}

impl ApiSettings {
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                CampaignError::Config("ANTHROPIC_API_KEY environment variable is required".into())
            })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CacheSettings {
    pub ttl: Duration,
    pub max_entries: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(3600),
            max_entries: 1000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    pub environment: String,
    pub debug: bool,
    pub data: DataSettings,
    pub api: ApiSettings,
    pub cache: CacheSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            debug: false,
            data: DataSettings::default(),
            api: ApiSettings::default(),
            cache: CacheSettings::default(),
        }
    }
}

impl Settings {
    /// Loads `.env` if present, then overlays environment variables on the defaults.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();
        let read = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        settings.api.api_key = read("ANTHROPIC_API_KEY");
        if let Some(model) = read("ANTHROPIC_MODEL") {
            settings.api.model = model;
        }
        if let Some(env) = read("ENVIRONMENT") {
            settings.environment = env;
        }
        if let Some(debug) = read("DEBUG") {
            settings.debug = debug.trim().eq_ignore_ascii_case("true");
        }
        if let Some(raw) = read("CAMPAIGN_MAX_TOKENS") {
            settings.api.max_tokens = parse_var("CAMPAIGN_MAX_TOKENS", &raw)?;
        }
        if let Some(raw) = read("CAMPAIGN_TEMPERATURE") {
            let temperature: f32 = parse_var("CAMPAIGN_TEMPERATURE", &raw)?;
            if !(0.0..=1.0).contains(&temperature) {
                return Err(CampaignError::Config(format!(
                    "CAMPAIGN_TEMPERATURE must be between 0.0 and 1.0, got {}",
                    temperature
                )));
            }
            settings.api.temperature = temperature;
        }
        if let Some(raw) = read("CAMPAIGN_TIMEOUT_SECS") {
            settings.api.timeout = Duration::from_secs(parse_var("CAMPAIGN_TIMEOUT_SECS", &raw)?);
        }

        info!("Configuration loaded for environment '{}'", settings.environment);
        debug!(
            "Model: {}, max_tokens: {}, temperature: {}, api key present: {}",
            settings.api.model,
            settings.api.max_tokens,
            settings.api.temperature,
            settings.api.api_key.is_some()
        );

        Ok(settings)
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| CampaignError::Config(format!("{} has an invalid value: '{}'", key, raw)))
}

/// Optional campaign angle layered on top of the persona-driven prompt.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CampaignType {
    ProductLaunch,
    CrossSell,
    Retention,
    Educational,
}

impl CampaignType {
    pub fn key(&self) -> &'static str {
        match self {
            Self::ProductLaunch => "product_launch",
            Self::CrossSell => "cross_sell",
            Self::Retention => "retention",
            Self::Educational => "educational",
        }
    }

    pub fn tone(&self) -> &'static str {
        match self {
            Self::ProductLaunch => "Exciting and innovative",
            Self::CrossSell => "Helpful and informative",
            Self::Retention => "Appreciative and valuable",
            Self::Educational => "Informative and helpful",
        }
    }

    pub fn focus(&self) -> &'static str {
        match self {
            Self::ProductLaunch => "Features and benefits",
            Self::CrossSell => "Added value and convenience",
            Self::Retention => "Relationship and loyalty",
            Self::Educational => "Knowledge and empowerment",
        }
    }

    pub fn required_elements(&self) -> &'static [&'static str] {
        match self {
            Self::ProductLaunch => &["Product features", "Launch offers", "How to get started"],
            Self::CrossSell => &[
                "Current product tie-in",
                "Benefits of addition",
                "Special offer",
            ],
            Self::Retention => &[
                "Relationship recap",
                "Exclusive benefits",
                "Thank you message",
            ],
            Self::Educational => &["Key insights", "Practical tips", "Next steps"],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::from_lookup(|_| None).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.data.min_records, 10);
        assert_eq!(settings.data.max_records, 1000);
        assert!(settings.api.require_api_key().is_err());
    }

    #[test]
    fn test_env_overrides() {
        let settings = Settings::from_lookup(lookup_from(&[
            ("ANTHROPIC_API_KEY", "sk-test"),
            ("DEBUG", "TRUE"),
            ("ENVIRONMENT", "staging"),
            ("CAMPAIGN_MAX_TOKENS", "2000"),
            ("CAMPAIGN_TEMPERATURE", "0.5"),
            ("CAMPAIGN_TIMEOUT_SECS", "15"),
        ]))
        .unwrap();

        assert!(settings.debug);
        assert_eq!(settings.environment, "staging");
        assert_eq!(settings.api.require_api_key().unwrap(), "sk-test");
        assert_eq!(settings.api.max_tokens, 2000);
        assert_eq!(settings.api.temperature, 0.5);
        assert_eq!(settings.api.timeout, Duration::from_secs(15));
    }

    #[test]
    fn test_invalid_numbers_are_config_errors() {
        let err = Settings::from_lookup(lookup_from(&[("CAMPAIGN_MAX_TOKENS", "lots")]))
            .unwrap_err();
        assert!(matches!(err, CampaignError::Config(_)));

        let err = Settings::from_lookup(lookup_from(&[("CAMPAIGN_TEMPERATURE", "3.0")]))
            .unwrap_err();
        assert!(err.to_string().contains("CAMPAIGN_TEMPERATURE"));
    }

    #[test]
    fn test_campaign_type_details() {
        assert_eq!(CampaignType::CrossSell.key(), "cross_sell");
        assert_eq!(CampaignType::Retention.required_elements().len(), 3);
    }
}
