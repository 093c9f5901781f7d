use serde::Deserialize;
use std::{fs, path::Path};

use utility_client::{bayou, palmetto};

use crate::pipeline::DataSource;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AggregatorConfig {
    pub domain: String,
    /// Overrides `https://{domain}/api/v2`, e.g. for a local stub.
    pub base_url: Option<String>,
    pub utility: String,
    pub api_key: Option<String>,
    pub request_timeout_ms: u64,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            domain: bayou::DEFAULT_DOMAIN.to_string(),
            base_url: None,
            utility: bayou::DEFAULT_UTILITY.to_string(),
            api_key: None,
            request_timeout_ms: 10_000,
        }
    }
}

impl AggregatorConfig {
    pub fn base_url(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| bayou::base_url_for_domain(&self.domain))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PredictionConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub forecast_year: i32,
    pub mode: DataSource,
    pub request_timeout_ms: u64,
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            base_url: palmetto::DEFAULT_BASE_URL.to_string(),
            api_key: None,
            forecast_year: 2025,
            mode: DataSource::Live,
            request_timeout_ms: 20_000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    pub bind_addr: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub aggregator: AggregatorConfig,
    pub prediction: PredictionConfig,
    pub metrics: Option<MetricsConfig>,
}

impl AppConfig {
    /// Read the TOML file named by `INSIGHTS_CONFIG` (default `insights-config.toml`), then
    /// apply `BAYOU_API_KEY`, `BAYOU_DOMAIN` and `PALMETTO_API_KEY` from the environment.
    /// A missing file means defaults.
    pub fn load() -> anyhow::Result<Self> {
        use std::env;

        let path = env::var("INSIGHTS_CONFIG").unwrap_or_else(|_| "insights-config.toml".to_string());
        let cfg = if Path::new(&path).exists() {
            let contents = fs::read_to_string(&path)?;
            Self::from_toml(&contents)?
        } else {
            tracing::info!(path = %path, "config file not found, using defaults");
            Self::default()
        };

        Ok(cfg.with_env(|key| env::var(key).ok()))
    }

    pub fn from_toml(contents: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Empty values count as unset.
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = lookup("BAYOU_API_KEY") {
            self.aggregator.api_key = Some(key);
        }
        if let Some(domain) = lookup("BAYOU_DOMAIN") {
            self.aggregator.domain = domain;
        }
        if let Some(key) = lookup("PALMETTO_API_KEY") {
            self.prediction.api_key = Some(key);
        }
        self
    }
}
