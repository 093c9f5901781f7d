pub mod bayou;
pub mod error;
pub mod insights;
pub mod views;

use std::{sync::Arc, time::Duration};

use axum::{
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;
use utility_client::{Aggregator, BayouClient, PalmettoClient};

use crate::{
    config::AppConfig,
    pipeline::{DataSource, InsightSource, LivePrediction},
    transform::SyntheticFallback,
};
pub use error::{ApiError, Result};

/// Shared, read-only handler state.
pub struct AppState {
    /// `None` when no aggregator key is configured.
    pub aggregator: Option<Arc<dyn Aggregator>>,
    /// `None` in synthetic mode or when no prediction key is configured.
    pub prediction: Option<Arc<dyn InsightSource>>,
    pub data_source: DataSource,
    /// Fixed jitter seed for the synthetic fallback; the clock is used when unset.
    pub fallback_seed: Option<u64>,
}

impl AppState {
    pub fn from_config(cfg: &AppConfig) -> anyhow::Result<Self> {
        let agg = &cfg.aggregator;
        let aggregator = match &agg.api_key {
            Some(key) => {
                let client = BayouClient::new(
                    &agg.base_url(),
                    key.clone(),
                    agg.utility.clone(),
                    Duration::from_millis(agg.request_timeout_ms),
                )?;
                Some(Arc::new(client) as Arc<dyn Aggregator>)
            }
            None => {
                tracing::warn!("BAYOU_API_KEY not set; aggregator endpoints will fail");
                None
            }
        };

        let pred = &cfg.prediction;
        let prediction = match (pred.mode, &pred.api_key) {
            (DataSource::Live, Some(key)) => {
                let client = PalmettoClient::new(
                    &pred.base_url,
                    key.clone(),
                    pred.forecast_year,
                    Duration::from_millis(pred.request_timeout_ms),
                )?;
                Some(Arc::new(LivePrediction::new(client)) as Arc<dyn InsightSource>)
            }
            (DataSource::Live, None) => {
                tracing::warn!("PALMETTO_API_KEY not set; insight requests will fail");
                None
            }
            (DataSource::Synthetic, _) => None,
        };

        Ok(Self {
            aggregator,
            prediction,
            data_source: pred.mode,
            fallback_seed: None,
        })
    }

    pub(crate) fn aggregator(&self) -> Result<&dyn Aggregator> {
        self.aggregator.as_deref().ok_or(ApiError::NotConfigured("Bayou"))
    }

    /// The live source, `None` in synthetic mode; a missing key in live mode is an error.
    pub(crate) fn live_prediction(&self) -> Result<Option<&dyn InsightSource>> {
        match (self.data_source, self.prediction.as_deref()) {
            (DataSource::Synthetic, _) => Ok(None),
            (DataSource::Live, Some(source)) => Ok(Some(source)),
            (DataSource::Live, None) => Err(ApiError::NotConfigured("Palmetto")),
        }
    }

    pub(crate) fn fallback(&self) -> SyntheticFallback {
        self.fallback_seed
            .map(SyntheticFallback::with_seed)
            .unwrap_or_else(SyntheticFallback::from_clock)
    }
}

/// `?customerId=` as sent by the pages.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerQuery {
    pub customer_id: Option<String>,
}

impl CustomerQuery {
    pub(crate) fn require(&self) -> Result<&str> {
        self.customer_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| ApiError::BadRequest("Customer ID is required".to_string()))
    }
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/bayou/create-customer", post(bayou::create_customer))
        .route("/api/bayou/customer-status", get(bayou::customer_status))
        .route("/api/bayou/customer-data", get(bayou::customer_data))
        .route("/api/bayou/connect", post(bayou::advance_connect))
        .route("/api/palmetto/insights", post(insights::palmetto_insights))
        .route("/api/insights", get(insights::customer_insights))
        .route("/api/electricity-trends", get(views::electricity_trends))
        .route("/api/trends", post(views::trends_for_bills))
        .route("/api/rating", get(views::rating))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
