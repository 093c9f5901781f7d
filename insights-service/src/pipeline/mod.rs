use serde::{Deserialize, Serialize};
use utility_client::{
    domain::{Bill, MonthlyPredictions},
    Aggregator, ClientError, ErrorKind, PalmettoClient,
};

use crate::transform::SyntheticFallback;

pub const FALLBACK_ADVISORY: &str = "Could not get real insights, showing sample data";

/// Where monthly predictions come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    #[default]
    Live,
    Synthetic,
}

#[async_trait::async_trait]
pub trait InsightSource: Send + Sync {
    async fn monthly_predictions(&self, bills: &[Bill]) -> Result<MonthlyPredictions, ClientError>;
}

/// Predictions from the external energy-model service.
pub struct LivePrediction {
    client: PalmettoClient,
}

impl LivePrediction {
    pub fn new(client: PalmettoClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl InsightSource for LivePrediction {
    async fn monthly_predictions(&self, bills: &[Bill]) -> Result<MonthlyPredictions, ClientError> {
        self.client.calculate(bills).await
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    pub insights: MonthlyPredictions,
    pub annual_total: f64,
    pub source: DataSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
}

impl Prediction {
    fn new(insights: MonthlyPredictions, source: DataSource) -> Self {
        Self {
            annual_total: insights.annual_total(),
            insights,
            source,
            error: None,
            error_kind: None,
        }
    }
}

/// Ask `live` for predictions; on any failure (or with no live source) use `fallback`.
///
/// Never fails: a failed live call is reported through `error` alongside synthetic data.
pub async fn predict(bills: &[Bill], live: Option<&dyn InsightSource>, fallback: &SyntheticFallback) -> Prediction {
    let Some(live) = live else {
        return Prediction::new(fallback.generate(), DataSource::Synthetic);
    };

    match live.monthly_predictions(bills).await {
        Ok(insights) => Prediction::new(insights, DataSource::Live),
        Err(e) => {
            tracing::warn!(error = %e, kind = ?e.kind(), "prediction failed, serving synthetic data");
            metrics::counter!("prediction_fallback_total").increment(1);
            Prediction {
                error: Some(FALLBACK_ADVISORY.to_string()),
                error_kind: Some(e.kind()),
                ..Prediction::new(fallback.generate(), DataSource::Synthetic)
            }
        }
    }
}

#[derive(Debug)]
pub enum BillsFetch {
    Ready(Vec<Bill>),
    /// The aggregator is still processing; no bills were requested.
    Processing,
}

/// Check status first and fetch bills only once the aggregator reports them ready.
pub async fn fetch_bills_when_ready(aggregator: &dyn Aggregator, customer_id: &str) -> Result<BillsFetch, ClientError> {
    let customer = aggregator.customer_status(customer_id).await?;
    if !customer.bills_ready() {
        tracing::info!(customer_id, state = ?customer.state(), "bills not ready yet");
        return Ok(BillsFetch::Processing);
    }
    Ok(BillsFetch::Ready(aggregator.bills(customer_id).await?))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowState {
    Idle,
    FetchingAggregatorData,
    AggregatorReady,
    AggregatorNotReady,
    AggregatorError,
    RequestingPrediction,
    PredictionReady,
    PredictionFailed,
    FallbackData,
}

#[derive(Debug)]
pub enum FlowOutcome {
    Predicted(Prediction),
    NotReady,
    AggregatorError(ClientError),
}

/// Customer id in, monthly predictions out:
/// `Idle → FetchingAggregatorData → {AggregatorReady → RequestingPrediction → {PredictionReady |
/// PredictionFailed → FallbackData} | AggregatorNotReady | AggregatorError}`.
pub struct InsightsFlow<'a> {
    aggregator: &'a dyn Aggregator,
    live: Option<&'a dyn InsightSource>,
    fallback: SyntheticFallback,
    state: FlowState,
}

impl<'a> InsightsFlow<'a> {
    pub fn new(aggregator: &'a dyn Aggregator, live: Option<&'a dyn InsightSource>, fallback: SyntheticFallback) -> Self {
        Self {
            aggregator,
            live,
            fallback,
            state: FlowState::Idle,
        }
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    fn enter(&mut self, next: FlowState) {
        tracing::debug!(from = ?self.state, to = ?next, "insights flow transition");
        self.state = next;
    }

    pub async fn run(&mut self, customer_id: &str) -> FlowOutcome {
        self.enter(FlowState::FetchingAggregatorData);

        let bills = match fetch_bills_when_ready(self.aggregator, customer_id).await {
            Ok(BillsFetch::Ready(bills)) => bills,
            Ok(BillsFetch::Processing) => {
                self.enter(FlowState::AggregatorNotReady);
                return FlowOutcome::NotReady;
            }
            Err(e) => {
                tracing::error!(error = %e, customer_id, "aggregator request failed");
                self.enter(FlowState::AggregatorError);
                return FlowOutcome::AggregatorError(e);
            }
        };
        self.enter(FlowState::AggregatorReady);

        self.enter(FlowState::RequestingPrediction);
        let prediction = predict(&bills, self.live, &self.fallback).await;
        if prediction.error.is_some() {
            self.enter(FlowState::PredictionFailed);
            self.enter(FlowState::FallbackData);
        } else {
            self.enter(FlowState::PredictionReady);
        }

        FlowOutcome::Predicted(prediction)
    }
}
