use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    Json,
};
use serde::Deserialize;
use utility_client::domain::Bill;

use super::{ApiError, AppState, CustomerQuery, Result};
use crate::pipeline::{predict, FlowOutcome, InsightsFlow, Prediction};

const UNPARSEABLE_DATA: &str = "Could not parse utility data";

#[derive(Debug, Deserialize)]
pub struct BillsBody {
    pub bills: Vec<Bill>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightsRequest {
    pub bayou_data: Option<BillsBody>,
}

/// Predictions for bills the page already holds.
pub async fn palmetto_insights(
    State(state): State<Arc<AppState>>,
    body: std::result::Result<Json<InsightsRequest>, JsonRejection>,
) -> Result<Json<Prediction>> {
    let live = state.live_prediction()?;

    let bills = match body {
        Ok(Json(InsightsRequest {
            bayou_data: Some(data),
        })) => data.bills,
        Ok(_) => return Err(ApiError::BadRequest(UNPARSEABLE_DATA.to_string())),
        Err(rejection) => {
            tracing::debug!(error = %rejection, "rejected insights body");
            return Err(ApiError::BadRequest(UNPARSEABLE_DATA.to_string()));
        }
    };

    Ok(Json(predict(&bills, live, &state.fallback()).await))
}

/// Status, bills and prediction for a customer in one request.
pub async fn customer_insights(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CustomerQuery>,
) -> Result<Json<Prediction>> {
    let customer_id = query.require()?;
    let aggregator = state.aggregator()?;
    let live = state.live_prediction()?;

    let mut flow = InsightsFlow::new(aggregator, live, state.fallback());
    match flow.run(customer_id).await {
        FlowOutcome::Predicted(prediction) => Ok(Json(prediction)),
        FlowOutcome::NotReady => Err(ApiError::NotReady),
        FlowOutcome::AggregatorError(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;
    use serde_json::{json, Value};
    use utility_client::{fixtures, Aggregator};

    use super::*;
    use crate::{
        pipeline::{
            tests::{FakeAggregator, FixedPrediction},
            DataSource, InsightSource, FALLBACK_ADVISORY,
        },
        routes::tests::{serve, state},
    };

    fn live(result: std::result::Result<f64, u16>) -> Option<Arc<dyn InsightSource>> {
        Some(Arc::new(FixedPrediction(result)))
    }

    async fn post_insights(base: &str, body: String) -> reqwest::Response {
        reqwest::Client::new()
            .post(format!("{base}/api/palmetto/insights"))
            .header("content-type", "application/json")
            .body(body)
            .send()
            .await
            .unwrap()
    }

    fn bills_body() -> String {
        json!({ "bayouData": { "bills": fixtures::current_year().unwrap() } }).to_string()
    }

    #[tokio::test]
    async fn live_predictions_are_returned() {
        let base = serve(state(None, live(Ok(640.0)))).await;

        let resp = post_insights(&base, bills_body()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["insights"], json!({ "January": 640.0 }));
        assert_eq!(body["annualTotal"], 640.0);
        assert_eq!(body["source"], "live");
        assert!(body.get("error").is_none());
    }

    #[tokio::test]
    async fn upstream_failure_serves_sample_data() {
        let base = serve(state(None, live(Err(500)))).await;

        let body: Value = post_insights(&base, bills_body()).await.json().await.unwrap();
        assert_eq!(body["source"], "synthetic");
        assert_eq!(body["error"], FALLBACK_ADVISORY);
        assert_eq!(body["insights"].as_object().map(|m| m.len()), Some(12));
    }

    #[tokio::test]
    async fn unparseable_bodies_are_rejected() {
        let base = serve(state(None, live(Ok(1.0)))).await;

        for body in ["not json".to_string(), json!({ "bills": [] }).to_string()] {
            let resp = post_insights(&base, body).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
            let body: Value = resp.json().await.unwrap();
            assert_eq!(body["error"], "Could not parse utility data");
        }
    }

    #[tokio::test]
    async fn live_mode_without_key_is_a_configuration_error() {
        let base = serve(state(None, None)).await;

        let resp = post_insights(&base, bills_body()).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["error"], "Palmetto API key is not configured");
    }

    #[tokio::test]
    async fn synthetic_mode_needs_no_key() {
        let mut app = state(None, None);
        app.data_source = DataSource::Synthetic;
        let base = serve(app).await;

        let body: Value = post_insights(&base, bills_body()).await.json().await.unwrap();
        assert_eq!(body["source"], "synthetic");
        assert!(body.get("error").is_none());
    }

    #[tokio::test]
    async fn customer_flow_runs_end_to_end() {
        let aggregator: Arc<dyn Aggregator> = Arc::new(FakeAggregator::new(true));
        let base = serve(state(Some(aggregator), live(Ok(900.0)))).await;

        let body: Value = reqwest::get(format!("{base}/api/insights?customerId=77"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["annualTotal"], 900.0);
    }

    #[tokio::test]
    async fn customer_flow_reports_processing() {
        let aggregator: Arc<dyn Aggregator> = Arc::new(FakeAggregator::new(false));
        let base = serve(state(Some(aggregator), live(Ok(900.0)))).await;

        let resp = reqwest::get(format!("{base}/api/insights?customerId=77")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::ACCEPTED);
    }
}
