use axum::{
    extract::{rejection::JsonRejection, Query},
    Json,
};
use serde::Deserialize;
use utility_client::{domain::Bill, fixtures};

use super::{ApiError, Result};
use crate::transform::{rating, validate_bills, RatingReport, TrendsReport};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    pub customer_id: Option<String>,
    pub address: Option<String>,
}

impl PageQuery {
    fn address(&self) -> Option<&str> {
        self.address.as_deref().filter(|a| !a.trim().is_empty())
    }
}

/// Trends over the bundled sample years; a caller-supplied address replaces the sample one.
pub async fn electricity_trends(Query(query): Query<PageQuery>) -> Result<Json<TrendsReport>> {
    let prior = fixtures::prior_year()?;
    let current = fixtures::current_year()?;

    let mut report = TrendsReport::build(&prior, &current)?;
    if let Some(address) = query.address() {
        report.address = Some(address.to_string());
    }
    tracing::debug!(customer_id = ?query.customer_id, "served sample trends");
    Ok(Json(report))
}

#[derive(Debug, Deserialize)]
pub struct TrendsRequest {
    pub prior: Vec<Bill>,
    pub current: Vec<Bill>,
}

/// Trends over caller-supplied bills, validated first.
pub async fn trends_for_bills(
    body: std::result::Result<Json<TrendsRequest>, JsonRejection>,
) -> Result<Json<TrendsReport>> {
    let Json(request) =
        body.map_err(|rejection| ApiError::BadRequest(format!("Could not parse bills: {}", rejection.body_text())))?;
    validate_bills(&request.prior)?;
    validate_bills(&request.current)?;
    Ok(Json(TrendsReport::build(&request.prior, &request.current)?))
}

pub async fn rating(Query(query): Query<PageQuery>) -> Json<RatingReport> {
    let customer_id = query.customer_id.as_deref().filter(|id| !id.trim().is_empty());
    let score = rating::estimate(query.address(), customer_id);
    Json(RatingReport::new(score, customer_id.is_some()))
}
