use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utility_client::domain::{Bill, Customer};

use super::{ApiError, AppState, CustomerQuery, Result};
use crate::{
    connect::{ConnectEvent, ConnectState},
    pipeline::{fetch_bills_when_ready, BillsFetch},
};

#[derive(Debug, Serialize)]
pub struct CustomerResponse {
    pub customer: Customer,
    pub connect: ConnectState,
}

impl From<Customer> for CustomerResponse {
    fn from(customer: Customer) -> Self {
        Self {
            connect: ConnectState::for_customer(&customer),
            customer,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BillsPayload {
    pub bills: Vec<Bill>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDataResponse {
    pub bayou_data: BillsPayload,
}

pub async fn create_customer(State(state): State<Arc<AppState>>) -> Result<Json<CustomerResponse>> {
    let customer = state.aggregator()?.create_customer().await?;
    let connect = match &customer.onboarding_link {
        Some(link) => ConnectState::NotStarted.transition(ConnectEvent::CustomerCreated {
            customer_id: customer.id.clone(),
            onboarding_link: link.clone(),
        })?,
        None => ConnectState::for_customer(&customer),
    };
    Ok(Json(CustomerResponse { customer, connect }))
}

#[derive(Debug, Deserialize)]
pub struct ConnectRequest {
    pub current: ConnectState,
    pub event: ConnectEvent,
}

#[derive(Debug, Serialize)]
pub struct ConnectResponse {
    pub connect: ConnectState,
}

/// Advance the connect page: form completed, status checked, failure, or continuing without an account.
pub async fn advance_connect(
    body: std::result::Result<Json<ConnectRequest>, JsonRejection>,
) -> Result<Json<ConnectResponse>> {
    let Json(ConnectRequest { current, event }) =
        body.map_err(|rejection| ApiError::BadRequest(format!("Invalid connect request: {}", rejection.body_text())))?;
    let connect = current.transition(event)?;
    tracing::debug!(?connect, "connect state advanced");
    Ok(Json(ConnectResponse { connect }))
}

pub async fn customer_status(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CustomerQuery>,
) -> Result<Json<CustomerResponse>> {
    let customer_id = query.require()?;
    let customer = state.aggregator()?.customer_status(customer_id).await?;
    Ok(Json(customer.into()))
}

pub async fn customer_data(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CustomerQuery>,
) -> Result<Json<CustomerDataResponse>> {
    let customer_id = query.require()?;
    match fetch_bills_when_ready(state.aggregator()?, customer_id).await? {
        BillsFetch::Ready(bills) => {
            tracing::info!(customer_id, bills = bills.len(), "fetched bills");
            Ok(Json(CustomerDataResponse {
                bayou_data: BillsPayload { bills },
            }))
        }
        BillsFetch::Processing => Err(ApiError::NotReady),
    }
}
