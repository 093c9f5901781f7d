//! Prediction adapter: turns bills into a building-energy-model request and flattens
//! the monthly intervals it returns.

use std::time::Duration;

use reqwest::Url;
use serde::{Deserialize, Serialize};
use time::{macros::format_description, Date};

use crate::{
    domain::{watts_to_kilowatts, Bill, CalendarMonth, MonthlyPredictions},
    error::ClientError,
    http::{build_client, join_segments, parse_base_url, read_json},
};

pub const DEFAULT_BASE_URL: &str = "https://ei.palmetto.com/api/v0";
pub const ELECTRICITY_CONSUMPTION: &str = "consumption.electricity";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalculateRequest {
    pub parameters: Parameters,
    pub location: Location,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consumption: Option<Consumption>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameters {
    pub from_datetime: String,
    pub to_datetime: String,
    pub variables: Vec<String>,
    pub group_by: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Consumption {
    pub actuals: Vec<Actual>,
}

/// One observed billing period, in kWh.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Actual {
    pub from_datetime: String,
    pub to_datetime: String,
    pub variable: String,
    pub value: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CalculateResponse {
    #[serde(default)]
    pub data: Option<ResponseData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseData {
    #[serde(default)]
    pub intervals: Option<Vec<Interval>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Interval {
    pub from_datetime: String,
    pub value: f64,
}

fn start_of_day(date: Date) -> String {
    format!("{date}T00:00:00")
}

/// Build the request for `bills`.
///
/// The address comes from the first bill's first electric meter that carries one. Each bill with
/// positive consumption contributes one actual, keyed by the billing period of its first electric
/// meter that reports both ends of the period.
pub fn build_request(bills: &[Bill], forecast_year: i32) -> Result<CalculateRequest, ClientError> {
    let first = bills
        .first()
        .ok_or_else(|| ClientError::Incomplete("no bills to build a prediction from".to_string()))?;

    let address = first
        .electric_meters()
        .find_map(|m| m.address.as_ref())
        .ok_or_else(|| ClientError::Incomplete("no electric meter with a service address".to_string()))?;

    let actuals: Vec<Actual> = bills
        .iter()
        .filter(|bill| bill.electricity_consumption > 0.0)
        .filter_map(|bill| {
            let (from, to) = bill.electric_meters().find_map(|m| m.billing_period())?;
            Some(Actual {
                from_datetime: start_of_day(from),
                to_datetime: start_of_day(to),
                variable: ELECTRICITY_CONSUMPTION.to_string(),
                value: watts_to_kilowatts(bill.electricity_consumption),
            })
        })
        .collect();

    Ok(CalculateRequest {
        parameters: Parameters {
            from_datetime: format!("{forecast_year}-01-01T00:00:00"),
            to_datetime: format!("{forecast_year}-12-31T23:59:59"),
            variables: vec![ELECTRICITY_CONSUMPTION.to_string()],
            group_by: "month".to_string(),
        },
        location: Location {
            address: address.to_string(),
        },
        consumption: (!actuals.is_empty()).then_some(Consumption { actuals }),
    })
}

/// Flatten the returned intervals into a month-keyed map. A later interval in the same month
/// replaces an earlier one; a response without intervals yields an empty map.
pub fn parse_response(response: CalculateResponse) -> Result<MonthlyPredictions, ClientError> {
    let intervals = response.data.and_then(|d| d.intervals).unwrap_or_default();
    let date_format = format_description!("[year]-[month]-[day]");

    let mut predictions = MonthlyPredictions::new();
    for interval in intervals {
        let date = interval
            .from_datetime
            .get(..10)
            .and_then(|prefix| Date::parse(prefix, &date_format).ok())
            .ok_or_else(|| {
                ClientError::Contract(format!("interval start '{}' is not a date", interval.from_datetime))
            })?;
        predictions.insert(CalendarMonth::from(date.month()), interval.value);
    }
    Ok(predictions)
}

pub struct PalmettoClient {
    inner: reqwest::Client,
    calculate_url: Url,
    api_key: String,
    forecast_year: i32,
}

impl PalmettoClient {
    pub fn new(
        base_url: &str,
        api_key: impl Into<String>,
        forecast_year: i32,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let base = parse_base_url(base_url)?;
        Ok(Self {
            inner: build_client(timeout)?,
            calculate_url: join_segments(&base, &["bem", "calculate"]),
            api_key: api_key.into(),
            forecast_year,
        })
    }

    /// Request a monthly consumption forecast for the address on `bills`.
    pub async fn calculate(&self, bills: &[Bill]) -> Result<MonthlyPredictions, ClientError> {
        let request = build_request(bills, self.forecast_year)?;
        let actuals = request.consumption.as_ref().map_or(0, |c| c.actuals.len());

        metrics::counter!("prediction_requests_total").increment(1);
        let response = self
            .inner
            .post(self.calculate_url.clone())
            .header("X-API-Key", &self.api_key)
            .json(&request)
            .send()
            .await?;
        let predictions = parse_response(read_json(response).await?)?;

        tracing::info!(actuals, months = predictions.len(), "prediction received");
        Ok(predictions)
    }
}
