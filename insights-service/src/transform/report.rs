use serde::Serialize;
use utility_client::domain::Bill;

use super::{to_chart_points, trend, yoy, ChartPoint, TransformError, TrendLine, TrendPoint, YoYComparison};

/// Everything the electricity-trends page draws for two years of bills.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendsReport {
    /// Service address from the first electric meter of the current year, if any.
    pub address: Option<String>,
    pub current_year: Vec<TrendPoint>,
    pub prior_year: Vec<ChartPoint>,
    pub trend_line: TrendLine,
    pub year_over_year: YoYComparison,
}

pub fn service_address(bills: &[Bill]) -> Option<String> {
    bills
        .iter()
        .flat_map(Bill::electric_meters)
        .find_map(|meter| meter.address.as_ref())
        .map(ToString::to_string)
}

impl TrendsReport {
    /// The trend line is fitted over the current year only.
    pub fn build(prior: &[Bill], current: &[Bill]) -> Result<Self, TransformError> {
        let (trend_line, current_year) = trend::fit(to_chart_points(current))?;
        Ok(Self {
            address: service_address(current),
            current_year,
            prior_year: to_chart_points(prior),
            trend_line,
            year_over_year: yoy::compare(prior, current),
        })
    }
}
