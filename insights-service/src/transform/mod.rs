//! Local computations over bills: reshaping for charts, year-over-year totals,
//! the trend line, the placeholder rating and synthetic predictions.

pub mod chart;
pub mod rating;
pub mod report;
pub mod synthetic;
pub mod trend;
pub mod yoy;

use time::macros::date;
use utility_client::domain::Bill;

pub use chart::{to_chart_points, ChartPoint};
pub use rating::{Rating, RatingReport};
pub use report::TrendsReport;
pub use synthetic::SyntheticFallback;
pub use trend::{TrendLine, TrendPoint};
pub use yoy::YoYComparison;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum TransformError {
    #[error("a trend line needs at least two points, got {0}")]
    InsufficientPoints(usize),
    #[error("bill {0}: consumption must be non-negative")]
    NegativeConsumption(u64),
    #[error("bill {0}: billing period ends before it starts")]
    InvertedPeriod(u64),
    #[error("bill {0}: billing period out of allowed range")]
    PeriodOutOfRange(u64),
}

/// Pure validation of a `Bill` supplied by a caller.
///
/// Rules:
/// - consumption must be non-negative.
/// - the billing period must not end before it starts.
/// - the period start must be within a broad sanity window [2000-01-01, 2100-01-01].
pub fn validate_bill(bill: &Bill) -> Result<(), TransformError> {
    if bill.electricity_consumption < 0.0 {
        return Err(TransformError::NegativeConsumption(bill.id));
    }

    if bill.billing_period_to < bill.billing_period_from {
        return Err(TransformError::InvertedPeriod(bill.id));
    }

    let min = date!(2000 - 01 - 01);
    let max = date!(2100 - 01 - 01);

    if bill.billing_period_from < min || bill.billing_period_from > max {
        return Err(TransformError::PeriodOutOfRange(bill.id));
    }

    Ok(())
}

pub fn validate_bills(bills: &[Bill]) -> Result<(), TransformError> {
    for bill in bills {
        if let Err(e) = validate_bill(bill) {
            metrics::counter!("validation_bills_rejected_total").increment(1);
            return Err(e);
        }
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use time::Date;

    pub(crate) fn bill(id: u64, from: Date, watts: f64) -> Bill {
        Bill {
            id,
            billed_on: from,
            billing_period_from: from,
            billing_period_to: from,
            electricity_consumption: watts,
            electricity_amount: 0.0,
            delivery_charge: 0.0,
            supply_charge: 0.0,
            total_amount: 0.0,
            meters: Vec::new(),
        }
    }

    #[test]
    fn bill_validation_accepts_valid_record() {
        assert!(validate_bill(&bill(1, date!(2023 - 03 - 24), 268_851.0)).is_ok());
    }

    #[test]
    fn bill_validation_rejects_negative_consumption() {
        let res = validate_bill(&bill(7, date!(2023 - 03 - 24), -1.0));
        assert_eq!(res, Err(TransformError::NegativeConsumption(7)));
    }

    #[test]
    fn bill_validation_rejects_inverted_and_out_of_range_periods() {
        let mut inverted = bill(2, date!(2023 - 03 - 24), 1.0);
        inverted.billing_period_to = date!(2023 - 03 - 01);
        assert_eq!(validate_bill(&inverted), Err(TransformError::InvertedPeriod(2)));

        let ancient = bill(3, date!(1800 - 01 - 01), 1.0);
        assert_eq!(validate_bills(&[ancient]), Err(TransformError::PeriodOutOfRange(3)));
    }
}
