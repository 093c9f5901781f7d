use serde::Serialize;
use utility_client::domain::{watts_to_kilowatts, Bill};

/// Prior vs. current year consumption, in kilowatts.
///
/// `percent_change` is `None` when the prior year has no consumption to compare against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YoYComparison {
    pub total_prior_year_kw: f64,
    pub total_current_year_kw: f64,
    pub difference_kw: f64,
    pub percent_change: Option<f64>,
}

fn total_watts(bills: &[Bill]) -> f64 {
    bills.iter().map(|b| b.electricity_consumption).sum()
}

/// Totals are summed in watts and converted once at the end.
pub fn compare(prior: &[Bill], current: &[Bill]) -> YoYComparison {
    let prior_watts = total_watts(prior);
    let current_watts = total_watts(current);
    let difference = prior_watts - current_watts;

    let percent_change = (prior_watts != 0.0)
        .then(|| difference / prior_watts * 100.0)
        .filter(|p| p.is_finite());

    YoYComparison {
        total_prior_year_kw: watts_to_kilowatts(prior_watts),
        total_current_year_kw: watts_to_kilowatts(current_watts),
        difference_kw: watts_to_kilowatts(difference),
        percent_change,
    }
}
