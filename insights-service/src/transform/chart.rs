use serde::Serialize;
use time::Date;
use utility_client::domain::{watts_to_kilowatts, Bill, CalendarMonth};

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// A bill reshaped for charting: kilowatts and a short month label.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    pub id: u64,
    pub month: &'static str,
    #[serde(with = "iso_date")]
    pub period_start: Date,
    #[serde(with = "iso_date")]
    pub period_end: Date,
    /// Kilowatts.
    pub consumption: f64,
    pub amount: f64,
    pub total: f64,
}

impl From<&Bill> for ChartPoint {
    fn from(bill: &Bill) -> Self {
        Self {
            id: bill.id,
            month: CalendarMonth::from(bill.billing_period_from.month()).short_name(),
            period_start: bill.billing_period_from,
            period_end: bill.billing_period_to,
            consumption: watts_to_kilowatts(bill.electricity_consumption),
            amount: bill.electricity_amount,
            total: bill.total_amount,
        }
    }
}

/// One chart point per bill, ascending by billing period start.
///
/// The sort is stable, so bills sharing a start date keep their input order.
pub fn to_chart_points(bills: &[Bill]) -> Vec<ChartPoint> {
    let mut sorted: Vec<&Bill> = bills.iter().collect();
    sorted.sort_by_key(|bill| bill.billing_period_from);
    sorted.into_iter().map(ChartPoint::from).collect()
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use time::macros::date;
    use utility_client::fixtures;

    use super::*;
    use crate::transform::tests::bill;

    #[test]
    fn sorts_by_period_start_and_converts_to_kilowatts() {
        let bills = fixtures::current_year().unwrap();
        let points = to_chart_points(&bills);

        assert_eq!(points.len(), bills.len());
        assert!(points.windows(2).all(|w| w[0].period_start <= w[1].period_start));
        assert_eq!(points[0].id, 143493);
        assert_eq!(points[0].month, "Mar");
        assert_eq!(points[0].period_start, date!(2023 - 03 - 24));
        assert_relative_eq!(points[0].consumption, 268.851);
        assert_eq!(points.last().map(|p| p.month), Some("Nov"));
    }

    #[test]
    fn total_kilowatts_match_total_watts() {
        let bills = fixtures::prior_year().unwrap();
        let kw: f64 = to_chart_points(&bills).iter().map(|p| p.consumption).sum();
        let watts: f64 = bills.iter().map(|b| b.electricity_consumption).sum();
        assert_relative_eq!(kw, watts / 1000.0, epsilon = 1e-9);
    }

    #[test]
    fn reshaping_sorted_input_is_a_no_op() {
        let bills = vec![
            bill(3, date!(2023 - 03 - 01), 3000.0),
            bill(1, date!(2023 - 01 - 01), 1000.0),
            bill(2, date!(2023 - 02 - 01), 2000.0),
        ];
        let once = to_chart_points(&bills);
        let ids: Vec<u64> = once.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);

        let mut resorted = bills.clone();
        resorted.sort_by_key(|b| b.billing_period_from);
        assert_eq!(to_chart_points(&resorted), once);
    }

    #[test]
    fn serializes_with_camel_case_and_iso_dates() {
        let point = ChartPoint::from(&bill(9, date!(2023 - 07 - 25), 262_057.0));
        let json = serde_json::to_value(&point).unwrap();
        assert_eq!(json["periodStart"], "2023-07-25");
        assert_eq!(json["month"], "Jul");
        assert_eq!(json["consumption"], 262.057);
    }

    #[test]
    fn empty_input_gives_empty_output() {
        assert!(to_chart_points(&[]).is_empty());
    }
}
