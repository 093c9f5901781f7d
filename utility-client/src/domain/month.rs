use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Calendar month used as a label for charts and monthly predictions.
///
/// Variant order is calendar order, so maps keyed by month iterate January first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CalendarMonth {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl CalendarMonth {
    pub const ALL: [CalendarMonth; 12] = [
        Self::January,
        Self::February,
        Self::March,
        Self::April,
        Self::May,
        Self::June,
        Self::July,
        Self::August,
        Self::September,
        Self::October,
        Self::November,
        Self::December,
    ];

    pub fn full_name(self) -> &'static str {
        match self {
            Self::January => "January",
            Self::February => "February",
            Self::March => "March",
            Self::April => "April",
            Self::May => "May",
            Self::June => "June",
            Self::July => "July",
            Self::August => "August",
            Self::September => "September",
            Self::October => "October",
            Self::November => "November",
            Self::December => "December",
        }
    }

    pub fn short_name(self) -> &'static str {
        &self.full_name()[..3]
    }

    /// Zero-based position in the year (January = 0).
    pub fn index(self) -> usize {
        self as usize
    }
}

impl From<time::Month> for CalendarMonth {
    fn from(month: time::Month) -> Self {
        Self::ALL[usize::from(u8::from(month)) - 1]
    }
}

/// Predicted consumption (kWh) per calendar month.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MonthlyPredictions(BTreeMap<CalendarMonth, f64>);

impl MonthlyPredictions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the value for `month`, replacing any earlier one.
    pub fn insert(&mut self, month: CalendarMonth, kwh: f64) {
        self.0.insert(month, kwh);
    }

    pub fn get(&self, month: CalendarMonth) -> Option<f64> {
        self.0.get(&month).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Months in calendar order.
    pub fn iter(&self) -> impl Iterator<Item = (CalendarMonth, f64)> + '_ {
        self.0.iter().map(|(month, kwh)| (*month, *kwh))
    }

    pub fn annual_total(&self) -> f64 {
        self.0.values().sum()
    }
}

impl FromIterator<(CalendarMonth, f64)> for MonthlyPredictions {
    fn from_iter<I: IntoIterator<Item = (CalendarMonth, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_from_time_month() {
        assert_eq!(CalendarMonth::from(time::Month::January), CalendarMonth::January);
        assert_eq!(CalendarMonth::from(time::Month::December), CalendarMonth::December);
        assert_eq!(CalendarMonth::September.short_name(), "Sep");
        assert_eq!(CalendarMonth::May.short_name(), "May");
    }

    #[test]
    fn predictions_serialize_as_month_keyed_object_in_calendar_order() {
        let predictions: MonthlyPredictions = [
            (CalendarMonth::March, 900.0),
            (CalendarMonth::January, 1300.0),
        ]
        .into_iter()
        .collect();

        let json = serde_json::to_string(&predictions).unwrap();
        assert_eq!(json, r#"{"January":1300.0,"March":900.0}"#);
        assert_eq!(predictions.annual_total(), 2200.0);

        let back: MonthlyPredictions = serde_json::from_str(&json).unwrap();
        assert_eq!(back, predictions);
    }
}
