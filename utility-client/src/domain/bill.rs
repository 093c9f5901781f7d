use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use time::Date;

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// Source readings are reported in watts; everything downstream works in kilowatts.
pub const WATTS_PER_KILOWATT: f64 = 1000.0;

/// Convert a watt reading to kilowatts. This is the only place the factor is applied.
pub fn watts_to_kilowatts(watts: f64) -> f64 {
    watts / WATTS_PER_KILOWATT
}

/// Absent and `null` amounts both read as zero.
fn zero_if_null<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or_default())
}

/// One billing period as returned by the aggregator.
///
/// Dates must be `YYYY-MM-DD`; anything else is rejected while decoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bill {
    pub id: u64,
    #[serde(with = "iso_date")]
    pub billed_on: Date,
    #[serde(with = "iso_date")]
    pub billing_period_from: Date,
    #[serde(with = "iso_date")]
    pub billing_period_to: Date,
    /// Watts.
    #[serde(default, deserialize_with = "zero_if_null")]
    pub electricity_consumption: f64,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub electricity_amount: f64,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub delivery_charge: f64,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub supply_charge: f64,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub total_amount: f64,
    #[serde(default)]
    pub meters: Vec<Meter>,
}

impl Bill {
    /// Electric meters on the bill, in the order the aggregator listed them.
    pub fn electric_meters(&self) -> impl Iterator<Item = &Meter> {
        self.meters.iter().filter(|m| m.kind == MeterType::Electric)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeterType {
    Electric,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meter {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: MeterType,
    #[serde(default, with = "iso_date::option")]
    pub billing_period_from: Option<Date>,
    #[serde(default, with = "iso_date::option")]
    pub billing_period_to: Option<Date>,
    /// Watts.
    #[serde(default, deserialize_with = "zero_if_null")]
    pub consumption: f64,
    #[serde(default)]
    pub address: Option<Address>,
}

impl Meter {
    /// Billing period of this meter, if the aggregator reported both ends.
    pub fn billing_period(&self) -> Option<(Date, Date)> {
        Some((self.billing_period_from?, self.billing_period_to?))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub line_1: String,
    #[serde(default)]
    pub line_2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.line_1)?;
        if let Some(line_2) = self.line_2.as_deref().filter(|l| !l.is_empty()) {
            write!(f, " {line_2}")?;
        }
        write!(f, ", {}, {} {}", self.city, self.state, self.postal_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    const BILL_JSON: &str = r#"{
        "id": 143485,
        "billed_on": "2023-12-29",
        "billing_period_from": "2023-11-22",
        "billing_period_to": "2023-12-21",
        "electricity_consumption": 240903,
        "electricity_amount": 7688,
        "delivery_charge": 4522,
        "supply_charge": 3166,
        "total_amount": 7688,
        "meters": [
            {
                "id": "2000",
                "type": "gas",
                "consumption": 12
            },
            {
                "id": "1005012345",
                "type": "electric",
                "billing_period_from": "2023-11-22",
                "billing_period_to": "2023-12-21",
                "consumption": 240903,
                "address": {
                    "line_1": "123 Street Rd",
                    "line_2": null,
                    "city": "San Francisco",
                    "state": "CA",
                    "postal_code": "94102"
                }
            }
        ]
    }"#;

    #[test]
    fn decodes_aggregator_bill() {
        let bill: Bill = serde_json::from_str(BILL_JSON).unwrap();
        assert_eq!(bill.billing_period_from, date!(2023 - 11 - 22));
        assert_eq!(bill.meters[0].kind, MeterType::Other);

        let electric = bill.electric_meters().next().unwrap();
        assert_eq!(electric.id, "1005012345");
        assert_eq!(
            electric.billing_period(),
            Some((date!(2023 - 11 - 22), date!(2023 - 12 - 21)))
        );
    }

    #[test]
    fn rejects_malformed_period_date() {
        let broken = BILL_JSON.replacen("2023-11-22", "22/11/2023", 1);
        assert!(serde_json::from_str::<Bill>(&broken).is_err());
    }

    #[test]
    fn null_amounts_read_as_zero() {
        let json = r#"{
            "id": 9,
            "billed_on": "2023-04-01",
            "billing_period_from": "2023-03-01",
            "billing_period_to": "2023-03-31",
            "electricity_consumption": null,
            "total_amount": null,
            "meters": [{ "id": "1", "type": "electric", "consumption": null }]
        }"#;
        let bill: Bill = serde_json::from_str(json).unwrap();
        assert_eq!(bill.electricity_consumption, 0.0);
        assert_eq!(bill.total_amount, 0.0);
        assert_eq!(bill.electricity_amount, 0.0);
        assert_eq!(bill.meters[0].consumption, 0.0);
    }

    #[test]
    fn address_formats_with_and_without_second_line() {
        let mut address = Address {
            line_1: "123 Street Rd".to_string(),
            line_2: None,
            city: "San Francisco".to_string(),
            state: "CA".to_string(),
            postal_code: "94102".to_string(),
        };
        assert_eq!(address.to_string(), "123 Street Rd, San Francisco, CA 94102");

        address.line_2 = Some("Apt 4".to_string());
        assert_eq!(address.to_string(), "123 Street Rd Apt 4, San Francisco, CA 94102");
    }

    #[test]
    fn watts_convert_to_kilowatts() {
        assert_eq!(watts_to_kilowatts(240_903.0), 240.903);
    }
}
