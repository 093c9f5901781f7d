//! Sample bills for one service address, used when no account is connected.
//!
//! The 2022 set is uniformly 50 kWh per period higher than 2023, so the
//! year-over-year view shows an improvement.

use crate::{domain::Bill, error::ClientError};

const BILLS_2022: &str = include_str!("../fixtures/bills_2022.json");
const BILLS_2023: &str = include_str!("../fixtures/bills_2023.json");

fn decode(raw: &str, name: &str) -> Result<Vec<Bill>, ClientError> {
    serde_json::from_str(raw).map_err(|e| ClientError::Contract(format!("invalid {name} fixture: {e}")))
}

/// Prior-year sample bills.
pub fn prior_year() -> Result<Vec<Bill>, ClientError> {
    decode(BILLS_2022, "2022")
}

/// Current-year sample bills.
pub fn current_year() -> Result<Vec<Bill>, ClientError> {
    decode(BILLS_2023, "2023")
}
