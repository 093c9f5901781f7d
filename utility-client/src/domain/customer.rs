use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

/// Opaque aggregator customer identifier. The aggregator may emit it as a number or a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "RawCustomerId")]
pub struct CustomerId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCustomerId {
    Text(String),
    Number(u64),
}

impl From<RawCustomerId> for CustomerId {
    fn from(raw: RawCustomerId) -> Self {
        match raw {
            RawCustomerId::Text(s) => Self(s),
            RawCustomerId::Number(n) => Self(n.to_string()),
        }
    }
}

impl CustomerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for CustomerId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// Customer record as returned by the aggregator on creation and on status checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    #[serde(default)]
    pub onboarding_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_filled_credentials: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bills_are_ready: Option<bool>,
}

/// Lifecycle of an aggregator customer: `Created → AwaitingCredentials → BillsProcessing → BillsReady`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerState {
    Created,
    AwaitingCredentials,
    BillsProcessing,
    BillsReady,
}

impl Customer {
    pub fn bills_ready(&self) -> bool {
        self.bills_are_ready.unwrap_or(false)
    }

    pub fn state(&self) -> CustomerState {
        match (self.has_filled_credentials, self.bills_are_ready) {
            (_, Some(true)) => CustomerState::BillsReady,
            (Some(true), _) => CustomerState::BillsProcessing,
            (Some(false), _) => CustomerState::AwaitingCredentials,
            (None, _) => CustomerState::Created,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_and_string_ids_decode() {
        let numeric: Customer =
            serde_json::from_str(r#"{"id": 42, "onboarding_link": "https://example.test/onboard"}"#).unwrap();
        assert_eq!(numeric.id.as_str(), "42");
        assert_eq!(numeric.state(), CustomerState::Created);

        let text: Customer = serde_json::from_str(r#"{"id": "cus_1"}"#).unwrap();
        assert_eq!(text.id, CustomerId::new("cus_1"));
        assert_eq!(text.onboarding_link, None);
    }

    #[test]
    fn state_follows_status_flags() {
        let mut customer = Customer {
            id: CustomerId::new("1"),
            onboarding_link: None,
            has_filled_credentials: Some(false),
            bills_are_ready: Some(false),
        };
        assert_eq!(customer.state(), CustomerState::AwaitingCredentials);
        assert!(!customer.bills_ready());

        customer.has_filled_credentials = Some(true);
        assert_eq!(customer.state(), CustomerState::BillsProcessing);

        customer.bills_are_ready = Some(true);
        assert_eq!(customer.state(), CustomerState::BillsReady);
        assert!(customer.bills_ready());
    }
}
