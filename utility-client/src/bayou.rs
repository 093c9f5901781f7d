//! Aggregator adapter: customer onboarding and bill retrieval.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::{
    domain::{Bill, Customer},
    error::ClientError,
    http::{build_client, join_segments, parse_base_url, read_json},
};

pub const DEFAULT_DOMAIN: &str = "staging.bayou.energy";
pub const DEFAULT_UTILITY: &str = "pacific_gas_and_electric";

/// `https://{domain}/api/v2`
pub fn base_url_for_domain(domain: &str) -> String {
    format!("https://{domain}/api/v2")
}

/// Operations the service needs from a utility-data aggregator.
///
/// None of these block waiting for the customer; callers poll [`Aggregator::customer_status`]
/// until bills are ready and only then call [`Aggregator::bills`].
#[async_trait::async_trait]
pub trait Aggregator: Send + Sync {
    async fn create_customer(&self) -> Result<Customer, ClientError>;

    async fn customer_status(&self, customer_id: &str) -> Result<Customer, ClientError>;

    async fn bills(&self, customer_id: &str) -> Result<Vec<Bill>, ClientError>;
}

#[derive(Serialize)]
struct CreateCustomerRequest<'a> {
    utility: &'a str,
    email: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BillsResponse {
    Wrapped { bills: Vec<Bill> },
    Bare(Vec<Bill>),
}

pub struct BayouClient {
    inner: reqwest::Client,
    base_url: Url,
    api_key: String,
    utility: String,
}

impl BayouClient {
    pub fn new(
        base_url: &str,
        api_key: impl Into<String>,
        utility: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        Ok(Self {
            inner: build_client(timeout)?,
            base_url: parse_base_url(base_url)?,
            api_key: api_key.into(),
            utility: utility.into(),
        })
    }

    fn placeholder_email() -> String {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        format!("user_{millis}@example.com")
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, segments: &[&str]) -> Result<T, ClientError> {
        let url = join_segments(&self.base_url, segments);
        let response = self
            .inner
            .get(url)
            .basic_auth(&self.api_key, Some(""))
            .send()
            .await?;
        read_json(response).await
    }
}

#[async_trait::async_trait]
impl Aggregator for BayouClient {
    async fn create_customer(&self) -> Result<Customer, ClientError> {
        metrics::counter!("aggregator_requests_total", "operation" => "create_customer").increment(1);

        let body = CreateCustomerRequest {
            utility: &self.utility,
            email: Self::placeholder_email(),
        };
        let response = self
            .inner
            .post(join_segments(&self.base_url, &["customers"]))
            .basic_auth(&self.api_key, Some(""))
            .json(&body)
            .send()
            .await?;
        let customer: Customer = read_json(response).await?;

        tracing::info!(customer_id = %customer.id, utility = %self.utility, "aggregator customer created");
        Ok(customer)
    }

    async fn customer_status(&self, customer_id: &str) -> Result<Customer, ClientError> {
        metrics::counter!("aggregator_requests_total", "operation" => "customer_status").increment(1);

        let customer: Customer = self.get(&["customers", customer_id]).await?;
        tracing::debug!(customer_id, state = ?customer.state(), "aggregator customer status");
        Ok(customer)
    }

    async fn bills(&self, customer_id: &str) -> Result<Vec<Bill>, ClientError> {
        metrics::counter!("aggregator_requests_total", "operation" => "bills").increment(1);

        let bills = match self.get::<BillsResponse>(&["customers", customer_id, "bills"]).await? {
            BillsResponse::Wrapped { bills } | BillsResponse::Bare(bills) => bills,
        };
        tracing::info!(customer_id, bills = bills.len(), "aggregator bills fetched");
        Ok(bills)
    }
}
