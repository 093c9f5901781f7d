use std::time::Duration;

use reqwest::{header::CONTENT_TYPE, Response, Url};
use serde::{de::DeserializeOwned, Deserialize};

use crate::error::ClientError;

pub(crate) fn build_client(timeout: Duration) -> Result<reqwest::Client, ClientError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ClientError::Configuration(format!("failed to build HTTP client: {e}")))
}

pub(crate) fn parse_base_url(raw: &str) -> Result<Url, ClientError> {
    let url = Url::parse(raw).map_err(|e| ClientError::Configuration(format!("invalid base url '{raw}': {e}")))?;
    if url.cannot_be_a_base() {
        return Err(ClientError::Configuration(format!("'{raw}' cannot be used as a base url")));
    }
    Ok(url)
}

/// Append path segments to `base`, percent-encoding each one.
pub(crate) fn join_segments(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<serde_json::Value>,
}

fn is_json(response: &Response) -> bool {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.contains("application/json"))
}

/// Decode a JSON response body, turning every failure into a [`ClientError`].
///
/// Rules:
/// - non-2xx: the body's `error` field when the body is JSON, otherwise the status line.
/// - 2xx without a JSON content type, or with an undecodable body: contract violation.
pub(crate) async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    let json = is_json(&response);

    if !status.is_success() {
        let fallback = format!("API Error: {status}");
        let message = if json {
            match response.json::<ErrorBody>().await {
                Ok(ErrorBody { error: Some(serde_json::Value::String(m)) }) => m,
                Ok(ErrorBody { error: Some(other) }) => other.to_string(),
                _ => fallback,
            }
        } else {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), body = %body, "non-JSON error body from upstream");
            fallback
        };
        return Err(ClientError::Upstream {
            status: status.as_u16(),
            message,
        });
    }

    if !json {
        return Err(ClientError::Contract(format!(
            "expected a JSON body, got content type {:?}",
            response.headers().get(CONTENT_TYPE)
        )));
    }

    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| {
        tracing::warn!(error = %e, "upstream JSON did not match the expected shape");
        ClientError::Contract(format!("failed to decode response body: {e}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_segments_onto_versioned_base() {
        let base = parse_base_url("https://staging.bayou.energy/api/v2").unwrap();
        let url = join_segments(&base, &["customers", "a b", "bills"]);
        assert_eq!(url.as_str(), "https://staging.bayou.energy/api/v2/customers/a%20b/bills");

        let trailing = parse_base_url("https://staging.bayou.energy/api/v2/").unwrap();
        assert_eq!(
            join_segments(&trailing, &["customers"]).as_str(),
            "https://staging.bayou.energy/api/v2/customers"
        );
    }

    #[test]
    fn rejects_non_base_url() {
        assert!(matches!(parse_base_url("mailto:ops@example.test"), Err(ClientError::Configuration(_))));
        assert!(matches!(parse_base_url("not a url"), Err(ClientError::Configuration(_))));
    }
}
