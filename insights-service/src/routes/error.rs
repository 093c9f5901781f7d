use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use utility_client::{ClientError, ErrorKind};

use crate::{connect::InvalidTransition, transform::TransformError};

pub const NOT_READY_MESSAGE: &str = "Utility data is still being processed. Please try again later.";

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    /// A required credential is missing; raised before any outbound call.
    #[error("{0} API key is not configured")]
    NotConfigured(&'static str),
    #[error("{0}")]
    BadRequest(String),
    #[error("Utility data is still being processed. Please try again later.")]
    NotReady,
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error(transparent)]
    Transform(#[from] TransformError),
    #[error(transparent)]
    InvalidTransition(#[from] InvalidTransition),
}

pub type Result<T, E = ApiError> = std::result::Result<T, E>;

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotConfigured(_) => ErrorKind::Configuration,
            Self::BadRequest(_) | Self::Transform(_) | Self::InvalidTransition(_) => ErrorKind::InvalidRequest,
            Self::NotReady => ErrorKind::NotReady,
            Self::Client(e) => e.kind(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotConfigured(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotReady => StatusCode::ACCEPTED,
            Self::Transform(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::InvalidTransition(_) => StatusCode::CONFLICT,
            Self::Client(ClientError::Upstream { status, .. }) => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            Self::Client(ClientError::Incomplete(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Client(ClientError::Configuration(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Client(ClientError::Transport(_) | ClientError::Contract(_)) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let kind = self.kind();

        match kind {
            ErrorKind::NotReady => tracing::info!("{self}"),
            ErrorKind::Contract => tracing::error!(error = %self, "upstream contract violation"),
            _ if status.is_server_error() => tracing::error!(error = %self, ?kind, "request failed"),
            _ => tracing::warn!(error = %self, ?kind, "request rejected"),
        }

        let body = match self {
            Self::NotReady => json!({ "error": NOT_READY_MESSAGE, "kind": kind, "status": "processing" }),
            other => json!({ "error": other.to_string(), "kind": kind }),
        };
        (status, Json(body)).into_response()
    }
}
