use serde::Serialize;

/// Failure of an outbound call or of translating its payload.
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    #[error("invalid client configuration: {0}")]
    Configuration(String),
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("{message}")]
    Upstream { status: u16, message: String },
    #[error("unexpected response: {0}")]
    Contract(String),
    #[error("incomplete utility data: {0}")]
    Incomplete(String),
}

/// Coarse classification carried next to every error message that leaves the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Configuration,
    Upstream,
    Contract,
    Incomplete,
    NotReady,
    /// The caller's own request was malformed or not valid here.
    InvalidRequest,
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::Transport(e) if e.is_decode() => ErrorKind::Contract,
            Self::Transport(_) | Self::Upstream { .. } => ErrorKind::Upstream,
            Self::Contract(_) => ErrorKind::Contract,
            Self::Incomplete(_) => ErrorKind::Incomplete,
        }
    }

    /// HTTP status reported by the upstream, if it answered at all.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            Self::Upstream { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(e)
    }
}
