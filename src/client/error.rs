use reqwest::StatusCode;
use thiserror::Error;

/// Failures talking to the shortening service.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP {status} from {url}: {body}")]
    Status {
        url: String,
        status: StatusCode,
        body: String,
    },

    #[error("malformed response from {url}: {reason}")]
    Malformed { url: String, reason: String },
}

impl ClientError {
    /// Short label used as a structured log field
    pub fn kind(&self) -> &'static str {
        match self {
            ClientError::Transport { source, .. } if source.is_timeout() => "timeout",
            ClientError::Transport { source, .. } if source.is_connect() => "connect",
            ClientError::Transport { .. } => "transport",
            ClientError::Status { .. } => "status",
            ClientError::Malformed { .. } => "malformed",
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
