//! Error types for the postcode API client.
//!
//! # Design
//! Every failure carries a numeric status so callers can treat it like the
//! upstream `{status, error}` record. Local precondition failures are 400,
//! upstream failures keep the upstream status verbatim, and everything that
//! goes wrong on our side of the wire (transport, encode, decode, URL
//! construction) is reported as 500.

use thiserror::Error;

use crate::types::ResponseError;

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors returned by `PostcodeClient` and `PostcodeApi`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// An input precondition failed before any request was sent.
    #[error("{message}")]
    Validation { message: String },

    /// The upstream service answered with a failure status.
    #[error("API error ({status}): {message}")]
    Upstream { status: u16, message: String },

    /// The HTTP round-trip itself failed (DNS, connect, TLS, timeout).
    #[error("transport failure: {0}")]
    Transport(#[from] ureq::Error),

    /// The response body did not match the expected JSON shape.
    #[error("failed to parse response body: {0}")]
    Decode(#[source] serde_json::Error),

    /// The request payload could not be serialized to JSON.
    #[error("failed to encode the request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// The request URL could not be built from the base URL and path.
    #[error("failed to build request: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn upstream(status: u16, message: impl Into<String>) -> Self {
        Self::Upstream {
            status,
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Numeric status of this error, in the upstream's terms.
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            Self::Validation { .. } => 400,
            Self::Upstream { status, .. } => *status,
            Self::Transport(_)
            | Self::Decode(_)
            | Self::Encode(_)
            | Self::InvalidUrl(_)
            | Self::Config(_) => 500,
        }
    }

    /// Human-readable message without the status prefix. Transport failures
    /// report the transport's own message.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Validation { message } | Self::Upstream { message, .. } => message.clone(),
            Self::Transport(source) => source.to_string(),
            other => other.to_string(),
        }
    }

    /// Flatten into the `{status, error}` record shape.
    #[must_use]
    pub fn to_response_error(&self) -> ResponseError {
        ResponseError {
            status: self.status(),
            error: self.message(),
        }
    }

    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Upstream { status: 404, .. })
    }

    /// 4xx, including local validation failures.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status())
    }

    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status() >= 500
    }
}

impl From<ResponseError> for ApiError {
    fn from(record: ResponseError) -> Self {
        Self::upstream(record.status, record.error)
    }
}
