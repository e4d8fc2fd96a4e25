//! Places lookup errors.
//!
//! Every failure surfaces to the caller as-is. Nothing here is retried.

use std::time::Duration;

use thiserror::Error;

/// Error from a places lookup.
#[derive(Debug, Error)]
pub enum PlacesError {
    /// Input rejected before anything was sent over the wire.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The request could not complete (DNS, connect, TLS, broken body).
    #[error("Places service unavailable: {0}")]
    UpstreamUnavailable(String),

    /// The request did not finish within the configured timeout.
    #[error("Places request timed out after {0:?}")]
    Timeout(Duration),

    /// The provider answered with a non-success status.
    #[error("Places service returned HTTP {status}: {message}")]
    UpstreamError { status: u16, message: String },

    /// Success status, but the payload does not have the expected shape.
    #[error("Malformed places response: {0}")]
    MalformedResponse(String),

    /// Missing credential or unusable client settings.
    #[error("Places configuration error: {0}")]
    Configuration(String),
}

impl PlacesError {
    /// Whether the provider could not be reached at all.
    ///
    /// `Timeout` counts as unavailable.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::UpstreamUnavailable(_) | Self::Timeout(_))
    }

    /// HTTP status reported by the provider, if it answered with an error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::UpstreamError { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Classify a transport-level reqwest failure.
    pub(crate) fn from_transport(error: reqwest::Error, timeout: Duration) -> Self {
        if error.is_timeout() {
            Self::Timeout(timeout)
        } else if error.is_connect() {
            Self::UpstreamUnavailable(format!("Connection failed: {}", error))
        } else {
            Self::UpstreamUnavailable(format!("Request failed: {}", error))
        }
    }
}
