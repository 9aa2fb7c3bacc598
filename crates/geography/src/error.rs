use thiserror::Error;

/// Errors from geography lookups.
#[derive(Debug, Error)]
pub enum GeographyError {
    #[error("invalid geography base url {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// Transport failure (DNS, connect, timeout, reading the body).
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },

    /// The service answered with a non-2xx status.
    #[error("geography service {endpoint} returned {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },

    /// The body was not the expected JSON array.
    #[error("failed to decode response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        source: serde_json::Error,
    },

    /// An in-memory source has no answer for this lookup.
    #[error("no data for {endpoint}")]
    Unavailable { endpoint: String },
}

impl GeographyError {
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            GeographyError::InvalidBaseUrl { .. } => None,
            GeographyError::Http { endpoint, .. }
            | GeographyError::Status { endpoint, .. }
            | GeographyError::Decode { endpoint, .. }
            | GeographyError::Unavailable { endpoint } => Some(endpoint),
        }
    }
}
