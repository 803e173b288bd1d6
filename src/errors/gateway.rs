//! Transport-level errors surfaced by the CRUD gateway

use thiserror::Error;

/// A remote CRUD call failed.
///
/// Carries a human-readable cause and, where available, the transport status
/// code. The gateway never retries automatically; a retry is a user-initiated
/// re-invocation.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// The request never produced a response (connection refused, DNS, ...)
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The backend answered with a non-2xx status
    #[error("server returned {status} for {url}")]
    Status { status: u16, url: String },

    /// The response arrived but its body could not be decoded
    #[error("malformed response from {url}: {source}")]
    Malformed {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Transport reported unavailable without a status code (mock failures,
    /// middleware rejections)
    #[error("transport unavailable: {0}")]
    Unavailable(String),
}

impl GatewayError {
    /// Transport status code, when the failure carried one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
