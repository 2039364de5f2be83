//! Transport boundary.
//!
//! The dispatcher only ever needs one thing from the network: POST a body to
//! the configured endpoint and get the raw response bytes back, with non-2xx
//! statuses classified rather than collapsed. [`Transport`] is the seam;
//! [`HttpTransport`] is the reqwest implementation, and tests substitute
//! scripted implementations.

mod http;

pub use http::HttpTransport;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// One request/response exchange with the API endpoint. URL and headers are
/// fixed when the transport is built; only the body varies per call.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, body: Vec<u8>) -> Result<Bytes, crate::Error>;
}

/// Connection-level failure: no HTTP status was obtained.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Connect(#[from] reqwest::Error),

    #[error("{0}")]
    Other(String),
}

/// Classified non-2xx status.
///
/// The classes are kept distinct because callers treat them differently:
/// `RateLimited` may be retried, the other 4xx classes are not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpErrorKind {
    BadRequest,
    Unauthorized,
    NotFound,
    RateLimited,
    ServerError,
    BadGateway,
    GatewayTimeout,
    Unknown,
}

impl HttpErrorKind {
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => HttpErrorKind::BadRequest,
            401 => HttpErrorKind::Unauthorized,
            404 => HttpErrorKind::NotFound,
            429 => HttpErrorKind::RateLimited,
            500 => HttpErrorKind::ServerError,
            502 => HttpErrorKind::BadGateway,
            504 => HttpErrorKind::GatewayTimeout,
            _ => HttpErrorKind::Unknown,
        }
    }

    /// Whether a request that hit this class is worth repeating as-is.
    pub fn is_retryable(self) -> bool {
        matches!(
            self,
            HttpErrorKind::RateLimited
                | HttpErrorKind::BadGateway
                | HttpErrorKind::GatewayTimeout
        )
    }
}

impl std::fmt::Display for HttpErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            HttpErrorKind::BadRequest => "bad request",
            HttpErrorKind::Unauthorized => "unauthorized",
            HttpErrorKind::NotFound => "not found",
            HttpErrorKind::RateLimited => "rate limited",
            HttpErrorKind::ServerError => "server error",
            HttpErrorKind::BadGateway => "bad gateway",
            HttpErrorKind::GatewayTimeout => "gateway timeout",
            HttpErrorKind::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Non-2xx response with its classified reason.
#[derive(Debug, Error)]
#[error("HTTP {status} ({kind}): {message}")]
pub struct HttpError {
    pub kind: HttpErrorKind,
    pub status: u16,
    pub message: String,
}
