use crate::transport::{HttpError, TransportError};
use thiserror::Error;

/// Protocol-level failures: the response body could not be routed back onto
/// the batch that produced it.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The payload did not parse as an array of envelopes.
    #[error("malformed wire payload: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The response array length differs from the request batch length.
    ///
    /// This is always fatal: positional correlation is the only link between
    /// a result and the action that produced it, so a mismatched array can
    /// never be partially applied.
    #[error("response length mismatch: sent {expected} actions, got {actual} results")]
    LengthMismatch { expected: usize, actual: usize },
}

/// Unified error type for the PixVault client.
#[derive(Debug, Error)]
pub enum Error {
    /// Connection-level failure, before any HTTP status was obtained.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Non-2xx response, classified by status.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// Unroutable response body.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Invalid or missing client configuration.
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// The poll loop hit its configured round budget with actions still
    /// pending. The unfinished actions keep their job handle in `params`
    /// and can be polled later with `job_view`.
    #[error("poll budget exhausted after {rounds} rounds, {remaining} actions still pending")]
    PollBudgetExhausted { rounds: usize, remaining: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }

    /// Whether this error is the server telling us to slow down. Callers may
    /// retry these; other 4xx classes are not retried by this client.
    pub fn is_rate_limited(&self) -> bool {
        matches!(
            self,
            Error::Http(HttpError {
                kind: crate::transport::HttpErrorKind::RateLimited,
                ..
            })
        )
    }
}
