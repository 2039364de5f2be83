//! Wire-format codecs.
//!
//! The batch layer is format-agnostic: it hands an ordered list of parameter
//! maps to a [`WireCodec`] and gets bytes back, and the reverse for
//! responses. The codec is chosen at client build time; [`JsonCodec`] is the
//! default and currently the only shipped implementation.

use crate::action::Envelope;
use crate::error::ProtocolError;
use serde_json::{Map, Value};

/// Serializer/deserializer for one request/response exchange.
pub trait WireCodec: Send + Sync {
    /// Value for the `Content-Type` and `Accept` headers.
    fn content_type(&self) -> &'static str;

    /// Serializes an ordered list of action parameter maps, preserving
    /// order. Order is the correlation key; a codec must never reorder.
    fn encode(&self, params: &[&Map<String, Value>]) -> Result<Vec<u8>, ProtocolError>;

    /// Parses a raw response body into an ordered list of envelopes.
    fn decode(&self, raw: &[u8]) -> Result<Vec<Envelope>, ProtocolError>;
}

/// JSON array-of-objects codec, the canonical PixVault wire format.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl WireCodec for JsonCodec {
    fn content_type(&self) -> &'static str {
        "application/json"
    }

    fn encode(&self, params: &[&Map<String, Value>]) -> Result<Vec<u8>, ProtocolError> {
        Ok(serde_json::to_vec(params)?)
    }

    fn decode(&self, raw: &[u8]) -> Result<Vec<Envelope>, ProtocolError> {
        Ok(serde_json::from_slice(raw)?)
    }
}
