//! Batch encoding and response demultiplexing.
//!
//! A batch is an ordered sequence of actions sent as one request. The
//! response is an ordered array whose i-th element belongs to the i-th
//! action of the batch, unconditionally; nothing in the envelope content
//! participates in routing. [`demux`] enforces the one property that keeps
//! that contract safe: the array length must match the batch length exactly.

use crate::action::{Action, Envelope};
use crate::codec::WireCodec;
use crate::error::ProtocolError;

/// Serializes the batch. Each action contributes exactly its parameter map;
/// `id` and outcome never go on the wire.
pub fn encode(codec: &dyn WireCodec, batch: &[Action]) -> Result<Vec<u8>, ProtocolError> {
    let params: Vec<_> = batch.iter().map(Action::params).collect();
    codec.encode(&params)
}

/// Parses a raw response body and checks it against the batch that produced
/// it. On success the returned vector has exactly `batch.len()` envelopes,
/// element i belonging to `batch[i]`.
///
/// A length mismatch is always [`ProtocolError::LengthMismatch`], never a
/// truncated or padded pairing: silent misalignment would attribute results
/// to the wrong actions.
pub fn demux(
    codec: &dyn WireCodec,
    raw: &[u8],
    batch: &[Action],
) -> Result<Vec<Envelope>, ProtocolError> {
    let envelopes = codec.decode(raw)?;
    if envelopes.len() != batch.len() {
        return Err(ProtocolError::LengthMismatch {
            expected: batch.len(),
            actual: envelopes.len(),
        });
    }
    Ok(envelopes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ActionId;
    use crate::codec::JsonCodec;
    use serde_json::{json, Map, Value};

    fn action(id: u64, name: &str, target: &str) -> Action {
        let mut params = Map::new();
        params.insert("action".into(), Value::String(name.into()));
        params.insert("id".into(), Value::String(target.into()));
        Action::new(ActionId(id), params)
    }

    #[test]
    fn encode_emits_params_in_queue_order() {
        let batch = vec![
            action(1, "album-info", "a1"),
            action(2, "image-info", "i1"),
            action(3, "image-remove", "i2"),
        ];

        let bytes = encode(&JsonCodec, &batch).unwrap();
        let wire: Vec<Map<String, Value>> = serde_json::from_slice(&bytes).unwrap();

        let names: Vec<_> = wire.iter().map(|p| p["action"].clone()).collect();
        assert_eq!(
            names,
            vec![json!("album-info"), json!("image-info"), json!("image-remove")]
        );
        // Identity and outcome never leak onto the wire.
        assert!(wire.iter().all(|p| p.get("outcome").is_none()));
    }

    #[test]
    fn encode_empty_batch() {
        let bytes = encode(&JsonCodec, &[]).unwrap();
        assert_eq!(bytes, b"[]");
    }

    #[test]
    fn demux_pairs_by_position() {
        let batch = vec![
            action(1, "album-info", "a1"),
            action(2, "image-info", "i1"),
        ];
        let raw = serde_json::to_vec(&json!([
            { "success": true, "result": { "who": "first" } },
            { "success": false, "error": { "who": "second" } }
        ]))
        .unwrap();

        let envelopes = demux(&JsonCodec, &raw, &batch).unwrap();

        assert_eq!(envelopes.len(), 2);
        assert!(envelopes[0].success);
        assert_eq!(envelopes[0].result.as_ref().unwrap()["who"], json!("first"));
        assert!(!envelopes[1].success);
        assert_eq!(envelopes[1].error.as_ref().unwrap()["who"], json!("second"));
    }

    #[test]
    fn demux_short_response_is_fatal() {
        let batch = vec![
            action(1, "album-info", "a1"),
            action(2, "image-info", "i1"),
        ];
        let raw = br#"[{ "success": true, "result": {} }]"#;

        let err = demux(&JsonCodec, raw, &batch).unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::LengthMismatch {
                expected: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn demux_long_response_is_fatal() {
        let batch = vec![action(1, "album-info", "a1")];
        let raw = serde_json::to_vec(&json!([
            { "success": true, "result": {} },
            { "success": true, "result": {} }
        ]))
        .unwrap();

        let err = demux(&JsonCodec, &raw, &batch).unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::LengthMismatch {
                expected: 1,
                actual: 2
            }
        ));
    }

    #[test]
    fn demux_malformed_body_is_protocol_error() {
        let batch = vec![action(1, "album-info", "a1")];
        let err = demux(&JsonCodec, b"not json", &batch).unwrap_err();
        assert!(matches!(err, ProtocolError::Malformed(_)));
    }
}
