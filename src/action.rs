//! Queued actions and their settle-once outcome slots.
//!
//! An [`Action`] is one requested API operation: a stable identity, the
//! parameter map that will be sent on the wire, and an outcome that is
//! written exactly once when the server's answer is routed back to it.

use serde::Deserialize;
use serde_json::{Map, Value};

/// Identity of a queued action, unique and monotonic for the lifetime of the
/// client that assigned it. Used for external reference (logging, lookups);
/// request/response correlation is positional and never uses this value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActionId(pub(crate) u64);

impl ActionId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ActionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Terminal state of one action.
///
/// Transitions `Pending -> Succeeded` or `Pending -> Failed`, exactly once.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Pending,
    Succeeded(Map<String, Value>),
    Failed(Map<String, Value>),
}

impl Outcome {
    pub fn is_pending(&self) -> bool {
        matches!(self, Outcome::Pending)
    }
}

/// One wire-level result object, paired positionally with the action that
/// produced it.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope {
    pub success: bool,
    #[serde(default)]
    pub result: Option<Map<String, Value>>,
    #[serde(default)]
    pub error: Option<Map<String, Value>>,
    /// Present only on job-status envelopes. `Some(false)` means the job is
    /// still running and the action must stay in the pending-poll set.
    #[serde(default)]
    pub done: Option<bool>,
}

impl Envelope {
    /// Job handle carried by a successful asynchronous create, if any.
    /// The server issues string handles, but numeric ids are accepted too
    /// and rendered as their decimal form.
    pub fn job_handle(&self) -> Option<String> {
        let job = self.result.as_ref()?.get("job")?;
        match job {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn is_done(&self) -> bool {
        self.done.unwrap_or(false)
    }
}

/// One requested API operation and, eventually, its result.
#[derive(Debug, Clone)]
pub struct Action {
    id: ActionId,
    params: Map<String, Value>,
    outcome: Outcome,
}

impl Action {
    pub(crate) fn new(id: ActionId, params: Map<String, Value>) -> Self {
        Self {
            id,
            params,
            outcome: Outcome::Pending,
        }
    }

    pub fn id(&self) -> ActionId {
        self.id
    }

    /// Parameters as they will be (or were) sent, including the `action` key.
    pub fn params(&self) -> &Map<String, Value> {
        &self.params
    }

    /// The `action` key naming this operation's kind.
    pub fn action_name(&self) -> &str {
        self.params
            .get("action")
            .and_then(Value::as_str)
            .unwrap_or("")
    }

    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    pub fn is_settled(&self) -> bool {
        !self.outcome.is_pending()
    }

    pub fn is_successful(&self) -> bool {
        matches!(self.outcome, Outcome::Succeeded(_))
    }

    pub fn result(&self) -> Option<&Map<String, Value>> {
        match &self.outcome {
            Outcome::Succeeded(result) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&Map<String, Value>> {
        match &self.outcome {
            Outcome::Failed(error) => Some(error),
            _ => None,
        }
    }

    /// Job handle for an action that was promoted to polling but returned to
    /// the caller still pending (`wait = false`).
    pub fn job_handle(&self) -> Option<&str> {
        if self.action_name() != "job-view" {
            return None;
        }
        self.params.get("id").and_then(Value::as_str)
    }

    /// Writes the terminal outcome. Panics if the action already settled:
    /// a second settlement means two response elements were routed to the
    /// same action, which the positional contract makes impossible.
    pub(crate) fn settle(&mut self, envelope: &Envelope) {
        assert!(
            self.outcome.is_pending(),
            "action {} settled twice",
            self.id
        );
        self.outcome = if envelope.success {
            Outcome::Succeeded(envelope.result.clone().unwrap_or_default())
        } else {
            Outcome::Failed(envelope.error.clone().unwrap_or_default())
        };
    }

    /// Rewrites this action into a job-status poll for `job`, keeping its
    /// identity. The single permitted params mutation.
    pub(crate) fn promote_to_job(&mut self, job: &str) {
        debug_assert!(self.outcome.is_pending());
        let mut params = Map::new();
        params.insert("action".into(), Value::String("job-view".into()));
        params.insert("id".into(), Value::String(job.into()));
        self.params = params;
    }

    pub(crate) fn handle(&self) -> ActionHandle {
        ActionHandle {
            id: self.id,
            params: self.params.clone(),
        }
    }
}

/// Read-only view of a just-queued action, returned by the enqueue methods.
#[derive(Debug, Clone)]
pub struct ActionHandle {
    id: ActionId,
    params: Map<String, Value>,
}

impl ActionHandle {
    pub fn id(&self) -> ActionId {
        self.id
    }

    pub fn params(&self) -> &Map<String, Value> {
        &self.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(action: &str) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("action".into(), Value::String(action.into()));
        map
    }

    fn success_envelope() -> Envelope {
        serde_json::from_value(json!({
            "success": true,
            "result": { "id": "img-1" }
        }))
        .unwrap()
    }

    #[test]
    fn settle_success_records_result() {
        let mut action = Action::new(ActionId(1), params("image-info"));
        assert!(!action.is_settled());

        action.settle(&success_envelope());

        assert!(action.is_successful());
        assert_eq!(action.result().unwrap()["id"], json!("img-1"));
        assert!(action.error().is_none());
    }

    #[test]
    fn settle_failure_records_error() {
        let envelope: Envelope = serde_json::from_value(json!({
            "success": false,
            "error": { "code": "not-found" }
        }))
        .unwrap();

        let mut action = Action::new(ActionId(2), params("image-info"));
        action.settle(&envelope);

        assert!(!action.is_successful());
        assert_eq!(action.error().unwrap()["code"], json!("not-found"));
    }

    #[test]
    #[should_panic(expected = "settled twice")]
    fn settle_twice_is_an_invariant_violation() {
        let mut action = Action::new(ActionId(3), params("image-info"));
        action.settle(&success_envelope());
        action.settle(&success_envelope());
    }

    #[test]
    fn promotion_rewrites_params_and_keeps_identity() {
        let mut action = Action::new(ActionId(4), params("image-create"));
        action.promote_to_job("J1");

        assert_eq!(action.id(), ActionId(4));
        assert_eq!(action.action_name(), "job-view");
        assert_eq!(action.job_handle(), Some("J1"));
        assert!(!action.is_settled());
    }

    #[test]
    fn envelope_done_defaults_to_absent() {
        let envelope: Envelope = serde_json::from_value(json!({
            "success": true,
            "result": {}
        }))
        .unwrap();
        assert!(!envelope.is_done());

        let envelope: Envelope = serde_json::from_value(json!({
            "success": true,
            "result": {},
            "done": true
        }))
        .unwrap();
        assert!(envelope.is_done());
    }

    #[test]
    fn envelope_exposes_job_handle() {
        let envelope: Envelope = serde_json::from_value(json!({
            "success": true,
            "result": { "job": "J9" }
        }))
        .unwrap();
        assert_eq!(envelope.job_handle(), Some("J9".to_string()));
    }

    #[test]
    fn numeric_job_handles_are_accepted() {
        let envelope: Envelope = serde_json::from_value(json!({
            "success": true,
            "result": { "job": 4217 }
        }))
        .unwrap();
        assert_eq!(envelope.job_handle(), Some("4217".to_string()));

        let envelope: Envelope = serde_json::from_value(json!({
            "success": true,
            "result": { "job": null }
        }))
        .unwrap();
        assert_eq!(envelope.job_handle(), None);
    }
}
