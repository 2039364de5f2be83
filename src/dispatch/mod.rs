//! Batched dispatch with asynchronous job reconciliation.
//!
//! One [`Dispatcher::run`] call drives a queue of actions through at most
//! two phases. The initial round encodes the whole queue as one request,
//! sends it, and routes the response array back by position. Successful
//! asynchronous image creates are then promoted: their params are rewritten
//! into a `job-view` poll and they move to the pending-poll set instead of
//! settling. The poll loop re-batches that set each round, settling and
//! removing actions as their job reports `done`, until the set is empty or
//! the round budget runs out.
//!
//! Output ordering: actions settled in the initial round come first, in
//! queue order; poll completions follow in the order they finished.

use crate::action::{Action, Envelope};
use crate::batch;
use crate::codec::WireCodec;
use crate::transport::Transport;
use crate::Error;
use std::time::Duration;
use thiserror::Error as ThisError;
use tracing::{debug, trace, warn};

/// Options for one dispatch call.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Wait for asynchronous creates by polling their jobs to completion.
    pub wait: bool,
    /// Delay between poll rounds. A plain fixed delay, not a backoff.
    pub poll_delay: Duration,
    /// Upper bound on poll rounds. `None` polls until every job finishes.
    pub max_poll_rounds: Option<usize>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            wait: false,
            poll_delay: Duration::from_secs(1),
            max_poll_rounds: None,
        }
    }
}

impl RunOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn wait(mut self, wait: bool) -> Self {
        self.wait = wait;
        self
    }

    pub fn poll_delay(mut self, delay: Duration) -> Self {
        self.poll_delay = delay;
        self
    }

    pub fn max_poll_rounds(mut self, rounds: usize) -> Self {
        self.max_poll_rounds = Some(rounds);
        self
    }
}

/// A dispatch call that could not finish.
///
/// Settled actions are never rolled back: `completed` holds everything that
/// reached a terminal outcome before the failure, and `pending` holds
/// promoted actions still awaiting their job, params already rewritten to
/// `job-view` so the caller can resume polling later.
#[derive(Debug, ThisError)]
#[error("dispatch aborted with {} settled and {} pending action(s): {source}", completed.len(), pending.len())]
pub struct DispatchError {
    #[source]
    pub source: Error,
    pub completed: Vec<Action>,
    pub pending: Vec<Action>,
}

impl From<DispatchError> for Error {
    /// Drops the partial result set; use the `DispatchError` fields when
    /// partial progress matters.
    fn from(err: DispatchError) -> Self {
        err.source
    }
}

/// What to do with an action once its immediate envelope arrives.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Decision {
    /// Apply the envelope to the action now.
    Finalize,
    /// Rewrite the action into a poll for `job` and defer settlement.
    Defer { job: String },
}

/// The async promotion rule. Defers exactly when the caller asked to wait,
/// the action is an image create, the immediate envelope succeeded, and it
/// carries a job handle. A failed create is never promoted: its error
/// envelope settles it like any other action.
pub(crate) fn promote(action: &Action, envelope: &Envelope, wait: bool) -> Decision {
    if !wait || action.action_name() != "image-create" || !envelope.success {
        return Decision::Finalize;
    }
    match envelope.job_handle() {
        Some(job) => Decision::Defer { job },
        None => Decision::Finalize,
    }
}

/// Orchestrates encode -> send -> demux rounds over a borrowed transport
/// and codec. Owns no state of its own; the queue and pending-poll set live
/// only inside one `run` call.
pub(crate) struct Dispatcher<'a> {
    transport: &'a dyn Transport,
    codec: &'a dyn WireCodec,
}

impl<'a> Dispatcher<'a> {
    pub(crate) fn new(transport: &'a dyn Transport, codec: &'a dyn WireCodec) -> Self {
        Self { transport, codec }
    }

    pub(crate) async fn run(
        &self,
        queued: Vec<Action>,
        opts: &RunOptions,
    ) -> Result<Vec<Action>, DispatchError> {
        let mut completed = Vec::with_capacity(queued.len());
        if queued.is_empty() {
            return Ok(completed);
        }

        debug!(actions = queued.len(), wait = opts.wait, "dispatching batch");

        let envelopes = match self.exchange(&queued).await {
            Ok(envelopes) => envelopes,
            Err(source) => {
                return Err(DispatchError {
                    source,
                    completed,
                    pending: Vec::new(),
                })
            }
        };

        let mut pending = Vec::new();
        for (mut action, envelope) in queued.into_iter().zip(envelopes) {
            match promote(&action, &envelope, opts.wait) {
                Decision::Defer { job } => {
                    debug!(action = %action.id(), job = %job, "promoted to job poll");
                    action.promote_to_job(&job);
                    pending.push(action);
                }
                Decision::Finalize => {
                    action.settle(&envelope);
                    completed.push(action);
                }
            }
        }

        let mut round = 0usize;
        while !pending.is_empty() {
            if let Some(max) = opts.max_poll_rounds {
                if round >= max {
                    return Err(DispatchError {
                        source: Error::PollBudgetExhausted {
                            rounds: round,
                            remaining: pending.len(),
                        },
                        completed,
                        pending,
                    });
                }
            }
            round += 1;
            trace!(round, pending = pending.len(), "poll round");

            let envelopes = match self.exchange(&pending).await {
                Ok(envelopes) => envelopes,
                Err(source) => {
                    if source.is_rate_limited() {
                        warn!(round, "rate limited while polling; aborting with partial results");
                    }
                    return Err(DispatchError {
                        source,
                        completed,
                        pending,
                    });
                }
            };

            let mut still_pending = Vec::with_capacity(pending.len());
            for (mut action, envelope) in pending.into_iter().zip(envelopes) {
                if envelope.is_done() {
                    debug!(action = %action.id(), round, "job finished");
                    action.settle(&envelope);
                    completed.push(action);
                } else {
                    still_pending.push(action);
                }
            }
            pending = still_pending;

            if !pending.is_empty() {
                tokio::time::sleep(opts.poll_delay).await;
            }
        }

        Ok(completed)
    }

    async fn exchange(&self, batch: &[Action]) -> Result<Vec<Envelope>, Error> {
        let body = batch::encode(self.codec, batch)?;
        let raw = self.transport.send(body).await?;
        Ok(batch::demux(self.codec, &raw, batch)?)
    }
}
