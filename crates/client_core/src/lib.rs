//! Client-side choreography for the oblivious evaluation protocol.
//!
//! One submission attempt drives an ordered batch of plaintexts through
//! blind → transport → finalize → encode. The attempt is all-or-nothing:
//! either every surviving item resolves to an [`OutputRecord`] or the whole
//! attempt fails, so the index-based pairing between inputs and outputs can
//! never desynchronize.

use std::sync::Arc;

use shared::{
    domain::{InputItem, OutputRecord, SessionStatus},
    error::SessionError,
};
use tokio::sync::Mutex;
use tracing::{error, info, warn};

pub mod blinder;
pub mod config;
pub mod transport;

pub use blinder::{BlindedBatch, ObliviousSuite, Ristretto255Suite};
pub use config::{load_settings, Settings};
pub use transport::{EvaluationTransport, HttpEvaluationTransport};

/// Owns the single active session. All session state lives behind one
/// Mutex with one logical owner; each attempt carries a monotonic token so
/// a result arriving after a reset is discarded instead of applied.
pub struct SessionOrchestrator<S: ObliviousSuite> {
    suite: S,
    transport: Arc<dyn EvaluationTransport>,
    max_inputs: usize,
    encode_width: usize,
    inner: Mutex<SessionInner>,
}

#[derive(Default)]
struct SessionInner {
    status: SessionStatus,
    attempt: u64,
    records: Vec<OutputRecord>,
}

impl<S: ObliviousSuite> SessionOrchestrator<S> {
    pub fn new(suite: S, transport: Arc<dyn EvaluationTransport>, settings: &Settings) -> Self {
        Self {
            suite,
            transport,
            max_inputs: settings.max_inputs,
            encode_width: settings.encode_width,
            inner: Mutex::new(SessionInner::default()),
        }
    }

    pub async fn status(&self) -> SessionStatus {
        self.inner.lock().await.status.clone()
    }

    /// Records of the last completed session, submission order. Empty
    /// unless the status is `Complete`.
    pub async fn records(&self) -> Vec<OutputRecord> {
        self.inner.lock().await.records.clone()
    }

    /// Runs one full submission attempt. Rejected with `SessionBusy` while
    /// a previous attempt's outcome has not been reset; blank-only and
    /// oversized submissions fail before the blinder or transport is ever
    /// invoked.
    pub async fn submit<T: AsRef<str>>(
        &self,
        raw_inputs: &[T],
    ) -> Result<Vec<OutputRecord>, SessionError> {
        let items = InputItem::from_submission(raw_inputs);

        let attempt = {
            let mut inner = self.inner.lock().await;
            if inner.status != SessionStatus::Idle {
                return Err(SessionError::SessionBusy);
            }
            if items.is_empty() {
                let err = SessionError::NoValidInput;
                warn!("submission rejected: every entry blank after trimming");
                inner.status = SessionStatus::Failed(err.clone());
                return Err(err);
            }
            if items.len() > self.max_inputs {
                let err = SessionError::BatchTooLarge {
                    count: items.len(),
                    max: self.max_inputs,
                };
                warn!(
                    count = items.len(),
                    max = self.max_inputs,
                    "submission rejected before blinding: batch too large"
                );
                inner.status = SessionStatus::Failed(err.clone());
                return Err(err);
            }
            inner.attempt += 1;
            inner.status = SessionStatus::Submitting;
            inner.records.clear();
            inner.attempt
        };

        let buffers: Vec<Vec<u8>> = items
            .iter()
            .map(|item| item.text.as_bytes().to_vec())
            .collect();
        let batch = match self.suite.blind(&buffers) {
            Ok(batch) => batch,
            Err(err) => return self.fail_attempt(attempt, err).await,
        };

        if !self.advance(attempt, SessionStatus::AwaitingServer).await {
            return Err(SessionError::AttemptSuperseded);
        }
        let response = match self.transport.send(&batch.request).await {
            Ok(bytes) => bytes,
            Err(err) => return self.fail_attempt(attempt, err).await,
        };

        if !self.advance(attempt, SessionStatus::Finalizing).await {
            return Err(SessionError::AttemptSuperseded);
        }
        let outputs = match self.suite.finalize(batch.state, &response) {
            Ok(outputs) => outputs,
            Err(err) => return self.fail_attempt(attempt, err).await,
        };
        if outputs.len() != items.len() {
            let err = SessionError::ProtocolInvariantViolation {
                expected: items.len(),
                actual: outputs.len(),
            };
            return self.fail_attempt(attempt, err).await;
        }

        let records: Vec<OutputRecord> = items
            .into_iter()
            .zip(outputs)
            .map(|(item, raw_output)| OutputRecord {
                encoded_glyphs: glyph::encode(&raw_output, self.encode_width),
                index: item.index,
                original_text: item.text,
                raw_output,
            })
            .collect();

        let mut inner = self.inner.lock().await;
        if inner.attempt != attempt {
            return Err(SessionError::AttemptSuperseded);
        }
        inner.status = SessionStatus::Complete;
        inner.records = records.clone();
        info!(items = records.len(), "evaluation session complete");
        Ok(records)
    }

    /// Returns the session to `Idle` and invalidates any in-flight
    /// attempt. The display layer is expected to clear its reveal state
    /// alongside this call.
    pub async fn reset(&self) {
        let mut inner = self.inner.lock().await;
        inner.attempt += 1;
        inner.status = SessionStatus::Idle;
        inner.records.clear();
    }

    async fn advance(&self, attempt: u64, status: SessionStatus) -> bool {
        let mut inner = self.inner.lock().await;
        if inner.attempt != attempt {
            return false;
        }
        inner.status = status;
        true
    }

    async fn fail_attempt(
        &self,
        attempt: u64,
        err: SessionError,
    ) -> Result<Vec<OutputRecord>, SessionError> {
        let mut inner = self.inner.lock().await;
        if inner.attempt != attempt {
            return Err(SessionError::AttemptSuperseded);
        }
        if err.is_defect() {
            error!(%err, "protocol defect aborted the session");
        } else {
            warn!(%err, "submission attempt failed");
        }
        inner.status = SessionStatus::Failed(err.clone());
        Err(err)
    }
}

#[cfg(test)]
mod tests;
