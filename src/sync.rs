//! Completion synchronization between a submitting thread and the engine
//! thread that eventually signals an operation done.
//!
//! [`CompletionLatch`] is a one-shot gate: it starts pending, transitions to
//! done exactly once, and never goes back. The thread that marks it done and
//! the thread that waits on it are in general different threads, neither of
//! which this crate controls, so the latch is shared by `Arc` between the
//! operation descriptor and any waiter: either side may outlive the other
//! depending on completion timing.

use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

use crate::error::{CollsyncError, Result};
use crate::types::OpKind;

/// Final outcome of an operation, as reported by the engine's completion
/// signal. A failure carries the engine's reason verbatim; this layer does
/// not reinterpret it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Success,
    Failed(String),
}

/// One-shot, thread-safe "done" gate with a blocking wait.
///
/// `mark_done` may be called from any thread, `wait` from any other (or the
/// same) thread, in either order: a wait that begins after completion
/// returns immediately. There is no timeout and no cancellation: a waiter
/// blocks until the engine signals, and if the engine never signals (a
/// violation of its contract), the waiter blocks forever.
pub struct CompletionLatch {
    state: Mutex<Option<Completion>>,
    cv: Condvar,
}

impl CompletionLatch {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(None),
            cv: Condvar::new(),
        }
    }

    // The outcome is write-once, so a panicked holder cannot leave it torn;
    // recover the guard instead of propagating the poison.
    fn lock_state(&self) -> MutexGuard<'_, Option<Completion>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record the outcome and wake all waiters.
    ///
    /// The first call wins; a later call leaves the recorded outcome
    /// untouched but still notifies.
    pub fn mark_done(&self, outcome: Completion) {
        {
            let mut state = self.lock_state();
            if state.is_none() {
                *state = Some(outcome);
            }
        }
        self.cv.notify_all();
    }

    /// Block until the latch is done, then return the recorded outcome.
    ///
    /// Returns immediately if completion already happened. Never returns
    /// while the latch is still pending.
    pub fn wait(&self) -> Completion {
        let mut state = self.lock_state();
        loop {
            if let Some(outcome) = state.as_ref() {
                return outcome.clone();
            }
            state = self
                .cv
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Non-blocking probe.
    pub fn is_done(&self) -> bool {
        self.lock_state().is_some()
    }
}

impl Default for CompletionLatch {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CompletionLatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionLatch")
            .field("done", &self.is_done())
            .finish()
    }
}

/// A handle to an in-flight collective operation.
///
/// Wraps the operation's [`CompletionLatch`]. Call [`wait`](Self::wait) to
/// block until the engine signals completion, or poll with
/// [`is_finished`](Self::is_finished).
///
/// Dropping the handle detaches from the operation; the engine still runs
/// it to completion, so the caller must not reuse the output buffer until
/// the engine's own dependency tracking says the operation is done.
pub struct OpHandle {
    latch: Arc<CompletionLatch>,
    kind: OpKind,
    name: String,
}

impl OpHandle {
    pub(crate) fn new(latch: Arc<CompletionLatch>, kind: OpKind, name: String) -> Self {
        Self { latch, kind, name }
    }

    /// Block until the operation completes and propagate any engine-side
    /// failure.
    pub fn wait(self) -> Result<()> {
        match self.latch.wait() {
            Completion::Success => Ok(()),
            Completion::Failed(reason) => Err(CollsyncError::Execution {
                operation: self.kind.name(),
                name: self.name,
                reason,
            }),
        }
    }

    /// Check if the operation has finished (non-blocking).
    pub fn is_finished(&self) -> bool {
        self.latch.is_done()
    }

    /// The operation kind this handle tracks.
    pub fn kind(&self) -> OpKind {
        self.kind
    }

    /// The caller-supplied operation name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for OpHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpHandle")
            .field("kind", &self.kind)
            .field("name", &self.name)
            .field("finished", &self.is_finished())
            .finish()
    }
}
