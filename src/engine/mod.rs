//! The contract between collsync and the external tensor-execution engine.
//!
//! The engine owns scheduling, thread assignment, and callback timing. This
//! layer hands it an owned [`EngineTask`] per operation; the engine runs the
//! transport work on a thread of its choosing and then consumes the task via
//! [`EngineTask::complete`], which performs the staging copy-back, signals
//! the operation's completion latch, and tears the descriptor down exactly
//! once, by ownership.

pub mod opaque;

use std::sync::Arc;

use crate::descriptor::OperationDescriptor;
use crate::device::DeviceAdapter;
use crate::sync::Completion;
use crate::types::Priority;

/// How an operation touches a dependency buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    Read,
    Write,
}

/// A buffer the engine must order this operation against.
///
/// The engine's own dependency tracking uses these to serialize operations
/// touching the same memory; collsync does not reimplement that ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferDep {
    pub addr: u64,
    pub mode: AccessMode,
}

/// An operation as handed to the engine: descriptor, ordering dependencies,
/// and a scheduling hint.
///
/// The engine reads the operation through [`descriptor`](Self::descriptor),
/// writes results either through the output buffer's raw pointer (host
/// placement) or into the staging buffer via
/// [`staging_mut`](Self::staging_mut), and finishes by calling
/// [`complete`](Self::complete). Dropping the task without completing it
/// releases the descriptor but never signals the latch; any blocked waiter
/// then blocks forever, so an engine must complete every task it accepted.
pub struct EngineTask {
    descriptor: OperationDescriptor,
    deps: Vec<BufferDep>,
    priority: Priority,
    adapter: Arc<dyn DeviceAdapter>,
}

impl EngineTask {
    pub(crate) fn new(
        descriptor: OperationDescriptor,
        deps: Vec<BufferDep>,
        priority: Priority,
        adapter: Arc<dyn DeviceAdapter>,
    ) -> Self {
        Self {
            descriptor,
            deps,
            priority,
            adapter,
        }
    }

    /// The operation this task carries.
    pub fn descriptor(&self) -> &OperationDescriptor {
        &self.descriptor
    }

    /// Mutable staging access for the executing transport.
    pub fn staging_mut(&mut self) -> Option<&mut [u8]> {
        self.descriptor.staging_mut()
    }

    /// Buffers the engine must treat as scheduling dependencies.
    pub fn deps(&self) -> &[BufferDep] {
        &self.deps
    }

    /// Advisory scheduling priority.
    pub fn priority(&self) -> Priority {
        self.priority
    }

    /// Signal completion with the transport's outcome and tear the task
    /// down.
    ///
    /// On success, copies the staging buffer (if any) back to the output
    /// buffer first; a copy-back failure downgrades the outcome to a
    /// failure. Then marks the completion latch, waking any thread blocked
    /// on it from whatever thread this runs on, and drops the descriptor.
    /// Consuming `self` makes the signal-then-destroy sequence run exactly
    /// once.
    pub fn complete(mut self, outcome: Completion) {
        let outcome = match outcome {
            Completion::Success => match self.copy_back() {
                Ok(()) => Completion::Success,
                Err(e) => {
                    tracing::warn!(
                        op = self.descriptor.name(),
                        "staging copy-back failed: {e}"
                    );
                    Completion::Failed(format!("staging copy-back failed: {e}"))
                }
            },
            failed => failed,
        };
        self.descriptor.latch().mark_done(outcome);
        // Descriptor (and its staging buffer) dropped here.
    }

    fn copy_back(&mut self) -> crate::error::Result<()> {
        if let Some(staging) = self.descriptor.take_staging() {
            let output = self.descriptor.output();
            unsafe { self.adapter.unstage_from_host(&staging, output.ptr())? };
        }
        Ok(())
    }
}

impl std::fmt::Debug for EngineTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineTask")
            .field("descriptor", &self.descriptor)
            .field("deps", &self.deps)
            .field("priority", &self.priority)
            .finish()
    }
}

/// Returned when the engine refuses a submission.
///
/// Carries the task back (mpsc `SendError` style) so a rejected submission
/// has no side effects: the caller discards the descriptor and latch, and no
/// completion is ever signaled for them.
pub struct SubmitRejected {
    pub task: EngineTask,
    pub reason: String,
}

impl std::fmt::Debug for SubmitRejected {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubmitRejected")
            .field("reason", &self.reason)
            .finish()
    }
}

/// The external engine's asynchronous execution facility.
///
/// An implementation that accepts a task guarantees it will eventually call
/// [`EngineTask::complete`] on it, exactly once, on some engine-managed
/// thread, once the operation and its buffer dependencies are satisfied,
/// unless the engine itself fails irrecoverably, in which case the
/// descriptor leaks and any blocked waiter never wakes. That boundary
/// condition is inherited from the engine's contract and deliberately not
/// papered over with a timeout here.
pub trait ExecutionEngine: Send + Sync {
    fn submit(&self, task: EngineTask) -> std::result::Result<(), SubmitRejected>;
}
