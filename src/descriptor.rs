//! The owned bundle describing one in-flight collective operation.

use std::sync::Arc;

use crate::memory::TensorRef;
use crate::sync::CompletionLatch;
use crate::types::{OpKind, Rank};

/// Everything the engine needs to carry a collective operation from
/// submission to completion: the caller's buffers, the optional host staging
/// copy, the operation's identity, and the completion latch.
///
/// Constructed only by the dispatch entry points, after validation; the
/// constructor stores its arguments verbatim and checks nothing. Each
/// descriptor owns exactly one latch; descriptors are never shared or
/// reused. The descriptor is destroyed exactly once, when its engine task is
/// completed (or discarded after a rejected submission).
pub struct OperationDescriptor {
    input: TensorRef,
    output: TensorRef,
    staging: Option<Vec<u8>>,
    kind: OpKind,
    name: String,
    root: Option<Rank>,
    average: bool,
    latch: Arc<CompletionLatch>,
}

impl OperationDescriptor {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        input: TensorRef,
        output: TensorRef,
        staging: Option<Vec<u8>>,
        kind: OpKind,
        name: String,
        root: Option<Rank>,
        average: bool,
        latch: Arc<CompletionLatch>,
    ) -> Self {
        Self {
            input,
            output,
            staging,
            kind,
            name,
            root,
            average,
            latch,
        }
    }

    /// The caller-owned input buffer. Never freed by this layer.
    pub fn input(&self) -> &TensorRef {
        &self.input
    }

    /// The caller-owned output buffer. Never freed by this layer.
    pub fn output(&self) -> &TensorRef {
        &self.output
    }

    /// The host staging buffer, if the operation crosses a device boundary.
    ///
    /// Output-sized. On submission the input's bytes occupy its front; the
    /// transport must leave the operation's result in it before signaling
    /// completion, and the completion path copies it back to the output
    /// buffer.
    pub fn staging(&self) -> Option<&[u8]> {
        self.staging.as_deref()
    }

    /// Mutable access to the staging buffer for the executing transport.
    pub fn staging_mut(&mut self) -> Option<&mut [u8]> {
        self.staging.as_deref_mut()
    }

    pub(crate) fn take_staging(&mut self) -> Option<Vec<u8>> {
        self.staging.take()
    }

    /// Operation kind, fixed at construction.
    pub fn kind(&self) -> OpKind {
        self.kind
    }

    /// Caller-supplied name identifying this logical operation instance.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Root rank. `Some` only for broadcast.
    pub fn root(&self) -> Option<Rank> {
        self.root
    }

    /// Whether a reduce should average instead of plain-sum.
    pub fn average(&self) -> bool {
        self.average
    }

    /// The completion latch shared with any waiter.
    pub fn latch(&self) -> &Arc<CompletionLatch> {
        &self.latch
    }
}

impl std::fmt::Debug for OperationDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperationDescriptor")
            .field("kind", &self.kind)
            .field("name", &self.name)
            .field("input", &self.input)
            .field("output", &self.output)
            .field("staged", &self.staging.is_some())
            .field("root", &self.root)
            .field("average", &self.average)
            .finish()
    }
}
