//! Dispatch of collective operations to the execution engine.
//!
//! Each entry point validates its arguments, decides whether a host staging
//! copy is needed, bundles an [`OperationDescriptor`] with a fresh
//! completion latch, and submits the resulting task to the engine. All
//! failures up to and including submission are reported synchronously, with
//! no engine interaction left behind; everything after acceptance is
//! reported through the completion latch.

mod broadcast;
mod gather;
mod reduce;

pub(crate) use broadcast::broadcast;
pub(crate) use gather::gather;
pub(crate) use reduce::reduce;

use std::sync::Arc;

use crate::client::CollsyncClient;
use crate::descriptor::OperationDescriptor;
use crate::engine::{AccessMode, BufferDep, EngineTask};
use crate::error::{CollsyncError, Result};
use crate::memory::TensorRef;
use crate::sync::{CompletionLatch, OpHandle};
use crate::types::{OpKind, Priority, Rank};

/// Whether a dispatch call waits for completion before returning.
///
/// The public entry points pick the mode at compile time (the `blocking`
/// cargo feature); this stays a runtime value so both paths are testable in
/// one build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WaitMode {
    Block,
    Detach,
}

pub(crate) fn active_wait_mode() -> WaitMode {
    if cfg!(feature = "blocking") {
        WaitMode::Block
    } else {
        WaitMode::Detach
    }
}

/// Checks shared by all three operations.
pub(crate) fn validate_common(input: &TensorRef, output: &TensorRef, name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(CollsyncError::EmptyName);
    }
    if input.dtype() != output.dtype() {
        return Err(CollsyncError::DTypeMismatch {
            input: input.dtype(),
            output: output.dtype(),
        });
    }
    Ok(())
}

/// Build the descriptor and hand it to the engine.
///
/// Runs after validation; returns the handle wrapping the operation's
/// latch. On engine rejection the task (descriptor, staging buffer, and
/// latch) is discarded on the spot and no completion is ever signaled.
#[allow(clippy::too_many_arguments)]
pub(crate) fn submit(
    client: &CollsyncClient,
    input: TensorRef,
    output: TensorRef,
    kind: OpKind,
    name: &str,
    root: Option<Rank>,
    average: bool,
    priority: Priority,
) -> Result<OpHandle> {
    let config = client.config();
    let adapter = client.adapter();

    let needs_staging = config.force_host_staging
        || !input.placement().is_host()
        || !output.placement().is_host();
    let staging = if needs_staging {
        let mut buf = unsafe { adapter.stage_to_host(input.ptr(), input.len_bytes())? };
        // Output-sized; the transport leaves the result here.
        buf.resize(output.len_bytes(), 0);
        Some(buf)
    } else {
        None
    };

    let latch = Arc::new(CompletionLatch::new());
    let handle = OpHandle::new(Arc::clone(&latch), kind, name.to_string());

    let descriptor = OperationDescriptor::new(
        input,
        output,
        staging,
        kind,
        name.to_string(),
        root,
        average,
        latch,
    );

    let deps = if config.track_buffer_deps {
        vec![
            BufferDep {
                addr: input.ptr(),
                mode: AccessMode::Read,
            },
            BufferDep {
                addr: output.ptr(),
                mode: AccessMode::Write,
            },
        ]
    } else {
        Vec::new()
    };

    tracing::debug!(
        op = kind.name(),
        name,
        staged = needs_staging,
        "submitting collective"
    );

    let task = EngineTask::new(descriptor, deps, priority, Arc::clone(adapter));
    if let Err(rejected) = client.engine().submit(task) {
        tracing::warn!(
            op = kind.name(),
            name,
            "engine rejected submission: {}",
            rejected.reason
        );
        // `rejected.task` is dropped with it: descriptor and latch discarded.
        return Err(CollsyncError::SubmissionRejected {
            operation: kind.name(),
            name: name.to_string(),
            reason: rejected.reason,
        });
    }

    Ok(handle)
}
