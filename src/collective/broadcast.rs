use crate::client::CollsyncClient;
use crate::collective::{submit, validate_common};
use crate::error::{CollsyncError, Result};
use crate::memory::TensorRef;
use crate::sync::OpHandle;
use crate::types::{OpKind, Priority, Rank};

/// Broadcast: distribute the root rank's `input` into every rank's
/// `output`. The root must name a valid participant; this is checked here,
/// before any descriptor or latch exists.
pub(crate) fn broadcast(
    client: &CollsyncClient,
    input: TensorRef,
    output: TensorRef,
    name: &str,
    root: Rank,
    priority: Priority,
) -> Result<OpHandle> {
    validate_common(&input, &output, name)?;
    if root >= client.world_size() {
        return Err(CollsyncError::InvalidRoot {
            root,
            world_size: client.world_size(),
        });
    }
    if output.count() != input.count() {
        return Err(CollsyncError::CountMismatch {
            operation: OpKind::Broadcast.name(),
            expected: input.count(),
            actual: output.count(),
        });
    }

    submit(
        client,
        input,
        output,
        OpKind::Broadcast,
        name,
        Some(root),
        false,
        priority,
    )
}
