use crate::client::CollsyncClient;
use crate::collective::{submit, validate_common};
use crate::error::{CollsyncError, Result};
use crate::memory::TensorRef;
use crate::sync::OpHandle;
use crate::types::{OpKind, Priority};

/// Gather: concatenate every rank's `input` into `output`, ordered by rank.
/// The output must be sized to hold all participants' contributions.
pub(crate) fn gather(
    client: &CollsyncClient,
    input: TensorRef,
    output: TensorRef,
    name: &str,
    priority: Priority,
) -> Result<OpHandle> {
    validate_common(&input, &output, name)?;
    let expected = input.count() * client.world_size() as usize;
    if output.count() != expected {
        return Err(CollsyncError::CountMismatch {
            operation: OpKind::Gather.name(),
            expected,
            actual: output.count(),
        });
    }

    submit(
        client,
        input,
        output,
        OpKind::Gather,
        name,
        None,
        false,
        priority,
    )
}
