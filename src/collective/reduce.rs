use crate::client::CollsyncClient;
use crate::collective::{submit, validate_common};
use crate::error::{CollsyncError, Result};
use crate::memory::TensorRef;
use crate::sync::OpHandle;
use crate::types::{OpKind, Priority};

/// Sum-reduce: combine corresponding elements of `input` across all ranks
/// into `output`, optionally averaging by world size. Input and output must
/// have the same shape on every rank.
pub(crate) fn reduce(
    client: &CollsyncClient,
    input: TensorRef,
    output: TensorRef,
    name: &str,
    average: bool,
    priority: Priority,
) -> Result<OpHandle> {
    validate_common(&input, &output, name)?;
    if output.count() != input.count() {
        return Err(CollsyncError::CountMismatch {
            operation: OpKind::Reduce.name(),
            expected: input.count(),
            actual: output.count(),
        });
    }

    submit(
        client,
        input,
        output,
        OpKind::Reduce,
        name,
        None,
        average,
        priority,
    )
}
