use crate::error::Result;

/// Bridges device memory with the host staging buffers collsync owns.
///
/// The collective transport behind the execution engine reads and writes
/// host memory. When an operation's buffers live on an accelerator, the
/// dispatch layer stages the input into a host buffer before submission and
/// copies the result back to the output buffer at completion time; the
/// `DeviceAdapter` performs those two copies.
///
/// - `CpuAdapter` (built-in): plain memcpy for host memory.
/// - GPU adapters: device-to-host / host-to-device copies (implemented
///   externally, against the engine's native stream API).
pub trait DeviceAdapter: Send + Sync {
    /// Copy `len_bytes` starting at `ptr` into a fresh host buffer.
    ///
    /// For CPU: read directly from the pointer.
    /// For GPU: device-to-host copy.
    ///
    /// # Safety
    /// `ptr` must be a valid pointer to at least `len_bytes` bytes.
    unsafe fn stage_to_host(&self, ptr: u64, len_bytes: usize) -> Result<Vec<u8>>;

    /// Copy a host buffer back out to `dst_ptr`.
    ///
    /// For CPU: write directly through the pointer.
    /// For GPU: host-to-device copy.
    ///
    /// # Safety
    /// `dst_ptr` must be a valid pointer to at least `data.len()` bytes.
    unsafe fn unstage_from_host(&self, data: &[u8], dst_ptr: u64) -> Result<()>;
}
