use crate::device::adapter::DeviceAdapter;
use crate::error::Result;

/// DeviceAdapter for host (CPU) memory. Direct pointer access, no device
/// transfers involved.
#[derive(Debug, Clone, Default)]
pub struct CpuAdapter;

impl CpuAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl DeviceAdapter for CpuAdapter {
    unsafe fn stage_to_host(&self, ptr: u64, len_bytes: usize) -> Result<Vec<u8>> {
        let slice = unsafe { std::slice::from_raw_parts(ptr as *const u8, len_bytes) };
        Ok(slice.to_vec())
    }

    unsafe fn unstage_from_host(&self, data: &[u8], dst_ptr: u64) -> Result<()> {
        let dst = dst_ptr as *mut u8;
        unsafe {
            std::ptr::copy_nonoverlapping(data.as_ptr(), dst, data.len());
        }
        Ok(())
    }
}
