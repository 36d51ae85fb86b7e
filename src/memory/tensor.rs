//! Engine-native buffer handles.
//!
//! A [`TensorRef`] is a thin view of caller-owned tensor memory: a raw `u64`
//! pointer, an element count, an element type, and a device placement. The
//! placement is what the dispatch layer consults to decide whether an
//! operation needs a host staging copy. collsync never allocates or frees
//! the memory a `TensorRef` points at.

use crate::types::DataType;

/// Where a buffer physically lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placement {
    /// Host (CPU) memory, directly addressable by the collective transport.
    Host,
    /// Accelerator memory on the given device ordinal. Not addressable by
    /// the transport; crossing this boundary requires a staging copy.
    Accelerator(u32),
}

impl Placement {
    /// Returns true for host memory.
    pub const fn is_host(self) -> bool {
        matches!(self, Placement::Host)
    }
}

impl std::fmt::Display for Placement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Placement::Host => f.write_str("host"),
            Placement::Accelerator(ordinal) => write!(f, "accel:{ordinal}"),
        }
    }
}

/// A view of a caller-owned tensor buffer.
///
/// The caller retains ownership of the underlying memory and must keep it
/// valid for the full lifetime of any operation referencing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TensorRef {
    ptr: u64,
    count: usize,
    dtype: DataType,
    placement: Placement,
}

impl TensorRef {
    /// Create a view of `count` elements of `dtype` starting at `ptr`.
    ///
    /// # Safety
    /// `ptr` must point to at least `count * dtype.size_in_bytes()` bytes of
    /// valid memory in the given placement, and stay valid for as long as
    /// any operation referencing this view is in flight.
    pub unsafe fn new(ptr: u64, count: usize, dtype: DataType, placement: Placement) -> Self {
        Self {
            ptr,
            count,
            dtype,
            placement,
        }
    }

    /// Raw address of the first element.
    pub fn ptr(&self) -> u64 {
        self.ptr
    }

    /// Number of elements.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Element type.
    pub fn dtype(&self) -> DataType {
        self.dtype
    }

    /// Device placement.
    pub fn placement(&self) -> Placement {
        self.placement
    }

    /// Total size in bytes.
    pub fn len_bytes(&self) -> usize {
        self.count * self.dtype.size_in_bytes()
    }

    /// Returns true if the buffer has zero length.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

impl std::fmt::Display for TensorRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "TensorRef(0x{:x}, {}x{}, {})",
            self.ptr, self.count, self.dtype, self.placement
        )
    }
}
