/// Rank of a participant in a communicator group (0-indexed).
pub type Rank = u32;

/// Element types supported for collective operation buffers.
///
/// collsync defines its own type enum so it remains a standalone
/// library usable with any host tensor engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DataType {
    F32 = 0,
    F64 = 1,
    F16 = 2,
    BF16 = 3,
    I8 = 4,
    I32 = 5,
    I64 = 6,
    U8 = 7,
    U32 = 8,
    U64 = 9,
}

impl DataType {
    /// Size of one element in bytes.
    pub const fn size_in_bytes(self) -> usize {
        match self {
            DataType::F32 | DataType::I32 | DataType::U32 => 4,
            DataType::F64 | DataType::I64 | DataType::U64 => 8,
            DataType::F16 | DataType::BF16 => 2,
            DataType::I8 | DataType::U8 => 1,
        }
    }

    /// Human-readable name.
    pub const fn name(self) -> &'static str {
        match self {
            DataType::F32 => "f32",
            DataType::F64 => "f64",
            DataType::F16 => "f16",
            DataType::BF16 => "bf16",
            DataType::I8 => "i8",
            DataType::I32 => "i32",
            DataType::I64 => "i64",
            DataType::U8 => "u8",
            DataType::U32 => "u32",
            DataType::U64 => "u64",
        }
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// The collective operations this layer dispatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKind {
    /// Element-wise sum across ranks, optionally averaged.
    Reduce,
    /// Concatenation of every rank's buffer, ordered by rank.
    Gather,
    /// Distribution of the root rank's buffer to all ranks.
    Broadcast,
}

impl OpKind {
    /// Operation name as used in logs and error messages.
    pub const fn name(self) -> &'static str {
        match self {
            OpKind::Reduce => "reduce",
            OpKind::Gather => "gather",
            OpKind::Broadcast => "broadcast",
        }
    }
}

impl std::fmt::Display for OpKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Scheduling hint forwarded to the execution engine with each submission.
///
/// The engine owns scheduling; this is advisory only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Priority {
    /// Schedule ahead of normal work (e.g. gradients on the critical path).
    High = 0,
    /// Default ordering.
    Normal = 1,
    /// Background transfers.
    Low = 2,
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Normal
    }
}

/// Outcome of a successful dispatch call.
///
/// `Accepted` is returned by the non-blocking build: the engine has taken
/// the operation and will complete it on its own schedule. `Completed` is
/// returned by the blocking build, after the completion signal arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpStatus {
    Accepted,
    Completed,
}
