use crate::types::{DataType, Rank};

pub type Result<T> = std::result::Result<T, CollsyncError>;

#[derive(Debug, thiserror::Error)]
pub enum CollsyncError {
    #[error("element type mismatch: input is {input}, output is {output}")]
    DTypeMismatch { input: DataType, output: DataType },

    #[error("{operation} output holds {actual} elements, expected {expected}")]
    CountMismatch {
        operation: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("invalid root rank {root}: world size is {world_size}")]
    InvalidRoot { root: Rank, world_size: u32 },

    #[error("operation name must not be empty")]
    EmptyName,

    #[error("{operation} \"{name}\" rejected by engine: {reason}")]
    SubmissionRejected {
        operation: &'static str,
        name: String,
        reason: String,
    },

    #[error("{operation} \"{name}\" failed in engine: {reason}")]
    Execution {
        operation: &'static str,
        name: String,
        reason: String,
    },

    #[error("device staging error: {message}")]
    Device {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl CollsyncError {
    /// Create a `Device` error with just a message.
    pub fn device(msg: impl Into<String>) -> Self {
        Self::Device {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a `Device` error with a message and a source error.
    pub fn device_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Device {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }
}
