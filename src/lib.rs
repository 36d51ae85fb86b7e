pub mod client;
pub mod collective;
pub mod config;
pub mod descriptor;
pub mod device;
pub mod engine;
pub mod error;
pub mod memory;
pub mod sync;
pub mod types;

pub use client::CollsyncClient;
pub use config::CollsyncConfig;
pub use descriptor::OperationDescriptor;
pub use device::{CpuAdapter, DeviceAdapter};
pub use engine::{AccessMode, BufferDep, EngineTask, ExecutionEngine, SubmitRejected};
pub use error::{CollsyncError, Result};
pub use memory::{Placement, TensorRef};
pub use sync::{Completion, CompletionLatch, OpHandle};
pub use types::{DataType, OpKind, OpStatus, Priority, Rank};
