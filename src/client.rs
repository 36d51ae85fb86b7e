//! The caller-facing dispatch surface.

use std::sync::Arc;

use crate::collective::{self, WaitMode};
use crate::config::CollsyncConfig;
use crate::device::DeviceAdapter;
use crate::engine::ExecutionEngine;
use crate::error::Result;
use crate::memory::TensorRef;
use crate::sync::OpHandle;
use crate::types::{OpStatus, Priority, Rank};

/// Issues collective operations against an external execution engine.
///
/// Holds the engine, the device adapter used for staging copies, the world
/// size of the communicator group, and tuning config. The client itself is
/// stateless across operations: every call produces an independent
/// descriptor/latch pair, and two in-flight operations share nothing but
/// whatever ordering the engine imposes through buffer dependencies.
///
/// Whether `reduce`/`gather`/`broadcast` block until completion is a build
/// mode: with the `blocking` cargo feature they return only after the
/// engine's completion signal; without it they return `Accepted` right
/// after submission. The `*_handle` variants are independent of the build
/// mode and always hand back an [`OpHandle`] to wait on explicitly.
pub struct CollsyncClient {
    engine: Arc<dyn ExecutionEngine>,
    adapter: Arc<dyn DeviceAdapter>,
    world_size: u32,
    config: CollsyncConfig,
}

impl CollsyncClient {
    /// Create a client with config loaded from the environment.
    pub fn new(
        engine: Arc<dyn ExecutionEngine>,
        adapter: Arc<dyn DeviceAdapter>,
        world_size: u32,
    ) -> Self {
        Self::with_config(engine, adapter, world_size, CollsyncConfig::from_env())
    }

    /// Create a client with explicit config.
    pub fn with_config(
        engine: Arc<dyn ExecutionEngine>,
        adapter: Arc<dyn DeviceAdapter>,
        world_size: u32,
        config: CollsyncConfig,
    ) -> Self {
        Self {
            engine,
            adapter,
            world_size,
            config,
        }
    }

    /// Total number of ranks in the communicator group.
    pub fn world_size(&self) -> u32 {
        self.world_size
    }

    pub(crate) fn engine(&self) -> &Arc<dyn ExecutionEngine> {
        &self.engine
    }

    pub(crate) fn adapter(&self) -> &Arc<dyn DeviceAdapter> {
        &self.adapter
    }

    pub(crate) fn config(&self) -> &CollsyncConfig {
        &self.config
    }

    /// Sum-reduce `input` across all ranks into `output`, averaging by
    /// world size when `average` is set.
    ///
    /// `name` identifies this logical operation instance; it must be unique
    /// among concurrently in-flight operations of the same kind (the
    /// transport uses it to correlate participants across processes).
    ///
    /// # Safety contract
    /// Both buffers are caller-owned and must stay valid until the engine
    /// reports the operation complete. In the non-blocking build that is
    /// after this call returns, per the engine's own dependency tracking.
    pub fn reduce(
        &self,
        input: TensorRef,
        output: TensorRef,
        name: &str,
        average: bool,
        priority: Priority,
    ) -> Result<OpStatus> {
        let handle = collective::reduce(self, input, output, name, average, priority)?;
        conclude(handle, collective::active_wait_mode())
    }

    /// Gather every rank's `input` into `output`, ordered by rank. The
    /// output must hold `input.count() * world_size()` elements.
    pub fn gather(
        &self,
        input: TensorRef,
        output: TensorRef,
        name: &str,
        priority: Priority,
    ) -> Result<OpStatus> {
        let handle = collective::gather(self, input, output, name, priority)?;
        conclude(handle, collective::active_wait_mode())
    }

    /// Distribute rank `root`'s `input` into every rank's `output`.
    pub fn broadcast(
        &self,
        input: TensorRef,
        output: TensorRef,
        name: &str,
        root: Rank,
        priority: Priority,
    ) -> Result<OpStatus> {
        let handle = collective::broadcast(self, input, output, name, root, priority)?;
        conclude(handle, collective::active_wait_mode())
    }

    /// Like [`reduce`](Self::reduce), but always returns a handle to wait
    /// on explicitly, regardless of build mode.
    pub fn reduce_handle(
        &self,
        input: TensorRef,
        output: TensorRef,
        name: &str,
        average: bool,
        priority: Priority,
    ) -> Result<OpHandle> {
        collective::reduce(self, input, output, name, average, priority)
    }

    /// Like [`gather`](Self::gather), but always returns a handle.
    pub fn gather_handle(
        &self,
        input: TensorRef,
        output: TensorRef,
        name: &str,
        priority: Priority,
    ) -> Result<OpHandle> {
        collective::gather(self, input, output, name, priority)
    }

    /// Like [`broadcast`](Self::broadcast), but always returns a handle.
    pub fn broadcast_handle(
        &self,
        input: TensorRef,
        output: TensorRef,
        name: &str,
        root: Rank,
        priority: Priority,
    ) -> Result<OpHandle> {
        collective::broadcast(self, input, output, name, root, priority)
    }
}

fn conclude(handle: OpHandle, mode: WaitMode) -> Result<OpStatus> {
    match mode {
        WaitMode::Block => {
            handle.wait()?;
            Ok(OpStatus::Completed)
        }
        WaitMode::Detach => Ok(OpStatus::Accepted),
    }
}
