//! Opaque-pointer lifecycle adapter for engines that cannot hold a typed
//! [`EngineTask`].
//!
//! Some host runtimes carry per-operation context as a bare pointer and
//! promise only to pass it through and hand it back once. This module is the
//! whole extent of that pattern in collsync: a symmetric create/consume pair
//! around `Box::into_raw`/`Box::from_raw`. Everywhere else, tasks move by
//! typed ownership.

use std::ffi::c_void;

use crate::engine::EngineTask;
use crate::sync::Completion;

/// Box a task and return it as an opaque pointer.
///
/// The pointer must be consumed exactly once, by either
/// [`complete_opaque`] or [`destroy_opaque`].
pub fn into_opaque(task: EngineTask) -> *mut c_void {
    Box::into_raw(Box::new(task)) as *mut c_void
}

/// Reconstitute the task and run its completion path (staging copy-back,
/// latch signal, teardown).
///
/// # Safety
/// `ptr` must have come from [`into_opaque`] and must not have been consumed
/// before; it is invalid after this call.
pub unsafe fn complete_opaque(ptr: *mut c_void, outcome: Completion) {
    let task = unsafe { Box::from_raw(ptr as *mut EngineTask) };
    task.complete(outcome);
}

/// Tear a task down without signaling completion.
///
/// Only for abandoning a task that was never accepted for execution; any
/// thread already waiting on the operation would otherwise never wake.
///
/// # Safety
/// Same contract as [`complete_opaque`].
pub unsafe fn destroy_opaque(ptr: *mut c_void) {
    drop(unsafe { Box::from_raw(ptr as *mut EngineTask) });
}
