//! Shared engine double for the dispatch tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use collsync::sync::Completion;
use collsync::{
    CpuAdapter, DeviceAdapter, EngineTask, ExecutionEngine, OpKind, Priority, SubmitRejected,
};
use crossbeam_queue::SegQueue;

/// What the double saw at submission time.
pub struct SubmissionRecord {
    pub kind: OpKind,
    pub name: String,
    pub dep_count: usize,
    pub priority: Priority,
    pub staged: bool,
}

/// Test double for the external engine.
///
/// Each accepted task runs on its own spawned thread after a configurable
/// delay, so completions can be forced to land out of submission order. The
/// "transport" is an echo: input bytes end up at the front of the output
/// (directly for host buffers, via the staging buffer otherwise).
pub struct ThreadedEngine {
    default_delay: Duration,
    delays: Vec<Duration>,
    submitted: AtomicUsize,
    completed: Arc<AtomicUsize>,
    pub log: SegQueue<SubmissionRecord>,
}

impl ThreadedEngine {
    pub fn new(default_delay: Duration) -> Self {
        Self::with_delays(default_delay, Vec::new())
    }

    /// Per-submission delays, indexed by submission order; later
    /// submissions fall back to the default.
    pub fn with_delays(default_delay: Duration, delays: Vec<Duration>) -> Self {
        Self {
            default_delay,
            delays,
            submitted: AtomicUsize::new(0),
            completed: Arc::new(AtomicUsize::new(0)),
            log: SegQueue::new(),
        }
    }

    pub fn submitted(&self) -> usize {
        self.submitted.load(Ordering::SeqCst)
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    /// Spin until the double has completed `n` operations, so tests do not
    /// drop buffers while a worker still references them.
    pub fn settle(&self, n: usize) {
        while self.completed() < n {
            thread::sleep(Duration::from_millis(5));
        }
    }
}

impl ExecutionEngine for ThreadedEngine {
    fn submit(&self, mut task: EngineTask) -> Result<(), SubmitRejected> {
        let nth = self.submitted.fetch_add(1, Ordering::SeqCst);
        self.log.push(SubmissionRecord {
            kind: task.descriptor().kind(),
            name: task.descriptor().name().to_string(),
            dep_count: task.deps().len(),
            priority: task.priority(),
            staged: task.descriptor().staging().is_some(),
        });

        let delay = self.delays.get(nth).copied().unwrap_or(self.default_delay);
        let completed = Arc::clone(&self.completed);
        thread::spawn(move || {
            thread::sleep(delay);

            if task.staging_mut().is_none() {
                // Host buffers: echo input bytes straight to the output.
                let input = *task.descriptor().input();
                let output = *task.descriptor().output();
                let adapter = CpuAdapter::new();
                let data = unsafe {
                    adapter
                        .stage_to_host(input.ptr(), input.len_bytes())
                        .unwrap()
                };
                unsafe { adapter.unstage_from_host(&data, output.ptr()).unwrap() };
            }
            // Staged: the input already sits at the staging front and the
            // completion path copies it back to the output.

            task.complete(Completion::Success);
            completed.fetch_add(1, Ordering::SeqCst);
        });
        Ok(())
    }
}

/// Engine double that refuses everything.
pub struct RejectingEngine {
    pub reason: &'static str,
}

impl ExecutionEngine for RejectingEngine {
    fn submit(&self, task: EngineTask) -> Result<(), SubmitRejected> {
        Err(SubmitRejected {
            task,
            reason: self.reason.to_string(),
        })
    }
}
