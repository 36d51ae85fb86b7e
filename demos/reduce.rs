//! Dispatch a reduce to a toy single-worker engine and block on its
//! completion.
//!
//! The worker stands in for the external execution engine: it pulls tasks
//! off a channel on its own thread, "executes" them by echoing the input
//! into the output, and signals completion. The main thread submits and
//! waits on the returned handle.
//!
//! ```bash
//! cargo run --example reduce
//! ```

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use collsync::sync::Completion;
use collsync::{
    CollsyncClient, CpuAdapter, DataType, DeviceAdapter, EngineTask, ExecutionEngine, Placement,
    Priority, SubmitRejected, TensorRef,
};

struct WorkerEngine {
    tx: Mutex<mpsc::Sender<EngineTask>>,
}

impl WorkerEngine {
    fn spawn() -> (Arc<Self>, thread::JoinHandle<()>) {
        let (tx, rx) = mpsc::channel::<EngineTask>();
        let worker = thread::spawn(move || {
            for task in rx {
                // Simulated transport latency.
                thread::sleep(Duration::from_millis(100));

                let input = *task.descriptor().input();
                let output = *task.descriptor().output();
                let adapter = CpuAdapter::new();
                let data = unsafe {
                    adapter
                        .stage_to_host(input.ptr(), input.len_bytes())
                        .unwrap()
                };
                unsafe { adapter.unstage_from_host(&data, output.ptr()).unwrap() };

                task.complete(Completion::Success);
            }
        });
        (Arc::new(Self { tx: Mutex::new(tx) }), worker)
    }
}

impl ExecutionEngine for WorkerEngine {
    fn submit(&self, task: EngineTask) -> Result<(), SubmitRejected> {
        let tx = self.tx.lock().unwrap();
        tx.send(task).map_err(|e| SubmitRejected {
            task: e.0,
            reason: "worker stopped".into(),
        })
    }
}

fn main() -> collsync::Result<()> {
    tracing_subscriber::fmt().init();

    let (engine, worker) = WorkerEngine::spawn();
    let client = CollsyncClient::new(
        Arc::clone(&engine) as Arc<dyn ExecutionEngine>,
        Arc::new(CpuAdapter::new()),
        4,
    );

    let input = vec![0.5f32; 8];
    let mut output = vec![0.0f32; 8];
    let input_ref =
        unsafe { TensorRef::new(input.as_ptr() as u64, 8, DataType::F32, Placement::Host) };
    let output_ref =
        unsafe { TensorRef::new(output.as_mut_ptr() as u64, 8, DataType::F32, Placement::Host) };

    let handle = client.reduce_handle(input_ref, output_ref, "demo.grad", false, Priority::Normal)?;
    println!("submitted, waiting for the engine...");
    handle.wait()?;
    println!("completed: {output:?}");

    // Close the channel so the worker exits.
    drop(client);
    drop(engine);
    worker.join().unwrap();
    Ok(())
}
