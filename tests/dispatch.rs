//! End-to-end dispatch scenarios against the threaded engine double.

mod support;

use std::sync::Arc;
use std::time::{Duration, Instant};

use collsync::{
    CollsyncClient, CollsyncConfig, CollsyncError, CpuAdapter, DataType, ExecutionEngine, OpKind,
    OpStatus, Placement, Priority, TensorRef,
};
use support::{RejectingEngine, ThreadedEngine};

fn host_tensor(data: &[f32]) -> TensorRef {
    unsafe {
        TensorRef::new(
            data.as_ptr() as u64,
            data.len(),
            DataType::F32,
            Placement::Host,
        )
    }
}

fn host_tensor_mut(data: &mut [f32]) -> TensorRef {
    unsafe {
        TensorRef::new(
            data.as_mut_ptr() as u64,
            data.len(),
            DataType::F32,
            Placement::Host,
        )
    }
}

fn client_with(engine: Arc<ThreadedEngine>, world_size: u32) -> CollsyncClient {
    CollsyncClient::with_config(
        engine,
        Arc::new(CpuAdapter::new()),
        world_size,
        CollsyncConfig::default(),
    )
}

/// Scenario A: a blocking reduce returns only after the engine's delayed
/// completion, and reports success.
#[test]
fn blocking_reduce_waits_for_delayed_completion() {
    let delay = Duration::from_millis(150);
    let engine = Arc::new(ThreadedEngine::new(delay));
    let client = client_with(Arc::clone(&engine), 4);

    let input = vec![1.5f32, 2.5, 3.5, 4.5];
    let mut output = vec![0.0f32; 4];

    let start = Instant::now();
    let handle = client
        .reduce_handle(
            host_tensor(&input),
            host_tensor_mut(&mut output),
            "grad.layer0",
            false,
            Priority::High,
        )
        .unwrap();
    handle.wait().unwrap();

    assert!(
        start.elapsed() >= delay,
        "wait returned before the engine completed"
    );
    assert_eq!(output, input);
    assert_eq!(engine.submitted(), 1);

    let record = engine.log.pop().unwrap();
    assert_eq!(record.kind, OpKind::Reduce);
    assert_eq!(record.name, "grad.layer0");
    assert_eq!(record.priority, Priority::High);
    assert_eq!(record.dep_count, 2);
    assert!(!record.staged);
}

/// Scenario B: the non-blocking build returns Accepted strictly before the
/// double's completion fires.
#[cfg(not(feature = "blocking"))]
#[test]
fn nonblocking_reduce_returns_before_completion() {
    let engine = Arc::new(ThreadedEngine::new(Duration::from_millis(300)));
    let client = client_with(Arc::clone(&engine), 4);

    let input = vec![1.0f32; 8];
    let mut output = vec![0.0f32; 8];

    let status = client
        .reduce(
            host_tensor(&input),
            host_tensor_mut(&mut output),
            "grad.layer1",
            true,
            Priority::Normal,
        )
        .unwrap();

    assert_eq!(status, OpStatus::Accepted);
    assert_eq!(engine.completed(), 0, "completion fired before the call returned");

    engine.settle(1);
}

/// The blocking build's entry points return Completed instead.
#[cfg(feature = "blocking")]
#[test]
fn blocking_build_reduce_returns_completed() {
    let engine = Arc::new(ThreadedEngine::new(Duration::from_millis(50)));
    let client = client_with(Arc::clone(&engine), 4);

    let input = vec![1.0f32; 8];
    let mut output = vec![0.0f32; 8];

    let status = client
        .reduce(
            host_tensor(&input),
            host_tensor_mut(&mut output),
            "grad.layer1",
            true,
            Priority::Normal,
        )
        .unwrap();

    assert_eq!(status, OpStatus::Completed);
    assert_eq!(engine.completed(), 1);
}

/// Scenario C: an out-of-range broadcast root fails validation before the
/// double's submit is ever invoked.
#[test]
fn invalid_broadcast_root_never_submitted() {
    let engine = Arc::new(ThreadedEngine::new(Duration::from_millis(1)));
    let client = client_with(Arc::clone(&engine), 4);

    let input = vec![1.0f32; 2];
    let mut output = vec![0.0f32; 2];

    let err = client
        .broadcast(
            host_tensor(&input),
            host_tensor_mut(&mut output),
            "weights",
            4, // world size is 4, valid roots are 0..=3
            Priority::Normal,
        )
        .unwrap_err();

    assert!(matches!(
        err,
        CollsyncError::InvalidRoot {
            root: 4,
            world_size: 4
        }
    ));
    assert_eq!(engine.submitted(), 0);
    assert!(engine.log.pop().is_none());
}

/// Scenario D: two blocking waits on independent descriptors, completed out
/// of submission order. Each wait wakes only for its own operation.
#[test]
fn out_of_order_completion_wakes_only_own_waiter() {
    let engine = Arc::new(ThreadedEngine::with_delays(
        Duration::from_millis(1),
        vec![Duration::from_millis(400), Duration::from_millis(50)],
    ));
    let client = client_with(Arc::clone(&engine), 2);

    let input_a = vec![1.0f32; 2];
    let mut output_a = vec![0.0f32; 2];
    let input_b = vec![2.0f32; 2];
    let mut output_b = vec![0.0f32; 2];

    let slow = client
        .reduce_handle(
            host_tensor(&input_a),
            host_tensor_mut(&mut output_a),
            "slow",
            false,
            Priority::Normal,
        )
        .unwrap();
    let fast = client
        .reduce_handle(
            host_tensor(&input_b),
            host_tensor_mut(&mut output_b),
            "fast",
            false,
            Priority::Normal,
        )
        .unwrap();

    // The second submission completes first.
    fast.wait().unwrap();
    assert!(
        !slow.is_finished(),
        "fast completion cross-signaled the slow descriptor"
    );
    assert_eq!(output_b, input_b);

    slow.wait().unwrap();
    assert_eq!(output_a, input_a);
}

/// Gather sizes the output for all participants and flows through staging
/// when the buffers live off-host.
#[test]
fn gather_with_accelerator_buffers_uses_staging() {
    let engine = Arc::new(ThreadedEngine::new(Duration::from_millis(10)));
    let client = client_with(Arc::clone(&engine), 4);

    // Host memory standing in for device buffers; the Accelerator placement
    // is what forces the staging path.
    let input = vec![7.0f32, 8.0];
    let mut output = vec![0.0f32; 8];
    let input_ref = unsafe {
        TensorRef::new(
            input.as_ptr() as u64,
            input.len(),
            DataType::F32,
            Placement::Accelerator(0),
        )
    };
    let output_ref = unsafe {
        TensorRef::new(
            output.as_mut_ptr() as u64,
            output.len(),
            DataType::F32,
            Placement::Accelerator(0),
        )
    };

    let handle = client
        .gather_handle(input_ref, output_ref, "activations", Priority::Low)
        .unwrap();
    handle.wait().unwrap();

    let record = engine.log.pop().unwrap();
    assert_eq!(record.kind, OpKind::Gather);
    assert!(record.staged);

    // The echo transport left the input at the staging front; copy-back
    // landed it at the start of the output.
    assert_eq!(&output[..2], &input[..]);
    assert_eq!(&output[2..], &[0.0; 6]);
}

/// Broadcast with a valid root round-trips.
#[test]
fn broadcast_valid_root_completes() {
    let engine = Arc::new(ThreadedEngine::new(Duration::from_millis(10)));
    let client = client_with(Arc::clone(&engine), 3);

    let input = vec![42.0f32, 43.0, 44.0];
    let mut output = vec![0.0f32; 3];

    let handle = client
        .broadcast_handle(
            host_tensor(&input),
            host_tensor_mut(&mut output),
            "model.weights",
            2,
            Priority::Normal,
        )
        .unwrap();
    handle.wait().unwrap();
    assert_eq!(output, input);
}

/// A rejected submission reports synchronously and leaves nothing in
/// flight.
#[test]
fn rejected_submission_reports_synchronously() {
    let client = CollsyncClient::with_config(
        Arc::new(RejectingEngine {
            reason: "resource exhausted",
        }),
        Arc::new(CpuAdapter::new()),
        2,
        CollsyncConfig::default(),
    );

    let input = vec![1.0f32; 2];
    let mut output = vec![0.0f32; 2];

    let err = client
        .reduce(
            host_tensor(&input),
            host_tensor_mut(&mut output),
            "grad",
            false,
            Priority::Normal,
        )
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "reduce \"grad\" rejected by engine: resource exhausted"
    );
}

/// Disabling dependency tracking submits with an empty dep list.
#[test]
fn dep_tracking_can_be_disabled() {
    let engine = Arc::new(ThreadedEngine::new(Duration::from_millis(1)));
    let config = CollsyncConfig {
        track_buffer_deps: false,
        ..CollsyncConfig::default()
    };
    let client = CollsyncClient::with_config(
        Arc::clone(&engine) as Arc<dyn ExecutionEngine>,
        Arc::new(CpuAdapter::new()),
        2,
        config,
    );

    let input = vec![1.0f32; 2];
    let mut output = vec![0.0f32; 2];

    let handle = client
        .reduce_handle(
            host_tensor(&input),
            host_tensor_mut(&mut output),
            "grad",
            false,
            Priority::Normal,
        )
        .unwrap();
    handle.wait().unwrap();

    let record = engine.log.pop().unwrap();
    assert_eq!(record.dep_count, 0);
}
