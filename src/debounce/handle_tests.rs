//! Tests for the tokio timer driver
//!
//! All tests run on a paused clock: `sleep` auto-advances virtual time,
//! and the driver's own sleeps fire deterministically in between.

use super::*;
use std::sync::{Arc, Mutex as StdMutex};
use tokio::time::sleep;

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

/// Handle around an operation that records every execution's argument
/// and returns it.
fn spawn_recording(
    wait_ms: u64,
    options: DebounceOptions,
) -> (DebounceHandle<u32, u32>, Arc<StdMutex<Vec<u32>>>) {
    let executed = Arc::new(StdMutex::new(Vec::new()));
    let log = Arc::clone(&executed);
    let handle = DebounceHandle::spawn(
        move |n: u32| {
            log.lock().unwrap().push(n);
            n
        },
        ms(wait_ms),
        options,
    )
    .unwrap();
    (handle, executed)
}

fn executions(executed: &Arc<StdMutex<Vec<u32>>>) -> Vec<u32> {
    executed.lock().unwrap().clone()
}

#[tokio::test(start_paused = true)]
async fn test_trailing_edge_fires_without_polling() {
    let (handle, executed) = spawn_recording(500, DebounceOptions::default());

    assert_eq!(handle.call(1), None);
    assert!(handle.is_pending());

    sleep(ms(499)).await;
    assert!(executions(&executed).is_empty());

    sleep(ms(2)).await;
    assert_eq!(executions(&executed), vec![1]);
    assert!(!handle.is_pending());
    assert_eq!(handle.last_result(), Some(1));
}

#[tokio::test(start_paused = true)]
async fn test_burst_collapses_to_last_args() {
    let (handle, executed) = spawn_recording(500, DebounceOptions::default());

    handle.call(1);
    sleep(ms(100)).await;
    handle.call(2);
    sleep(ms(100)).await;
    handle.call(3);

    // Quiet period restarts with every call
    sleep(ms(499)).await;
    assert!(executions(&executed).is_empty());

    sleep(ms(2)).await;
    assert_eq!(executions(&executed), vec![3]);
}

#[tokio::test(start_paused = true)]
async fn test_leading_edge_executes_synchronously() {
    let (handle, executed) =
        spawn_recording(500, DebounceOptions::new().leading(true).trailing(false));

    assert_eq!(handle.call(1), Some(1));
    assert_eq!(executions(&executed), vec![1]);

    handle.call(2);
    handle.call(3);
    sleep(ms(600)).await;
    assert_eq!(executions(&executed), vec![1]);

    // Next burst after the quiet period hits the leading edge again
    assert_eq!(handle.call(4), Some(4));
    assert_eq!(executions(&executed), vec![1, 4]);
}

#[tokio::test(start_paused = true)]
async fn test_max_wait_fires_under_sustained_calls() {
    let (handle, executed) =
        spawn_recording(500, DebounceOptions::new().max_wait(ms(2_000)));

    // A call every 200ms: the quiet period never elapses, the ceiling
    // forces execution at the 2s mark
    for i in 0..10u32 {
        handle.call(i);
        sleep(ms(200)).await;
    }

    sleep(ms(50)).await;
    assert_eq!(executions(&executed), vec![9]);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_suppresses_pending_execution() {
    let (handle, executed) = spawn_recording(500, DebounceOptions::default());

    handle.call(1);
    handle.cancel();
    handle.cancel();

    sleep(ms(1_000)).await;
    assert!(executions(&executed).is_empty());
    assert!(!handle.is_pending());
    assert_eq!(handle.last_result(), None);
}

#[tokio::test(start_paused = true)]
async fn test_flush_executes_synchronously_and_timer_stays_quiet() {
    let (handle, executed) = spawn_recording(500, DebounceOptions::default());

    handle.call(1);
    assert_eq!(handle.flush(), Some(1));
    assert_eq!(executions(&executed), vec![1]);

    // The deadline armed for the flushed burst must not fire again
    sleep(ms(600)).await;
    assert_eq!(executions(&executed), vec![1]);
}

#[tokio::test(start_paused = true)]
async fn test_flush_when_idle_is_a_no_op() {
    let (handle, executed) = spawn_recording(500, DebounceOptions::default());

    assert_eq!(handle.flush(), None);
    assert!(executions(&executed).is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_result_retained_across_bursts() {
    let (handle, executed) = spawn_recording(500, DebounceOptions::default());

    handle.call(1);
    sleep(ms(510)).await;
    assert_eq!(handle.last_result(), Some(1));

    // Rescheduling calls surface the retained result
    assert_eq!(handle.call(2), Some(1));
    assert_eq!(handle.flush(), Some(2));
    assert_eq!(executions(&executed), vec![1, 2]);
}

#[tokio::test(start_paused = true)]
async fn test_drop_cancels_pending_timer() {
    let (handle, executed) = spawn_recording(500, DebounceOptions::default());

    handle.call(1);
    drop(handle);

    sleep(ms(1_000)).await;
    assert!(executions(&executed).is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_panicking_operation_does_not_kill_the_timer_task() {
    let executed = Arc::new(StdMutex::new(Vec::new()));
    let log = Arc::clone(&executed);
    let handle = DebounceHandle::spawn(
        move |n: u32| {
            if n == 13 {
                panic!("unlucky");
            }
            log.lock().unwrap().push(n);
            n
        },
        ms(500),
        DebounceOptions::default(),
    )
    .unwrap();

    // Timer-turn panic is logged, not propagated; state was reset first
    handle.call(13);
    sleep(ms(600)).await;
    assert!(executions(&executed).is_empty());
    assert_eq!(handle.last_result(), None);

    // The task keeps serving later bursts
    handle.call(2);
    sleep(ms(600)).await;
    assert_eq!(executions(&executed), vec![2]);
    assert_eq!(handle.last_result(), Some(2));
}
