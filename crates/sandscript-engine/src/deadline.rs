//! Wall-clock deadline enforcement for one script execution.
//!
//! Scripts cannot be trusted to check a cancellation flag themselves,
//! so the work runs on a worker thread while this guard observes
//! elapsed time from outside. On expiry the shared cancel flag is set —
//! the evaluator polls it on its tick counter, so script code is always
//! interruptible — and the worker is abandoned rather than joined.
//!
//! Known limitation: a worker blocked inside a host executor call
//! cannot be preempted until that call returns. The thread is detached,
//! so the caller is never starved, but the OS thread lives until the
//! blocking call finishes.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use thiserror::Error;

/// Why `run_with_deadline` produced no value.
#[derive(Debug, Error)]
pub enum DeadlineError {
    /// The deadline fired before the work completed.
    #[error("deadline of {0:?} exceeded")]
    Expired(Duration),
    /// The worker thread could not be spawned.
    #[error("failed to spawn worker thread: {0}")]
    Spawn(std::io::Error),
    /// The worker terminated without producing a result.
    #[error("script worker terminated unexpectedly")]
    WorkerLost,
}

/// Run `task` on a worker thread, waiting at most `deadline`.
///
/// On timeout the `cancel` flag is set before returning, so a
/// cooperatively polling task tears itself down at its next check. The
/// guard never leaks a timer: the channel (and with it the deadline
/// state) is dropped on every exit path.
pub fn run_with_deadline<T, F>(
    deadline: Duration,
    cancel: Arc<AtomicBool>,
    task: F,
) -> Result<T, DeadlineError>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    let handle = thread::Builder::new()
        .name("sandscript-worker".to_string())
        .spawn(move || {
            // The receiver may be gone if the deadline already fired;
            // a failed send just discards the late result.
            let _ = tx.send(task());
        })
        .map_err(DeadlineError::Spawn)?;

    match rx.recv_timeout(deadline) {
        Ok(value) => {
            let _ = handle.join();
            Ok(value)
        }
        Err(RecvTimeoutError::Timeout) => {
            cancel.store(true, Ordering::Relaxed);
            tracing::debug!(?deadline, "script deadline expired, worker abandoned");
            drop(handle);
            Err(DeadlineError::Expired(deadline))
        }
        Err(RecvTimeoutError::Disconnected) => Err(DeadlineError::WorkerLost),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn fast_task_completes() {
        let cancel = Arc::new(AtomicBool::new(false));
        let result = run_with_deadline(Duration::from_secs(5), cancel.clone(), || 41 + 1);
        assert_eq!(result.unwrap(), 42);
        assert!(!cancel.load(Ordering::Relaxed));
    }

    #[test]
    fn slow_task_expires_and_sets_cancel() {
        let cancel = Arc::new(AtomicBool::new(false));
        let started = Instant::now();
        let result = run_with_deadline(Duration::from_millis(50), cancel.clone(), || {
            thread::sleep(Duration::from_secs(5));
            0
        });
        assert!(matches!(result, Err(DeadlineError::Expired(_))));
        assert!(cancel.load(Ordering::Relaxed));
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[test]
    fn cooperative_task_sees_cancel_flag() {
        let cancel = Arc::new(AtomicBool::new(false));
        let observed = Arc::new(AtomicBool::new(false));
        let task_cancel = cancel.clone();
        let task_observed = observed.clone();
        let result = run_with_deadline(Duration::from_millis(50), cancel, move || {
            while !task_cancel.load(Ordering::Relaxed) {
                thread::sleep(Duration::from_millis(5));
            }
            task_observed.store(true, Ordering::Relaxed);
        });
        assert!(result.is_err());
        // give the abandoned worker a moment to notice the flag
        thread::sleep(Duration::from_millis(100));
        assert!(observed.load(Ordering::Relaxed));
    }
}
