//! One-shot timers.
//!
//! The inventory session only needs "run this task once after a delay". The
//! [`OneShotTimer`] trait lets that primitive be an event-loop timer
//! ([`TokioTimer`]) or a plain sleeping thread ([`ThreadTimer`]) without the
//! session knowing which.
//!
//! # Examples
//!
//! ```
//! use std::time::Duration;
//! use tagbridge_workflow::timer::{OneShotTimer, TokioTimer};
//! use tokio::sync::oneshot;
//!
//! #[tokio::main]
//! async fn main() {
//!     let (tx, rx) = oneshot::channel();
//!
//!     TokioTimer.schedule(Duration::from_millis(10), Box::pin(async move {
//!         let _ = tx.send("fired");
//!     }));
//!
//!     assert_eq!(rx.await.unwrap(), "fired");
//! }
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use futures::future::BoxFuture;

/// Schedules a task to run once after a delay.
pub trait OneShotTimer: Send + Sync {
    /// Run `task` once `delay` has elapsed.
    ///
    /// Dropping the returned handle does not cancel the task.
    fn schedule(&self, delay: Duration, task: BoxFuture<'static, ()>) -> TimerHandle;
}

/// Handle to a scheduled task.
///
/// Timers check the shared flag once the delay has elapsed and skip the task
/// if it is set.
#[derive(Debug, Clone, Default)]
pub struct TimerHandle {
    cancelled: Arc<AtomicBool>,
}

impl TimerHandle {
    /// Create a handle that has not been cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel the task if it has not started yet.
    ///
    /// A task that is already running is left to finish.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Check if [`cancel`](Self::cancel) was called.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Timer backed by the Tokio runtime.
///
/// `schedule` must be called from within a Tokio runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioTimer;

impl OneShotTimer for TokioTimer {
    fn schedule(&self, delay: Duration, task: BoxFuture<'static, ()>) -> TimerHandle {
        let handle = TimerHandle::new();
        let flag = Arc::clone(&handle.cancelled);

        // Checked after the sleep: a cancel racing the deadline still wins
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if !flag.load(Ordering::Acquire) {
                task.await;
            }
        });

        handle
    }
}

/// Timer that sleeps on a dedicated thread, then runs the task to completion
/// on that thread.
///
/// Needs no async runtime, so the task must not rely on one either.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadTimer;

impl OneShotTimer for ThreadTimer {
    fn schedule(&self, delay: Duration, task: BoxFuture<'static, ()>) -> TimerHandle {
        let handle = TimerHandle::new();
        let flag = Arc::clone(&handle.cancelled);

        thread::spawn(move || {
            thread::sleep(delay);
            if !flag.load(Ordering::Acquire) {
                futures::executor::block_on(task);
            }
        });

        handle
    }
}
