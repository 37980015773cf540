//! Bounded-duration inventory session.
//!
//! A session starts the reader, collects tag reports for a fixed window and
//! then stops the reader and hands the collected observations to a
//! completion handler.
//!
//! # States
//!
//! - `Idle`: no inventory in progress
//! - `Running`: reader started, deadline pending
//!
//! Only one session runs at a time. Starting while `Running` is a no-op.
//!
//! # Stop race
//!
//! The reader does not stop synchronously. Reports already queued when
//! `stop_read` is issued can reach the callback after the observations have
//! been drained; they are discarded. The result is the field as seen at the
//! deadline.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use tagbridge_core::TagObservation;
use tagbridge_hardware::{TagCallback, TagReader};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::observation::ObservationSet;
use crate::timer::{OneShotTimer, TokioTimer};

/// Lifecycle state of an [`InventorySession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// No inventory in progress.
    Idle,

    /// Inventory running until its deadline.
    Running,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Idle => write!(f, "Idle"),
            SessionState::Running => write!(f, "Running"),
        }
    }
}

/// Result of [`InventorySession::start`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum SessionStart {
    /// Session started; the completion handler will run once.
    Started,

    /// Another session is running; nothing was done.
    AlreadyRunning,
}

/// Reader callback feeding one session's observation set.
struct SessionCallback {
    observations: Arc<ObservationSet>,
}

impl TagCallback for SessionCallback {
    fn on_tag(&self, tag: TagObservation) {
        debug!(epc = %tag.epc, rssi = tag.rssi, "Tag found");
        self.observations.upsert(tag);
    }

    fn on_stop(&self) {
        debug!("Inventory stopped");
    }
}

/// Runs single-flight, fixed-duration inventories on a shared reader.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use std::time::Duration;
/// use tagbridge_hardware::mock::MockTagReader;
/// use tagbridge_hardware::{ConnectionSettings, TagReader};
/// use tagbridge_workflow::{InventorySession, SessionStart};
/// use tokio::sync::{Mutex, oneshot};
///
/// #[tokio::main]
/// async fn main() {
///     let (mut reader, handle) = MockTagReader::new();
///     reader.connect(&ConnectionSettings::default()).await.unwrap();
///     handle.place_tag("E2001234", -42);
///
///     let session = InventorySession::new(Arc::new(Mutex::new(reader)));
///     let (tx, rx) = oneshot::channel();
///
///     let start = session
///         .start(Duration::from_millis(100), move |tags| {
///             let _ = tx.send(tags);
///         })
///         .await;
///     assert_eq!(start, SessionStart::Started);
///
///     let tags = rx.await.unwrap();
///     assert_eq!(tags[0].epc, "E2001234");
/// }
/// ```
pub struct InventorySession<R, T = TokioTimer> {
    reader: Arc<Mutex<R>>,
    timer: T,
    running: Arc<AtomicBool>,
}

impl<R> InventorySession<R, TokioTimer>
where
    R: TagReader + 'static,
{
    /// Create a session driven by the Tokio timer.
    pub fn new(reader: Arc<Mutex<R>>) -> Self {
        Self::with_timer(reader, TokioTimer)
    }
}

impl<R, T> InventorySession<R, T>
where
    R: TagReader + 'static,
    T: OneShotTimer,
{
    /// Create a session with a custom timer.
    pub fn with_timer(reader: Arc<Mutex<R>>, timer: T) -> Self {
        Self {
            reader,
            timer,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Current state.
    pub fn state(&self) -> SessionState {
        if self.is_running() {
            SessionState::Running
        } else {
            SessionState::Idle
        }
    }

    /// Check if a session is running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Start an inventory lasting `duration`.
    ///
    /// Registers a fresh callback on the reader, starts it and schedules the
    /// stop. At the deadline, measured from this call, the reader is
    /// stopped, the session returns to `Idle` and `on_complete` receives
    /// the latest observation of every tag seen. The order of that list is
    /// arrival order of each tag's latest report.
    ///
    /// Reader failures are logged; the session still completes at the
    /// deadline with whatever was collected.
    ///
    /// Returns [`SessionStart::AlreadyRunning`] without side effects if a
    /// session is in progress.
    pub async fn start<F>(&self, duration: Duration, on_complete: F) -> SessionStart
    where
        F: FnOnce(Vec<TagObservation>) + Send + 'static,
    {
        if self
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Inventory already running, start ignored");
            return SessionStart::AlreadyRunning;
        }

        let started_at = Instant::now();
        let observations = Arc::new(ObservationSet::new());

        {
            let mut reader = self.reader.lock().await;
            reader.set_callback(Arc::new(SessionCallback {
                observations: Arc::clone(&observations),
            }));
            if let Err(e) = reader.start_read().await {
                warn!(code = e.status_code(), error = %e, "Failed to start inventory");
            }
        }

        info!(duration_ms = duration.as_millis() as u64, "Inventory started");

        let reader = Arc::clone(&self.reader);
        let running = Arc::clone(&self.running);
        let remaining = duration.saturating_sub(started_at.elapsed());

        // Cancellation is not exposed: a started session always completes
        let _ = self.timer.schedule(
            remaining,
            Box::pin(async move {
                if let Err(e) = reader.lock().await.stop_read().await {
                    warn!(code = e.status_code(), error = %e, "Failed to stop inventory");
                }

                let tags = observations.drain();
                running.store(false, Ordering::Release);
                info!(tags = tags.len(), "Inventory finished");
                on_complete(tags);
            }),
        );

        SessionStart::Started
    }
}

impl<R, T> fmt::Debug for InventorySession<R, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InventorySession")
            .field("running", &self.running.load(Ordering::Acquire))
            .finish_non_exhaustive()
    }
}
