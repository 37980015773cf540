//! Write-and-verify workflow.
//!
//! One trigger press runs one cycle. With a barcode held the cycle encodes
//! it, writes it to the tag in field, runs a timed inventory and checks that
//! the strongest tag carries the written value. Without a barcode the cycle
//! only runs the inventory and reports the strongest tag.
//!
//! ```text
//!            trigger
//!               │
//!      ┌────────┴────────┐
//!   barcode           no barcode
//!      │                 │
//!   encode ──► InvalidHex / TooLong
//!      │                 │
//!   write  ──► WriteFailed
//!      │                 │
//!   inventory        inventory
//!      │                 │
//!   reconcile        reconcile
//!      │                 │
//!  Success / Mismatch   EpcReport
//!   / NoTagFound        / NoTagFound
//! ```
//!
//! Triggers arriving while a cycle is in progress are dropped.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tagbridge_core::constants::DEFAULT_INVENTORY_DURATION;
use tagbridge_core::{AccessPassword, BarcodeValue, EncodedPayload, Error, TagObservation, hex};
use tagbridge_hardware::TagReader;
use tokio::sync::{Mutex, oneshot};
use tracing::{debug, info, warn};

use crate::outcome::WorkflowOutcome;
use crate::session::{InventorySession, SessionStart};
use crate::timer::{OneShotTimer, TokioTimer};

/// Receives the outcome of every completed cycle.
pub trait OutcomeSink: Send + Sync {
    /// Present `outcome` to the operator.
    fn present(&self, outcome: &WorkflowOutcome);
}

/// Workflow tuning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowConfig {
    /// Length of the verification inventory.
    pub inventory_duration: Duration,

    /// Password sent with every EPC write.
    pub access_password: AccessPassword,

    /// Run a read-only inventory when triggered without a barcode.
    ///
    /// When disabled such a trigger ends in [`WorkflowOutcome::NoBarcode`].
    pub read_only_without_barcode: bool,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            inventory_duration: DEFAULT_INVENTORY_DURATION,
            access_password: AccessPassword::default(),
            read_only_without_barcode: true,
        }
    }
}

/// What a trigger press led to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerResponse {
    /// A cycle was already running; the press was dropped.
    Ignored,

    /// The cycle ran to completion.
    Completed(WorkflowOutcome),
}

impl TriggerResponse {
    /// Outcome of the cycle, if one ran.
    #[must_use]
    pub fn outcome(&self) -> Option<&WorkflowOutcome> {
        match self {
            TriggerResponse::Ignored => None,
            TriggerResponse::Completed(outcome) => Some(outcome),
        }
    }
}

/// Clears the in-flight flag when a cycle ends, however it ends.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Drives trigger cycles against a shared reader.
pub struct WriteVerifyWorkflow<R, T = TokioTimer> {
    reader: Arc<Mutex<R>>,
    session: InventorySession<R, T>,
    sink: Arc<dyn OutcomeSink>,
    config: WorkflowConfig,
    in_flight: AtomicBool,
}

impl<R> WriteVerifyWorkflow<R, TokioTimer>
where
    R: TagReader + 'static,
{
    /// Create a workflow whose inventories are timed by Tokio.
    pub fn new(reader: Arc<Mutex<R>>, sink: Arc<dyn OutcomeSink>, config: WorkflowConfig) -> Self {
        Self::with_timer(reader, TokioTimer, sink, config)
    }
}

impl<R, T> WriteVerifyWorkflow<R, T>
where
    R: TagReader + 'static,
    T: OneShotTimer,
{
    /// Create a workflow with a custom inventory timer.
    pub fn with_timer(
        reader: Arc<Mutex<R>>,
        timer: T,
        sink: Arc<dyn OutcomeSink>,
        config: WorkflowConfig,
    ) -> Self {
        let session = InventorySession::with_timer(Arc::clone(&reader), timer);
        Self {
            reader,
            session,
            sink,
            config,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Workflow configuration.
    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    /// Check if a cycle is in progress.
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire) || self.session.is_running()
    }

    /// Handle a trigger press.
    ///
    /// `barcode` is the latest barcode held by the caller. The outcome is
    /// presented to the sink before it is returned. Returns
    /// [`TriggerResponse::Ignored`] without touching the reader if a cycle is
    /// already running.
    pub async fn on_trigger(&self, barcode: Option<&BarcodeValue>) -> TriggerResponse {
        if self.session.is_running()
            || self
                .in_flight
                .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
                .is_err()
        {
            debug!("Trigger ignored, cycle in progress");
            return TriggerResponse::Ignored;
        }
        let _guard = InFlightGuard(&self.in_flight);

        info!(barcode = barcode.map(BarcodeValue::as_str), "Trigger received");

        let outcome = match barcode {
            Some(barcode) => self.write_and_verify(barcode).await,
            None if self.config.read_only_without_barcode => self.read_only().await,
            None => WorkflowOutcome::NoBarcode,
        };

        info!(outcome = %outcome, "Cycle finished");
        self.sink.present(&outcome);
        TriggerResponse::Completed(outcome)
    }

    async fn write_and_verify(&self, barcode: &BarcodeValue) -> WorkflowOutcome {
        let payload = match hex::encode(barcode.as_str()) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(barcode = %barcode, error = %e, "Barcode rejected");
                return rejection_outcome(e);
            }
        };

        debug!(
            original = payload.original(),
            padded = payload.padded(),
            added = payload.added(),
            "Writing EPC"
        );

        let written = self
            .reader
            .lock()
            .await
            .write_epc(payload.padded(), &self.config.access_password)
            .await;
        if let Err(e) = written {
            warn!(code = e.status_code(), error = %e, "EPC write failed");
            return WorkflowOutcome::WriteFailed {
                code: e.status_code(),
            };
        }

        let tags = self.run_inventory().await;
        reconcile(&tags, Some(&payload))
    }

    async fn read_only(&self) -> WorkflowOutcome {
        let tags = self.run_inventory().await;
        reconcile(&tags, None)
    }

    /// Run one inventory and wait for its observations.
    ///
    /// An inventory that could not start or never completed counts as an
    /// empty field.
    async fn run_inventory(&self) -> Vec<TagObservation> {
        let (tx, rx) = oneshot::channel();
        let start = self
            .session
            .start(self.config.inventory_duration, move |tags| {
                let _ = tx.send(tags);
            })
            .await;

        match start {
            SessionStart::Started => rx.await.unwrap_or_else(|_| {
                warn!("Inventory ended without reporting, treating field as empty");
                Vec::new()
            }),
            SessionStart::AlreadyRunning => {
                warn!("Inventory already running, treating field as empty");
                Vec::new()
            }
        }
    }
}

/// Map a codec rejection onto its outcome.
fn rejection_outcome(error: Error) -> WorkflowOutcome {
    match error {
        Error::InvalidHexInput { value } => WorkflowOutcome::InvalidHex { value },
        Error::PayloadTooLong { length, max } => WorkflowOutcome::TooLong { length, max },
    }
}

/// Pick the tag with the highest RSSI.
///
/// On a tie the earliest entry in `tags` wins.
#[must_use]
pub fn select_strongest(tags: &[TagObservation]) -> Option<&TagObservation> {
    tags.iter().reduce(|best, tag| if tag.rssi > best.rssi { tag } else { best })
}

/// Turn the observations of one inventory into an outcome.
///
/// With a payload the strongest tag's stripped EPC is checked against the
/// payload's expected read-back. Without one the strongest tag is reported.
/// Extra tags in the field are logged and otherwise ignored.
#[must_use]
pub fn reconcile(tags: &[TagObservation], payload: Option<&EncodedPayload>) -> WorkflowOutcome {
    let Some(selected) = select_strongest(tags) else {
        return WorkflowOutcome::NoTagFound;
    };

    if tags.len() > 1 {
        info!(
            count = tags.len(),
            rssi = selected.rssi,
            "Multiple tags found, selected strongest"
        );
    }

    let read = selected.display_epc();
    match payload {
        Some(payload) if payload.matches_readback(&selected.epc) => WorkflowOutcome::Success {
            value: payload.original().to_string(),
            rssi: selected.rssi,
        },
        Some(payload) => WorkflowOutcome::Mismatch {
            read,
            expected: payload.expected_readback(),
            rssi: selected.rssi,
        },
        None => WorkflowOutcome::EpcReport {
            value: read,
            rssi: selected.rssi,
        },
    }
}

impl<R, T> std::fmt::Debug for WriteVerifyWorkflow<R, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WriteVerifyWorkflow")
            .field("config", &self.config)
            .field("in_flight", &self.in_flight.load(Ordering::Acquire))
            .finish_non_exhaustive()
    }
}
