//! Barcode-to-EPC write-and-verify workflow.
//!
//! This crate holds the trigger-driven logic of the handheld: the timed
//! inventory session, the collection of tag observations it feeds, and the
//! workflow that writes a barcode onto a tag and verifies the read-back.

pub mod observation;
pub mod outcome;
pub mod session;
pub mod timer;
pub mod workflow;

pub use observation::ObservationSet;
pub use outcome::{Locale, WorkflowOutcome};
pub use session::{InventorySession, SessionStart, SessionState};
pub use timer::{OneShotTimer, ThreadTimer, TimerHandle, TokioTimer};
pub use workflow::{
    OutcomeSink, TriggerResponse, WorkflowConfig, WriteVerifyWorkflow, reconcile, select_strongest,
};
