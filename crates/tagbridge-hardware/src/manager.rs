//! Input device manager.
//!
//! Merges the barcode scanner and the trigger button into one ordered event
//! stream so the application handles all operator input on a single task.
//!
//! ```text
//! ┌──────────┐       ┌─────────────────┐
//! │ Scanner  │──────►│                 │
//! │ Task     │       │  Event Channel  │──────► Application loop
//! └──────────┘       │  (mpsc)         │
//! ┌──────────┐       │                 │
//! │ Trigger  │──────►│                 │
//! │ Task     │       └─────────────────┘
//! └──────────┘
//! ```
//!
//! # Examples
//!
//! ```no_run
//! use tagbridge_hardware::manager::{InputEvent, InputManager};
//! use tagbridge_hardware::devices::{AnyBarcodeSource, AnyTriggerSource};
//! use tagbridge_hardware::mock::{MockScanner, MockTrigger};
//!
//! #[tokio::main]
//! async fn main() -> tagbridge_hardware::Result<()> {
//!     let mut manager = InputManager::new();
//!
//!     let (scanner, _scan) = MockScanner::new();
//!     let (trigger, _press) = MockTrigger::new();
//!     manager.register_scanner(AnyBarcodeSource::Mock(scanner));
//!     manager.register_trigger(AnyTriggerSource::Mock(trigger));
//!
//!     let mut handle = manager.start();
//!     while let Some(event) = handle.recv().await {
//!         match event {
//!             InputEvent::Barcode(barcode) => println!("scanned {barcode}"),
//!             InputEvent::Trigger => println!("trigger"),
//!             _ => {}
//!         }
//!     }
//!
//!     handle.shutdown().await
//! }
//! ```

use crate::Result;
use crate::devices::{AnyBarcodeSource, AnyTriggerSource};
use crate::traits::{BarcodeSource, TriggerSource};
use tagbridge_core::BarcodeValue;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, warn};

/// Operator input from any registered device.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InputEvent {
    /// A barcode was decoded.
    Barcode(BarcodeValue),

    /// The scanner decoded nothing but whitespace.
    ///
    /// Any barcode held from an earlier scan is no longer current.
    EmptyDecode,

    /// The trigger button was pressed.
    Trigger,

    /// Device error occurred.
    ///
    /// The device task terminates after sending this event.
    DeviceError {
        /// Device that encountered the error.
        source: InputSource,

        /// Error message.
        error: String,
    },
}

/// Kind of input device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputSource {
    /// Barcode scan engine.
    Scanner,

    /// Trigger button.
    Trigger,
}

impl std::fmt::Display for InputSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Scanner => write!(f, "Scanner"),
            Self::Trigger => write!(f, "Trigger"),
        }
    }
}

/// Handle for receiving merged input events.
pub struct InputHandle {
    /// Event receiver.
    event_rx: mpsc::Receiver<InputEvent>,

    /// Running device tasks.
    tasks: JoinSet<Result<()>>,
}

impl InputHandle {
    /// Receive the next input event.
    ///
    /// Returns `None` once every device task has terminated.
    pub async fn recv(&mut self) -> Option<InputEvent> {
        self.event_rx.recv().await
    }

    /// Abort all device tasks and wait for them to terminate.
    ///
    /// Task errors and panics are logged, not returned.
    pub async fn shutdown(mut self) -> Result<()> {
        self.tasks.abort_all();

        let mut error_count = 0;
        let mut panic_count = 0;

        while let Some(result) = self.tasks.join_next().await {
            match Self::classify_task_result(result) {
                TaskTermination::Success | TaskTermination::Cancelled => {}
                TaskTermination::Error => error_count += 1,
                TaskTermination::Panic => panic_count += 1,
            }
        }

        if error_count + panic_count > 0 {
            warn!(error_count, panic_count, "Input tasks terminated abnormally");
        } else {
            debug!("Input tasks shut down");
        }

        Ok(())
    }

    fn classify_task_result(
        result: std::result::Result<Result<()>, tokio::task::JoinError>,
    ) -> TaskTermination {
        match result {
            Ok(Ok(())) => TaskTermination::Success,
            Ok(Err(_)) => TaskTermination::Error,
            Err(e) if e.is_cancelled() => TaskTermination::Cancelled,
            Err(_) => TaskTermination::Panic,
        }
    }
}

/// Task termination classification for shutdown handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TaskTermination {
    Success,
    Error,
    Cancelled,
    Panic,
}

/// Collects input devices and merges their events.
///
/// # Lifecycle
///
/// 1. Create the manager
/// 2. Register devices
/// 3. Call `start()` to spawn device tasks and get the event handle
pub struct InputManager {
    scanner: Option<AnyBarcodeSource>,
    trigger: Option<AnyTriggerSource>,
    event_tx: mpsc::Sender<InputEvent>,
    event_rx: mpsc::Receiver<InputEvent>,
}

impl InputManager {
    /// Create an input manager with no devices.
    pub fn new() -> Self {
        let (event_tx, event_rx) = mpsc::channel(100);

        Self {
            scanner: None,
            trigger: None,
            event_tx,
            event_rx,
        }
    }

    /// Register the barcode scanner.
    pub fn register_scanner(&mut self, device: AnyBarcodeSource) {
        self.scanner = Some(device);
    }

    /// Register the trigger button.
    pub fn register_trigger(&mut self, device: AnyTriggerSource) {
        self.trigger = Some(device);
    }

    /// Spawn one task per registered device and return the event handle.
    pub fn start(self) -> InputHandle {
        let mut tasks = JoinSet::new();

        if let Some(device) = self.scanner {
            tasks.spawn(Self::scanner_task(device, self.event_tx.clone()));
        }

        if let Some(device) = self.trigger {
            tasks.spawn(Self::trigger_task(device, self.event_tx.clone()));
        }

        InputHandle {
            event_rx: self.event_rx,
            tasks,
        }
    }

    async fn scanner_task(
        mut device: AnyBarcodeSource,
        tx: mpsc::Sender<InputEvent>,
    ) -> Result<()> {
        loop {
            match device.next_barcode().await {
                Ok(decoded) => {
                    let event = match decoded {
                        Some(barcode) => {
                            debug!(barcode = %barcode, "Barcode decoded");
                            InputEvent::Barcode(barcode)
                        }
                        None => {
                            debug!("Empty decode");
                            InputEvent::EmptyDecode
                        }
                    };
                    if tx.send(event).await.is_err() {
                        return Ok(());
                    }
                }
                Err(e) => {
                    let _ = tx
                        .send(InputEvent::DeviceError {
                            source: InputSource::Scanner,
                            error: e.to_string(),
                        })
                        .await;
                    return Err(e);
                }
            }
        }
    }

    async fn trigger_task(
        mut device: AnyTriggerSource,
        tx: mpsc::Sender<InputEvent>,
    ) -> Result<()> {
        loop {
            match device.next_press().await {
                Ok(()) => {
                    debug!("Trigger pressed");
                    if tx.send(InputEvent::Trigger).await.is_err() {
                        return Ok(());
                    }
                }
                Err(e) => {
                    let _ = tx
                        .send(InputEvent::DeviceError {
                            source: InputSource::Trigger,
                            error: e.to_string(),
                        })
                        .await;
                    return Err(e);
                }
            }
        }
    }
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}
