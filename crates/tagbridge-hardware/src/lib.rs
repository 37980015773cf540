//! Hardware abstraction layer for the barcode-to-RFID handheld.
//!
//! This crate defines the contracts of the devices the write-and-verify
//! workflow talks to: the UHF RFID reader, the barcode scan engine and the
//! trigger button. Mock implementations with control handles let the rest of
//! the application run and be tested without a device.
//!
//! # Design Philosophy
//!
//! - **Async commands**: reader commands return `impl Future + Send`, so
//!   generic code can await them from spawned Tokio tasks.
//! - **Callback reports**: tag reports arrive through [`TagCallback`] from
//!   the reader's own thread or task, never from the caller's.
//! - **Enum dispatch**: [`devices`] wraps implementations in enums since the
//!   traits are not object-safe.
//! - **Status codes preserved**: reader status codes travel inside
//!   [`HardwareError`] and can be recovered with
//!   [`HardwareError::status_code`].
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use tagbridge_core::TagObservation;
//! use tagbridge_hardware::mock::MockTagReader;
//! use tagbridge_hardware::setup::bring_up;
//! use tagbridge_hardware::traits::{TagCallback, TagReader};
//! use tagbridge_hardware::ReaderSettings;
//!
//! struct Print;
//!
//! impl TagCallback for Print {
//!     fn on_tag(&self, tag: TagObservation) {
//!         println!("{} ({} dBm)", tag.epc, tag.rssi);
//!     }
//!
//!     fn on_stop(&self) {}
//! }
//!
//! #[tokio::main]
//! async fn main() -> tagbridge_hardware::Result<()> {
//!     let (mut reader, handle) = MockTagReader::new();
//!     handle.place_tag("E2000017", -50);
//!
//!     bring_up(&mut reader, &ReaderSettings::default()).await;
//!     reader.set_callback(Arc::new(Print));
//!     reader.start_read().await?;
//!     reader.stop_read().await?;
//!     Ok(())
//! }
//! ```

pub mod devices;
pub mod error;
pub mod manager;
pub mod mock;
pub mod setup;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{HardwareError, Result, TRANSPORT_FAILURE_CODE};
pub use traits::{BarcodeSource, TagCallback, TagReader, TriggerSource};
pub use types::{ConnectionSettings, InventoryParams, ReaderSettings};
