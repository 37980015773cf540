//! Device traits for the reader and its input peripherals.
//!
//! Command methods return `impl Future + Send` so generic code can drive a
//! reader from spawned Tokio tasks. Implementors simply write `async fn`.
//!
//! Tag reports come back through [`TagCallback`], which the reader invokes
//! from its own thread or task. Callback methods are synchronous and must
//! not block.

use std::future::Future;
use std::sync::Arc;

use tagbridge_core::{AccessPassword, BarcodeValue, TagObservation};

use crate::error::Result;
use crate::types::{ConnectionSettings, InventoryParams};

/// Receiver for asynchronous reader reports.
///
/// The reader may call these methods from any thread, concurrently with
/// whatever the registering code is doing.
///
/// # Examples
///
/// ```
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use tagbridge_core::TagObservation;
/// use tagbridge_hardware::traits::TagCallback;
///
/// #[derive(Default)]
/// struct CountingCallback {
///     seen: AtomicUsize,
/// }
///
/// impl TagCallback for CountingCallback {
///     fn on_tag(&self, _tag: TagObservation) {
///         self.seen.fetch_add(1, Ordering::Relaxed);
///     }
///
///     fn on_stop(&self) {}
/// }
/// ```
pub trait TagCallback: Send + Sync {
    /// A tag was seen during inventory.
    fn on_tag(&self, tag: TagObservation);

    /// The reader acknowledged a stop request.
    fn on_stop(&self);
}

/// UHF RFID reader command interface.
///
/// Mirrors the command set of handheld UHF modules: connection management,
/// RF configuration, EPC write, and a start/stop inventory whose results are
/// delivered through the registered [`TagCallback`].
///
/// # Examples
///
/// ```no_run
/// use tagbridge_core::AccessPassword;
/// use tagbridge_hardware::traits::TagReader;
/// use tagbridge_hardware::Result;
///
/// async fn write_and_scan<R: TagReader>(reader: &mut R) -> Result<()> {
///     reader.write_epc("0ABC", &AccessPassword::default()).await?;
///     reader.start_read().await?;
///     Ok(())
/// }
/// ```
pub trait TagReader: Send + Sync {
    /// Open the connection to the reader.
    ///
    /// # Errors
    ///
    /// Returns [`HardwareError::ConnectionFailed`](crate::HardwareError::ConnectionFailed)
    /// with the reader's status code if the connection is refused.
    fn connect(&mut self, settings: &ConnectionSettings) -> impl Future<Output = Result<()>> + Send;

    /// Close the connection to the reader.
    fn disconnect(&mut self) -> impl Future<Output = Result<()>> + Send;

    /// Set RF output power in dBm.
    fn set_rf_power(&mut self, dbm: u8) -> impl Future<Output = Result<()>> + Send;

    /// Read the current inventory parameter block.
    fn inventory_params(&mut self) -> impl Future<Output = Result<InventoryParams>> + Send;

    /// Replace the inventory parameter block.
    fn set_inventory_params(
        &mut self,
        params: &InventoryParams,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Write `epc` (word-aligned hex) onto the EPC bank of the tag in field.
    ///
    /// # Errors
    ///
    /// Returns [`HardwareError::CommandFailed`](crate::HardwareError::CommandFailed)
    /// with the reader's status code if the write is rejected.
    fn write_epc(
        &mut self,
        epc: &str,
        password: &AccessPassword,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Register the receiver for tag reports, replacing any previous one.
    fn set_callback(&mut self, callback: Arc<dyn TagCallback>);

    /// Start continuous inventory.
    fn start_read(&mut self) -> impl Future<Output = Result<()>> + Send;

    /// Request inventory stop.
    ///
    /// Reports already queued by the reader may still reach the callback
    /// after this returns.
    fn stop_read(&mut self) -> impl Future<Output = Result<()>> + Send;
}

/// Source of decoded barcodes (the handheld's scan engine).
pub trait BarcodeSource: Send + Sync {
    /// Wait for the next decode.
    ///
    /// Yields `None` for a decode that is empty after trimming.
    ///
    /// # Errors
    ///
    /// Returns an error if the scanner is disconnected.
    fn next_barcode(&mut self) -> impl Future<Output = Result<Option<BarcodeValue>>> + Send;
}

/// Source of trigger presses (the handheld's hardware button).
pub trait TriggerSource: Send + Sync {
    /// Wait for the next trigger press.
    ///
    /// # Errors
    ///
    /// Returns an error if the button source is disconnected.
    fn next_press(&mut self) -> impl Future<Output = Result<()>> + Send;
}
