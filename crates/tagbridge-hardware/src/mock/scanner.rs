//! Mock barcode scanner implementation for testing and development.
//!
//! Decodes are pushed through a [`MockScannerHandle`] as raw strings, the
//! way the scan engine broadcasts them, and come out of
//! [`BarcodeSource::next_barcode`] trimmed. Blank decodes come out as
//! `None`.

use crate::{HardwareError, Result, traits::BarcodeSource};
use tagbridge_core::BarcodeValue;
use tokio::sync::mpsc;

/// Mock barcode scanner.
///
/// # Examples
///
/// ```
/// use tagbridge_hardware::mock::MockScanner;
/// use tagbridge_hardware::traits::BarcodeSource;
///
/// #[tokio::main]
/// async fn main() -> tagbridge_hardware::Result<()> {
///     let (mut scanner, handle) = MockScanner::new();
///
///     handle.scan(" 0A1B2C \n").await?;
///
///     let barcode = scanner.next_barcode().await?;
///     assert_eq!(barcode.as_ref().map(|b| b.as_str()), Some("0A1B2C"));
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockScanner {
    /// Channel receiver for raw decode strings
    decode_rx: mpsc::Receiver<String>,
}

impl MockScanner {
    /// Create a new mock scanner.
    ///
    /// Returns a tuple of (MockScanner, MockScannerHandle) where the handle
    /// can be used to simulate decodes.
    pub fn new() -> (Self, MockScannerHandle) {
        let (decode_tx, decode_rx) = mpsc::channel(32);
        (Self { decode_rx }, MockScannerHandle { decode_tx })
    }
}

impl Default for MockScanner {
    fn default() -> Self {
        Self::new().0
    }
}

impl BarcodeSource for MockScanner {
    async fn next_barcode(&mut self) -> Result<Option<BarcodeValue>> {
        let raw = self
            .decode_rx
            .recv()
            .await
            .ok_or_else(|| HardwareError::disconnected("Scanner decode channel closed"))?;

        Ok(BarcodeValue::new(&raw))
    }
}

/// Handle for simulating decodes on a mock scanner.
///
/// It can be cloned and shared across tasks.
#[derive(Debug, Clone)]
pub struct MockScannerHandle {
    /// Channel sender for raw decode strings
    decode_tx: mpsc::Sender<String>,
}

impl MockScannerHandle {
    /// Simulate a decode of `raw`.
    ///
    /// # Errors
    ///
    /// Returns an error if the scanner has been dropped.
    pub async fn scan(&self, raw: impl Into<String>) -> Result<()> {
        self.decode_tx
            .send(raw.into())
            .await
            .map_err(|_| HardwareError::disconnected("Scanner decode channel closed"))
    }
}
