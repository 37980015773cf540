//! Enum wrappers for hardware device dispatch.
//!
//! The device traits return `impl Future`, so they cannot be used as trait
//! objects. These enums give the application one concrete type per device
//! kind while still allowing several implementations.
//!
//! # Examples
//!
//! ```
//! use tagbridge_hardware::devices::AnyTagReader;
//! use tagbridge_hardware::mock::MockTagReader;
//!
//! let (reader, _handle) = MockTagReader::new();
//! let any_reader = AnyTagReader::Mock(reader);
//! ```

use std::sync::Arc;

use tagbridge_core::{AccessPassword, BarcodeValue};

use crate::mock::{MockScanner, MockTagReader, MockTrigger};
use crate::traits::{BarcodeSource, TagCallback, TagReader, TriggerSource};
use crate::{ConnectionSettings, InventoryParams, Result};

/// Enum wrapper for UHF reader dispatch.
#[derive(Debug)]
#[non_exhaustive]
pub enum AnyTagReader {
    /// Simulated reader for development and testing.
    Mock(MockTagReader),
    // TODO: add a `Serial` variant behind `hardware-serial` once the UHF
    // module's serial framing is implemented
}

impl TagReader for AnyTagReader {
    async fn connect(&mut self, settings: &ConnectionSettings) -> Result<()> {
        match self {
            Self::Mock(device) => device.connect(settings).await,
        }
    }

    async fn disconnect(&mut self) -> Result<()> {
        match self {
            Self::Mock(device) => device.disconnect().await,
        }
    }

    async fn set_rf_power(&mut self, dbm: u8) -> Result<()> {
        match self {
            Self::Mock(device) => device.set_rf_power(dbm).await,
        }
    }

    async fn inventory_params(&mut self) -> Result<InventoryParams> {
        match self {
            Self::Mock(device) => device.inventory_params().await,
        }
    }

    async fn set_inventory_params(&mut self, params: &InventoryParams) -> Result<()> {
        match self {
            Self::Mock(device) => device.set_inventory_params(params).await,
        }
    }

    async fn write_epc(&mut self, epc: &str, password: &AccessPassword) -> Result<()> {
        match self {
            Self::Mock(device) => device.write_epc(epc, password).await,
        }
    }

    fn set_callback(&mut self, callback: Arc<dyn TagCallback>) {
        match self {
            Self::Mock(device) => device.set_callback(callback),
        }
    }

    async fn start_read(&mut self) -> Result<()> {
        match self {
            Self::Mock(device) => device.start_read().await,
        }
    }

    async fn stop_read(&mut self) -> Result<()> {
        match self {
            Self::Mock(device) => device.stop_read().await,
        }
    }
}

/// Enum wrapper for barcode scanner dispatch.
#[derive(Debug)]
#[non_exhaustive]
pub enum AnyBarcodeSource {
    /// Mock scanner for development and testing.
    Mock(MockScanner),
}

impl BarcodeSource for AnyBarcodeSource {
    async fn next_barcode(&mut self) -> Result<Option<BarcodeValue>> {
        match self {
            Self::Mock(device) => device.next_barcode().await,
        }
    }
}

/// Enum wrapper for trigger button dispatch.
#[derive(Debug)]
#[non_exhaustive]
pub enum AnyTriggerSource {
    /// Mock trigger for development and testing.
    Mock(MockTrigger),
}

impl TriggerSource for AnyTriggerSource {
    async fn next_press(&mut self) -> Result<()> {
        match self {
            Self::Mock(device) => device.next_press().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_any_reader_dispatch() {
        let (reader, handle) = MockTagReader::new();
        let mut reader = AnyTagReader::Mock(reader);

        reader.connect(&ConnectionSettings::default()).await.unwrap();
        reader.set_rf_power(27).await.unwrap();

        assert!(handle.is_connected());
        assert_eq!(handle.rf_power(), Some(27));
    }

    #[tokio::test]
    async fn test_any_barcode_source_dispatch() {
        let (scanner, handle) = MockScanner::new();
        let mut scanner = AnyBarcodeSource::Mock(scanner);

        handle.scan("ABC").await.unwrap();
        assert_eq!(scanner.next_barcode().await.unwrap(), BarcodeValue::new("ABC"));
    }

    #[tokio::test]
    async fn test_any_trigger_source_dispatch() {
        let (trigger, handle) = MockTrigger::new();
        let mut trigger = AnyTriggerSource::Mock(trigger);

        handle.press().await.unwrap();
        assert!(trigger.next_press().await.is_ok());
    }
}
