//! Common types shared across reader implementations.
//!
//! This module defines connection settings and the inventory parameter
//! block. Gen2 fields are forwarded to the reader as-is; this crate does not
//! interpret them.

use serde::{Deserialize, Serialize};
use tagbridge_core::constants::{
    DEFAULT_ANTENNA, DEFAULT_CONNECT_RETRIES, DEFAULT_IVT_TYPE, DEFAULT_Q_VALUE,
    DEFAULT_READER_BAUD, DEFAULT_READER_PORT, DEFAULT_RF_POWER_DBM, DEFAULT_SCAN_TIME,
    DEFAULT_SESSION,
};

/// Serial connection settings for a reader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionSettings {
    /// Serial device path (e.g., "/dev/ttyHSL0").
    pub port: String,

    /// Baud rate in bits per second.
    pub baud: u32,

    /// Connection attempts made by the driver.
    pub retries: u8,
}

impl ConnectionSettings {
    /// Create connection settings for a port and baud rate.
    pub fn new(port: impl Into<String>, baud: u32) -> Self {
        Self {
            port: port.into(),
            baud,
            retries: DEFAULT_CONNECT_RETRIES,
        }
    }

    /// Set the number of connection attempts.
    pub fn with_retries(mut self, retries: u8) -> Self {
        self.retries = retries;
        self
    }
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self::new(DEFAULT_READER_PORT, DEFAULT_READER_BAUD)
    }
}

/// Inventory parameter block as exposed by the reader firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryParams {
    /// Inventory type.
    pub ivt_type: u8,

    /// Gen2 session.
    pub session: u8,

    /// Gen2 initial Q value.
    pub q_value: u8,

    /// Antenna selection.
    pub antenna: u8,

    /// Per-round scan time.
    pub scan_time: u8,
}

impl Default for InventoryParams {
    fn default() -> Self {
        Self {
            ivt_type: DEFAULT_IVT_TYPE,
            session: DEFAULT_SESSION,
            q_value: DEFAULT_Q_VALUE,
            antenna: DEFAULT_ANTENNA,
            scan_time: DEFAULT_SCAN_TIME,
        }
    }
}

/// Everything needed to bring a reader up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderSettings {
    /// Serial connection.
    #[serde(flatten)]
    pub connection: ConnectionSettings,

    /// RF output power in dBm.
    pub rf_power_dbm: u8,

    /// Inventory parameters applied after connecting.
    pub inventory: InventoryParams,
}

impl Default for ReaderSettings {
    fn default() -> Self {
        Self {
            connection: ConnectionSettings::default(),
            rf_power_dbm: DEFAULT_RF_POWER_DBM,
            inventory: InventoryParams::default(),
        }
    }
}
