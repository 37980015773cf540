//! Configuration loading from TOML files.
//!
//! Every section and key is optional; anything left out takes the handheld's
//! factory value. A missing file yields the defaults.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;
use tagbridge_core::AccessPassword;
use tagbridge_core::constants::{
    DEFAULT_CONNECT_RETRIES, DEFAULT_INVENTORY_DURATION_MS, DEFAULT_READER_BAUD,
    DEFAULT_READER_PORT, DEFAULT_RF_POWER_DBM,
};
use tagbridge_hardware::mock::{DEFAULT_REPORT_INTERVAL, MockTagReaderHandle};
use tagbridge_hardware::{ConnectionSettings, InventoryParams, ReaderSettings};
use tagbridge_workflow::{Locale, WorkflowConfig};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub reader: ReaderConfig,
    pub workflow: WorkflowSection,
    pub simulation: SimulationConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// Serial device of the UHF module
    pub port: String,
    pub baud: u32,
    pub connect_retries: u8,
    pub rf_power_dbm: u8,
    /// Gen2 parameters forwarded to the reader unchanged
    pub inventory: InventoryParams,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_READER_PORT.to_string(),
            baud: DEFAULT_READER_BAUD,
            connect_retries: DEFAULT_CONNECT_RETRIES,
            rf_power_dbm: DEFAULT_RF_POWER_DBM,
            inventory: InventoryParams::default(),
        }
    }
}

impl ReaderConfig {
    pub fn settings(&self) -> ReaderSettings {
        ReaderSettings {
            connection: ConnectionSettings::new(&self.port, self.baud)
                .with_retries(self.connect_retries),
            rf_power_dbm: self.rf_power_dbm,
            inventory: self.inventory,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WorkflowSection {
    pub inventory_duration_ms: u64,
    pub access_password: AccessPassword,
    pub locale: Locale,
    /// Trigger without a barcode runs an inventory instead of failing
    pub read_only_without_barcode: bool,
}

impl Default for WorkflowSection {
    fn default() -> Self {
        Self {
            inventory_duration_ms: DEFAULT_INVENTORY_DURATION_MS,
            access_password: AccessPassword::default(),
            locale: Locale::default(),
            read_only_without_barcode: true,
        }
    }
}

impl WorkflowSection {
    pub fn workflow_config(&self) -> WorkflowConfig {
        WorkflowConfig {
            inventory_duration: Duration::from_millis(self.inventory_duration_ms),
            access_password: self.access_password.clone(),
            read_only_without_barcode: self.read_only_without_barcode,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub report_interval_ms: u64,
    /// Status code every write returns, 0 for success
    pub write_status: i32,
    pub tags: Vec<SimulatedTag>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            report_interval_ms: DEFAULT_REPORT_INTERVAL.as_millis() as u64,
            write_status: 0,
            tags: Vec::new(),
        }
    }
}

impl SimulationConfig {
    pub fn report_interval(&self) -> Duration {
        Duration::from_millis(self.report_interval_ms)
    }

    /// Load the configured field into a mock reader.
    pub fn apply(&self, field: &MockTagReaderHandle) {
        for tag in &self.tags {
            field.place_tag(&tag.epc, tag.rssi);
        }
        field.set_write_status(self.write_status);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SimulatedTag {
    pub epc: String,
    pub rssi: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default filter when `RUST_LOG` is unset
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Parse a configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Load `path`, or the defaults if it does not exist.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }
}
