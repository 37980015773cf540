//! Mock device implementations for testing and development.
//!
//! This module provides simulated device implementations that can be controlled
//! programmatically without requiring physical hardware.

pub mod reader;
pub mod scanner;
pub mod trigger;

// Re-export commonly used types
pub use reader::{
    DEFAULT_REPORT_INTERVAL, MockTagReader, MockTagReaderHandle, STATUS_NO_TAG, WriteRecord,
};
pub use scanner::{MockScanner, MockScannerHandle};
pub use trigger::{MockTrigger, MockTriggerHandle};
