//! Core domain for linking barcodes to UHF RFID tags.
//!
//! Contains the EPC hex encoding rules ([`hex`]), the value types that flow
//! through one write-and-verify cycle ([`types`]) and shared constants.
//! Nothing in this crate performs I/O.

pub mod constants;
pub mod error;
pub mod hex;
pub mod types;

pub use error::{Error, InvalidAccessPassword, Result};
pub use types::*;

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
