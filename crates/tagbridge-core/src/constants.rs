//! Constants shared by the encoder, the reader bring-up and the workflow.
//!
//! Values for the reader (port, baud rate, power and inventory parameters)
//! are the defaults of the handheld's built-in UHF module. They can all be
//! overridden through configuration.

use std::time::Duration;

// ============================================================================
// EPC Encoding
// ============================================================================

/// Maximum barcode length, in hex characters, accepted for an EPC write.
///
/// 24 hex characters is a 96-bit EPC, the standard EPC bank size.
///
/// # Examples
///
/// ```
/// use tagbridge_core::constants::MAX_EPC_HEX_LEN;
///
/// assert_eq!(MAX_EPC_HEX_LEN * 4, 96);
/// ```
pub const MAX_EPC_HEX_LEN: usize = 24;

/// Number of hex characters per EPC memory word (16 bits).
pub const EPC_WORD_NIBBLES: usize = 4;

/// Character used to left-pad a payload to a word boundary.
pub const PAD_CHAR: char = '0';

/// Access password sent with every EPC write (no password set on the tag).
pub const DEFAULT_ACCESS_PASSWORD: &str = "00000000";

/// Length, in hex characters, of a Gen2 access password (32 bits).
pub const ACCESS_PASSWORD_LEN: usize = 8;

// ============================================================================
// Inventory
// ============================================================================

/// Inventory window after a trigger press, in milliseconds.
pub const DEFAULT_INVENTORY_DURATION_MS: u64 = 800;

/// Inventory window after a trigger press.
pub const DEFAULT_INVENTORY_DURATION: Duration =
    Duration::from_millis(DEFAULT_INVENTORY_DURATION_MS);

// ============================================================================
// Reader Defaults
// ============================================================================

/// Serial device of the built-in UHF module.
pub const DEFAULT_READER_PORT: &str = "/dev/ttyHSL0";

/// Baud rate of the built-in UHF module.
pub const DEFAULT_READER_BAUD: u32 = 115_200;

/// Connection attempts made by the reader driver.
pub const DEFAULT_CONNECT_RETRIES: u8 = 1;

/// RF output power in dBm.
pub const DEFAULT_RF_POWER_DBM: u8 = 30;

/// Inventory type (0 = EPC only).
pub const DEFAULT_IVT_TYPE: u8 = 0;

/// Gen2 session (S0).
pub const DEFAULT_SESSION: u8 = 0;

/// Gen2 initial Q value.
pub const DEFAULT_Q_VALUE: u8 = 4;

/// Antenna selection byte.
pub const DEFAULT_ANTENNA: u8 = 0x80;

/// Per-round scan time, in reader firmware units.
pub const DEFAULT_SCAN_TIME: u8 = 50;
