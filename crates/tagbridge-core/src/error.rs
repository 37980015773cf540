use thiserror::Error;

/// Barcode rejected by the EPC codec.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid hex input: {value:?} (only 0-9 A-F allowed)")]
    InvalidHexInput { value: String },

    #[error("Payload too long: {length} characters (max {max})")]
    PayloadTooLong { length: usize, max: usize },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Access password that is not exactly 8 hex characters.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid access password: {0}")]
pub struct InvalidAccessPassword(pub String);
