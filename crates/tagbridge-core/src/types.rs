use crate::{
    constants::{ACCESS_PASSWORD_LEN, DEFAULT_ACCESS_PASSWORD},
    error::InvalidAccessPassword,
    hex,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Decoded barcode text (trimmed, never empty).
///
/// Holds the scanner output as received. Normalization to uppercase happens
/// at encode time so the operator sees exactly what was scanned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BarcodeValue(String);

impl BarcodeValue {
    /// Create a barcode value from raw scanner output.
    ///
    /// Returns `None` if the input is empty after trimming.
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// Get the barcode as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BarcodeValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Word-aligned EPC payload derived from a barcode.
///
/// Built by [`hex::encode`]. Keeps the normalized original alongside the
/// padded form because verification needs both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncodedPayload {
    original: String,
    padded: String,
    added: usize,
}

impl EncodedPayload {
    pub(crate) fn from_parts(original: String, padded: String, added: usize) -> Self {
        Self {
            original,
            padded,
            added,
        }
    }

    /// Normalized barcode before padding.
    #[must_use]
    pub fn original(&self) -> &str {
        &self.original
    }

    /// Payload sent to the reader.
    #[must_use]
    pub fn padded(&self) -> &str {
        &self.padded
    }

    /// Number of pad characters prepended.
    #[must_use]
    pub fn added(&self) -> usize {
        self.added
    }

    /// Value a stripped read-back must equal.
    #[must_use]
    pub fn expected_readback(&self) -> String {
        hex::expected_readback(&self.original, self.added)
    }

    /// Check a raw EPC read back from a tag against this payload.
    ///
    /// The EPC is uppercased and stripped of leading zero bytes before the
    /// comparison.
    #[must_use]
    pub fn matches_readback(&self, epc: &str) -> bool {
        hex::strip_leading_zero_pairs(&hex::normalize(epc)) == self.expected_readback()
    }
}

impl fmt::Display for EncodedPayload {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.padded)
    }
}

/// One tag seen during an inventory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TagObservation {
    /// Current EPC bank content as hex.
    pub epc: String,

    /// Received signal strength (dBm, higher is stronger).
    pub rssi: i32,
}

impl TagObservation {
    /// Create a new observation.
    pub fn new(epc: impl Into<String>, rssi: i32) -> Self {
        Self {
            epc: epc.into(),
            rssi,
        }
    }

    /// EPC uppercased with leading zero bytes removed.
    #[must_use]
    pub fn display_epc(&self) -> String {
        hex::strip_leading_zero_pairs(&hex::normalize(&self.epc))
    }
}

/// Gen2 access password (8 hex characters).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccessPassword(String);

impl AccessPassword {
    /// Create an access password with validation.
    ///
    /// # Errors
    /// Returns [`InvalidAccessPassword`] unless the input is exactly 8 hex
    /// characters.
    pub fn new(password: &str) -> Result<Self, InvalidAccessPassword> {
        let password = hex::normalize(password.trim());

        if password.len() != ACCESS_PASSWORD_LEN || !hex::is_valid_hex(&password) {
            return Err(InvalidAccessPassword(format!(
                "expected {ACCESS_PASSWORD_LEN} hex characters, got {password:?}"
            )));
        }

        Ok(Self(password))
    }

    /// Get the password as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for AccessPassword {
    fn default() -> Self {
        Self(DEFAULT_ACCESS_PASSWORD.to_string())
    }
}

impl TryFrom<String> for AccessPassword {
    type Error = InvalidAccessPassword;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        AccessPassword::new(&value)
    }
}

impl From<AccessPassword> for String {
    fn from(value: AccessPassword) -> Self {
        value.0
    }
}

impl std::str::FromStr for AccessPassword {
    type Err = InvalidAccessPassword;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AccessPassword::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("ABC123", "ABC123")]
    #[case("  0042\n", "0042")]
    #[case("\tabc ", "abc")]
    fn test_barcode_value_trims(#[case] input: &str, #[case] expected: &str) {
        let value = BarcodeValue::new(input).unwrap();
        assert_eq!(value.as_str(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("\r\n")]
    fn test_barcode_value_empty(#[case] input: &str) {
        assert!(BarcodeValue::new(input).is_none());
    }

    #[test]
    fn test_payload_matches_even_padding() {
        let payload = hex::encode("AB").unwrap();
        assert_eq!(payload.padded(), "00AB");
        assert!(payload.matches_readback("00AB"));
        assert!(payload.matches_readback("00ab"));
        assert!(!payload.matches_readback("00AC"));
    }

    #[test]
    fn test_payload_matches_full_bank_readback() {
        // Reader reports the whole 96-bit bank with leading zero words
        let payload = hex::encode("ABCD1234").unwrap();
        assert!(payload.matches_readback("00000000ABCD1234"));
    }

    #[test]
    fn test_observation_display_epc() {
        let tag = TagObservation::new("0000e2001234", -48);
        assert_eq!(tag.display_epc(), "E2001234");
    }

    #[rstest]
    #[case("00000000")]
    #[case("deadBEEF")]
    fn test_access_password_valid(#[case] input: &str) {
        let password = AccessPassword::new(input).unwrap();
        assert_eq!(password.as_str(), input.to_uppercase());
    }

    #[rstest]
    #[case("0000")]
    #[case("000000000")]
    #[case("0000000G")]
    fn test_access_password_invalid(#[case] input: &str) {
        let err = AccessPassword::new(input).unwrap_err();
        assert!(err.to_string().starts_with("Invalid access password"));
    }

    #[test]
    fn test_access_password_default() {
        assert_eq!(AccessPassword::default().as_str(), "00000000");
    }

    #[test]
    fn test_access_password_serde() {
        let password: AccessPassword = serde_json::from_str("\"1234abcd\"").unwrap();
        assert_eq!(password.as_str(), "1234ABCD");
        assert!(serde_json::from_str::<AccessPassword>("\"xyz\"").is_err());
    }
}
