//! EPC hex encoding rules.
//!
//! A barcode is written onto the EPC bank as uppercase hex. The reader only
//! accepts whole 16-bit words, so the payload is left-padded with `0` up to a
//! multiple of four characters. When the tag is read back the reader reports
//! the full bank, and leading zero *bytes* are stripped for display and
//! comparison.
//!
//! Padding works in nibbles but stripping works in bytes. A payload that
//! needed an odd number of pad nibbles therefore reads back with one extra
//! leading `0` that stripping cannot remove, which is what
//! [`expected_readback`] accounts for.
//!
//! ```text
//! barcode   "ABC"    (3 chars)
//! pad       "0ABC"   added = 1 (odd)
//! read back "0ABC"
//! strip     "0ABC"   no "00" prefix
//! expected  "0ABC"   "0" + "ABC"
//! ```
//!
//! # Examples
//!
//! ```
//! use tagbridge_core::hex;
//!
//! let payload = hex::encode("abc").unwrap();
//! assert_eq!(payload.padded(), "0ABC");
//! assert_eq!(payload.added(), 1);
//! assert!(payload.matches_readback("0ABC"));
//! ```

use crate::{
    EncodedPayload, Result,
    constants::{EPC_WORD_NIBBLES, MAX_EPC_HEX_LEN, PAD_CHAR},
    error::Error,
};

/// Normalize barcode input to uppercase.
#[must_use]
pub fn normalize(s: &str) -> String {
    s.to_ascii_uppercase()
}

/// Check that every character is `0-9` or `A-F`.
///
/// Input is expected to be normalized already; lowercase letters are
/// rejected. The empty string is accepted.
///
/// # Examples
///
/// ```
/// use tagbridge_core::hex::is_valid_hex;
///
/// assert!(is_valid_hex("1A2B3C"));
/// assert!(!is_valid_hex("1G23"));
/// assert!(is_valid_hex(""));
/// ```
#[must_use]
pub fn is_valid_hex(s: &str) -> bool {
    s.chars().all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c))
}

/// Check whether a payload exceeds the 96-bit EPC bank.
#[must_use]
pub fn is_too_long(s: &str) -> bool {
    s.len() > MAX_EPC_HEX_LEN
}

/// Left-pad `s` with zeros to a whole number of EPC words.
///
/// Returns the padded string and the number of characters added, which is
/// always in `0..4`.
///
/// # Examples
///
/// ```
/// use tagbridge_core::hex::pad_to_word;
///
/// assert_eq!(pad_to_word("ABC"), ("0ABC".to_string(), 1));
/// assert_eq!(pad_to_word("ABCD1234"), ("ABCD1234".to_string(), 0));
/// assert_eq!(pad_to_word("12345"), ("00012345".to_string(), 3));
/// ```
#[must_use]
pub fn pad_to_word(s: &str) -> (String, usize) {
    let remainder = s.len() % EPC_WORD_NIBBLES;
    if remainder == 0 {
        return (s.to_string(), 0);
    }

    let added = EPC_WORD_NIBBLES - remainder;
    let mut padded = String::with_capacity(s.len() + added);
    padded.extend(std::iter::repeat_n(PAD_CHAR, added));
    padded.push_str(s);
    (padded, added)
}

/// Remove leading `"00"` byte pairs.
///
/// Single leading zero nibbles are kept. An all-zero input collapses to `"0"`.
///
/// # Examples
///
/// ```
/// use tagbridge_core::hex::strip_leading_zero_pairs;
///
/// assert_eq!(strip_leading_zero_pairs("0000ABCD"), "ABCD");
/// assert_eq!(strip_leading_zero_pairs("000ABC"), "0ABC");
/// assert_eq!(strip_leading_zero_pairs("0000"), "0");
/// ```
#[must_use]
pub fn strip_leading_zero_pairs(hex: &str) -> String {
    let mut rest = hex;
    while let Some(stripped) = rest.strip_prefix("00") {
        rest = stripped;
    }

    if rest.is_empty() {
        "0".to_string()
    } else {
        rest.to_string()
    }
}

/// Value a stripped read-back must equal for the write to count as verified.
///
/// An odd pad count leaves one leading zero nibble that
/// [`strip_leading_zero_pairs`] keeps, so it is part of the expected value.
///
/// # Examples
///
/// ```
/// use tagbridge_core::hex::expected_readback;
///
/// assert_eq!(expected_readback("ABC", 1), "0ABC");
/// assert_eq!(expected_readback("AB", 2), "AB");
/// ```
#[must_use]
pub fn expected_readback(original: &str, added: usize) -> String {
    if added % 2 == 1 {
        format!("{PAD_CHAR}{original}")
    } else {
        original.to_string()
    }
}

/// Encode barcode text into a word-aligned EPC payload.
///
/// The input is normalized to uppercase, validated, length-checked and padded
/// in that order.
///
/// # Errors
///
/// - [`Error::InvalidHexInput`] if a character is outside `0-9 A-F`
/// - [`Error::PayloadTooLong`] if the input exceeds [`MAX_EPC_HEX_LEN`]
pub fn encode(barcode: &str) -> Result<EncodedPayload> {
    let original = normalize(barcode);

    if !is_valid_hex(&original) {
        return Err(Error::InvalidHexInput { value: original });
    }

    if is_too_long(&original) {
        return Err(Error::PayloadTooLong {
            length: original.len(),
            max: MAX_EPC_HEX_LEN,
        });
    }

    let (padded, added) = pad_to_word(&original);
    Ok(EncodedPayload::from_parts(original, padded, added))
}
