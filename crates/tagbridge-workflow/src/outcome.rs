//! Trigger cycle outcomes and their operator-facing messages.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Result of one trigger cycle.
///
/// Every cycle ends in exactly one outcome, which is handed to the
/// [`OutcomeSink`](crate::OutcomeSink) and then dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum WorkflowOutcome {
    /// No barcode held and read-only inventory disabled.
    NoBarcode,

    /// Barcode contains characters outside `0-9A-F`.
    InvalidHex {
        /// Normalized barcode.
        value: String,
    },

    /// Barcode is longer than the EPC bank accepts.
    TooLong {
        /// Barcode length in hex digits.
        length: usize,

        /// Maximum accepted length.
        max: usize,
    },

    /// The reader rejected the write.
    WriteFailed {
        /// Reader status code, `-1` for transport failures.
        code: i32,
    },

    /// Inventory finished without seeing a tag.
    NoTagFound,

    /// Strongest tag does not carry the written value.
    Mismatch {
        /// Stripped EPC read back.
        read: String,

        /// Value the read-back had to equal.
        expected: String,

        /// RSSI of the selected tag.
        rssi: i32,
    },

    /// Write verified on the strongest tag.
    Success {
        /// Normalized barcode that was written.
        value: String,

        /// RSSI of the selected tag.
        rssi: i32,
    },

    /// Read-only report of the strongest tag.
    EpcReport {
        /// Stripped EPC.
        value: String,

        /// RSSI of the selected tag.
        rssi: i32,
    },
}

impl WorkflowOutcome {
    /// Check if the cycle verified a write.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, WorkflowOutcome::Success { .. })
    }

    /// Check if the cycle ended in an error.
    ///
    /// `Success` and `EpcReport` are the only non-error outcomes.
    #[must_use]
    pub fn is_error(&self) -> bool {
        !matches!(
            self,
            WorkflowOutcome::Success { .. } | WorkflowOutcome::EpcReport { .. }
        )
    }

    /// Render the status line shown to the operator.
    #[must_use]
    pub fn message(&self, locale: Locale) -> String {
        match locale {
            Locale::En => self.message_en(),
            Locale::Ru => self.message_ru(),
        }
    }

    fn message_en(&self) -> String {
        match self {
            WorkflowOutcome::NoBarcode => "No barcode scanned".to_string(),
            WorkflowOutcome::InvalidHex { .. } => "Error: only 0-9 A-F allowed".to_string(),
            WorkflowOutcome::TooLong { max, .. } => {
                format!("Error: too long (>{max} characters)")
            }
            WorkflowOutcome::WriteFailed { code } => format!("Write error: {code}"),
            WorkflowOutcome::NoTagFound => "No tag detected".to_string(),
            WorkflowOutcome::Mismatch {
                read,
                expected,
                rssi,
            } => format!("MISMATCH: {read} (expected {expected}, RSSI: {rssi})"),
            WorkflowOutcome::Success { value, rssi } => {
                format!("SUCCESS! Written: {value} (RSSI: {rssi})")
            }
            WorkflowOutcome::EpcReport { value, rssi } => format!("EPC: {value} (RSSI: {rssi})"),
        }
    }

    fn message_ru(&self) -> String {
        match self {
            WorkflowOutcome::NoBarcode => "Штрихкод не отсканирован".to_string(),
            WorkflowOutcome::InvalidHex { .. } => "Ошибка: только 0-9 A-F".to_string(),
            WorkflowOutcome::TooLong { max, .. } => {
                format!("Ошибка: слишком длинный (>{max} символов)")
            }
            WorkflowOutcome::WriteFailed { code } => format!("Ошибка записи: {code}"),
            WorkflowOutcome::NoTagFound => "Метка не обнаружена".to_string(),
            WorkflowOutcome::Mismatch {
                read,
                expected,
                rssi,
            } => format!("НЕ СОВПАДАЕТ: {read} (ожидалось {expected}, RSSI: {rssi})"),
            WorkflowOutcome::Success { value, rssi } => {
                format!("УСПЕШНО! Записано: {value} (RSSI: {rssi})")
            }
            WorkflowOutcome::EpcReport { value, rssi } => format!("EPC: {value} (RSSI: {rssi})"),
        }
    }
}

impl fmt::Display for WorkflowOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message_en())
    }
}

/// Language of operator messages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// English.
    #[default]
    En,

    /// Russian.
    Ru,
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Locale::En),
            "ru" => Ok(Locale::Ru),
            other => Err(format!("unsupported locale '{other}' (expected 'en' or 'ru')")),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locale::En => write!(f, "en"),
            Locale::Ru => write!(f, "ru"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(WorkflowOutcome::InvalidHex { value: "1G23".into() }, "Ошибка: только 0-9 A-F")]
    #[case(
        WorkflowOutcome::TooLong { length: 25, max: 24 },
        "Ошибка: слишком длинный (>24 символов)"
    )]
    #[case(WorkflowOutcome::WriteFailed { code: 251 }, "Ошибка записи: 251")]
    #[case(WorkflowOutcome::NoTagFound, "Метка не обнаружена")]
    #[case(
        WorkflowOutcome::Success { value: "ABC".into(), rssi: -41 },
        "УСПЕШНО! Записано: ABC (RSSI: -41)"
    )]
    #[case(
        WorkflowOutcome::Mismatch { read: "1234".into(), expected: "0ABC".into(), rssi: -60 },
        "НЕ СОВПАДАЕТ: 1234 (ожидалось 0ABC, RSSI: -60)"
    )]
    #[case(
        WorkflowOutcome::EpcReport { value: "E200".into(), rssi: -30 },
        "EPC: E200 (RSSI: -30)"
    )]
    fn test_russian_messages(#[case] outcome: WorkflowOutcome, #[case] expected: &str) {
        assert_eq!(outcome.message(Locale::Ru), expected);
    }

    #[rstest]
    #[case(WorkflowOutcome::NoBarcode, "No barcode scanned")]
    #[case(WorkflowOutcome::WriteFailed { code: -1 }, "Write error: -1")]
    #[case(
        WorkflowOutcome::Success { value: "ABC".into(), rssi: -41 },
        "SUCCESS! Written: ABC (RSSI: -41)"
    )]
    fn test_display_is_english(#[case] outcome: WorkflowOutcome, #[case] expected: &str) {
        assert_eq!(outcome.to_string(), expected);
        assert_eq!(outcome.message(Locale::En), expected);
    }

    #[test]
    fn test_success_and_error_classification() {
        let success = WorkflowOutcome::Success {
            value: "ABC".into(),
            rssi: -40,
        };
        let report = WorkflowOutcome::EpcReport {
            value: "ABC".into(),
            rssi: -40,
        };

        assert!(success.is_success());
        assert!(!success.is_error());
        assert!(!report.is_success());
        assert!(!report.is_error());
        assert!(WorkflowOutcome::NoTagFound.is_error());
        assert!(WorkflowOutcome::NoBarcode.is_error());
    }

    #[test]
    fn test_outcome_serializes_tagged() {
        let json = serde_json::to_value(WorkflowOutcome::Mismatch {
            read: "1234".into(),
            expected: "0ABC".into(),
            rssi: -60,
        })
        .unwrap();

        assert_eq!(json["outcome"], "mismatch");
        assert_eq!(json["expected"], "0ABC");
        assert_eq!(json["rssi"], -60);

        let json = serde_json::to_value(WorkflowOutcome::NoTagFound).unwrap();
        assert_eq!(json, serde_json::json!({ "outcome": "no_tag_found" }));
    }

    #[rstest]
    #[case("en", Locale::En)]
    #[case("RU", Locale::Ru)]
    #[case(" ru ", Locale::Ru)]
    fn test_locale_from_str(#[case] input: &str, #[case] expected: Locale) {
        assert_eq!(input.parse::<Locale>().unwrap(), expected);
    }

    #[test]
    fn test_locale_rejects_unknown() {
        assert!("de".parse::<Locale>().is_err());
        assert_eq!(Locale::default(), Locale::En);
    }
}
