//! Error types for hardware operations.
//!
//! Reader firmware reports the outcome of each command as an integer status
//! code (0 = success). Non-zero codes are carried by
//! [`HardwareError::CommandFailed`] and [`HardwareError::ConnectionFailed`] so
//! callers can surface the exact code to the operator.

/// Result type alias for hardware operations.
pub type Result<T> = std::result::Result<T, HardwareError>;

/// Status code reported for failures that never reached the reader.
pub const TRANSPORT_FAILURE_CODE: i32 = -1;

/// Failures of reader, scanner and trigger operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HardwareError {
    /// Device link is down or was never opened.
    #[error("Device disconnected: {device}")]
    Disconnected { device: String },

    /// Reader refused the connection.
    #[error("Connection failed with code {code}")]
    ConnectionFailed { code: i32 },

    /// Reader returned a non-zero status for a command.
    #[error("{operation} failed with code {code}")]
    CommandFailed { operation: String, code: i32 },

    /// Command issued in a state the device cannot handle.
    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },
}

impl HardwareError {
    pub fn disconnected(device: impl Into<String>) -> Self {
        Self::Disconnected {
            device: device.into(),
        }
    }

    pub fn connection_failed(code: i32) -> Self {
        Self::ConnectionFailed { code }
    }

    pub fn command_failed(operation: impl Into<String>, code: i32) -> Self {
        Self::CommandFailed {
            operation: operation.into(),
            code,
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::ConfigurationError {
            message: message.into(),
        }
    }

    /// Status code to report for this error.
    ///
    /// Returns the reader's own code for [`CommandFailed`](Self::CommandFailed)
    /// and [`ConnectionFailed`](Self::ConnectionFailed), and
    /// [`TRANSPORT_FAILURE_CODE`] for everything else.
    pub fn status_code(&self) -> i32 {
        match self {
            Self::CommandFailed { code, .. } | Self::ConnectionFailed { code } => *code,
            Self::Disconnected { .. } | Self::ConfigurationError { .. } => TRANSPORT_FAILURE_CODE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disconnected_message() {
        let error = HardwareError::disconnected("UHF reader");
        assert_eq!(error.to_string(), "Device disconnected: UHF reader");
    }

    #[test]
    fn test_command_failed_keeps_code() {
        let error = HardwareError::command_failed("write_epc", 251);
        assert_eq!(error.to_string(), "write_epc failed with code 251");
        assert_eq!(error.status_code(), 251);
    }

    #[test]
    fn test_connection_failed_keeps_code() {
        let error = HardwareError::connection_failed(48);
        assert_eq!(error.to_string(), "Connection failed with code 48");
        assert_eq!(error.status_code(), 48);
    }

    #[test]
    fn test_local_failures_report_transport_code() {
        assert_eq!(
            HardwareError::disconnected("reader").status_code(),
            TRANSPORT_FAILURE_CODE
        );
        assert_eq!(
            HardwareError::configuration("no tag callback registered").status_code(),
            TRANSPORT_FAILURE_CODE
        );
    }
}
