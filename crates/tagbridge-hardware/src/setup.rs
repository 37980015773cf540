//! Reader bring-up and teardown.
//!
//! Bring-up is best effort: every step is attempted even if an earlier one
//! failed, and failures are logged rather than returned. The application
//! stays usable in a degraded mode and individual commands report their own
//! errors later.

use tracing::{error, info, warn};

use crate::traits::TagReader;
use crate::types::ReaderSettings;

/// Which bring-up steps succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BringUpReport {
    /// Connection opened.
    pub connected: bool,

    /// RF power applied.
    pub power_set: bool,

    /// Inventory parameters applied.
    pub params_set: bool,
}

impl BringUpReport {
    /// Check if every step succeeded.
    pub fn is_complete(&self) -> bool {
        self.connected && self.power_set && self.params_set
    }
}

/// Connect and configure a reader.
///
/// Steps: connect, set RF power, read the inventory parameter block,
/// override it with `settings.inventory`, write it back. If the current
/// block cannot be read, the configured one is written anyway.
///
/// # Examples
///
/// ```
/// use tagbridge_hardware::mock::MockTagReader;
/// use tagbridge_hardware::setup::bring_up;
/// use tagbridge_hardware::ReaderSettings;
///
/// #[tokio::main]
/// async fn main() {
///     let (mut reader, handle) = MockTagReader::new();
///
///     let report = bring_up(&mut reader, &ReaderSettings::default()).await;
///     assert!(report.is_complete());
///     assert_eq!(handle.rf_power(), Some(30));
/// }
/// ```
pub async fn bring_up<R: TagReader>(reader: &mut R, settings: &ReaderSettings) -> BringUpReport {
    let mut report = BringUpReport::default();
    let connection = &settings.connection;

    match reader.connect(connection).await {
        Ok(()) => {
            info!(port = %connection.port, baud = connection.baud, "UHF reader connected");
            report.connected = true;
        }
        Err(e) => {
            error!(
                port = %connection.port,
                code = e.status_code(),
                error = %e,
                "UHF reader connect failed"
            );
        }
    }

    match reader.set_rf_power(settings.rf_power_dbm).await {
        Ok(()) => report.power_set = true,
        Err(e) => warn!(dbm = settings.rf_power_dbm, error = %e, "Failed to set RF power"),
    }

    if let Err(e) = reader.inventory_params().await {
        warn!(error = %e, "Failed to read inventory parameters");
    }

    match reader.set_inventory_params(&settings.inventory).await {
        Ok(()) => report.params_set = true,
        Err(e) => warn!(
            params = ?settings.inventory,
            error = %e,
            "Failed to set inventory parameters"
        ),
    }

    report
}

/// Stop a running inventory and disconnect.
///
/// Failures are logged and do not stop the remaining steps.
pub async fn tear_down<R: TagReader>(reader: &mut R, inventory_running: bool) {
    if inventory_running && let Err(e) = reader.stop_read().await {
        warn!(error = %e, "Failed to stop inventory during teardown");
    }

    match reader.disconnect().await {
        Ok(()) => info!("UHF reader disconnected"),
        Err(e) => warn!(error = %e, "Failed to disconnect UHF reader"),
    }
}
