//! Mock UHF reader implementation for testing and development.
//!
//! The mock keeps a simulated RF field: a list of tags with their EPC and
//! RSSI. While an inventory is running a background task reports every tag
//! in the field to the registered callback once per report interval, so
//! callbacks arrive from a different task than the one issuing commands, as
//! they do on real hardware.

use crate::{
    HardwareError, Result,
    traits::{TagCallback, TagReader},
    types::{ConnectionSettings, InventoryParams},
};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tagbridge_core::{AccessPassword, TagObservation};
use tokio::task::JoinHandle;
use tracing::{debug, trace};

/// Status code returned by a write when no tag is in the field.
pub const STATUS_NO_TAG: i32 = 0xFB;

/// Default interval between inventory reports.
pub const DEFAULT_REPORT_INTERVAL: Duration = Duration::from_millis(50);

/// A write command received by the mock reader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteRecord {
    /// Payload sent to the reader.
    pub epc: String,

    /// Access password sent with the payload.
    pub password: String,
}

/// Shared state between the reader and its handle.
#[derive(Debug, Default)]
struct FieldState {
    tags: Vec<TagObservation>,
    connected: bool,
    reading: bool,
    rf_power: Option<u8>,
    params: InventoryParams,
    connect_status: i32,
    write_status: i32,
    start_status: i32,
    stop_status: i32,
    write_override: Option<String>,
    writes: Vec<WriteRecord>,
    start_count: usize,
    stop_count: usize,
}

/// Mock UHF reader for testing and development.
///
/// # Examples
///
/// ```
/// use tagbridge_hardware::mock::MockTagReader;
/// use tagbridge_hardware::traits::TagReader;
/// use tagbridge_hardware::ConnectionSettings;
/// use tagbridge_core::AccessPassword;
///
/// #[tokio::main]
/// async fn main() -> tagbridge_hardware::Result<()> {
///     let (mut reader, handle) = MockTagReader::new();
///     handle.place_tag("E2000017", -50);
///
///     reader.connect(&ConnectionSettings::default()).await?;
///     reader.write_epc("0ABC", &AccessPassword::default()).await?;
///
///     assert_eq!(handle.tags()[0].epc, "0ABC");
///     Ok(())
/// }
/// ```
pub struct MockTagReader {
    state: Arc<Mutex<FieldState>>,
    callback: Option<Arc<dyn TagCallback>>,
    report_interval: Duration,
    scan_task: Option<JoinHandle<()>>,
}

impl MockTagReader {
    /// Create a new mock reader with the default report interval.
    ///
    /// Returns a tuple of (MockTagReader, MockTagReaderHandle) where the
    /// handle controls the simulated field and scripted failures.
    pub fn new() -> (Self, MockTagReaderHandle) {
        Self::with_report_interval(DEFAULT_REPORT_INTERVAL)
    }

    /// Create a new mock reader reporting the field every `interval`.
    ///
    /// Intervals below 1ms are raised to 1ms.
    pub fn with_report_interval(interval: Duration) -> (Self, MockTagReaderHandle) {
        let state = Arc::new(Mutex::new(FieldState::default()));

        let reader = Self {
            state: Arc::clone(&state),
            callback: None,
            report_interval: interval.max(Duration::from_millis(1)),
            scan_task: None,
        };

        (reader, MockTagReaderHandle { state })
    }

    fn ensure_connected(&self) -> Result<()> {
        if self.state.lock().connected {
            Ok(())
        } else {
            Err(HardwareError::disconnected("mock UHF reader"))
        }
    }

    fn spawn_scan(&mut self, callback: Arc<dyn TagCallback>) {
        let state = Arc::clone(&self.state);
        let period = self.report_interval;

        self.scan_task = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                let tags = state.lock().tags.clone();
                for tag in tags {
                    trace!(epc = %tag.epc, rssi = tag.rssi, "mock reader report");
                    callback.on_tag(tag);
                }
            }
        }));
    }
}

impl fmt::Debug for MockTagReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockTagReader")
            .field("report_interval", &self.report_interval)
            .field("has_callback", &self.callback.is_some())
            .field("scanning", &self.scan_task.is_some())
            .finish_non_exhaustive()
    }
}

impl Default for MockTagReader {
    fn default() -> Self {
        Self::new().0
    }
}

impl Drop for MockTagReader {
    fn drop(&mut self) {
        if let Some(task) = self.scan_task.take() {
            task.abort();
        }
    }
}

impl TagReader for MockTagReader {
    async fn connect(&mut self, settings: &ConnectionSettings) -> Result<()> {
        let mut state = self.state.lock();
        if state.connect_status != 0 {
            return Err(HardwareError::connection_failed(state.connect_status));
        }

        debug!(port = %settings.port, baud = settings.baud, "mock reader connected");
        state.connected = true;
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<()> {
        if let Some(task) = self.scan_task.take() {
            task.abort();
        }

        let mut state = self.state.lock();
        state.connected = false;
        state.reading = false;
        Ok(())
    }

    async fn set_rf_power(&mut self, dbm: u8) -> Result<()> {
        self.ensure_connected()?;
        self.state.lock().rf_power = Some(dbm);
        Ok(())
    }

    async fn inventory_params(&mut self) -> Result<InventoryParams> {
        self.ensure_connected()?;
        Ok(self.state.lock().params)
    }

    async fn set_inventory_params(&mut self, params: &InventoryParams) -> Result<()> {
        self.ensure_connected()?;
        self.state.lock().params = *params;
        Ok(())
    }

    async fn write_epc(&mut self, epc: &str, password: &AccessPassword) -> Result<()> {
        self.ensure_connected()?;

        let mut state = self.state.lock();
        state.writes.push(WriteRecord {
            epc: epc.to_string(),
            password: password.as_str().to_string(),
        });

        if state.write_status != 0 {
            return Err(HardwareError::command_failed("write_epc", state.write_status));
        }

        // The write lands on the tag closest to the antenna
        let stored = state
            .write_override
            .clone()
            .unwrap_or_else(|| epc.to_string());
        let target = state
            .tags
            .iter_mut()
            .reduce(|best, tag| if tag.rssi > best.rssi { tag } else { best })
            .ok_or_else(|| HardwareError::command_failed("write_epc", STATUS_NO_TAG))?;
        target.epc = stored;

        Ok(())
    }

    fn set_callback(&mut self, callback: Arc<dyn TagCallback>) {
        self.callback = Some(callback);
    }

    async fn start_read(&mut self) -> Result<()> {
        {
            let mut state = self.state.lock();
            state.start_count += 1;
            if state.start_status != 0 {
                return Err(HardwareError::command_failed("start_read", state.start_status));
            }
            if !state.connected {
                return Err(HardwareError::disconnected("mock UHF reader"));
            }
            state.reading = true;
        }

        let callback = self
            .callback
            .clone()
            .ok_or_else(|| HardwareError::configuration("no tag callback registered"))?;

        if let Some(task) = self.scan_task.take() {
            task.abort();
        }
        self.spawn_scan(callback);
        Ok(())
    }

    async fn stop_read(&mut self) -> Result<()> {
        if let Some(task) = self.scan_task.take() {
            task.abort();
        }

        let stop_status = {
            let mut state = self.state.lock();
            state.stop_count += 1;
            state.reading = false;
            state.stop_status
        };

        if stop_status != 0 {
            return Err(HardwareError::command_failed("stop_read", stop_status));
        }

        if let Some(callback) = &self.callback {
            callback.on_stop();
        }
        Ok(())
    }
}

/// Handle for controlling a mock reader.
///
/// Clones share the same simulated field.
#[derive(Debug, Clone)]
pub struct MockTagReaderHandle {
    state: Arc<Mutex<FieldState>>,
}

impl MockTagReaderHandle {
    /// Place a tag in the field, replacing any tag with the same EPC.
    pub fn place_tag(&self, epc: impl Into<String>, rssi: i32) {
        let tag = TagObservation::new(epc, rssi);
        let mut state = self.state.lock();
        state.tags.retain(|t| t.epc != tag.epc);
        state.tags.push(tag);
    }

    /// Remove a tag from the field.
    ///
    /// Returns `true` if the tag was present.
    pub fn remove_tag(&self, epc: &str) -> bool {
        let mut state = self.state.lock();
        let before = state.tags.len();
        state.tags.retain(|t| t.epc != epc);
        state.tags.len() != before
    }

    /// Remove every tag from the field.
    pub fn clear_field(&self) {
        self.state.lock().tags.clear();
    }

    /// Tags currently in the field.
    pub fn tags(&self) -> Vec<TagObservation> {
        self.state.lock().tags.clone()
    }

    /// Make `connect` fail with `code` (0 restores success).
    pub fn set_connect_status(&self, code: i32) {
        self.state.lock().connect_status = code;
    }

    /// Make `write_epc` fail with `code` (0 restores success).
    pub fn set_write_status(&self, code: i32) {
        self.state.lock().write_status = code;
    }

    /// Make `start_read` fail with `code` (0 restores success).
    pub fn set_start_status(&self, code: i32) {
        self.state.lock().start_status = code;
    }

    /// Make `stop_read` fail with `code` (0 restores success).
    pub fn set_stop_status(&self, code: i32) {
        self.state.lock().stop_status = code;
    }

    /// Store `epc` on the tag instead of the payload of the next writes.
    ///
    /// Simulates a write that the reader acknowledges but the tag does not
    /// retain correctly. `None` restores normal writes.
    pub fn set_write_override(&self, epc: Option<String>) {
        self.state.lock().write_override = epc;
    }

    /// All write commands received so far.
    pub fn writes(&self) -> Vec<WriteRecord> {
        self.state.lock().writes.clone()
    }

    /// Number of `start_read` calls.
    pub fn start_count(&self) -> usize {
        self.state.lock().start_count
    }

    /// Number of `stop_read` calls.
    pub fn stop_count(&self) -> usize {
        self.state.lock().stop_count
    }

    /// Check if the reader is connected.
    pub fn is_connected(&self) -> bool {
        self.state.lock().connected
    }

    /// Check if an inventory is running.
    pub fn is_reading(&self) -> bool {
        self.state.lock().reading
    }

    /// Last RF power set, if any.
    pub fn rf_power(&self) -> Option<u8> {
        self.state.lock().rf_power
    }

    /// Inventory parameters currently stored in the reader.
    pub fn inventory_params(&self) -> InventoryParams {
        self.state.lock().params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Recorder {
        tags: Mutex<Vec<TagObservation>>,
        stops: AtomicUsize,
    }

    impl TagCallback for Recorder {
        fn on_tag(&self, tag: TagObservation) {
            self.tags.lock().push(tag);
        }

        fn on_stop(&self) {
            self.stops.fetch_add(1, Ordering::SeqCst);
        }
    }

    async fn connected_reader() -> (MockTagReader, MockTagReaderHandle) {
        let (mut reader, handle) = MockTagReader::new();
        reader.connect(&ConnectionSettings::default()).await.unwrap();
        (reader, handle)
    }

    #[tokio::test]
    async fn test_mock_reader_connect_failure() {
        let (mut reader, handle) = MockTagReader::new();
        handle.set_connect_status(48);

        let err = reader
            .connect(&ConnectionSettings::default())
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 48);
        assert!(!handle.is_connected());
    }

    #[tokio::test]
    async fn test_mock_reader_write_targets_strongest_tag() {
        let (mut reader, handle) = connected_reader().await;
        handle.place_tag("1111", -60);
        handle.place_tag("2222", -35);

        reader
            .write_epc("0ABC", &AccessPassword::default())
            .await
            .unwrap();

        let tags = handle.tags();
        assert_eq!(tags[0].epc, "1111");
        assert_eq!(tags[1].epc, "0ABC");
        assert_eq!(
            handle.writes(),
            vec![WriteRecord {
                epc: "0ABC".to_string(),
                password: "00000000".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_mock_reader_write_without_tag() {
        let (mut reader, _handle) = connected_reader().await;

        let err = reader
            .write_epc("0ABC", &AccessPassword::default())
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), STATUS_NO_TAG);
    }

    #[tokio::test]
    async fn test_mock_reader_scripted_write_failure() {
        let (mut reader, handle) = connected_reader().await;
        handle.place_tag("1111", -40);
        handle.set_write_status(5);

        let err = reader
            .write_epc("0ABC", &AccessPassword::default())
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 5);
        assert_eq!(handle.tags()[0].epc, "1111");
    }

    #[tokio::test]
    async fn test_mock_reader_write_override() {
        let (mut reader, handle) = connected_reader().await;
        handle.place_tag("1111", -40);
        handle.set_write_override(Some("DEAD".to_string()));

        reader
            .write_epc("BEEF", &AccessPassword::default())
            .await
            .unwrap();
        assert_eq!(handle.tags()[0].epc, "DEAD");
    }

    #[tokio::test]
    async fn test_mock_reader_requires_connection() {
        let (mut reader, _handle) = MockTagReader::new();

        assert!(reader.set_rf_power(30).await.is_err());
        assert!(
            reader
                .write_epc("0ABC", &AccessPassword::default())
                .await
                .is_err()
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_mock_reader_reports_field_until_stopped() {
        let (mut reader, handle) = connected_reader().await;
        handle.place_tag("AAAA", -45);

        let recorder = Arc::new(Recorder::default());
        reader.set_callback(recorder.clone());
        reader.start_read().await.unwrap();
        assert!(handle.is_reading());

        tokio::time::sleep(Duration::from_millis(120)).await;
        reader.stop_read().await.unwrap();

        let reports = recorder.tags.lock().len();
        assert!(reports >= 2, "expected repeated reports, got {reports}");
        assert_eq!(recorder.stops.load(Ordering::SeqCst), 1);
        assert!(!handle.is_reading());

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(recorder.tags.lock().len(), reports);
    }

    #[tokio::test]
    async fn test_mock_reader_start_without_callback() {
        let (mut reader, _handle) = connected_reader().await;

        let err = reader.start_read().await.unwrap_err();
        assert!(matches!(err, HardwareError::ConfigurationError { .. }));
    }

    #[tokio::test]
    async fn test_mock_reader_scripted_stop_failure() {
        let (mut reader, handle) = connected_reader().await;
        let recorder = Arc::new(Recorder::default());
        reader.set_callback(recorder.clone());
        handle.set_stop_status(7);

        reader.start_read().await.unwrap();
        let err = reader.stop_read().await.unwrap_err();

        assert_eq!(err.status_code(), 7);
        assert_eq!(recorder.stops.load(Ordering::SeqCst), 0);
        assert_eq!(handle.stop_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_reader_handle_field_management() {
        let (_reader, handle) = MockTagReader::new();

        handle.place_tag("1111", -40);
        handle.place_tag("1111", -30);
        assert_eq!(handle.tags(), vec![TagObservation::new("1111", -30)]);

        assert!(handle.remove_tag("1111"));
        assert!(!handle.remove_tag("1111"));

        handle.place_tag("2222", -50);
        handle.clear_field();
        assert!(handle.tags().is_empty());
    }
}
