//! Mock trigger button implementation for testing and development.

use crate::{HardwareError, Result, traits::TriggerSource};
use tokio::sync::mpsc;

/// Mock trigger button.
///
/// # Examples
///
/// ```
/// use tagbridge_hardware::mock::MockTrigger;
/// use tagbridge_hardware::traits::TriggerSource;
///
/// #[tokio::main]
/// async fn main() -> tagbridge_hardware::Result<()> {
///     let (mut trigger, handle) = MockTrigger::new();
///
///     handle.press().await?;
///     trigger.next_press().await?;
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockTrigger {
    /// Channel receiver for button presses
    press_rx: mpsc::Receiver<()>,
}

impl MockTrigger {
    /// Create a new mock trigger.
    ///
    /// Returns a tuple of (MockTrigger, MockTriggerHandle) where the handle
    /// can be used to simulate presses.
    pub fn new() -> (Self, MockTriggerHandle) {
        let (press_tx, press_rx) = mpsc::channel(32);
        (Self { press_rx }, MockTriggerHandle { press_tx })
    }
}

impl Default for MockTrigger {
    fn default() -> Self {
        Self::new().0
    }
}

impl TriggerSource for MockTrigger {
    async fn next_press(&mut self) -> Result<()> {
        self.press_rx
            .recv()
            .await
            .ok_or_else(|| HardwareError::disconnected("Trigger channel closed"))
    }
}

/// Handle for simulating presses on a mock trigger.
#[derive(Debug, Clone)]
pub struct MockTriggerHandle {
    /// Channel sender for button presses
    press_tx: mpsc::Sender<()>,
}

impl MockTriggerHandle {
    /// Simulate a trigger press.
    ///
    /// # Errors
    ///
    /// Returns an error if the trigger has been dropped.
    pub async fn press(&self) -> Result<()> {
        self.press_tx
            .send(())
            .await
            .map_err(|_| HardwareError::disconnected("Trigger channel closed"))
    }
}
