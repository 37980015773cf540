//! Line-based operator console.
//!
//! Stands in for the handheld's scan engine and trigger button, and lets the
//! operator move simulated tags in and out of the reader's field.
//!
//! ```text
//! scan <code>        decode a barcode
//! trigger | t        press the trigger
//! tag <epc> <rssi>   place a tag in the field
//! remove <epc>       take a tag out of the field
//! clear              empty the field
//! field              list tags in the field
//! quit | q           exit
//! ```

use std::sync::Arc;

use serde::Serialize;
use tagbridge_hardware::mock::{MockScannerHandle, MockTagReaderHandle, MockTriggerHandle};
use tagbridge_workflow::{Locale, OutcomeSink, WorkflowOutcome};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, warn};

/// One parsed console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Scan(String),
    Trigger,
    PlaceTag { epc: String, rssi: i32 },
    RemoveTag(String),
    ClearField,
    ShowField,
    Quit,
}

impl Command {
    /// Parse a console line. Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(word, rest)| (word, rest.trim()));

        let command = match word.to_ascii_lowercase().as_str() {
            "scan" | "s" => Command::Scan(rest.to_string()),
            "trigger" | "t" => Command::Trigger,
            "tag" => {
                let mut parts = rest.split_whitespace();
                let (Some(epc), Some(rssi), None) = (parts.next(), parts.next(), parts.next())
                else {
                    return Err("usage: tag <epc> <rssi>".to_string());
                };
                let rssi = rssi
                    .parse()
                    .map_err(|_| format!("invalid rssi '{rssi}'"))?;
                Command::PlaceTag {
                    epc: epc.to_string(),
                    rssi,
                }
            }
            "remove" if !rest.is_empty() => Command::RemoveTag(rest.to_string()),
            "remove" => return Err("usage: remove <epc>".to_string()),
            "clear" => Command::ClearField,
            "field" => Command::ShowField,
            "quit" | "q" | "exit" => Command::Quit,
            other => return Err(format!("unknown command '{other}'")),
        };

        Ok(Some(command))
    }
}

/// Control handles the console drives.
pub struct Console {
    pub scanner: MockScannerHandle,
    pub trigger: MockTriggerHandle,
    pub field: MockTagReaderHandle,
}

impl Console {
    /// Read commands until `quit` or end of input.
    ///
    /// Dropping the console afterwards closes the scanner and trigger, which
    /// ends the input stream.
    pub async fn run<I>(self, input: I)
    where
        I: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();

        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => {
                    warn!(error = %e, "Console read failed");
                    break;
                }
            };

            match Command::parse(&line) {
                Ok(Some(Command::Quit)) => break,
                Ok(Some(command)) => {
                    if !self.execute(command).await {
                        break;
                    }
                }
                Ok(None) => {}
                Err(message) => eprintln!("{message}"),
            }
        }

        debug!("Console closed");
    }

    /// Returns `false` once the input devices are gone.
    async fn execute(&self, command: Command) -> bool {
        match command {
            Command::Scan(code) => self.scanner.scan(code).await.is_ok(),
            Command::Trigger => self.trigger.press().await.is_ok(),
            Command::PlaceTag { epc, rssi } => {
                self.field.place_tag(epc, rssi);
                true
            }
            Command::RemoveTag(epc) => {
                if !self.field.remove_tag(&epc) {
                    eprintln!("no tag {epc} in field");
                }
                true
            }
            Command::ClearField => {
                self.field.clear_field();
                true
            }
            Command::ShowField => {
                for tag in self.field.tags() {
                    eprintln!("{} ({} dBm)", tag.epc, tag.rssi);
                }
                true
            }
            Command::Quit => false,
        }
    }
}

/// Prints each outcome as a localized status line.
pub struct TextSink {
    pub locale: Locale,
}

impl OutcomeSink for TextSink {
    fn present(&self, outcome: &WorkflowOutcome) {
        println!("{}", outcome.message(self.locale));
    }
}

#[derive(Serialize)]
struct JsonLine<'a> {
    #[serde(flatten)]
    outcome: &'a WorkflowOutcome,
    message: String,
}

/// Prints each outcome as one JSON object per line.
pub struct JsonSink {
    pub locale: Locale,
}

impl OutcomeSink for JsonSink {
    fn present(&self, outcome: &WorkflowOutcome) {
        let line = JsonLine {
            outcome,
            message: outcome.message(self.locale),
        };
        match serde_json::to_string(&line) {
            Ok(json) => println!("{json}"),
            Err(e) => warn!(error = %e, "Failed to serialize outcome"),
        }
    }
}

/// Pick the sink for the requested output format.
pub fn sink_for(json: bool, locale: Locale) -> Arc<dyn OutcomeSink> {
    if json {
        Arc::new(JsonSink { locale })
    } else {
        Arc::new(TextSink { locale })
    }
}
