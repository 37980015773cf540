//! Barcode-to-RFID console.
//!
//! Runs the write-and-verify workflow against the simulated UHF reader,
//! with the scanner and trigger driven from standard input. Outcomes go to
//! stdout, logs to stderr.

mod config;
mod console;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tagbridge_core::BarcodeValue;
use tagbridge_hardware::TagReader;
use tagbridge_hardware::devices::{AnyBarcodeSource, AnyTagReader, AnyTriggerSource};
use tagbridge_hardware::manager::{InputEvent, InputHandle, InputManager};
use tagbridge_hardware::mock::{MockScanner, MockTagReader, MockTrigger};
use tagbridge_hardware::setup::{bring_up, tear_down};
use tagbridge_workflow::{Locale, WriteVerifyWorkflow};
use tokio::io::BufReader;
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::console::{Console, sink_for};

/// Write scanned barcodes onto UHF tags and verify them
#[derive(Parser, Debug)]
#[command(name = "tagbridge", version, about)]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "config/tagbridge.toml")]
    config: PathBuf,

    /// Message language, overrides the configuration
    #[arg(short, long)]
    locale: Option<Locale>,

    /// Print outcomes as JSON lines
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = Config::load(&args.config)?;

    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log.level))
        .context("Invalid log level")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let locale = args.locale.unwrap_or(config.workflow.locale);
    info!(
        config_file = %args.config.display(),
        found = args.config.exists(),
        port = %config.reader.port,
        locale = %locale,
        simulated_tags = config.simulation.tags.len(),
        "tagbridge starting"
    );

    let (mut reader, field) =
        MockTagReader::with_report_interval(config.simulation.report_interval());
    config.simulation.apply(&field);

    let report = bring_up(&mut reader, &config.reader.settings()).await;
    if !report.is_complete() {
        warn!(?report, "Reader bring-up incomplete, continuing in degraded mode");
    }

    let reader = Arc::new(Mutex::new(AnyTagReader::Mock(reader)));
    let workflow = Arc::new(WriteVerifyWorkflow::new(
        Arc::clone(&reader),
        sink_for(args.json, locale),
        config.workflow.workflow_config(),
    ));

    let (scanner, scan) = MockScanner::new();
    let (trigger, press) = MockTrigger::new();
    let mut manager = InputManager::new();
    manager.register_scanner(AnyBarcodeSource::Mock(scanner));
    manager.register_trigger(AnyTriggerSource::Mock(trigger));
    let mut input = manager.start();

    let console = Console {
        scanner: scan,
        trigger: press,
        field,
    };
    let console_task = tokio::spawn(console.run(BufReader::new(tokio::io::stdin())));

    run_event_loop(&mut input, &workflow).await;

    input.shutdown().await?;
    console_task.abort();

    let inventory_running = workflow.is_busy();
    tear_down(&mut *reader.lock().await, inventory_running).await;

    info!("tagbridge stopped");
    Ok(())
}

/// Hold the latest scan and run a cycle for each trigger press.
///
/// Returns once an input device closes and every started cycle has finished.
async fn run_event_loop<R>(input: &mut InputHandle, workflow: &Arc<WriteVerifyWorkflow<R>>)
where
    R: TagReader + 'static,
{
    let mut barcode: Option<BarcodeValue> = None;
    let mut cycles = JoinSet::new();

    while let Some(event) = input.recv().await {
        match event {
            InputEvent::Barcode(value) => {
                info!(barcode = %value, "Barcode held");
                barcode = Some(value);
            }
            InputEvent::EmptyDecode => {
                if let Some(previous) = barcode.take() {
                    info!(barcode = %previous, "Empty scan, barcode cleared");
                }
            }
            InputEvent::Trigger => {
                let workflow = Arc::clone(workflow);
                let held = barcode.clone();
                cycles.spawn(async move { workflow.on_trigger(held.as_ref()).await });
            }
            InputEvent::DeviceError { source, error } => {
                info!(%source, %error, "Input closed");
                break;
            }
            _ => {}
        }
    }

    while let Some(result) = cycles.join_next().await {
        if let Err(e) = result {
            warn!(error = %e, "Trigger cycle panicked");
        }
    }
}
