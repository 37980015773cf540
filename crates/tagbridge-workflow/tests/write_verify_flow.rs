//! End-to-end trigger cycles against the mock reader.

use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use parking_lot::Mutex as SyncMutex;
use tagbridge_core::{AccessPassword, BarcodeValue};
use tagbridge_hardware::mock::{MockTagReader, MockTagReaderHandle, STATUS_NO_TAG};
use tagbridge_hardware::{ConnectionSettings, TagReader, TRANSPORT_FAILURE_CODE};
use tagbridge_workflow::{
    Locale, OneShotTimer, OutcomeSink, TimerHandle, TriggerResponse, WorkflowConfig,
    WorkflowOutcome, WriteVerifyWorkflow,
};
use tokio::sync::Mutex;

#[derive(Default)]
struct RecordingSink {
    outcomes: SyncMutex<Vec<WorkflowOutcome>>,
}

impl RecordingSink {
    fn outcomes(&self) -> Vec<WorkflowOutcome> {
        self.outcomes.lock().clone()
    }
}

impl OutcomeSink for RecordingSink {
    fn present(&self, outcome: &WorkflowOutcome) {
        self.outcomes.lock().push(outcome.clone());
    }
}

struct Fixture {
    workflow: Arc<WriteVerifyWorkflow<MockTagReader>>,
    reader: MockTagReaderHandle,
    sink: Arc<RecordingSink>,
}

async fn fixture_with(config: WorkflowConfig) -> Fixture {
    let (mut reader, handle) = MockTagReader::new();
    reader
        .connect(&ConnectionSettings::default())
        .await
        .unwrap();

    let sink = Arc::new(RecordingSink::default());
    let workflow = WriteVerifyWorkflow::new(
        Arc::new(Mutex::new(reader)),
        Arc::clone(&sink) as Arc<dyn OutcomeSink>,
        config,
    );

    Fixture {
        workflow: Arc::new(workflow),
        reader: handle,
        sink,
    }
}

async fn fixture() -> Fixture {
    fixture_with(WorkflowConfig::default()).await
}

fn barcode(raw: &str) -> BarcodeValue {
    BarcodeValue::new(raw).unwrap()
}

fn completed(response: TriggerResponse) -> WorkflowOutcome {
    match response {
        TriggerResponse::Completed(outcome) => outcome,
        TriggerResponse::Ignored => panic!("trigger was ignored"),
    }
}

#[tokio::test(start_paused = true)]
async fn test_write_and_verify_odd_padding() {
    let fx = fixture().await;
    fx.reader.place_tag("E2000017221101441890ABCD", -45);

    let outcome = completed(fx.workflow.on_trigger(Some(&barcode("abc"))).await);

    assert_eq!(
        outcome,
        WorkflowOutcome::Success {
            value: "ABC".into(),
            rssi: -45
        }
    );
    let writes = fx.reader.writes();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].epc, "0ABC");
    assert_eq!(writes[0].password, "00000000");
    assert_eq!(fx.reader.start_count(), 1);
    assert_eq!(fx.reader.stop_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_write_and_verify_even_padding() {
    let fx = fixture().await;
    fx.reader.place_tag("1111", -50);

    let outcome = completed(fx.workflow.on_trigger(Some(&barcode("AB"))).await);

    assert_eq!(fx.reader.writes()[0].epc, "00AB");
    assert!(outcome.is_success());
}

#[tokio::test(start_paused = true)]
async fn test_invalid_hex_never_writes() {
    let fx = fixture().await;
    fx.reader.place_tag("1111", -50);

    let outcome = completed(fx.workflow.on_trigger(Some(&barcode("1G23"))).await);

    assert_eq!(
        outcome,
        WorkflowOutcome::InvalidHex {
            value: "1G23".into()
        }
    );
    assert!(fx.reader.writes().is_empty());
    assert_eq!(fx.reader.start_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_too_long_never_writes() {
    let fx = fixture().await;
    fx.reader.place_tag("1111", -50);

    let outcome = completed(
        fx.workflow
            .on_trigger(Some(&barcode(&"A".repeat(25))))
            .await,
    );

    assert_eq!(
        outcome,
        WorkflowOutcome::TooLong {
            length: 25,
            max: 24
        }
    );
    assert!(fx.reader.writes().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_write_failure_skips_inventory() {
    let fx = fixture().await;
    fx.reader.place_tag("1111", -50);
    fx.reader.set_write_status(5);

    let outcome = completed(fx.workflow.on_trigger(Some(&barcode("ABCD"))).await);

    assert_eq!(outcome, WorkflowOutcome::WriteFailed { code: 5 });
    assert_eq!(fx.reader.start_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_write_with_empty_field_fails() {
    let fx = fixture().await;

    let outcome = completed(fx.workflow.on_trigger(Some(&barcode("ABCD"))).await);

    assert_eq!(
        outcome,
        WorkflowOutcome::WriteFailed {
            code: STATUS_NO_TAG
        }
    );
}

#[tokio::test(start_paused = true)]
async fn test_write_on_disconnected_reader_reports_transport_code() {
    let (reader, handle) = MockTagReader::new();
    handle.place_tag("1111", -50);
    let sink = Arc::new(RecordingSink::default());
    let workflow = WriteVerifyWorkflow::new(
        Arc::new(Mutex::new(reader)),
        Arc::clone(&sink) as Arc<dyn OutcomeSink>,
        WorkflowConfig::default(),
    );

    let outcome = completed(workflow.on_trigger(Some(&barcode("ABCD"))).await);

    assert_eq!(
        outcome,
        WorkflowOutcome::WriteFailed {
            code: TRANSPORT_FAILURE_CODE
        }
    );
    assert_eq!(sink.outcomes(), vec![outcome]);
}

#[tokio::test(start_paused = true)]
async fn test_mismatch_when_tag_keeps_old_value() {
    let fx = fixture().await;
    fx.reader.place_tag("1111", -50);
    fx.reader.set_write_override(Some("00001234".into()));

    let outcome = completed(fx.workflow.on_trigger(Some(&barcode("ABC"))).await);

    assert_eq!(
        outcome,
        WorkflowOutcome::Mismatch {
            read: "1234".into(),
            expected: "0ABC".into(),
            rssi: -50
        }
    );
}

#[tokio::test(start_paused = true)]
async fn test_read_only_empty_field() {
    let fx = fixture().await;

    let outcome = completed(fx.workflow.on_trigger(None).await);

    assert_eq!(outcome, WorkflowOutcome::NoTagFound);
    assert!(fx.reader.writes().is_empty());
    assert_eq!(fx.reader.start_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_read_only_reports_strongest_tag() {
    let fx = fixture().await;
    fx.reader.place_tag("1111", -40);
    fx.reader.place_tag("00002222", -30);

    let outcome = completed(fx.workflow.on_trigger(None).await);

    assert_eq!(
        outcome,
        WorkflowOutcome::EpcReport {
            value: "2222".into(),
            rssi: -30
        }
    );
    assert_eq!(outcome.message(Locale::Ru), "EPC: 2222 (RSSI: -30)");
}

#[tokio::test(start_paused = true)]
async fn test_no_barcode_when_read_only_disabled() {
    let fx = fixture_with(WorkflowConfig {
        read_only_without_barcode: false,
        ..WorkflowConfig::default()
    })
    .await;
    fx.reader.place_tag("1111", -40);

    let outcome = completed(fx.workflow.on_trigger(None).await);

    assert_eq!(outcome, WorkflowOutcome::NoBarcode);
    assert_eq!(fx.reader.start_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_custom_password_and_duration() {
    let fx = fixture_with(WorkflowConfig {
        inventory_duration: Duration::from_millis(200),
        access_password: AccessPassword::new("deadbeef").unwrap(),
        ..WorkflowConfig::default()
    })
    .await;
    fx.reader.place_tag("1111", -40);

    let begin = tokio::time::Instant::now();
    let outcome = completed(fx.workflow.on_trigger(Some(&barcode("ABCD"))).await);
    let elapsed = begin.elapsed();

    assert!(outcome.is_success());
    assert_eq!(fx.reader.writes()[0].password, "DEADBEEF");
    assert!(elapsed >= Duration::from_millis(200));
    assert!(elapsed < Duration::from_millis(800));
}

#[tokio::test(start_paused = true)]
async fn test_trigger_during_cycle_is_ignored() {
    let fx = fixture().await;
    fx.reader.place_tag("1111", -40);

    let first = {
        let workflow = Arc::clone(&fx.workflow);
        tokio::spawn(async move { workflow.on_trigger(None).await })
    };

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(fx.workflow.is_busy());

    let second = fx.workflow.on_trigger(Some(&barcode("ABCD"))).await;
    assert_eq!(second, TriggerResponse::Ignored);

    let first = completed(first.await.unwrap());
    assert!(matches!(first, WorkflowOutcome::EpcReport { .. }));
    assert!(fx.reader.writes().is_empty());
    assert_eq!(fx.reader.start_count(), 1);
    assert_eq!(fx.sink.outcomes().len(), 1);
    assert!(!fx.workflow.is_busy());
}

#[tokio::test(start_paused = true)]
async fn test_sink_receives_every_outcome() {
    let fx = fixture().await;
    fx.reader.place_tag("1111", -40);

    let _ = fx.workflow.on_trigger(Some(&barcode("XYZ"))).await;
    let _ = fx.workflow.on_trigger(Some(&barcode("1111"))).await;
    let _ = fx.workflow.on_trigger(None).await;

    let outcomes = fx.sink.outcomes();
    assert_eq!(outcomes.len(), 3);
    assert!(matches!(outcomes[0], WorkflowOutcome::InvalidHex { .. }));
    assert!(outcomes[1].is_success());
    assert_eq!(
        outcomes[2],
        WorkflowOutcome::EpcReport {
            value: "1111".into(),
            rssi: -40
        }
    );
}

/// Timer that drops every task, so inventories never report back.
struct DiscardingTimer;

impl OneShotTimer for DiscardingTimer {
    fn schedule(&self, _delay: Duration, _task: BoxFuture<'static, ()>) -> TimerHandle {
        TimerHandle::new()
    }
}

#[tokio::test(start_paused = true)]
async fn test_lost_inventory_reports_no_tag() {
    let (mut reader, handle) = MockTagReader::new();
    reader
        .connect(&ConnectionSettings::default())
        .await
        .unwrap();
    handle.place_tag("0ABC", -45);

    let sink = Arc::new(RecordingSink::default());
    let workflow = WriteVerifyWorkflow::with_timer(
        Arc::new(Mutex::new(reader)),
        DiscardingTimer,
        Arc::clone(&sink) as Arc<dyn OutcomeSink>,
        WorkflowConfig::default(),
    );

    let outcome = completed(workflow.on_trigger(Some(&barcode("ABC"))).await);

    assert_eq!(outcome, WorkflowOutcome::NoTagFound);
    assert_eq!(handle.writes().len(), 1);
    assert_eq!(sink.outcomes(), vec![WorkflowOutcome::NoTagFound]);
}
