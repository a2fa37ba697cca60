//! Pipeline integration tests
//!
//! End-to-end tests exercising batch evaluation with the in-memory sink.
//! Covers extension and size violations, batch ordering, sink failure,
//! and decoding of notification documents.

use a3s_upload_guard::{
    BatchResult, DispatchOutcome, MemoryAlertSink, ObjectEvent, Policy, S3Notification,
    ValidationPipeline, Violation,
};
use std::sync::Arc;

const MIB: u64 = 1024 * 1024;

fn event(key: &str, size: u64) -> ObjectEvent {
    ObjectEvent::new("site-assets", key, size)
}

fn test_pipeline() -> (ValidationPipeline, MemoryAlertSink) {
    let sink = MemoryAlertSink::new();
    let pipeline = ValidationPipeline::new(Policy::default()).with_sink(Arc::new(sink.clone()));
    (pipeline, sink)
}

// ─── Single records ──────────────────────────────────────────────

#[tokio::test]
async fn test_disallowed_extensions_reject_with_one_alert() {
    for key in ["malware.exe", "script.PY", "notes.txt", "Makefile", "dir/.env"] {
        let (pipeline, sink) = test_pipeline();
        let result = pipeline.evaluate(&[event(key, 100)]).await;

        assert_eq!(result.status_code, 400, "key {key}");
        assert_eq!(result.message, "Unauthorized file type");

        let alerts = sink.alerts().await;
        assert_eq!(alerts.len(), 1, "key {key}");
        assert_eq!(alerts[0].subject, "S3 File Validation Alert");
        assert!(alerts[0].body.contains(&format!("File: {key}")));
    }
}

#[tokio::test]
async fn test_allowed_within_limit_sends_nothing() {
    let (pipeline, sink) = test_pipeline();
    let batch: Vec<ObjectEvent> = [
        "index.html", "app.css", "app.js", "a.jpg", "b.jpeg", "c.png", "d.gif", "favicon.ico",
        "logo.svg",
    ]
    .iter()
    .map(|key| event(key, 10 * MIB))
    .collect();

    let result = pipeline.evaluate(&batch).await;

    assert_eq!(result, BatchResult::validated());
    assert_eq!(sink.count().await, 0);
}

#[tokio::test]
async fn test_oversized_alerts_and_still_succeeds() {
    let (pipeline, sink) = test_pipeline();
    let result = pipeline.evaluate(&[event("hero.png", 10 * MIB + 1)]).await;

    assert_eq!(result.status_code, 200);
    assert_eq!(result.message, "Files validated successfully");

    let alerts = sink.alerts().await;
    assert_eq!(alerts.len(), 1);
    assert!(alerts[0].body.contains("File: hero.png"));
    assert!(alerts[0].body.contains("Size: 10.00MB"));
    assert!(alerts[0].body.contains("Limit: 10.0MB"));
}

#[tokio::test]
async fn test_extension_match_is_case_insensitive() {
    let (pipeline, sink) = test_pipeline();
    let result = pipeline
        .evaluate(&[event("IMAGE.JPG", MIB), event("image.jpg", MIB)])
        .await;

    assert_eq!(result.status_code, 200);
    assert_eq!(sink.count().await, 0);
}

// ─── Batch ordering ──────────────────────────────────────────────

#[tokio::test]
async fn test_batch_halts_at_disallowed_extension() {
    let (pipeline, sink) = test_pipeline();
    let report = pipeline
        .evaluate_detailed(&[
            event("valid.jpg", 5 * MIB),
            event("malware.exe", MIB),
            event("oversize.png", 15 * MIB),
        ])
        .await;

    assert_eq!(report.result, BatchResult::unauthorized_file_type());

    let keys: Vec<&str> = report.records.iter().map(|r| r.key.as_str()).collect();
    assert_eq!(keys, vec!["valid.jpg", "malware.exe"]);

    let alerts = sink.alerts().await;
    assert_eq!(alerts.len(), 1);
    assert!(alerts[0].body.contains("File: malware.exe"));
    assert!(!alerts.iter().any(|a| a.body.contains("oversize.png")));
}

#[tokio::test]
async fn test_batch_continues_after_oversized() {
    let (pipeline, sink) = test_pipeline();
    let report = pipeline
        .evaluate_detailed(&[event("oversize.png", 15 * MIB), event("valid.jpg", 5 * MIB)])
        .await;

    assert_eq!(report.result, BatchResult::validated());
    assert_eq!(report.records.len(), 2);
    assert!(matches!(
        report.records[0].violation,
        Violation::OversizedFile { size, .. } if size == 15 * MIB
    ));
    assert_eq!(report.records[1].violation, Violation::Compliant);

    let alerts = sink.alerts().await;
    assert_eq!(alerts.len(), 1);
    assert!(alerts[0].body.contains("File: oversize.png"));
    assert!(alerts[0].body.contains("Size: 15.00MB"));
}

#[tokio::test]
async fn test_oversized_then_disallowed_rejects() {
    let (pipeline, sink) = test_pipeline();
    let result = pipeline
        .evaluate(&[event("oversize.png", 15 * MIB), event("run.bat", 1)])
        .await;

    assert_eq!(result.status_code, 400);
    assert_eq!(sink.count().await, 2);
}

#[tokio::test]
async fn test_empty_batch_succeeds_without_dispatch() {
    let (pipeline, sink) = test_pipeline();
    let result = pipeline.evaluate(&[]).await;

    assert_eq!(result, BatchResult::validated());
    assert_eq!(sink.count().await, 0);
}

// ─── Sink failure ────────────────────────────────────────────────

#[tokio::test]
async fn test_sink_failure_never_changes_result() {
    let batches: Vec<(Vec<ObjectEvent>, u16)> = vec![
        (vec![], 200),
        (vec![event("ok.png", MIB)], 200),
        (vec![event("malware.exe", MIB)], 400),
        (vec![event("oversize.png", 15 * MIB), event("valid.jpg", MIB)], 200),
        (
            vec![
                event("valid.jpg", 5 * MIB),
                event("malware.exe", MIB),
                event("oversize.png", 15 * MIB),
            ],
            400,
        ),
    ];

    for (batch, expected) in batches {
        let healthy = ValidationPipeline::new(Policy::default())
            .with_sink(Arc::new(MemoryAlertSink::new()));
        let failing = ValidationPipeline::new(Policy::default())
            .with_sink(Arc::new(MemoryAlertSink::failing("endpoint unreachable")));

        let healthy_result = healthy.evaluate(&batch).await;
        let failing_report = failing.evaluate_detailed(&batch).await;

        assert_eq!(healthy_result.status_code, expected);
        assert_eq!(failing_report.result, healthy_result);
        assert!(failing_report
            .records
            .iter()
            .filter_map(|r| r.dispatch.as_ref())
            .all(|d| matches!(d, DispatchOutcome::Failed(_))));
    }
}

// ─── Notification documents ──────────────────────────────────────

#[tokio::test]
async fn test_notification_to_response() {
    let document = serde_json::json!({
        "Records": [
            {
                "eventName": "ObjectCreated:Put",
                "s3": {
                    "bucket": {"name": "site-assets"},
                    "object": {"key": "css/site.css", "size": 512}
                }
            },
            {
                "eventName": "ObjectCreated:Put",
                "s3": {
                    "bucket": {"name": "site-assets"},
                    "object": {"key": "drop/shell.php", "size": 64}
                }
            }
        ]
    });

    let batch = S3Notification::from_slice(document.to_string().as_bytes())
        .unwrap()
        .into_batch();
    let (pipeline, sink) = test_pipeline();
    let response = pipeline.evaluate(&batch).await.to_response();

    assert_eq!(
        serde_json::to_value(&response).unwrap(),
        serde_json::json!({"statusCode": 400, "body": "\"Unauthorized file type\""})
    );

    let alerts = sink.alerts().await;
    assert_eq!(alerts.len(), 1);
    assert!(alerts[0].body.contains("Extension: .php"));
    assert!(alerts[0].body.contains("Bucket: site-assets"));
}
