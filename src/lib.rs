//! # a3s-upload-guard
//!
//! Upload policy enforcement for object-creation events.
//!
//! ## Overview
//!
//! `a3s-upload-guard` checks every newly written object against an upload
//! policy (allowed extensions, maximum size) and sends an alert through a
//! pluggable sink when an object violates it. Swap sinks (SNS, in-memory)
//! without changing the pipeline.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use a3s_upload_guard::{MemoryAlertSink, ObjectEvent, Policy, ValidationPipeline};
//!
//! # async fn example() {
//! let sink = MemoryAlertSink::new();
//! let pipeline = ValidationPipeline::new(Policy::default())
//!     .with_sink(Arc::new(sink.clone()));
//!
//! let result = pipeline
//!     .evaluate(&[
//!         ObjectEvent::new("site-assets", "index.html", 4096),
//!         ObjectEvent::new("site-assets", "payload.exe", 1024),
//!     ])
//!     .await;
//!
//! assert_eq!(result.status_code, 400);
//! assert_eq!(sink.count().await, 1);
//! # }
//! ```
//!
//! ## Batch semantics
//!
//! - Records are evaluated strictly in order
//! - A disallowed extension sends an alert and stops the batch with 400
//! - An oversized file sends an alert and evaluation continues
//! - Alert delivery is best-effort and never changes the result
//!
//! ## Sinks
//!
//! - **memory** — records alerts in process, for testing
//! - **sns** — publishes to an SNS topic (feature `sns`, on by default)

pub mod alert;
pub mod config;
pub mod error;
pub mod notification;
pub mod pipeline;
pub mod policy;
pub mod sink;
pub mod types;

// Re-export core types
pub use alert::{Alert, ALERT_SUBJECT};
pub use config::GuardConfig;
pub use error::{GuardError, Result};
pub use notification::S3Notification;
pub use pipeline::{BatchReport, RecordReport, ValidationPipeline};
pub use policy::{extension_of, Policy, Violation, ViolationAction};
pub use sink::{AlertSink, DispatchOutcome};
pub use types::{BatchResult, InvocationResponse, ObjectEvent};

// Re-export sinks for convenience
pub use sink::memory::MemoryAlertSink;
#[cfg(feature = "sns")]
pub use sink::sns::SnsAlertSink;
