//! Validation pipeline
//!
//! `ValidationPipeline` evaluates a batch of object events against a
//! policy, strictly in order, dispatching an alert for each violation.
//!
//! A disallowed extension stops the batch (unless the policy says
//! `Continue`) and yields a 400 result. An oversized file only raises an
//! alert; it never changes the result.

use crate::alert::Alert;
use crate::policy::{Policy, Violation, ViolationAction};
use crate::sink::{AlertSink, DispatchOutcome};
use crate::types::{BatchResult, ObjectEvent};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Source of alert capture timestamps
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// What happened to one evaluated record
#[derive(Debug)]
pub struct RecordReport {
    pub key: String,
    pub violation: Violation,
    /// `None` for compliant records
    pub dispatch: Option<DispatchOutcome>,
}

/// Outcome of a batch, with per-record detail
///
/// Records after an early exit are absent from `records`.
#[derive(Debug)]
pub struct BatchReport {
    pub result: BatchResult,
    pub records: Vec<RecordReport>,
}

impl BatchReport {
    /// Number of alerts handed to a sink, successful or not
    pub fn dispatched(&self) -> usize {
        self.records
            .iter()
            .filter(|r| {
                matches!(
                    r.dispatch,
                    Some(DispatchOutcome::Delivered { .. } | DispatchOutcome::Failed(_))
                )
            })
            .count()
    }
}

/// Policy evaluation and alert dispatch over a batch of events
pub struct ValidationPipeline {
    policy: Arc<Policy>,
    sink: Option<Arc<dyn AlertSink>>,
    clock: Clock,
}

impl ValidationPipeline {
    /// Create a pipeline with no alert sink; alerts are skipped
    pub fn new(policy: Policy) -> Self {
        Self {
            policy: Arc::new(policy),
            sink: None,
            clock: Arc::new(Utc::now),
        }
    }

    /// Attach the sink alerts are dispatched to
    pub fn with_sink(mut self, sink: Arc<dyn AlertSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Replace the wall clock used for alert timestamps
    pub fn with_clock(
        mut self,
        clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'static,
    ) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    pub fn sink_name(&self) -> Option<&str> {
        self.sink.as_deref().map(|s| s.name())
    }

    /// Evaluate a batch and return its aggregate result
    pub async fn evaluate(&self, batch: &[ObjectEvent]) -> BatchResult {
        self.evaluate_detailed(batch).await.result
    }

    /// Evaluate a batch, keeping the per-record classification and
    /// dispatch outcome
    pub async fn evaluate_detailed(&self, batch: &[ObjectEvent]) -> BatchReport {
        let mut records = Vec::with_capacity(batch.len());
        let mut rejected = false;

        for event in batch {
            tracing::info!(
                bucket = %event.bucket,
                key = %event.key,
                size = event.size,
                "Processing object"
            );

            let violation = self.policy.classify(event);
            let dispatch = match Alert::for_violation(event, &violation, || (self.clock)()) {
                Some(alert) => Some(self.dispatch(&alert).await),
                None => None,
            };

            let disallowed = matches!(violation, Violation::DisallowedExtension { .. });
            match &violation {
                Violation::Compliant => {
                    tracing::info!(key = %event.key, "Object validated");
                }
                Violation::DisallowedExtension { extension } => {
                    tracing::warn!(
                        key = %event.key,
                        extension = %extension,
                        bucket = %event.bucket,
                        "Unauthorized file type"
                    );
                }
                Violation::OversizedFile { size, limit } => {
                    tracing::warn!(
                        key = %event.key,
                        size = *size,
                        limit = *limit,
                        bucket = %event.bucket,
                        "Object exceeds size limit"
                    );
                }
            }

            records.push(RecordReport {
                key: event.key.clone(),
                violation,
                dispatch,
            });

            if disallowed {
                rejected = true;
                if self.policy.on_disallowed_extension() == ViolationAction::Halt {
                    tracing::info!(
                        evaluated = records.len(),
                        skipped = batch.len() - records.len(),
                        "Halting batch on unauthorized file type"
                    );
                    return BatchReport {
                        result: BatchResult::unauthorized_file_type(),
                        records,
                    };
                }
            }
        }

        let result = if rejected {
            BatchResult::unauthorized_file_type()
        } else {
            BatchResult::validated()
        };

        BatchReport { result, records }
    }

    async fn dispatch(&self, alert: &Alert) -> DispatchOutcome {
        let Some(sink) = &self.sink else {
            tracing::debug!("No alert sink configured, skipping alert");
            return DispatchOutcome::Skipped;
        };

        match sink.publish(alert).await {
            Ok(message_id) => {
                tracing::info!(sink = sink.name(), message_id = %message_id, "Alert sent");
                DispatchOutcome::Delivered { message_id }
            }
            Err(e) => {
                tracing::error!(sink = sink.name(), error = %e, "Failed to send alert");
                DispatchOutcome::Failed(e)
            }
        }
    }
}
