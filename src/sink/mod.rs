//! Alert sink trait — the transport abstraction for alert delivery
//!
//! All alert backends (SNS, in-memory, etc.) implement `AlertSink`.
//! The validation pipeline treats delivery as best-effort: a failed
//! publish is recorded as a `DispatchOutcome`, never propagated.

use crate::alert::Alert;
use crate::config::GuardConfig;
use crate::error::{GuardError, Result};
use async_trait::async_trait;
use std::sync::Arc;

pub mod memory;
#[cfg(feature = "sns")]
pub mod sns;

/// Core trait for alert backends
#[async_trait]
pub trait AlertSink: Send + Sync {
    /// Deliver an alert, returning the backend-assigned message id
    async fn publish(&self, alert: &Alert) -> Result<String>;

    /// Sink name (e.g., "sns", "memory")
    fn name(&self) -> &str;
}

/// Result of a single best-effort dispatch
#[derive(Debug)]
pub enum DispatchOutcome {
    /// The sink accepted the alert
    Delivered { message_id: String },
    /// No sink is configured; the alert was dropped
    Skipped,
    /// The sink rejected or failed to deliver the alert
    Failed(GuardError),
}

impl DispatchOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, DispatchOutcome::Delivered { .. })
    }
}

/// Build the sink selected by configuration
///
/// Returns `None` when no alert topic is configured, in which case
/// alerts are skipped.
pub async fn from_config(config: &GuardConfig) -> Option<Arc<dyn AlertSink>> {
    let topic = config.alert_topic.as_deref()?;
    topic_sink(topic, config.region.as_deref()).await
}

#[cfg(feature = "sns")]
async fn topic_sink(topic: &str, region: Option<&str>) -> Option<Arc<dyn AlertSink>> {
    let sink = sns::SnsAlertSink::connect(topic, region).await;
    tracing::info!(topic = %topic, "Using SNS alert sink");
    Some(Arc::new(sink))
}

#[cfg(not(feature = "sns"))]
async fn topic_sink(topic: &str, _region: Option<&str>) -> Option<Arc<dyn AlertSink>> {
    tracing::warn!(
        topic = %topic,
        "Alert topic configured but the sns feature is disabled; alerts will be skipped"
    );
    None
}
