//! In-memory alert sink for development and testing

use super::AlertSink;
use crate::alert::Alert;
use crate::error::{GuardError, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Records every published alert in a `Vec`
///
/// A sink created with [`MemoryAlertSink::failing`] rejects every publish,
/// which lets tests exercise the transport-failure path.
#[derive(Clone, Default)]
pub struct MemoryAlertSink {
    alerts: Arc<RwLock<Vec<Alert>>>,
    fail_with: Option<String>,
}

impl MemoryAlertSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink whose publish always fails with `reason`
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            alerts: Arc::new(RwLock::new(Vec::new())),
            fail_with: Some(reason.into()),
        }
    }

    /// Alerts delivered so far, oldest first
    pub async fn alerts(&self) -> Vec<Alert> {
        self.alerts.read().await.clone()
    }

    pub async fn count(&self) -> usize {
        self.alerts.read().await.len()
    }
}

#[async_trait]
impl AlertSink for MemoryAlertSink {
    async fn publish(&self, alert: &Alert) -> Result<String> {
        if let Some(reason) = &self.fail_with {
            return Err(GuardError::Publish {
                destination: "memory".to_string(),
                reason: reason.clone(),
            });
        }

        self.alerts.write().await.push(alert.clone());
        Ok(format!("mem-{}", uuid::Uuid::new_v4()))
    }

    fn name(&self) -> &str {
        "memory"
    }
}
