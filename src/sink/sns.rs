//! SNS alert sink
//!
//! Publishes alerts to an SNS topic. Credentials and region come from the
//! standard AWS provider chain unless a region is given explicitly.

use super::AlertSink;
use crate::alert::Alert;
use crate::error::{GuardError, Result};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_sns::config::Region;
use aws_sdk_sns::error::DisplayErrorContext;
use aws_sdk_sns::Client;

/// Alert sink backed by an SNS topic
pub struct SnsAlertSink {
    client: Client,
    topic_arn: String,
}

impl SnsAlertSink {
    /// Wrap an existing SNS client
    pub fn new(client: Client, topic_arn: impl Into<String>) -> Self {
        Self {
            client,
            topic_arn: topic_arn.into(),
        }
    }

    /// Load AWS configuration from the environment and build a client
    pub async fn connect(topic_arn: impl Into<String>, region: Option<&str>) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = region {
            loader = loader.region(Region::new(region.to_owned()));
        }
        let config = loader.load().await;
        Self::new(Client::new(&config), topic_arn)
    }

    pub fn topic_arn(&self) -> &str {
        &self.topic_arn
    }
}

#[async_trait]
impl AlertSink for SnsAlertSink {
    async fn publish(&self, alert: &Alert) -> Result<String> {
        let output = self
            .client
            .publish()
            .topic_arn(self.topic_arn.as_str())
            .subject(alert.subject.as_str())
            .message(alert.body.as_str())
            .send()
            .await
            .map_err(|e| GuardError::Publish {
                destination: self.topic_arn.clone(),
                reason: DisplayErrorContext(&e).to_string(),
            })?;

        let message_id = output.message_id().unwrap_or_default().to_string();
        tracing::debug!(
            topic = %self.topic_arn,
            message_id = %message_id,
            "Alert published to SNS"
        );

        Ok(message_id)
    }

    fn name(&self) -> &str {
        "sns"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_client() -> Client {
        let config = aws_sdk_sns::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .build();
        Client::from_conf(config)
    }

    #[test]
    fn test_sink_identity() {
        let topic = "arn:aws:sns:us-east-1:123456789012:upload-alerts";
        let sink = SnsAlertSink::new(offline_client(), topic);

        assert_eq!(sink.topic_arn(), topic);
        assert_eq!(sink.name(), "sns");
    }
}
