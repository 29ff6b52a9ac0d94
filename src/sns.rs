//! SNS service facade.

use std::sync::Arc;

use aws_sdk_sns::operation::publish::PublishOutput;
use serde_json::Value;
use tracing::{debug, info};

use crate::client::RegionCache;
use crate::config::Service;
use crate::services::Shared;
use crate::{AwsError, Result};

/// Default message shown to subscribers without a protocol-specific body.
const DEFAULT_MESSAGE: &str = "notification";

/// SNS facade addressing topics by resource key.
pub struct Sns {
    shared: Arc<Shared>,
    clients: RegionCache<aws_sdk_sns::Client>,
}

impl Sns {
    pub(crate) fn new(shared: Arc<Shared>) -> Self {
        Self {
            shared,
            clients: RegionCache::new(),
        }
    }

    /// Client for the effective region of a topic key. An explicit region
    /// override allows operating on topics that are not in the
    /// configuration.
    pub fn client(&self, key: &str, region_override: Option<&str>) -> Result<aws_sdk_sns::Client> {
        let region = self
            .shared
            .config
            .resolve_region(Service::Sns, key, region_override)?;

        Ok(self.clients.get_or_create(&region, || {
            let config = aws_sdk_sns::config::Builder::from(&self.shared.sdk_config)
                .region(aws_config::Region::new(region.clone()))
                .build();
            debug!(region = %region, "SNS client initialized");
            aws_sdk_sns::Client::from_conf(config)
        }))
    }

    /// Publish a notification to a configured topic.
    ///
    /// The message uses the JSON structure: the `default` body is the
    /// payload's `error_message` when present, and SQS subscribers receive
    /// the full JSON-encoded payload.
    pub async fn publish(&self, key: &str, message: &Value) -> Result<PublishOutput> {
        let entry = self.shared.config.resource(Service::Sns, key)?;
        let topic_arn = entry
            .topic_arn
            .clone()
            .ok_or_else(|| AwsError::not_found("sns", key))?;

        let default = message
            .get("error_message")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_MESSAGE);
        let body = serde_json::json!({
            "default": default,
            "sqs": serde_json::to_string(message)
                .map_err(|e| AwsError::Serialization(e.to_string()))?,
        });

        let output = self
            .client(key, None)?
            .publish()
            .topic_arn(&topic_arn)
            .message(body.to_string())
            .message_structure("json")
            .send()
            .await
            .map_err(AwsError::upstream)?;

        info!(topic = %key, message_id = ?output.message_id(), "SNS notification published");
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use crate::services::test_support::services_for;
    use crate::{AwsConfig, AwsError, ResourceConfig};

    #[tokio::test]
    async fn test_publish_to_missing_topic() {
        let services = services_for(AwsConfig::new()).await;
        let err = services
            .sns()
            .publish("alerts", &serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AwsError::ResourceNotFound { service: "sns", .. }
        ));
    }

    #[tokio::test]
    async fn test_publish_to_disabled_topic_short_circuits() {
        let services = services_for(
            AwsConfig::builder()
                .sns(
                    "alerts",
                    ResourceConfig::topic("arn:aws:sns:us-east-1:123:alerts").disabled(),
                )
                .build(),
        )
        .await;

        let err = services
            .sns()
            .publish("alerts", &serde_json::json!({"error_message": "boom"}))
            .await
            .unwrap_err();
        assert!(matches!(err, AwsError::ResourceDisabled { .. }));
    }

    #[tokio::test]
    async fn test_publish_to_entry_without_topic_arn() {
        let services = services_for(
            AwsConfig::builder()
                .sns("alerts", ResourceConfig::default())
                .build(),
        )
        .await;

        let err = services
            .sns()
            .publish("alerts", &serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, AwsError::ResourceNotFound { .. }));
    }
}
