//! SQS service facade.

use std::sync::Arc;

use aws_sdk_sqs::operation::send_message::SendMessageOutput;
use serde::Serialize;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::client::RegionCache;
use crate::config::Service;
use crate::services::Shared;
use crate::{AwsError, Result};

/// SQS facade addressing queues by resource key.
pub struct Sqs {
    shared: Arc<Shared>,
    clients: RegionCache<aws_sdk_sqs::Client>,
}

impl Sqs {
    pub(crate) fn new(shared: Arc<Shared>) -> Self {
        Self {
            shared,
            clients: RegionCache::new(),
        }
    }

    /// Client for the effective region of a queue key. An explicit region
    /// override allows operating on queues that are not in the
    /// configuration.
    pub fn client(&self, key: &str, region_override: Option<&str>) -> Result<aws_sdk_sqs::Client> {
        let region = self
            .shared
            .config
            .resolve_region(Service::Sqs, key, region_override)?;

        Ok(self.clients.get_or_create(&region, || {
            let config = aws_sdk_sqs::config::Builder::from(&self.shared.sdk_config)
                .region(aws_config::Region::new(region.clone()))
                .build();
            debug!(region = %region, "SQS client initialized");
            aws_sdk_sqs::Client::from_conf(config)
        }))
    }

    /// Send a message to a configured queue.
    ///
    /// The message is JSON-encoded. FIFO queues (`queue_type = "fifo"`) get
    /// a fresh group and deduplication id per send, so repeated payloads are
    /// not deduplicated away.
    pub async fn send<T: Serialize>(&self, key: &str, message: &T) -> Result<SendMessageOutput> {
        let entry = self.shared.config.resource(Service::Sqs, key)?;
        let queue_url = entry
            .queue_url
            .clone()
            .ok_or_else(|| AwsError::not_found("sqs", key))?;

        let body = serde_json::to_string(message)
            .map_err(|e| AwsError::Serialization(e.to_string()))?;

        let mut request = self
            .client(key, None)?
            .send_message()
            .queue_url(queue_url)
            .message_body(&body);

        if entry.queue_type.as_deref() == Some("fifo") {
            request = request
                .message_group_id(Uuid::new_v4().simple().to_string())
                .message_deduplication_id(Uuid::new_v4().simple().to_string());
        }

        match request.send().await {
            Ok(output) => {
                info!(
                    queue = %key,
                    message_id = ?output.message_id(),
                    payload = %body,
                    "SQS message sent"
                );
                Ok(output)
            }
            Err(e) => {
                error!(queue = %key, payload = %body, error = %e, "SQS send failed");
                Err(AwsError::upstream(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::services::test_support::services_for;
    use crate::{AwsConfig, AwsError, ResourceConfig};

    #[tokio::test]
    async fn test_send_to_missing_queue() {
        let services = services_for(AwsConfig::new()).await;
        let err = services
            .sqs()
            .send("orders", &serde_json::json!({"order_item_id": 800301}))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AwsError::ResourceNotFound { service: "sqs", .. }
        ));
    }

    #[tokio::test]
    async fn test_send_to_disabled_queue_short_circuits() {
        let services = services_for(
            AwsConfig::builder()
                .sqs(
                    "orders",
                    ResourceConfig::queue("https://sqs.us-east-1.amazonaws.com/123/orders")
                        .disabled(),
                )
                .build(),
        )
        .await;

        let err = services
            .sqs()
            .send("orders", &serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, AwsError::ResourceDisabled { .. }));
    }

    #[tokio::test]
    async fn test_send_to_entry_without_queue_url() {
        let services = services_for(
            AwsConfig::builder()
                .sqs("orders", ResourceConfig::default())
                .build(),
        )
        .await;

        let err = services
            .sqs()
            .send("orders", &serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, AwsError::ResourceNotFound { .. }));
    }
}
