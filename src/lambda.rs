//! Lambda service facade.

use std::sync::Arc;

use aws_sdk_lambda::operation::invoke::InvokeOutput;
use aws_sdk_lambda::primitives::Blob;
use aws_sdk_lambda::types::InvocationType;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::client::RegionCache;
use crate::config::Service;
use crate::services::Shared;
use crate::{AwsError, Result};

/// Lambda facade addressing functions by resource key.
pub struct Lambda {
    shared: Arc<Shared>,
    clients: RegionCache<aws_sdk_lambda::Client>,
}

impl Lambda {
    pub(crate) fn new(shared: Arc<Shared>) -> Self {
        Self {
            shared,
            clients: RegionCache::new(),
        }
    }

    /// Client for the effective region of a function key. An explicit
    /// region override allows operating on functions that are not in the
    /// configuration.
    pub fn client(&self, key: &str, region_override: Option<&str>) -> Result<aws_sdk_lambda::Client> {
        let region = self
            .shared
            .config
            .resolve_region(Service::Lambda, key, region_override)?;

        Ok(self.clients.get_or_create(&region, || {
            let config = aws_sdk_lambda::config::Builder::from(&self.shared.sdk_config)
                .region(aws_config::Region::new(region.clone()))
                .build();
            debug!(region = %region, "Lambda client initialized");
            aws_sdk_lambda::Client::from_conf(config)
        }))
    }

    /// Invoke a configured function asynchronously (`InvocationType::Event`)
    /// with a JSON payload.
    pub async fn invoke<T: Serialize>(&self, key: &str, payload: &T) -> Result<InvokeOutput> {
        let entry = self.shared.config.resource(Service::Lambda, key)?;
        let function_name = entry
            .function_name
            .clone()
            .ok_or_else(|| AwsError::not_found("lambda", key))?;

        let payload = serde_json::to_vec(payload)
            .map_err(|e| AwsError::Serialization(e.to_string()))?;

        let output = self
            .client(key, None)?
            .invoke()
            .function_name(&function_name)
            .invocation_type(InvocationType::Event)
            .payload(Blob::new(payload))
            .send()
            .await
            .map_err(AwsError::upstream)?;

        info!(function = %function_name, status = ?output.status_code(), "Lambda invoked");
        Ok(output)
    }

    /// Invoke the configured import function to pull a file into an S3
    /// bucket, with an optional callback the function reports back to.
    pub async fn import_file_to_s3(
        &self,
        key: &str,
        file_url: &str,
        bucket: &str,
        object_key: &str,
        callback: Option<Value>,
    ) -> Result<InvokeOutput> {
        let mut payload = serde_json::json!({
            "file": file_url,
            "target": {
                "bucket": bucket,
                "key": object_key,
            },
        });
        if let Some(callback) = callback {
            payload["callback"] = callback;
        }

        self.invoke(key, &payload).await
    }
}

#[cfg(test)]
mod tests {
    use crate::services::test_support::services_for;
    use crate::{AwsConfig, AwsError, ResourceConfig};

    #[tokio::test]
    async fn test_invoke_missing_function() {
        let services = services_for(AwsConfig::new()).await;
        let err = services
            .lambda()
            .invoke("import", &serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AwsError::ResourceNotFound { service: "lambda", .. }
        ));
    }

    #[tokio::test]
    async fn test_invoke_disabled_function_short_circuits() {
        let services = services_for(
            AwsConfig::builder()
                .lambda(
                    "import",
                    ResourceConfig::function("om2_import_to_s3").disabled(),
                )
                .build(),
        )
        .await;

        let err = services
            .lambda()
            .invoke("import", &serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, AwsError::ResourceDisabled { .. }));
    }

    #[tokio::test]
    async fn test_invoke_entry_without_function_name() {
        let services = services_for(
            AwsConfig::builder()
                .lambda("import", ResourceConfig::default())
                .build(),
        )
        .await;

        let err = services
            .lambda()
            .invoke("import", &serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, AwsError::ResourceNotFound { .. }));
    }

    #[tokio::test]
    async fn test_import_payload_errors_mirror_invoke() {
        let services = services_for(AwsConfig::new()).await;
        let err = services
            .lambda()
            .import_file_to_s3(
                "import",
                "https://example.com/file.pdf",
                "alpha-upload-dev",
                "upload/temp/file.pdf",
                Some(serde_json::json!({"url": "https://callback.example"})),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AwsError::ResourceNotFound { .. }));
    }
}
