//! S3 service facade.

use std::sync::Arc;
use std::time::Duration;

use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::client::RegionCache;
use crate::config::Service;
use crate::services::Shared;
use crate::url::key_for_bucket;
use crate::{AwsError, Result};

// Temp uploads live under this prefix until an order item claims them.
static TEMP_UPLOAD: Lazy<Regex> = Lazy::new(|| Regex::new(r"upload/temp/(.*)").unwrap());

/// S3 facade addressing buckets by resource key.
pub struct S3 {
    shared: Arc<Shared>,
    clients: RegionCache<aws_sdk_s3::Client>,
}

impl S3 {
    pub(crate) fn new(shared: Arc<Shared>) -> Self {
        Self {
            shared,
            clients: RegionCache::new(),
        }
    }

    /// Client for the effective region of a bucket key.
    ///
    /// An explicit region override takes precedence over the resource
    /// entry's region and the global region, and allows operating on
    /// buckets that are not in the configuration at all.
    pub fn client(&self, key: &str, region_override: Option<&str>) -> Result<aws_sdk_s3::Client> {
        let region = self
            .shared
            .config
            .resolve_region(Service::S3, key, region_override)?;

        Ok(self.clients.get_or_create(&region, || {
            let mut builder = aws_sdk_s3::config::Builder::from(&self.shared.sdk_config)
                .region(aws_config::Region::new(region.clone()));
            if self.shared.config.global.endpoint_url.is_some() {
                builder = builder.force_path_style(true);
            }
            debug!(region = %region, "S3 client initialized");
            aws_sdk_s3::Client::from_conf(builder.build())
        }))
    }

    /// Configured bucket name for a resource key.
    pub fn bucket_name(&self, key: &str) -> Result<String> {
        let entry = self.shared.config.resource(Service::S3, key)?;
        entry
            .bucket
            .clone()
            .ok_or_else(|| AwsError::not_found("s3", key))
    }

    /// Virtual-hosted URL for an object in a configured bucket.
    pub fn file_url(&self, key: &str, object_key: &str) -> Result<String> {
        let bucket = self.bucket_name(key)?;
        let region = self.shared.config.resolve_region(Service::S3, key, None)?;

        if let Some(endpoint) = &self.shared.config.global.endpoint_url {
            Ok(format!("{endpoint}/{bucket}/{object_key}"))
        } else {
            Ok(format!("https://{bucket}.s3.{region}.amazonaws.com/{object_key}"))
        }
    }

    /// Presign a GetObject request for an object referenced by full URL.
    ///
    /// The object key is recovered from the URL using the configured bucket
    /// name, so both URL styles (and damaged legacy URLs) are accepted.
    pub async fn sign_file_url(
        &self,
        key: &str,
        object_url: &str,
        expires_in: Duration,
    ) -> Result<String> {
        let bucket = self.bucket_name(key)?;
        let object_key = key_for_bucket(object_url, &bucket)?;

        let presigning = PresigningConfig::builder()
            .expires_in(expires_in)
            .build()
            .map_err(AwsError::upstream)?;

        let presigned = self
            .client(key, None)?
            .get_object()
            .bucket(&bucket)
            .key(&object_key)
            .presigned(presigning)
            .await
            .map_err(AwsError::upstream)?;

        Ok(presigned.uri().to_string())
    }

    /// Copy an object within a configured bucket and return the new object
    /// URL.
    pub async fn copy_file(
        &self,
        key: &str,
        origin_key: &str,
        target_key: &str,
    ) -> Result<String> {
        let bucket = self.bucket_name(key)?;

        self.client(key, None)?
            .copy_object()
            .bucket(&bucket)
            .copy_source(format!("{bucket}/{}", origin_key.trim_start_matches('/')))
            .key(target_key)
            .send()
            .await
            .map_err(AwsError::upstream)?;

        debug!(bucket = %bucket, from = %origin_key, to = %target_key, "S3 object copied");
        self.file_url(key, target_key)
    }

    /// Move a temp upload to its final location for an order item.
    ///
    /// Returns the new object URL, or `Ok(None)` when the URL does not point
    /// into the temp upload area.
    pub async fn move_temp_to_final(
        &self,
        key: &str,
        order_item_id: u64,
        url: &str,
    ) -> Result<Option<String>> {
        let Some(captures) = TEMP_UPLOAD.captures(url) else {
            return Ok(None);
        };

        let rest = &captures[1];
        let basename = rest.rsplit('/').next().unwrap_or(rest);
        let origin_key = format!("upload/temp/{rest}");
        let target_key = format!("upload/connected_files/{order_item_id}/{basename}");

        self.copy_file(key, &origin_key, &target_key).await.map(Some)
    }

    /// Upload a file to a configured bucket.
    pub async fn put_file(
        &self,
        key: &str,
        object_key: &str,
        body: Bytes,
        content_type: &str,
    ) -> Result<String> {
        let bucket = self.bucket_name(key)?;
        let size = body.len();

        self.client(key, None)?
            .put_object()
            .bucket(&bucket)
            .key(object_key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await
            .map_err(AwsError::upstream)?;

        debug!(bucket = %bucket, key = %object_key, size = size, "Uploaded to S3");
        self.file_url(key, object_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::services_for;
    use crate::{AwsConfig, ResourceConfig};

    fn config() -> AwsConfig {
        AwsConfig::builder()
            .region("us-east-1")
            .s3(
                "briefing",
                ResourceConfig::bucket("alpha-upload-dev").region("sa-east-1"),
            )
            .s3("archive", ResourceConfig::bucket("alpha-archive").disabled())
            .build()
    }

    #[tokio::test]
    async fn test_bucket_name_resolution() {
        let services = services_for(config()).await;
        assert_eq!(
            services.s3().bucket_name("briefing").unwrap(),
            "alpha-upload-dev"
        );
        assert!(matches!(
            services.s3().bucket_name("missing"),
            Err(AwsError::ResourceNotFound { .. })
        ));
        assert!(matches!(
            services.s3().bucket_name("archive"),
            Err(AwsError::ResourceDisabled { .. })
        ));
    }

    #[tokio::test]
    async fn test_entry_without_bucket_is_not_found() {
        let services = services_for(
            AwsConfig::builder()
                .s3("broken", ResourceConfig::default())
                .build(),
        )
        .await;
        assert!(matches!(
            services.s3().bucket_name("broken"),
            Err(AwsError::ResourceNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_file_url_uses_effective_region() {
        let services = services_for(config()).await;
        assert_eq!(
            services.s3().file_url("briefing", "briefing/file.pdf").unwrap(),
            "https://alpha-upload-dev.s3.sa-east-1.amazonaws.com/briefing/file.pdf"
        );
    }

    #[tokio::test]
    async fn test_file_url_prefers_custom_endpoint() {
        let services = services_for(
            AwsConfig::builder()
                .endpoint_url("http://localhost:4566")
                .s3("briefing", ResourceConfig::bucket("alpha-upload-dev"))
                .build(),
        )
        .await;
        assert_eq!(
            services.s3().file_url("briefing", "file.pdf").unwrap(),
            "http://localhost:4566/alpha-upload-dev/file.pdf"
        );
    }

    #[tokio::test]
    async fn test_move_temp_to_final_ignores_non_temp_urls() {
        let services = services_for(config()).await;
        let moved = services
            .s3()
            .move_temp_to_final(
                "briefing",
                800301,
                "https://alpha-upload-dev.s3-sa-east-1.amazonaws.com/briefing/file.pdf",
            )
            .await
            .unwrap();
        assert!(moved.is_none());
    }

    #[tokio::test]
    async fn test_client_region_override_allows_unregistered_buckets() {
        let services = services_for(config()).await;

        assert!(matches!(
            services.s3().client("unregistered", None),
            Err(AwsError::ResourceNotFound { .. })
        ));
        // An explicit region suppresses the lookup failure.
        let client = services.s3().client("unregistered", Some("eu-west-1")).unwrap();
        assert_eq!(
            client.config().region().map(|r| r.as_ref()),
            Some("eu-west-1")
        );
    }

    #[tokio::test]
    async fn test_disabled_bucket_fails_before_network() {
        let services = services_for(config()).await;
        let err = services
            .s3()
            .copy_file("archive", "upload/temp/a.pdf", "upload/final/a.pdf")
            .await
            .unwrap_err();
        assert!(matches!(err, AwsError::ResourceDisabled { .. }));
    }
}
