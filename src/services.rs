//! AWS services container.

use std::sync::Arc;

use tracing::info;

use crate::{AwsConfig, Result};

/// State shared by every service facade: the resolved configuration and the
/// base SDK configuration (credentials, endpoint) clients are derived from.
pub(crate) struct Shared {
    pub(crate) config: AwsConfig,
    pub(crate) sdk_config: aws_config::SdkConfig,
}

/// Container for the configured service facades.
///
/// The SDK configuration is loaded once at construction; per-resource
/// clients are built lazily by each facade for the effective region.
pub struct AwsServices {
    shared: Arc<Shared>,

    #[cfg(feature = "s3")]
    s3: crate::s3::S3,

    #[cfg(feature = "sqs")]
    sqs: crate::sqs::Sqs,

    #[cfg(feature = "sns")]
    sns: crate::sns::Sns,

    #[cfg(feature = "lambda")]
    lambda: crate::lambda::Lambda,
}

impl AwsServices {
    /// Create the services container for a configuration.
    pub async fn new(config: AwsConfig) -> Result<Arc<Self>> {
        let sdk_config = Self::build_sdk_config(&config).await?;

        info!(
            region = %config.global.region,
            version = ?config.global.version,
            "AWS services initialized"
        );

        let shared = Arc::new(Shared { config, sdk_config });

        Ok(Arc::new(Self {
            #[cfg(feature = "s3")]
            s3: crate::s3::S3::new(shared.clone()),
            #[cfg(feature = "sqs")]
            sqs: crate::sqs::Sqs::new(shared.clone()),
            #[cfg(feature = "sns")]
            sns: crate::sns::Sns::new(shared.clone()),
            #[cfg(feature = "lambda")]
            lambda: crate::lambda::Lambda::new(shared.clone()),
            shared,
        }))
    }

    /// Build the base AWS SDK configuration.
    async fn build_sdk_config(config: &AwsConfig) -> Result<aws_config::SdkConfig> {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(config.global.region.clone()));

        if let Some(credentials) = &config.global.credentials {
            let creds = aws_credential_types::Credentials::new(
                credentials.key.clone(),
                credentials.secret.clone(),
                None,
                None,
                "explicit",
            );
            loader = loader.credentials_provider(creds);
        }

        if let Some(endpoint) = &config.global.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }

        Ok(loader.load().await)
    }

    /// Get the configuration.
    pub fn config(&self) -> &AwsConfig {
        &self.shared.config
    }

    /// Get the base SDK configuration.
    pub fn sdk_config(&self) -> &aws_config::SdkConfig {
        &self.shared.sdk_config
    }

    /// Get the S3 facade.
    #[cfg(feature = "s3")]
    pub fn s3(&self) -> &crate::s3::S3 {
        &self.s3
    }

    /// Get the SQS facade.
    #[cfg(feature = "sqs")]
    pub fn sqs(&self) -> &crate::sqs::Sqs {
        &self.sqs
    }

    /// Get the SNS facade.
    #[cfg(feature = "sns")]
    pub fn sns(&self) -> &crate::sns::Sns {
        &self.sns
    }

    /// Get the Lambda facade.
    #[cfg(feature = "lambda")]
    pub fn lambda(&self) -> &crate::lambda::Lambda {
        &self.lambda
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Build a services container with explicit credentials so tests never
    /// touch the default provider chain.
    pub(crate) async fn services_for(config: AwsConfig) -> Arc<AwsServices> {
        let config = AwsConfig {
            global: crate::config::GlobalConfig {
                credentials: Some(crate::config::Credentials {
                    key: "AKIATEST".to_string(),
                    secret: "testsecret".to_string(),
                }),
                ..config.global
            },
            ..config
        };
        AwsServices::new(config).await.unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::services_for;
    use crate::{AwsConfig, ResourceConfig};

    #[tokio::test]
    async fn test_container_exposes_config() {
        let config = AwsConfig::builder()
            .region("sa-east-1")
            .s3("briefing", ResourceConfig::bucket("alpha-upload-dev"))
            .build();

        let services = services_for(config).await;
        assert_eq!(services.config().global.region, "sa-east-1");
        assert_eq!(
            services.sdk_config().region().map(|r| r.as_ref()),
            Some("sa-east-1")
        );
    }
}
