//! Layered configuration for named AWS resources.
//!
//! Application code addresses buckets, queues, topics and functions by
//! symbolic resource key. Each key maps to a [`ResourceConfig`] entry in the
//! section for its service family, and the [`GlobalConfig`] section supplies
//! process-wide defaults (region, credentials, endpoint).
//!
//! Layering order: file < environment < builder calls.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{AwsError, Result};

/// Region used when neither the resource entry nor the global section
/// specifies one.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Service families the facade integrates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    S3,
    Sqs,
    Sns,
    Lambda,
}

impl Service {
    /// Section name as it appears in configuration files and error messages.
    pub fn name(self) -> &'static str {
        match self {
            Service::S3 => "s3",
            Service::Sqs => "sqs",
            Service::Sns => "sns",
            Service::Lambda => "lambda",
        }
    }
}

/// Explicit access key credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub key: String,
    pub secret: String,
}

/// Process-wide settings shared by every service client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    /// API version pin carried over from older deployments. The Rust SDK
    /// pins API versions itself, so the value is only echoed at startup.
    pub version: Option<String>,
    /// Fallback region for resources without one of their own.
    pub region: String,
    /// Explicit credentials. When absent the default provider chain is used.
    pub credentials: Option<Credentials>,
    /// Custom endpoint URL (for LocalStack, MinIO, etc.).
    pub endpoint_url: Option<String>,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            version: None,
            region: DEFAULT_REGION.to_string(),
            credentials: None,
            endpoint_url: None,
        }
    }
}

/// Connection details for one named resource.
///
/// The shape is deliberately loose: every service family shares this record,
/// reads the fields it needs and reports [`AwsError::ResourceNotFound`] when
/// its identifier is missing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceConfig {
    /// Kill switch. Disabled resources fail fast without a network call.
    pub enable: bool,
    /// Region override for this resource.
    pub region: Option<String>,
    /// S3 bucket name.
    pub bucket: Option<String>,
    /// SQS queue URL.
    pub queue_url: Option<String>,
    /// SQS queue type; `"fifo"` switches on group/deduplication ids.
    pub queue_type: Option<String>,
    /// SNS topic ARN.
    pub topic_arn: Option<String>,
    /// Lambda function name.
    pub function_name: Option<String>,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            enable: true,
            region: None,
            bucket: None,
            queue_url: None,
            queue_type: None,
            topic_arn: None,
            function_name: None,
        }
    }
}

impl ResourceConfig {
    /// Entry for an S3 bucket.
    pub fn bucket(name: impl Into<String>) -> Self {
        Self {
            bucket: Some(name.into()),
            ..Default::default()
        }
    }

    /// Entry for an SQS queue.
    pub fn queue(url: impl Into<String>) -> Self {
        Self {
            queue_url: Some(url.into()),
            ..Default::default()
        }
    }

    /// Entry for an SNS topic.
    pub fn topic(arn: impl Into<String>) -> Self {
        Self {
            topic_arn: Some(arn.into()),
            ..Default::default()
        }
    }

    /// Entry for a Lambda function.
    pub fn function(name: impl Into<String>) -> Self {
        Self {
            function_name: Some(name.into()),
            ..Default::default()
        }
    }

    /// Pin this resource to a region.
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Mark an SQS queue as FIFO.
    pub fn fifo(mut self) -> Self {
        self.queue_type = Some("fifo".to_string());
        self
    }

    /// Switch the resource off.
    pub fn disabled(mut self) -> Self {
        self.enable = false;
        self
    }
}

/// Supported configuration file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Json,
    Toml,
}

impl FileFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "json" => Some(FileFormat::Json),
            "toml" => Some(FileFormat::Toml),
            _ => None,
        }
    }
}

/// Full facade configuration: the global section plus one resource map per
/// service family.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AwsConfig {
    pub global: GlobalConfig,
    pub s3: HashMap<String, ResourceConfig>,
    pub sqs: HashMap<String, ResourceConfig>,
    pub sns: HashMap<String, ResourceConfig>,
    pub lambda: HashMap<String, ResourceConfig>,
}

impl AwsConfig {
    /// Create an empty configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder.
    pub fn builder() -> AwsConfigBuilder {
        AwsConfigBuilder::new()
    }

    /// Load configuration from a file, detecting the format from the
    /// extension.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .ok_or_else(|| AwsError::Config(format!("{}: no file extension", path.display())))?;
        let format = FileFormat::from_extension(ext)
            .ok_or_else(|| AwsError::Config(format!("Unsupported format: {ext}")))?;

        let content = std::fs::read_to_string(path)
            .map_err(|e| AwsError::Config(format!("Failed to read {}: {e}", path.display())))?;
        Self::parse(&content, format)
    }

    /// Parse configuration from a string.
    pub fn parse(content: &str, format: FileFormat) -> Result<Self> {
        match format {
            FileFormat::Json => serde_json::from_str(content)
                .map_err(|e| AwsError::Config(format!("JSON parse error: {e}"))),
            FileFormat::Toml => toml::from_str(content)
                .map_err(|e| AwsError::Config(format!("TOML parse error: {e}"))),
        }
    }

    /// Apply overrides from the process environment.
    ///
    /// `AWS_REGION` (or `AWS_DEFAULT_REGION`), `AWS_ENDPOINT_URL` and the
    /// `AWS_ACCESS_KEY_ID`/`AWS_SECRET_ACCESS_KEY` pair take precedence over
    /// file values.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(std::env::vars().collect())
    }

    fn with_overrides(mut self, vars: HashMap<String, String>) -> Self {
        if let Some(region) = vars
            .get("AWS_REGION")
            .or_else(|| vars.get("AWS_DEFAULT_REGION"))
        {
            self.global.region = region.clone();
        }
        if let Some(endpoint) = vars.get("AWS_ENDPOINT_URL") {
            self.global.endpoint_url = Some(endpoint.clone());
        }
        if let (Some(key), Some(secret)) = (
            vars.get("AWS_ACCESS_KEY_ID"),
            vars.get("AWS_SECRET_ACCESS_KEY"),
        ) {
            self.global.credentials = Some(Credentials {
                key: key.clone(),
                secret: secret.clone(),
            });
        }
        self
    }

    /// Resource map for a service family.
    pub fn section(&self, service: Service) -> &HashMap<String, ResourceConfig> {
        match service {
            Service::S3 => &self.s3,
            Service::Sqs => &self.sqs,
            Service::Sns => &self.sns,
            Service::Lambda => &self.lambda,
        }
    }

    fn section_mut(&mut self, service: Service) -> &mut HashMap<String, ResourceConfig> {
        match service {
            Service::S3 => &mut self.s3,
            Service::Sqs => &mut self.sqs,
            Service::Sns => &mut self.sns,
            Service::Lambda => &mut self.lambda,
        }
    }

    /// Look up the entry for a resource key.
    ///
    /// Fails with [`AwsError::ResourceNotFound`] when the key is absent and
    /// [`AwsError::ResourceDisabled`] when the entry is switched off.
    pub fn resource(&self, service: Service, key: &str) -> Result<&ResourceConfig> {
        let entry = self
            .section(service)
            .get(key)
            .ok_or_else(|| AwsError::not_found(service.name(), key))?;
        if !entry.enable {
            return Err(AwsError::disabled(service.name(), key));
        }
        Ok(entry)
    }

    /// Effective region for a resource.
    ///
    /// Precedence: explicit override, then the resource entry's `region`,
    /// then the global region. An explicit override also suppresses the
    /// not-found failure, so callers can operate on unregistered resources
    /// at a region of their choosing.
    pub fn resolve_region(
        &self,
        service: Service,
        key: &str,
        region_override: Option<&str>,
    ) -> Result<String> {
        if let Some(region) = region_override {
            return Ok(region.to_string());
        }
        let entry = self
            .section(service)
            .get(key)
            .ok_or_else(|| AwsError::not_found(service.name(), key))?;
        Ok(entry
            .region
            .clone()
            .unwrap_or_else(|| self.global.region.clone()))
    }
}

/// Builder for [`AwsConfig`].
#[derive(Default)]
pub struct AwsConfigBuilder {
    config: AwsConfig,
}

impl AwsConfigBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the legacy API version pin.
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.config.global.version = Some(version.into());
        self
    }

    /// Set the global region.
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.config.global.region = region.into();
        self
    }

    /// Use explicit credentials.
    pub fn credentials(mut self, key: impl Into<String>, secret: impl Into<String>) -> Self {
        self.config.global.credentials = Some(Credentials {
            key: key.into(),
            secret: secret.into(),
        });
        self
    }

    /// Set a custom endpoint URL (for LocalStack, MinIO, etc.).
    pub fn endpoint_url(mut self, url: impl Into<String>) -> Self {
        self.config.global.endpoint_url = Some(url.into());
        self
    }

    /// Configure for LocalStack.
    pub fn localstack(self) -> Self {
        self.endpoint_url("http://localhost:4566")
    }

    /// Register a resource under a service family.
    pub fn resource(
        mut self,
        service: Service,
        key: impl Into<String>,
        entry: ResourceConfig,
    ) -> Self {
        self.config.section_mut(service).insert(key.into(), entry);
        self
    }

    /// Register an S3 bucket.
    pub fn s3(self, key: impl Into<String>, entry: ResourceConfig) -> Self {
        self.resource(Service::S3, key, entry)
    }

    /// Register an SQS queue.
    pub fn sqs(self, key: impl Into<String>, entry: ResourceConfig) -> Self {
        self.resource(Service::Sqs, key, entry)
    }

    /// Register an SNS topic.
    pub fn sns(self, key: impl Into<String>, entry: ResourceConfig) -> Self {
        self.resource(Service::Sns, key, entry)
    }

    /// Register a Lambda function.
    pub fn lambda(self, key: impl Into<String>, entry: ResourceConfig) -> Self {
        self.resource(Service::Lambda, key, entry)
    }

    /// Build the configuration.
    pub fn build(self) -> AwsConfig {
        self.config
    }
}
