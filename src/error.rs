//! AWS facade error types.

use thiserror::Error;

/// Result type for AWS operations.
pub type Result<T> = std::result::Result<T, AwsError>;

/// Errors surfaced by the AWS facade.
///
/// No operation retries or recovers locally. Every call either succeeds or
/// returns one of these immediately.
#[derive(Debug, Error)]
pub enum AwsError {
    /// Resource key absent from configuration, or the entry is missing the
    /// identifier the service needs (bucket, queue URL, topic ARN, ...).
    #[error("No {service} configuration found for resource '{key}'")]
    ResourceNotFound { service: &'static str, key: String },

    /// Resource entry exists but is switched off.
    #[error("Resource '{key}' is disabled in the {service} configuration")]
    ResourceDisabled { service: &'static str, key: String },

    /// URL matches neither the virtual-hosted nor the path-style S3 shape.
    #[error("Unrecognized S3 object URL: {0}")]
    UrlParse(String),

    /// The underlying SDK call failed (network, auth, throttling).
    /// Opaque passthrough, not categorized further.
    #[error("AWS request failed: {0}")]
    Upstream(String),

    /// Configuration could not be read or parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A message payload could not be JSON-encoded.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl AwsError {
    /// Create a resource-not-found error.
    pub fn not_found(service: &'static str, key: impl Into<String>) -> Self {
        Self::ResourceNotFound {
            service,
            key: key.into(),
        }
    }

    /// Create a resource-disabled error.
    pub fn disabled(service: &'static str, key: impl Into<String>) -> Self {
        Self::ResourceDisabled {
            service,
            key: key.into(),
        }
    }

    /// Wrap an SDK failure.
    pub fn upstream(err: impl std::fmt::Display) -> Self {
        Self::Upstream(err.to_string())
    }
}
