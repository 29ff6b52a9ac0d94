//! # Nimbus AWS
//!
//! Configuration-driven facade over AWS service clients. Application code
//! references buckets, queues, topics and Lambda functions by symbolic
//! resource key instead of hardcoded ARNs and URLs; per-resource region and
//! credentials are resolved from layered configuration, and SDK clients are
//! built lazily and cached per service type for the effective region.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use nimbus_aws::{AwsConfig, AwsServices, ResourceConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AwsConfig::from_file("aws.toml")?.with_env_overrides();
//!     let services = AwsServices::new(config).await?;
//!
//!     // Send an order to its queue by nickname
//!     services.sqs().send("order_events", &serde_json::json!({
//!         "order_item_id": 800301,
//!     })).await?;
//!
//!     // Presign a download for an object referenced by full URL
//!     let url = services.s3().sign_file_url(
//!         "briefing",
//!         "https://alpha-upload-dev.s3-sa-east-1.amazonaws.com/briefing/file.pdf",
//!         std::time::Duration::from_secs(600),
//!     ).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! ```toml
//! [global]
//! region = "us-east-1"
//!
//! [s3.briefing]
//! bucket = "alpha-upload-dev"
//! region = "sa-east-1"
//!
//! [sqs.order_events]
//! queue_url = "https://sqs.us-east-1.amazonaws.com/123/orders.fifo"
//! queue_type = "fifo"
//!
//! [sns.alerts]
//! topic_arn = "arn:aws:sns:us-east-1:123:alerts"
//!
//! [lambda.import]
//! function_name = "om2_import_to_s3"
//! ```
//!
//! Region precedence for any operation: explicit override, then the
//! resource entry's `region`, then `[global].region` (default `us-east-1`).

mod client;
mod config;
mod error;
mod services;

#[cfg(feature = "s3")]
pub mod s3;

#[cfg(feature = "s3")]
pub mod url;

#[cfg(feature = "sqs")]
pub mod sqs;

#[cfg(feature = "sns")]
pub mod sns;

#[cfg(feature = "lambda")]
pub mod lambda;

pub use config::{
    AwsConfig, AwsConfigBuilder, Credentials, DEFAULT_REGION, FileFormat, GlobalConfig,
    ResourceConfig, Service,
};
pub use error::{AwsError, Result};
pub use services::AwsServices;

#[cfg(feature = "s3")]
pub use url::{S3ObjectUrl, key_for_bucket};

// Re-export AWS types for convenience
pub use aws_config;
pub use aws_credential_types;
pub use aws_types;

// Re-export enabled service clients
#[cfg(feature = "s3")]
pub use aws_sdk_s3;

#[cfg(feature = "sqs")]
pub use aws_sdk_sqs;

#[cfg(feature = "sns")]
pub use aws_sdk_sns;

#[cfg(feature = "lambda")]
pub use aws_sdk_lambda;
