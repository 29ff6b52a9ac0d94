//! S3 object URL decomposition.
//!
//! Objects arrive referenced by full URL in two shapes:
//!
//! - virtual-hosted style: `https://alpha-upload-dev.s3-sa-east-1.amazonaws.com/briefing/800301/file.pdf`
//! - path style: `https://s3-sa-east-1.amazonaws.com/alpha-upload-dev/briefing/800301/file.pdf`
//!
//! Both the legacy `s3-region` and the current `s3.region` host forms are
//! accepted, as is the region-less `s3.amazonaws.com` host.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{AwsError, Result};

// Virtual-hosted must be tried first: a permissive bucket match against a
// path-style URL can spuriously succeed, the reverse cannot.
static VIRTUAL_HOSTED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^https?://(?P<bucket>[a-z0-9][a-z0-9.-]*)\.s3(?:[.-](?P<region>[a-z]{2}(?:-[a-z]+)+-\d{1,2}))?\.amazonaws\.com/(?P<key>.+)$",
    )
    .unwrap()
});

static PATH_STYLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^https?://s3(?:[.-](?P<region>[a-z]{2}(?:-[a-z]+)+-\d{1,2}))?\.amazonaws\.com/(?P<bucket>[a-z0-9][a-z0-9.-]*)/(?P<key>.+)$",
    )
    .unwrap()
});

/// An S3 object URL broken into its addressable parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct S3ObjectUrl {
    pub bucket: String,
    /// Region segment of the host, when the URL carries one.
    pub region: Option<String>,
    pub key: String,
}

impl S3ObjectUrl {
    /// Parse a virtual-hosted or path-style S3 object URL.
    pub fn parse(url: &str) -> Result<Self> {
        for pattern in [&VIRTUAL_HOSTED, &PATH_STYLE] {
            if let Some(captures) = pattern.captures(url) {
                return Ok(Self {
                    bucket: captures["bucket"].to_string(),
                    region: captures.name("region").map(|m| m.as_str().to_string()),
                    key: captures["key"].to_string(),
                });
            }
        }
        Err(AwsError::UrlParse(url.to_string()))
    }

    /// Region from the URL, or `default` when the host carries none.
    pub fn region_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.region.as_deref().unwrap_or(default)
    }
}

/// Recover the object key from a full URL when the bucket name is already
/// known from configuration.
///
/// Matches the bucket segment of the host (or path) followed by a slash and
/// returns everything after it. A fallback handles historical URLs from the
/// old live system that occasionally dropped the separator after the bucket
/// segment: the URL is split on the bucket name and a single leading
/// character is trimmed. The fallback is known not to be 100% reliable for
/// arbitrary URLs; it is kept on purpose for compatibility with stored data.
pub fn key_for_bucket(object_url: &str, bucket: &str) -> Result<String> {
    let pattern = format!(r".*{}[^/]*/(.*)", regex::escape(bucket));
    let re = Regex::new(&pattern).map_err(|e| AwsError::UrlParse(e.to_string()))?;
    if let Some(captures) = re.captures(object_url) {
        return Ok(captures[1].to_string());
    }

    let index = object_url
        .rfind(bucket)
        .ok_or_else(|| AwsError::UrlParse(object_url.to_string()))?;
    let tail = &object_url[index + bucket.len()..];
    Ok(tail.get(1..).unwrap_or("").to_string())
}
