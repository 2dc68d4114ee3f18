//! Bucket region cache and redirect classification
//! <https://docs.aws.amazon.com/AmazonS3/latest/API/API_GetBucketLocation.html>

use crate::s3::limits::DEFAULT_REGION;
use parking_lot::RwLock;
use std::{collections::HashMap, sync::Arc};

/// Bucket name to region mapping, shared by every clone of the client that
/// owns it. Concurrent lookups for the same bucket may race, the last write
/// wins.
#[derive(Debug, Clone, Default)]
pub struct RegionCache {
    regions: Arc<RwLock<HashMap<String, String>>>,
}

impl RegionCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, bucket: &str) -> Option<String> {
        self.regions.read().get(bucket).cloned()
    }

    pub fn insert(&self, bucket: &str, region: &str) {
        log::debug!("caching region {region} for bucket {bucket}");
        self.regions
            .write()
            .insert(bucket.to_string(), region.to_string());
    }

    pub fn evict(&self, bucket: &str) {
        if self.regions.write().remove(bucket).is_some() {
            log::debug!("evicted region of bucket {bucket}");
        }
    }

    #[must_use]
    pub fn contains(&self, bucket: &str) -> bool {
        self.regions.read().contains_key(bucket)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.read().is_empty()
    }
}

/// Map a `LocationConstraint` value to a region name, legacy values included
#[must_use]
pub fn region_from_location(location: Option<&str>) -> String {
    match location.map(str::trim) {
        None | Some("") => DEFAULT_REGION.to_string(),
        Some("EU") => "eu-west-1".to_string(),
        Some(region) => region.to_string(),
    }
}

/// Error synthesized from a 301, 307 or 400 response without body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub code: &'static str,
    pub message: String,
    /// HEAD against a cached bucket, the request is replayed once
    pub retry_head: bool,
}

/// Classify a redirect-class status, the region suggested in
/// `x-amz-bucket-region` is appended to the message
#[must_use]
pub fn classify_redirect(
    status: u16,
    region_header: Option<&str>,
    is_head: bool,
    bucket_cached: bool,
) -> Option<Redirect> {
    let (code, message) = match status {
        301 => ("PermanentRedirect", "Moved Permanently"),
        307 => ("Redirect", "Temporary redirect"),
        400 => ("BadRequest", "Bad request"),
        _ => return None,
    };

    let region = region_header.filter(|r| !r.is_empty());

    Some(Redirect {
        code,
        message: match region {
            Some(region) => format!("{message}; use region {region}"),
            None => message.to_string(),
        },
        retry_head: is_head && bucket_cached && region.is_some(),
    })
}
