//! Sources of server-side copies
//! <https://docs.aws.amazon.com/AmazonS3/latest/API/API_UploadPartCopy.html>

use crate::s3::{
    error::{Error, Result},
    signature::{encode_path, encode_value},
    sse::Sse,
};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

const HTTP_DATE: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// An object, or a range of it, to copy from
#[derive(Debug, Clone, Default)]
pub struct ComposeSource {
    pub bucket: String,
    pub object: String,
    pub version_id: Option<String>,
    pub offset: Option<u64>,
    pub length: Option<u64>,
    pub ssec: Option<Sse>,
    pub match_etag: Option<String>,
    pub not_match_etag: Option<String>,
    pub modified_since: Option<DateTime<Utc>>,
    pub unmodified_since: Option<DateTime<Utc>>,
}

/// Source of `copy_object`
pub type CopySource = ComposeSource;

impl ComposeSource {
    #[must_use]
    pub fn new(bucket: &str, object: &str) -> Self {
        Self {
            bucket: bucket.to_string(),
            object: object.to_string(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_version_id(mut self, version_id: &str) -> Self {
        self.version_id = Some(version_id.to_string());
        self
    }

    #[must_use]
    pub const fn with_offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    #[must_use]
    pub const fn with_length(mut self, length: u64) -> Self {
        self.length = Some(length);
        self
    }

    #[must_use]
    pub fn with_ssec(mut self, ssec: Sse) -> Self {
        self.ssec = Some(ssec);
        self
    }

    #[must_use]
    pub fn with_match_etag(mut self, etag: &str) -> Self {
        self.match_etag = Some(etag.to_string());
        self
    }

    #[must_use]
    pub fn with_not_match_etag(mut self, etag: &str) -> Self {
        self.not_match_etag = Some(etag.to_string());
        self
    }

    #[must_use]
    pub const fn with_modified_since(mut self, date: DateTime<Utc>) -> Self {
        self.modified_since = Some(date);
        self
    }

    #[must_use]
    pub const fn with_unmodified_since(mut self, date: DateTime<Utc>) -> Self {
        self.unmodified_since = Some(date);
        self
    }

    /// Offset or length restrict the copy to a range
    #[must_use]
    pub const fn is_range(&self) -> bool {
        self.offset.is_some() || self.length.is_some()
    }

    /// Checks that need no request
    ///
    /// # Errors
    ///
    /// Will return `Err` if a name is empty, SSE-C is not a customer key or
    /// the length is zero
    pub fn validate(&self) -> Result<()> {
        if self.bucket.is_empty() || self.object.is_empty() {
            return Err(Error::Validation(
                "source bucket and object names cannot be empty".to_string(),
            ));
        }

        if self.length == Some(0) {
            return Err(Error::Validation(format!(
                "source {}/{}: length must be greater than zero",
                self.bucket, self.object
            )));
        }

        if self.ssec.as_ref().is_some_and(|sse| !sse.is_customer_key()) {
            return Err(Error::Validation(format!(
                "source {}/{}: only SSE-C applies to a copy source",
                self.bucket, self.object
            )));
        }

        Ok(())
    }

    /// `x-amz-copy-source` with its conditions and SSE-C key
    #[must_use]
    pub fn copy_headers(&self) -> BTreeMap<String, String> {
        let mut headers = BTreeMap::new();

        let mut copy_source = encode_path(&format!("/{}/{}", self.bucket, self.object));
        if let Some(version_id) = &self.version_id {
            copy_source.push_str("?versionId=");
            copy_source.push_str(&encode_value(version_id));
        }
        headers.insert("x-amz-copy-source".to_string(), copy_source);

        if let Some(ssec) = &self.ssec {
            headers.extend(ssec.copy_headers());
        }

        if let Some(etag) = &self.match_etag {
            headers.insert("x-amz-copy-source-if-match".to_string(), etag.clone());
        }

        if let Some(etag) = &self.not_match_etag {
            headers.insert("x-amz-copy-source-if-none-match".to_string(), etag.clone());
        }

        if let Some(date) = &self.modified_since {
            headers.insert(
                "x-amz-copy-source-if-modified-since".to_string(),
                date.format(HTTP_DATE).to_string(),
            );
        }

        if let Some(date) = &self.unmodified_since {
            headers.insert(
                "x-amz-copy-source-if-unmodified-since".to_string(),
                date.format(HTTP_DATE).to_string(),
            );
        }

        headers
    }

    /// Attach the size and `ETag` found by `stat`, the range must fit in the
    /// object
    ///
    /// # Errors
    ///
    /// Will return `Err` if the offset or length go beyond the object size
    pub fn resolve(&self, object_size: u64, etag: &str) -> Result<ResolvedSource> {
        let offset = self.offset.unwrap_or_default();

        if self.offset.is_some() && offset >= object_size {
            return Err(Error::Validation(format!(
                "source {}/{}: offset {offset} is beyond object size {object_size}",
                self.bucket, self.object
            )));
        }

        if let Some(length) = self.length
            && (length > object_size || offset + length > object_size)
        {
            return Err(Error::Validation(format!(
                "source {}/{}: offset {offset} and length {length} are beyond object size {object_size}",
                self.bucket, self.object
            )));
        }

        Ok(ResolvedSource {
            source: self.clone(),
            object_size,
            etag: etag.to_string(),
        })
    }
}

/// A source with the size and `ETag` of the object it points to
#[derive(Debug, Clone)]
pub struct ResolvedSource {
    pub source: ComposeSource,
    pub object_size: u64,
    pub etag: String,
}

impl ResolvedSource {
    /// Bytes copied from this source
    #[must_use]
    pub fn effective_size(&self) -> u64 {
        match (self.source.length, self.source.offset) {
            (Some(length), _) => length,
            (None, Some(offset)) => self.object_size - offset,
            (None, None) => self.object_size,
        }
    }

    #[must_use]
    pub fn offset(&self) -> u64 {
        self.source.offset.unwrap_or_default()
    }

    /// Copy headers pinned to the `ETag` seen by `stat` unless the caller set
    /// a condition
    #[must_use]
    pub fn headers(&self) -> BTreeMap<String, String> {
        let mut headers = self.source.copy_headers();
        if !headers.contains_key("x-amz-copy-source-if-match") && !self.etag.is_empty() {
            headers.insert(
                "x-amz-copy-source-if-match".to_string(),
                self.etag.clone(),
            );
        }
        headers
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_copy_headers() {
        let source = ComposeSource::new("bucket", "dir/a b.txt")
            .with_version_id("v1")
            .with_not_match_etag("abc")
            .with_modified_since(Utc.with_ymd_and_hms(2014, 4, 1, 0, 0, 0).unwrap());
        let headers = source.copy_headers();
        assert_eq!(
            headers.get("x-amz-copy-source").unwrap(),
            "/bucket/dir/a%20b.txt?versionId=v1"
        );
        assert_eq!(headers.get("x-amz-copy-source-if-none-match").unwrap(), "abc");
        assert_eq!(
            headers.get("x-amz-copy-source-if-modified-since").unwrap(),
            "Tue, 01 Apr 2014 00:00:00 GMT"
        );
        assert!(!headers.contains_key("x-amz-copy-source-if-match"));
    }

    #[test]
    fn test_ssec_copy_headers() {
        let source = ComposeSource::new("bucket", "key").with_ssec(Sse::CustomerKey([1; 32]));
        assert!(source.validate().is_ok());
        assert!(
            source
                .copy_headers()
                .contains_key("x-amz-copy-source-server-side-encryption-customer-key")
        );

        let source = ComposeSource::new("bucket", "key").with_ssec(Sse::S3);
        assert!(source.validate().unwrap_err().is_validation());
    }

    #[test]
    fn test_resolve() {
        let source = ComposeSource::new("bucket", "key");
        let resolved = source.resolve(100, "etag").unwrap();
        assert_eq!(resolved.effective_size(), 100);
        assert_eq!(resolved.headers().get("x-amz-copy-source-if-match").unwrap(), "etag");

        let resolved = source.clone().with_offset(10).resolve(100, "etag").unwrap();
        assert_eq!(resolved.effective_size(), 90);
        assert_eq!(resolved.offset(), 10);

        let resolved = source
            .clone()
            .with_offset(10)
            .with_length(20)
            .resolve(100, "etag")
            .unwrap();
        assert_eq!(resolved.effective_size(), 20);

        // caller condition wins
        let resolved = source.clone().with_match_etag("mine").resolve(100, "etag").unwrap();
        assert_eq!(resolved.headers().get("x-amz-copy-source-if-match").unwrap(), "mine");
    }

    #[test]
    fn test_resolve_out_of_range() {
        let source = ComposeSource::new("bucket", "key");
        assert!(source.clone().with_offset(100).resolve(100, "").is_err());
        assert!(source.clone().with_length(101).resolve(100, "").is_err());
        assert!(
            source
                .clone()
                .with_offset(50)
                .with_length(51)
                .resolve(100, "")
                .unwrap_err()
                .is_validation()
        );
        assert!(source.with_length(0).validate().is_err());
    }
}
