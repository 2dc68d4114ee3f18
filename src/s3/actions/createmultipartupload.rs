//! Amazon S3 multipart upload limits
//! Maximum object size 5 TB
//! Maximum number of parts per upload  10,000
//! <https://docs.aws.amazon.com/AmazonS3/latest/dev/qfacts.html>

use crate::s3::{S3, actions::Action, error::Result, responses::InitiateMultipartUploadResult};
use reqwest::Method;
use std::collections::BTreeMap;

#[derive(Debug, Default)]
pub struct CreateMultipartUpload<'a> {
    bucket: &'a str,
    key: &'a str,
    headers: BTreeMap<String, String>,
}

impl<'a> CreateMultipartUpload<'a> {
    /// `headers` carries metadata, encryption, tags, retention and legal hold
    #[must_use]
    pub const fn new(bucket: &'a str, key: &'a str, headers: BTreeMap<String, String>) -> Self {
        Self {
            bucket,
            key,
            headers,
        }
    }

    /// Returns the upload id
    ///
    /// # Errors
    ///
    /// Will return `Err` if can not make the request or the response has no
    /// `UploadId`
    pub async fn request(&self, s3: &S3) -> Result<String> {
        let response = s3.execute(&self.to_request()?).await?;
        let upload: InitiateMultipartUploadResult =
            quick_xml::de::from_str(&response.text().await?)?;
        Ok(upload.upload_id)
    }
}

// <https://docs.aws.amazon.com/AmazonS3/latest/API/API_CreateMultipartUpload.html>
impl Action for CreateMultipartUpload<'_> {
    fn http_method(&self) -> Method {
        Method::POST
    }

    fn bucket(&self) -> &str {
        self.bucket
    }

    fn key(&self) -> Option<&str> {
        Some(self.key)
    }

    fn headers(&self) -> Option<BTreeMap<String, String>> {
        let mut map = self.headers.clone();

        map.entry("content-type".to_string())
            .or_insert_with(|| "application/octet-stream".to_string());

        Some(map)
    }

    fn query_pairs(&self) -> Option<BTreeMap<&str, &str>> {
        let mut map: BTreeMap<&str, &str> = BTreeMap::new();

        // uploads
        map.insert("uploads", "");

        Some(map)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_method() {
        let action = CreateMultipartUpload::new("bucket", "key", BTreeMap::new());
        assert_eq!(Method::POST, action.http_method());
    }

    #[test]
    fn test_headers() {
        let action = CreateMultipartUpload::new("bucket", "key", BTreeMap::new());
        let headers = action.headers().unwrap();
        assert_eq!(
            headers.get("content-type").map(String::as_str),
            Some("application/octet-stream")
        );

        let mut custom = BTreeMap::new();
        custom.insert("content-type".to_string(), "text/plain".to_string());
        custom.insert("x-amz-meta-project".to_string(), "one".to_string());
        let headers = CreateMultipartUpload::new("bucket", "key", custom)
            .headers()
            .unwrap();
        assert_eq!(headers.get("content-type").unwrap(), "text/plain");
        assert_eq!(headers.get("x-amz-meta-project").unwrap(), "one");
    }

    #[test]
    fn test_query_pairs() {
        let action = CreateMultipartUpload::new("bucket", "key", BTreeMap::new());
        let mut map = BTreeMap::new();
        map.insert("uploads", "");
        assert_eq!(Some(map), action.query_pairs());
    }
}
