use crate::s3::{
    S3,
    actions::{Action, response_header},
    error::Result,
    tools::trim_etag,
    types::ObjectWriteResult,
};
use bytes::Bytes;
use reqwest::Method;
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
pub struct PutObject<'a> {
    bucket: &'a str,
    key: &'a str,
    body: Bytes,
    headers: BTreeMap<String, String>,
}

impl<'a> PutObject<'a> {
    #[must_use]
    pub const fn new(
        bucket: &'a str,
        key: &'a str,
        body: Bytes,
        headers: BTreeMap<String, String>,
    ) -> Self {
        Self {
            bucket,
            key,
            body,
            headers,
        }
    }

    /// # Errors
    ///
    /// Will return `Err` if can not make the request
    pub async fn request(&self, s3: &S3) -> Result<ObjectWriteResult> {
        let response = s3.execute(&self.to_request()?).await?;

        Ok(ObjectWriteResult {
            bucket: self.bucket.to_string(),
            object: self.key.to_string(),
            version_id: response_header(&response, "x-amz-version-id"),
            etag: response_header(&response, "etag")
                .map(|etag| trim_etag(&etag))
                .unwrap_or_default(),
            location: None,
            last_modified: None,
        })
    }
}

// https://docs.aws.amazon.com/AmazonS3/latest/API/API_PutObject.html
impl Action for PutObject<'_> {
    fn http_method(&self) -> Method {
        Method::PUT
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

    fn body(&self) -> Result<Bytes> {
        Ok(self.body.clone())
    }
}
