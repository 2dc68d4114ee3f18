use crate::s3::{S3, actions::Action, error::Result};
use reqwest::Method;
use std::collections::BTreeMap;

#[derive(Debug, Default)]
pub struct AbortMultipartUpload<'a> {
    bucket: &'a str,
    key: &'a str,
    upload_id: &'a str,
}

impl<'a> AbortMultipartUpload<'a> {
    #[must_use]
    pub const fn new(bucket: &'a str, key: &'a str, upload_id: &'a str) -> Self {
        Self {
            bucket,
            key,
            upload_id,
        }
    }

    /// # Errors
    ///
    /// Will return `Err` if can not make the request
    pub async fn request(&self, s3: &S3) -> Result<()> {
        s3.execute(&self.to_request()?).await?;
        Ok(())
    }
}

// https://docs.aws.amazon.com/AmazonS3/latest/API/API_AbortMultipartUpload.html
impl Action for AbortMultipartUpload<'_> {
    fn http_method(&self) -> Method {
        Method::DELETE
    }

    fn bucket(&self) -> &str {
        self.bucket
    }

    fn key(&self) -> Option<&str> {
        Some(self.key)
    }

    fn query_pairs(&self) -> Option<BTreeMap<&str, &str>> {
        let mut map: BTreeMap<&str, &str> = BTreeMap::new();

        // uploadId - Upload ID that identifies the multipart upload.
        map.insert("uploadId", self.upload_id);

        Some(map)
    }
}
