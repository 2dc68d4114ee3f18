use crate::s3::{
    S3,
    actions::{Action, response_header},
    error::{Error, Result},
    tools::trim_etag,
};
use bytes::Bytes;
use reqwest::Method;
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
pub struct UploadPart<'a> {
    bucket: &'a str,
    key: &'a str,
    upload_id: &'a str,
    part_number: String,
    body: Bytes,
    // SSE-C headers are required on every part
    headers: BTreeMap<String, String>,
}

impl<'a> UploadPart<'a> {
    #[must_use]
    pub fn new(
        bucket: &'a str,
        key: &'a str,
        upload_id: &'a str,
        part_number: u16,
        body: Bytes,
        headers: BTreeMap<String, String>,
    ) -> Self {
        Self {
            bucket,
            key,
            upload_id,
            part_number: part_number.to_string(),
            body,
            headers,
        }
    }

    /// Returns the unquoted `ETag` of the part
    ///
    /// # Errors
    ///
    /// Will return `Err` if can not make the request or the `ETag` is missing
    pub async fn request(&self, s3: &S3) -> Result<String> {
        let response = s3.execute(&self.to_request()?).await?;
        response_header(&response, "etag")
            .map(|etag| trim_etag(&etag))
            .ok_or_else(|| Error::Protocol("missing ETag".to_string()))
    }
}

// https://docs.aws.amazon.com/AmazonS3/latest/API/API_UploadPart.html
impl Action for UploadPart<'_> {
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
        Some(self.headers.clone())
    }

    fn query_pairs(&self) -> Option<BTreeMap<&str, &str>> {
        let mut map: BTreeMap<&str, &str> = BTreeMap::new();

        // partNumber - Part number of part being uploaded. This is a positive
        // integer between 1 and 10,000.
        map.insert("partNumber", &self.part_number);

        // uploadId - Upload ID identifying the multipart upload whose part is being uploaded.
        map.insert("uploadId", self.upload_id);

        Some(map)
    }

    fn body(&self) -> Result<Bytes> {
        Ok(self.body.clone())
    }
}
