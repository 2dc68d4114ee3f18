use crate::s3::{
    S3,
    actions::Action,
    error::{Error, Result},
    responses::CopyResult,
    tools::trim_etag,
};
use reqwest::Method;
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
pub struct UploadPartCopy<'a> {
    bucket: &'a str,
    key: &'a str,
    upload_id: &'a str,
    part_number: String,
    // x-amz-copy-source, optional range and conditions
    headers: BTreeMap<String, String>,
}

impl<'a> UploadPartCopy<'a> {
    #[must_use]
    pub fn new(
        bucket: &'a str,
        key: &'a str,
        upload_id: &'a str,
        part_number: u16,
        headers: BTreeMap<String, String>,
    ) -> Self {
        Self {
            bucket,
            key,
            upload_id,
            part_number: part_number.to_string(),
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
        let result: CopyResult = quick_xml::de::from_str(&response.text().await?)?;
        result
            .e_tag
            .map(|etag| trim_etag(&etag))
            .ok_or_else(|| Error::Protocol("missing ETag in CopyPartResult".to_string()))
    }
}

// https://docs.aws.amazon.com/AmazonS3/latest/API/API_UploadPartCopy.html
impl Action for UploadPartCopy<'_> {
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
        map.insert("partNumber", &self.part_number);
        map.insert("uploadId", self.upload_id);
        Some(map)
    }
}
