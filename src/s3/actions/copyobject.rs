use crate::s3::{
    S3,
    actions::{Action, response_header},
    error::Result,
    responses::CopyResult,
    tools::trim_etag,
    types::ObjectWriteResult,
};
use reqwest::Method;
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
pub struct CopyObject<'a> {
    bucket: &'a str,
    key: &'a str,
    // x-amz-copy-source, conditions, directives and destination options
    headers: BTreeMap<String, String>,
}

impl<'a> CopyObject<'a> {
    #[must_use]
    pub const fn new(bucket: &'a str, key: &'a str, headers: BTreeMap<String, String>) -> Self {
        Self {
            bucket,
            key,
            headers,
        }
    }

    /// # Errors
    ///
    /// Will return `Err` if can not make the request
    pub async fn request(&self, s3: &S3) -> Result<ObjectWriteResult> {
        let response = s3.execute(&self.to_request()?).await?;
        let version_id = response_header(&response, "x-amz-version-id");
        let result: CopyResult = quick_xml::de::from_str(&response.text().await?)?;

        Ok(ObjectWriteResult {
            bucket: self.bucket.to_string(),
            object: self.key.to_string(),
            version_id,
            etag: result.e_tag.map(|etag| trim_etag(&etag)).unwrap_or_default(),
            location: None,
            last_modified: result.last_modified,
        })
    }
}

// https://docs.aws.amazon.com/AmazonS3/latest/API/API_CopyObject.html
impl Action for CopyObject<'_> {
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
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_to_request() {
        let mut headers = BTreeMap::new();
        headers.insert("x-amz-copy-source".to_string(), "/src/obj".to_string());
        headers.insert("x-amz-metadata-directive".to_string(), "REPLACE".to_string());
        let action = CopyObject::new("bucket", "key", headers);
        assert_eq!(Method::PUT, action.http_method());

        let request = action.to_request().unwrap();
        assert_eq!(request.headers.get("x-amz-copy-source").unwrap(), "/src/obj");
        assert!(request.query.is_empty());
    }
}
