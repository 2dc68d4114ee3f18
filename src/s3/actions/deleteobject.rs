use crate::s3::{S3, actions::Action, error::Result};
use reqwest::Method;
use std::collections::BTreeMap;

#[derive(Debug, Default)]
pub struct DeleteObject<'a> {
    bucket: &'a str,
    key: &'a str,
    pub version_id: Option<&'a str>,
}

impl<'a> DeleteObject<'a> {
    #[must_use]
    pub const fn new(bucket: &'a str, key: &'a str) -> Self {
        Self {
            bucket,
            key,
            version_id: None,
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

// https://docs.aws.amazon.com/AmazonS3/latest/API/API_DeleteObject.html
impl Action for DeleteObject<'_> {
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
        let version_id = self.version_id?;
        let mut map: BTreeMap<&str, &str> = BTreeMap::new();
        map.insert("versionId", version_id);
        Some(map)
    }
}
