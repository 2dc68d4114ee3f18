use crate::s3::{S3, actions::Action, error::Result, types::ObjectStat};
use reqwest::Method;
use std::collections::BTreeMap;

#[derive(Debug, Default)]
pub struct HeadObject<'a> {
    bucket: &'a str,
    key: &'a str,
    pub version_id: Option<&'a str>,
    // SSE-C headers
    pub headers: BTreeMap<String, String>,
}

impl<'a> HeadObject<'a> {
    #[must_use]
    pub fn new(bucket: &'a str, key: &'a str) -> Self {
        Self {
            bucket,
            key,
            ..Self::default()
        }
    }

    /// # Errors
    ///
    /// Will return `Err` if can not make the request
    pub async fn request(&self, s3: &S3) -> Result<ObjectStat> {
        let response = s3.execute(&self.to_request()?).await?;
        ObjectStat::from_headers(self.bucket, self.key, response.headers())
    }
}

// https://docs.aws.amazon.com/AmazonS3/latest/API/API_HeadObject.html
impl Action for HeadObject<'_> {
    fn http_method(&self) -> Method {
        Method::HEAD
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
        let version_id = self.version_id?;
        let mut map: BTreeMap<&str, &str> = BTreeMap::new();
        map.insert("versionId", version_id);
        Some(map)
    }
}
