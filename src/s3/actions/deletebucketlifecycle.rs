use crate::s3::{S3, actions::Action, error::Result};
use reqwest::Method;
use std::collections::BTreeMap;

/// Removes the lifecycle configuration, succeeds when there is none
#[derive(Debug)]
pub struct DeleteBucketLifecycle<'a> {
    bucket: &'a str,
}

impl<'a> DeleteBucketLifecycle<'a> {
    #[must_use]
    pub const fn new(bucket: &'a str) -> Self {
        Self { bucket }
    }

    /// # Errors
    ///
    /// Will return `Err` if can not make the request
    pub async fn request(&self, s3: &S3) -> Result<()> {
        s3.execute(&self.to_request()?).await?;
        Ok(())
    }
}

// https://docs.aws.amazon.com/AmazonS3/latest/API/API_DeleteBucketLifecycle.html
impl Action for DeleteBucketLifecycle<'_> {
    fn http_method(&self) -> Method {
        Method::DELETE
    }

    fn bucket(&self) -> &str {
        self.bucket
    }

    fn query_pairs(&self) -> Option<BTreeMap<&str, &str>> {
        let mut map: BTreeMap<&str, &str> = BTreeMap::new();
        map.insert("lifecycle", "");
        Some(map)
    }
}
