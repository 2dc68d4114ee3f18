use crate::s3::{
    S3,
    actions::Action,
    error::Result,
    limits::DEFAULT_REGION,
    responses::CreateBucketConfiguration,
};
use bytes::Bytes;
use reqwest::Method;
use std::collections::BTreeMap;

#[derive(Debug)]
pub struct CreateBucket<'a> {
    bucket: &'a str,
    location: &'a str,
    object_lock: bool,
}

impl<'a> CreateBucket<'a> {
    #[must_use]
    pub const fn new(bucket: &'a str, location: &'a str, object_lock: bool) -> Self {
        Self {
            bucket,
            location,
            object_lock,
        }
    }

    /// The request is signed for `location`, the bucket does not exist yet
    ///
    /// # Errors
    ///
    /// Will return `Err` if can not make the request
    pub async fn request(&self, s3: &S3) -> Result<()> {
        s3.execute_in(self.location, &self.to_request()?).await?;
        Ok(())
    }
}

// https://docs.aws.amazon.com/AmazonS3/latest/API/API_CreateBucket.html
impl Action for CreateBucket<'_> {
    fn http_method(&self) -> Method {
        Method::PUT
    }

    fn bucket(&self) -> &str {
        self.bucket
    }

    fn headers(&self) -> Option<BTreeMap<String, String>> {
        if self.object_lock {
            let mut map = BTreeMap::new();
            map.insert(
                "x-amz-bucket-object-lock-enabled".to_string(),
                "true".to_string(),
            );
            Some(map)
        } else {
            None
        }
    }

    fn body(&self) -> Result<Bytes> {
        if self.location == DEFAULT_REGION {
            return Ok(Bytes::new());
        }

        let configuration = CreateBucketConfiguration {
            location_constraint: self.location.to_string(),
        };

        Ok(Bytes::from(quick_xml::se::to_string(&configuration)?))
    }
}
