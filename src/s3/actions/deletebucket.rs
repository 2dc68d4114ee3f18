use crate::s3::{S3, actions::Action, error::Result};
use reqwest::Method;

#[derive(Debug)]
pub struct DeleteBucket<'a> {
    bucket: &'a str,
}

impl<'a> DeleteBucket<'a> {
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

// https://docs.aws.amazon.com/AmazonS3/latest/API/API_DeleteBucket.html
impl Action for DeleteBucket<'_> {
    fn http_method(&self) -> Method {
        Method::DELETE
    }

    fn bucket(&self) -> &str {
        self.bucket
    }
}
