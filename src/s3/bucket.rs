//! Bucket operations on the client

use crate::s3::{
    S3,
    actions::{CreateBucket, DeleteBucket, DeleteBucketLifecycle, HeadBucket},
    error::{Error, Result},
    limits::DEFAULT_REGION,
};

impl S3 {
    /// Create a bucket, the region cache learns its location
    ///
    /// # Errors
    ///
    /// Will return `Err` if `location` conflicts with the fixed region or the
    /// request fails
    pub async fn make_bucket(
        &self,
        bucket: &str,
        location: Option<&str>,
        object_lock: bool,
    ) -> Result<()> {
        let location = location.filter(|l| !l.is_empty());

        let location = match (self.fixed_region(), location) {
            (Some(fixed), Some(location)) if fixed != location => {
                return Err(Error::Validation(format!(
                    "region must be {fixed}, but passed {location}"
                )));
            }
            (Some(fixed), _) => fixed.to_string(),
            (None, Some(location)) => location.to_string(),
            (None, None) => DEFAULT_REGION.to_string(),
        };

        CreateBucket::new(bucket, &location, object_lock)
            .request(self)
            .await?;

        self.region_cache().insert(bucket, &location);

        Ok(())
    }

    /// # Errors
    ///
    /// Will return `Err` for any failure other than a missing bucket
    pub async fn bucket_exists(&self, bucket: &str) -> Result<bool> {
        match HeadBucket::new(bucket).request(self).await {
            Ok(()) => Ok(true),
            Err(err) if err.code() == Some("NoSuchBucket") => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Remove an empty bucket and forget its region
    ///
    /// # Errors
    ///
    /// Will return `Err` if the request fails
    pub async fn remove_bucket(&self, bucket: &str) -> Result<()> {
        DeleteBucket::new(bucket).request(self).await?;
        self.region_cache().evict(bucket);
        Ok(())
    }

    /// Delete the lifecycle configuration, a bucket without one is not an error
    ///
    /// # Errors
    ///
    /// Will return `Err` if the request fails
    pub async fn delete_bucket_lifecycle(&self, bucket: &str) -> Result<()> {
        DeleteBucketLifecycle::new(bucket).request(self).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_make_bucket_region_mismatch() {
        let s3 = S3::new("http://localhost:9000", None, Some("eu-west-1")).unwrap();
        let err = s3
            .make_bucket("bucket", Some("us-west-2"), false)
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert!(s3.region_cache().is_empty());
    }
}
