//! Presigned URLs
//! <https://docs.aws.amazon.com/AmazonS3/latest/API/sigv4-query-string-auth.html>

use crate::s3::{
    S3,
    error::{Error, Result},
    limits::MAX_PRESIGN_EXPIRY,
    signature::presign_v4,
};
use chrono::{DateTime, Utc};
use reqwest::Method;
use std::{collections::BTreeMap, time::Duration};
use url::Url;

#[derive(Debug, Clone, Default)]
pub struct PresignOptions {
    pub version_id: Option<String>,
    /// `response-content-type`, `response-content-disposition`, ...
    pub response_headers: BTreeMap<String, String>,
    pub extra_query: BTreeMap<String, String>,
    /// Signing time, now when unset
    pub request_date: Option<DateTime<Utc>>,
}

/// Expiry in seconds, between 1 second and 7 days
///
/// # Errors
///
/// Will return `Err` if the expiry is out of range
pub fn expiry_seconds(expires: Duration) -> Result<u64> {
    if expires < Duration::from_secs(1) || expires > MAX_PRESIGN_EXPIRY {
        return Err(Error::Validation(format!(
            "expires must be between 1 second and {} seconds, got {}",
            MAX_PRESIGN_EXPIRY.as_secs(),
            expires.as_secs()
        )));
    }
    Ok(expires.as_secs())
}

impl S3 {
    /// URL for one operation on an object, usable without credentials until
    /// it expires. Anonymous clients get the plain URL.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the expiry is out of range or the region can not be
    /// resolved
    pub async fn presigned_url(
        &self,
        method: Method,
        bucket: &str,
        key: &str,
        expires: Duration,
        options: &PresignOptions,
    ) -> Result<Url> {
        let expires = expiry_seconds(expires)?;

        if key.is_empty() {
            return Err(Error::Validation("object name cannot be empty".to_string()));
        }

        let region = self.get_region(Some(bucket), None).await?;

        let mut query = options.extra_query.clone();
        query.extend(options.response_headers.clone());
        if let Some(version_id) = &options.version_id {
            query.insert("versionId".to_string(), version_id.clone());
        }

        let credentials = self.credentials()?;

        if let Some(token) = credentials.as_ref().and_then(|c| c.session_token()) {
            query.insert("X-Amz-Security-Token".to_string(), token.to_string());
        }

        let url = self
            .base_url
            .build(&region, Some(bucket), Some(key), &query)?;

        let Some(credentials) = credentials else {
            return Ok(url);
        };

        let date = options.request_date.unwrap_or_else(Utc::now);

        log::debug!("presigning {method} {bucket}/{key} for {expires} seconds");

        Ok(presign_v4(&method, &url, &region, &credentials, &date, expires))
    }

    /// # Errors
    ///
    /// Will return `Err` if the expiry is out of range
    pub async fn presigned_get_object(
        &self,
        bucket: &str,
        key: &str,
        expires: Duration,
        options: &PresignOptions,
    ) -> Result<Url> {
        self.presigned_url(Method::GET, bucket, key, expires, options)
            .await
    }

    /// # Errors
    ///
    /// Will return `Err` if the expiry is out of range
    pub async fn presigned_put_object(
        &self,
        bucket: &str,
        key: &str,
        expires: Duration,
    ) -> Result<Url> {
        self.presigned_url(Method::PUT, bucket, key, expires, &PresignOptions::default())
            .await
    }
}
