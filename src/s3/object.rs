//! Object operations on the client

use crate::s3::{
    S3,
    actions::{DeleteObject, GetObject, HeadObject, PutObjectLegalHold},
    error::{Error, Result},
    sse::Sse,
    types::ObjectStat,
};
use reqwest::Response;
use std::collections::BTreeMap;

/// Options of `get_object`, a zero `offset` with no `length` reads everything
#[derive(Debug, Clone, Default)]
pub struct GetObjectOptions {
    pub version_id: Option<String>,
    pub offset: u64,
    pub length: Option<u64>,
    pub ssec: Option<Sse>,
}

impl S3 {
    /// # Errors
    ///
    /// Will return `Err` if the request fails, `NoSuchKey` if the object does
    /// not exist
    pub async fn stat_object(
        &self,
        bucket: &str,
        key: &str,
        version_id: Option<&str>,
        ssec: Option<&Sse>,
    ) -> Result<ObjectStat> {
        let mut action = HeadObject::new(bucket, key);
        action.version_id = version_id;
        action.headers = self.ssec_headers(ssec)?;
        action.request(self).await
    }

    /// Get an object, the body is streamed from the returned response
    ///
    /// # Errors
    ///
    /// Will return `Err` if the request fails
    pub async fn get_object(
        &self,
        bucket: &str,
        key: &str,
        options: &GetObjectOptions,
    ) -> Result<Response> {
        if options.length == Some(0) {
            return Err(Error::Validation("length cannot be zero".to_string()));
        }

        let mut action = GetObject::new(bucket, key);
        action.version_id = options.version_id.as_deref();
        action.offset = options.offset;
        action.length = options.length;
        action.headers = self.ssec_headers(options.ssec.as_ref())?;
        action.request(self).await
    }

    /// # Errors
    ///
    /// Will return `Err` if the request fails
    pub async fn remove_object(
        &self,
        bucket: &str,
        key: &str,
        version_id: Option<&str>,
    ) -> Result<()> {
        let mut action = DeleteObject::new(bucket, key);
        action.version_id = version_id;
        action.request(self).await
    }

    /// # Errors
    ///
    /// Will return `Err` if the request fails
    pub async fn enable_object_legal_hold(
        &self,
        bucket: &str,
        key: &str,
        version_id: Option<&str>,
    ) -> Result<()> {
        let mut action = PutObjectLegalHold::new(bucket, key, true);
        action.version_id = version_id;
        action.request(self).await
    }

    /// Disabling an already disabled legal hold succeeds
    ///
    /// # Errors
    ///
    /// Will return `Err` if the request fails
    pub async fn disable_object_legal_hold(
        &self,
        bucket: &str,
        key: &str,
        version_id: Option<&str>,
    ) -> Result<()> {
        let mut action = PutObjectLegalHold::new(bucket, key, false);
        action.version_id = version_id;
        action.request(self).await
    }

    // SSE-C headers to read an encrypted object
    fn ssec_headers(&self, ssec: Option<&Sse>) -> Result<BTreeMap<String, String>> {
        match ssec {
            Some(sse) if !sse.is_customer_key() => Err(Error::Validation(
                "only SSE-C applies to reads".to_string(),
            )),
            Some(_) if !self.is_https() => Err(Error::Validation(
                "SSE-C operations must be performed over a secure connection".to_string(),
            )),
            Some(sse) => Ok(sse.headers()),
            None => Ok(BTreeMap::new()),
        }
    }
}
