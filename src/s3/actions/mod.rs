//! Actions
//! <https://docs.aws.amazon.com/AmazonS3/latest/API/API_Operations.html>

use crate::s3::{
    error::{Error, Result},
    request::Request,
};
use bytes::Bytes;
use reqwest::Method;
use std::collections::BTreeMap;

// <https://docs.aws.amazon.com/AmazonS3/latest/API/API_AbortMultipartUpload.html>
mod abortmultipartupload;
pub use self::abortmultipartupload::AbortMultipartUpload;

// <https://docs.aws.amazon.com/AmazonS3/latest/API/API_CompleteMultipartUpload.html>
mod completemultipartupload;
pub use self::completemultipartupload::CompleteMultipartUpload;

// <https://docs.aws.amazon.com/AmazonS3/latest/API/API_CopyObject.html>
mod copyobject;
pub use self::copyobject::CopyObject;

// <https://docs.aws.amazon.com/AmazonS3/latest/API/API_CreateBucket.html>
mod createbucket;
pub use self::createbucket::CreateBucket;

// <https://docs.aws.amazon.com/AmazonS3/latest/API/API_CreateMultipartUpload.html>
mod createmultipartupload;
pub use self::createmultipartupload::CreateMultipartUpload;

// <https://docs.aws.amazon.com/AmazonS3/latest/API/API_DeleteBucket.html>
mod deletebucket;
pub use self::deletebucket::DeleteBucket;

// <https://docs.aws.amazon.com/AmazonS3/latest/API/API_DeleteBucketLifecycle.html>
mod deletebucketlifecycle;
pub use self::deletebucketlifecycle::DeleteBucketLifecycle;

// <https://docs.aws.amazon.com/AmazonS3/latest/API/API_DeleteObject.html>
mod deleteobject;
pub use self::deleteobject::DeleteObject;

// <https://docs.aws.amazon.com/AmazonS3/latest/API/API_GetBucketLocation.html>
mod getbucketlocation;
pub use self::getbucketlocation::GetBucketLocation;

// <https://docs.aws.amazon.com/AmazonS3/latest/API/API_GetObject.html>
mod getobject;
pub use self::getobject::GetObject;

// <https://docs.aws.amazon.com/AmazonS3/latest/API/API_HeadBucket.html>
mod headbucket;
pub use self::headbucket::HeadBucket;

// <https://docs.aws.amazon.com/AmazonS3/latest/API/API_HeadObject.html>
mod headobject;
pub use self::headobject::HeadObject;

// <https://docs.aws.amazon.com/AmazonS3/latest/API/API_PutObject.html>
mod putobject;
pub use self::putobject::PutObject;

// <https://docs.aws.amazon.com/AmazonS3/latest/API/API_PutObjectLegalHold.html>
mod putobjectlegalhold;
pub use self::putobjectlegalhold::PutObjectLegalHold;

// <https://docs.aws.amazon.com/AmazonS3/latest/API/API_UploadPart.html>
mod uploadpart;
pub use self::uploadpart::UploadPart;

// <https://docs.aws.amazon.com/AmazonS3/latest/API/API_UploadPartCopy.html>
mod uploadpartcopy;
pub use self::uploadpartcopy::UploadPartCopy;

pub trait Action {
    // method to use GET/PUT...
    fn http_method(&self) -> Method;

    fn bucket(&self) -> &str;

    // object key, None for bucket operations
    fn key(&self) -> Option<&str> {
        None
    }

    // headers to send in the request
    fn headers(&self) -> Option<BTreeMap<String, String>> {
        None
    }

    // URL query pairs
    fn query_pairs(&self) -> Option<BTreeMap<&str, &str>> {
        None
    }

    /// # Errors
    ///
    /// Will return `Err` if the body can not be serialized
    fn body(&self) -> Result<Bytes> {
        Ok(Bytes::new())
    }

    /// Describe the call for the transport
    ///
    /// # Errors
    ///
    /// Will return `Err` if the body can not be serialized
    fn to_request(&self) -> Result<Request> {
        let mut request = Request::new(self.http_method()).bucket(self.bucket());

        if let Some(key) = self.key() {
            if key.is_empty() {
                return Err(Error::Validation("object name cannot be empty".to_string()));
            }
            request = request.key(key);
        }

        if let Some(pairs) = self.query_pairs() {
            for (k, v) in pairs {
                request = request.query(k, v);
            }
        }

        if let Some(headers) = self.headers() {
            request = request.headers(headers);
        }

        Ok(request.body(self.body()?))
    }
}

/// Read a header of a successful response
pub(crate) fn response_header(response: &reqwest::Response, name: &str) -> Option<String> {
    crate::s3::request::header_value(response.headers(), name)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    struct KeyedAction<'a> {
        key: &'a str,
    }

    impl Action for KeyedAction<'_> {
        fn http_method(&self) -> Method {
            Method::GET
        }

        fn bucket(&self) -> &str {
            "bucket"
        }

        fn key(&self) -> Option<&str> {
            Some(self.key)
        }
    }

    #[test]
    fn test_request() {
        let request = KeyedAction { key: "a/b" }.to_request().unwrap();
        assert_eq!(request.method, Method::GET);
        assert_eq!(request.bucket.as_deref(), Some("bucket"));
        assert_eq!(request.key.as_deref(), Some("a/b"));
        assert!(request.query.is_empty());
        assert!(request.body.is_empty());
    }

    #[test]
    fn test_request_empty_key() {
        assert!(KeyedAction { key: "" }.to_request().unwrap_err().is_validation());
    }
}
