//! XML documents exchanged with the service
//! <https://docs.aws.amazon.com/AmazonS3/latest/API/ErrorResponses.html>

use crate::s3::error::ServiceError;
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Debug, Clone, Default)]
pub struct ErrorResponse {
    #[serde(rename = "Code", default)]
    pub code: String,
    #[serde(rename = "Message", default)]
    pub message: String,
    #[serde(rename = "Resource")]
    pub resource: Option<String>,
    #[serde(rename = "RequestId")]
    pub request_id: Option<String>,
    #[serde(rename = "HostId")]
    pub host_id: Option<String>,
    #[serde(rename = "BucketName")]
    pub bucket_name: Option<String>,
    #[serde(rename = "Key")]
    pub key: Option<String>,
}

impl ErrorResponse {
    /// Promote the document to a `ServiceError`, request context fills the
    /// fields the document leaves out
    #[must_use]
    pub fn into_service_error(
        self,
        status: u16,
        bucket: Option<&str>,
        object: Option<&str>,
    ) -> ServiceError {
        ServiceError {
            status,
            code: self.code,
            message: self.message,
            resource: self.resource,
            request_id: self.request_id,
            host_id: self.host_id,
            bucket: self.bucket_name.or_else(|| bucket.map(ToString::to_string)),
            object: self.key.or_else(|| object.map(ToString::to_string)),
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct InitiateMultipartUploadResult {
    #[serde(rename = "Bucket")]
    pub bucket: String,
    #[serde(rename = "Key")]
    pub key: String,
    #[serde(rename = "UploadId")]
    pub upload_id: String,
}

#[derive(Deserialize, Debug, Default)]
pub struct CompleteMultipartUploadResult {
    #[serde(rename = "Location")]
    pub location: Option<String>,
    #[serde(rename = "Bucket")]
    pub bucket: Option<String>,
    #[serde(rename = "Key")]
    pub key: Option<String>,
    #[serde(rename = "ETag")]
    pub e_tag: Option<String>,
}

/// Body of `CopyObject` and `UploadPartCopy` responses
/// (`CopyObjectResult` / `CopyPartResult`)
#[derive(Deserialize, Debug, Default)]
pub struct CopyResult {
    #[serde(rename = "LastModified")]
    pub last_modified: Option<String>,
    #[serde(rename = "ETag")]
    pub e_tag: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
pub struct LocationConstraint {
    #[serde(rename = "$text", default)]
    pub region: Option<String>,
}

/// Request body of `CompleteMultipartUpload`
#[derive(Serialize, Debug)]
#[serde(rename = "CompleteMultipartUpload")]
pub struct CompleteMultipartUploadRequest {
    #[serde(rename = "Part")]
    pub parts: Vec<CompletedPart>,
}

#[derive(Serialize, Debug)]
pub struct CompletedPart {
    #[serde(rename = "PartNumber")]
    pub number: u16,
    #[serde(rename = "ETag")]
    pub etag: String,
}

/// Request body of `PutObjectLegalHold`
#[derive(Serialize, Debug)]
#[serde(rename = "LegalHold")]
pub struct LegalHold {
    #[serde(rename = "Status")]
    pub status: String,
}

/// Request body of `CreateBucket` outside the default region
#[derive(Serialize, Debug)]
#[serde(rename = "CreateBucketConfiguration")]
pub struct CreateBucketConfiguration {
    #[serde(rename = "LocationConstraint")]
    pub location_constraint: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use quick_xml::de::from_str;

    #[test]
    fn test_error_response() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<Error>
  <Code>NoSuchKey</Code>
  <Message>The resource you requested does not exist</Message>
  <Resource>/mybucket/myfoto.jpg</Resource>
  <RequestId>4442587FB7D0A2F9</RequestId>
</Error>"#;
        let error: ErrorResponse = from_str(xml).unwrap();
        let error = error.into_service_error(404, Some("mybucket"), Some("myfoto.jpg"));
        assert_eq!(error.code, "NoSuchKey");
        assert_eq!(error.resource.as_deref(), Some("/mybucket/myfoto.jpg"));
        assert_eq!(error.request_id.as_deref(), Some("4442587FB7D0A2F9"));
        assert_eq!(error.bucket.as_deref(), Some("mybucket"));
        assert_eq!(error.object.as_deref(), Some("myfoto.jpg"));
        assert_eq!(error.status, 404);
    }

    #[test]
    fn test_initiate_multipart_upload_result() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<InitiateMultipartUploadResult xmlns="http://s3.amazonaws.com/doc/2006-03-01/">
  <Bucket>example-bucket</Bucket>
  <Key>example-object</Key>
  <UploadId>VXBsb2FkIElEIGZvciA2aWWpbmcncyBteS1tb3ZpZS5tMnRzIHVwbG9hZA</UploadId>
</InitiateMultipartUploadResult>"#;
        let result: InitiateMultipartUploadResult = from_str(xml).unwrap();
        assert_eq!(result.bucket, "example-bucket");
        assert_eq!(
            result.upload_id,
            "VXBsb2FkIElEIGZvciA2aWWpbmcncyBteS1tb3ZpZS5tMnRzIHVwbG9hZA"
        );
    }

    #[test]
    fn test_location_constraint() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<LocationConstraint xmlns="http://s3.amazonaws.com/doc/2006-03-01/">eu-central-1</LocationConstraint>"#;
        let location: LocationConstraint = from_str(xml).unwrap();
        assert_eq!(location.region.as_deref(), Some("eu-central-1"));

        let xml = r#"<LocationConstraint xmlns="http://s3.amazonaws.com/doc/2006-03-01/"/>"#;
        let location: LocationConstraint = from_str(xml).unwrap();
        assert_eq!(location.region, None);
    }

    #[test]
    fn test_copy_result() {
        let xml = r#"<CopyPartResult>
  <LastModified>2011-04-11T20:34:56.000Z</LastModified>
  <ETag>"9b2cf535f27731c974343645a3985328"</ETag>
</CopyPartResult>"#;
        let result: CopyResult = from_str(xml).unwrap();
        assert_eq!(result.e_tag.as_deref(), Some("\"9b2cf535f27731c974343645a3985328\""));
        assert_eq!(result.last_modified.as_deref(), Some("2011-04-11T20:34:56.000Z"));
    }

    #[test]
    fn test_complete_multipart_upload_request() {
        let body = CompleteMultipartUploadRequest {
            parts: vec![
                CompletedPart {
                    number: 1,
                    etag: "\"a54357aff0632cce46d942af68356b38\"".to_string(),
                },
                CompletedPart {
                    number: 2,
                    etag: "\"0c78aef83f66abc1fa1e8477f296d394\"".to_string(),
                },
            ],
        };
        let xml = quick_xml::se::to_string(&body).unwrap();
        assert!(xml.starts_with("<CompleteMultipartUpload><Part><PartNumber>1</PartNumber>"));
        assert!(xml.contains("<Part><PartNumber>2</PartNumber><ETag>"));
        assert!(xml.ends_with("</Part></CompleteMultipartUpload>"));
    }
}
