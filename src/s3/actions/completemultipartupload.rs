use crate::{
    s3::{
        S3,
        actions::{Action, response_header},
        error::Result,
        responses::{
            CompleteMultipartUploadRequest, CompleteMultipartUploadResult, CompletedPart,
            ErrorResponse,
        },
        tools::{base64_md5, trim_etag},
        types::ObjectWriteResult,
    },
    stream::part::Part,
};
use bytes::Bytes;
use reqwest::Method;
use std::collections::BTreeMap;

#[derive(Debug)]
pub struct CompleteMultipartUpload<'a> {
    bucket: &'a str,
    key: &'a str,
    upload_id: &'a str,
    body: Bytes,
}

impl<'a> CompleteMultipartUpload<'a> {
    /// `parts` must be sorted by part number
    ///
    /// # Errors
    ///
    /// Will return `Err` if the XML body can not be created
    pub fn new(bucket: &'a str, key: &'a str, upload_id: &'a str, parts: &[Part]) -> Result<Self> {
        let document = CompleteMultipartUploadRequest {
            parts: parts
                .iter()
                .map(|part| CompletedPart {
                    number: part.get_number(),
                    etag: format!("\"{}\"", part.get_etag()),
                })
                .collect(),
        };

        Ok(Self {
            bucket,
            key,
            upload_id,
            body: Bytes::from(quick_xml::se::to_string(&document)?),
        })
    }

    /// # Errors
    ///
    /// Will return `Err` if can not make the request, or the service answers
    /// 200 with an `<Error>` document
    pub async fn request(&self, s3: &S3) -> Result<ObjectWriteResult> {
        let response = s3.execute(&self.to_request()?).await?;
        let status = response.status().as_u16();
        let version_id = response_header(&response, "x-amz-version-id");
        let body = response.text().await?;

        // the request may still fail after the 200 status was sent
        if body.contains("<Error>") {
            let error: ErrorResponse = quick_xml::de::from_str(&body)?;
            return Err(error
                .into_service_error(status, Some(self.bucket), Some(self.key))
                .into());
        }

        let result: CompleteMultipartUploadResult = quick_xml::de::from_str(&body)?;

        Ok(ObjectWriteResult {
            bucket: result.bucket.unwrap_or_else(|| self.bucket.to_string()),
            object: result.key.unwrap_or_else(|| self.key.to_string()),
            version_id,
            etag: result.e_tag.map(|etag| trim_etag(&etag)).unwrap_or_default(),
            location: result.location,
            last_modified: None,
        })
    }
}

// https://docs.aws.amazon.com/AmazonS3/latest/API/API_CompleteMultipartUpload.html
impl Action for CompleteMultipartUpload<'_> {
    fn http_method(&self) -> Method {
        Method::POST
    }

    fn bucket(&self) -> &str {
        self.bucket
    }

    fn key(&self) -> Option<&str> {
        Some(self.key)
    }

    fn headers(&self) -> Option<BTreeMap<String, String>> {
        let mut map = BTreeMap::new();
        map.insert("content-type".to_string(), "application/xml".to_string());
        map.insert("content-md5".to_string(), base64_md5(&self.body));
        Some(map)
    }

    fn query_pairs(&self) -> Option<BTreeMap<&str, &str>> {
        let mut map: BTreeMap<&str, &str> = BTreeMap::new();
        map.insert("uploadId", self.upload_id);
        Some(map)
    }

    fn body(&self) -> Result<Bytes> {
        Ok(self.body.clone())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_method() {
        let action = CompleteMultipartUpload::new("b", "k", "uid", &[]).unwrap();
        assert_eq!(Method::POST, action.http_method());
    }

    #[test]
    fn test_query_pairs() {
        let action = CompleteMultipartUpload::new("b", "k", "uid", &[]).unwrap();
        let mut map = BTreeMap::new();
        map.insert("uploadId", "uid");
        assert_eq!(Some(map), action.query_pairs());
    }

    #[test]
    fn test_body() {
        let parts = vec![Part::new(1, "etag1"), Part::new(2, "etag2")];
        let action = CompleteMultipartUpload::new("b", "k", "uid", &parts).unwrap();
        let body = String::from_utf8(action.body().unwrap().to_vec()).unwrap();
        let first = body.find("<PartNumber>1</PartNumber>").unwrap();
        let second = body.find("<PartNumber>2</PartNumber>").unwrap();
        assert!(first < second);
        assert!(body.contains("etag1"));
        assert!(body.starts_with("<CompleteMultipartUpload>"));

        let headers = action.headers().unwrap();
        assert_eq!(headers.get("content-type").unwrap(), "application/xml");
        assert_eq!(
            headers.get("content-md5").unwrap(),
            &base64_md5(action.body().unwrap())
        );
    }
}
