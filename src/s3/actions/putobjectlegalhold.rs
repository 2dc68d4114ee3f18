use crate::s3::{
    S3,
    actions::Action,
    error::Result,
    responses::LegalHold,
    tools::base64_md5,
};
use bytes::Bytes;
use reqwest::Method;
use std::collections::BTreeMap;

/// Sets the legal hold status, setting the current status again succeeds
#[derive(Debug)]
pub struct PutObjectLegalHold<'a> {
    bucket: &'a str,
    key: &'a str,
    enabled: bool,
    pub version_id: Option<&'a str>,
}

impl<'a> PutObjectLegalHold<'a> {
    #[must_use]
    pub const fn new(bucket: &'a str, key: &'a str, enabled: bool) -> Self {
        Self {
            bucket,
            key,
            enabled,
            version_id: None,
        }
    }

    /// # Errors
    ///
    /// Will return `Err` if can not make the request
    pub async fn request(&self, s3: &S3) -> Result<()> {
        s3.execute(&self.to_request()?).await?;
        Ok(())
    }

    fn document(&self) -> Result<String> {
        let legal_hold = LegalHold {
            status: if self.enabled { "ON" } else { "OFF" }.to_string(),
        };
        Ok(quick_xml::se::to_string(&legal_hold)?)
    }
}

// https://docs.aws.amazon.com/AmazonS3/latest/API/API_PutObjectLegalHold.html
impl Action for PutObjectLegalHold<'_> {
    fn http_method(&self) -> Method {
        Method::PUT
    }

    fn bucket(&self) -> &str {
        self.bucket
    }

    fn key(&self) -> Option<&str> {
        Some(self.key)
    }

    fn headers(&self) -> Option<BTreeMap<String, String>> {
        // Content-MD5 is required for this call
        let document = self.document().ok()?;
        let mut map = BTreeMap::new();
        map.insert("content-md5".to_string(), base64_md5(document));
        Some(map)
    }

    fn query_pairs(&self) -> Option<BTreeMap<&str, &str>> {
        let mut map: BTreeMap<&str, &str> = BTreeMap::new();
        map.insert("legal-hold", "");
        if let Some(version_id) = self.version_id {
            map.insert("versionId", version_id);
        }
        Some(map)
    }

    fn body(&self) -> Result<Bytes> {
        Ok(Bytes::from(self.document()?))
    }
}
