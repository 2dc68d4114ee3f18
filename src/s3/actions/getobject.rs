use crate::s3::{S3, actions::Action, error::Result};
use reqwest::{Method, Response};
use std::collections::BTreeMap;

#[derive(Debug, Default)]
pub struct GetObject<'a> {
    bucket: &'a str,
    key: &'a str,
    pub version_id: Option<&'a str>,
    pub offset: u64,
    pub length: Option<u64>,
    // SSE-C headers
    pub headers: BTreeMap<String, String>,
}

impl<'a> GetObject<'a> {
    #[must_use]
    pub fn new(bucket: &'a str, key: &'a str) -> Self {
        Self {
            bucket,
            key,
            ..Self::default()
        }
    }

    /// The body is left in the response to be streamed by the caller
    ///
    /// # Errors
    ///
    /// Will return `Err` if can not make the request
    pub async fn request(&self, s3: &S3) -> Result<Response> {
        s3.execute(&self.to_request()?).await
    }

    fn range(&self) -> Option<String> {
        match self.length {
            Some(length) if length > 0 => Some(format!(
                "bytes={}-{}",
                self.offset,
                self.offset + length - 1
            )),
            _ if self.offset > 0 => Some(format!("bytes={}-", self.offset)),
            _ => None,
        }
    }
}

// https://docs.aws.amazon.com/AmazonS3/latest/API/API_GetObject.html
impl Action for GetObject<'_> {
    fn http_method(&self) -> Method {
        Method::GET
    }

    fn bucket(&self) -> &str {
        self.bucket
    }

    fn key(&self) -> Option<&str> {
        Some(self.key)
    }

    fn headers(&self) -> Option<BTreeMap<String, String>> {
        let mut map = self.headers.clone();
        if let Some(range) = self.range() {
            map.insert("range".to_string(), range);
        }
        Some(map)
    }

    fn query_pairs(&self) -> Option<BTreeMap<&str, &str>> {
        let version_id = self.version_id?;
        let mut map: BTreeMap<&str, &str> = BTreeMap::new();
        map.insert("versionId", version_id);
        Some(map)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_range() {
        let mut action = GetObject::new("bucket", "key");
        assert_eq!(action.range(), None);
        assert!(!action.headers().unwrap().contains_key("range"));

        action.offset = 10;
        assert_eq!(action.range().as_deref(), Some("bytes=10-"));

        action.length = Some(5);
        assert_eq!(action.range().as_deref(), Some("bytes=10-14"));

        action.offset = 0;
        assert_eq!(
            action.headers().unwrap().get("range").map(String::as_str),
            Some("bytes=0-4")
        );
    }

    #[test]
    fn test_query_pairs() {
        let mut action = GetObject::new("bucket", "key");
        assert_eq!(Method::GET, action.http_method());
        assert_eq!(None, action.query_pairs());
        action.version_id = Some("v2");
        assert_eq!(action.query_pairs().unwrap().get("versionId"), Some(&"v2"));
    }
}
