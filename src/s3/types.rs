use crate::s3::{
    error::{Error, Result},
    request::header_value,
    tools::trim_etag,
};
use reqwest::header::HeaderMap;
use std::collections::BTreeMap;

/// Result of any write: put, copy, compose or completed multipart upload
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectWriteResult {
    pub bucket: String,
    pub object: String,
    pub version_id: Option<String>,
    pub etag: String,
    pub location: Option<String>,
    pub last_modified: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectStat {
    pub bucket: String,
    pub object: String,
    pub size: u64,
    pub etag: String,
    pub last_modified: Option<String>,
    pub content_type: Option<String>,
    pub version_id: Option<String>,
    pub metadata: BTreeMap<String, String>,
}

impl ObjectStat {
    /// Read the stat from `HeadObject` response headers
    ///
    /// # Errors
    ///
    /// Will return `Err` if `content-length` is missing or not a number
    pub fn from_headers(bucket: &str, object: &str, headers: &HeaderMap) -> Result<Self> {
        let size = header_value(headers, "content-length")
            .and_then(|v| v.parse::<u64>().ok())
            .ok_or_else(|| {
                Error::Protocol(format!(
                    "stat {bucket}/{object}: missing or invalid content-length"
                ))
            })?;

        let metadata = headers
            .iter()
            .filter_map(|(name, value)| {
                let key = name.as_str().strip_prefix("x-amz-meta-")?;
                Some((key.to_string(), value.to_str().ok()?.to_string()))
            })
            .collect();

        Ok(Self {
            bucket: bucket.to_string(),
            object: object.to_string(),
            size,
            etag: header_value(headers, "etag")
                .map(|etag| trim_etag(&etag))
                .unwrap_or_default(),
            last_modified: header_value(headers, "last-modified"),
            content_type: header_value(headers, "content-type"),
            version_id: header_value(headers, "x-amz-version-id"),
            metadata,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn test_stat_from_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("content-length", HeaderValue::from_static("5242880"));
        headers.insert("etag", HeaderValue::from_static("\"abc\""));
        headers.insert("x-amz-version-id", HeaderValue::from_static("v1"));
        headers.insert("x-amz-meta-project", HeaderValue::from_static("one"));
        headers.insert("content-type", HeaderValue::from_static("text/plain"));

        let stat = ObjectStat::from_headers("bucket", "key", &headers).unwrap();
        assert_eq!(stat.size, 5_242_880);
        assert_eq!(stat.etag, "abc");
        assert_eq!(stat.version_id.as_deref(), Some("v1"));
        assert_eq!(stat.content_type.as_deref(), Some("text/plain"));
        assert_eq!(stat.metadata.get("project").unwrap(), "one");
        assert_eq!(stat.last_modified, None);
    }

    #[test]
    fn test_stat_without_content_length() {
        let mut headers = HeaderMap::new();
        headers.insert("etag", HeaderValue::from_static("\"abc\""));

        let err = ObjectStat::from_headers("bucket", "key", &headers).unwrap_err();
        assert!(matches!(err, Error::Protocol(_)));

        headers.insert("content-length", HeaderValue::from_static("unknown"));
        let err = ObjectStat::from_headers("bucket", "key", &headers).unwrap_err();
        assert!(matches!(err, Error::Protocol(_)));

        headers.insert("content-length", HeaderValue::from_static("0"));
        assert_eq!(ObjectStat::from_headers("bucket", "key", &headers).unwrap().size, 0);
    }
}
