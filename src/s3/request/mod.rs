//! Request descriptor handed to the transport by every action

use crate::s3::error::{Error, Result};
use bytes::Bytes;
use reqwest::{
    Method,
    header::{HeaderMap, HeaderName, HeaderValue},
};
use std::collections::BTreeMap;

/// One S3 API call: what to send, not how to route or sign it
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub bucket: Option<String>,
    pub key: Option<String>,
    pub query: BTreeMap<String, String>,
    // header names are stored lowercase
    pub headers: BTreeMap<String, String>,
    pub body: Bytes,
}

impl Request {
    #[must_use]
    pub fn new(method: Method) -> Self {
        Self {
            method,
            bucket: None,
            key: None,
            query: BTreeMap::new(),
            headers: BTreeMap::new(),
            body: Bytes::new(),
        }
    }

    #[must_use]
    pub fn bucket(mut self, bucket: &str) -> Self {
        self.bucket = Some(bucket.to_string());
        self
    }

    #[must_use]
    pub fn key(mut self, key: &str) -> Self {
        self.key = Some(key.to_string());
        self
    }

    #[must_use]
    pub fn query(mut self, key: &str, value: &str) -> Self {
        self.query.insert(key.to_string(), value.to_string());
        self
    }

    #[must_use]
    pub fn header(mut self, key: &str, value: &str) -> Self {
        self.headers
            .insert(key.to_ascii_lowercase(), value.to_string());
        self
    }

    #[must_use]
    pub fn headers(mut self, headers: BTreeMap<String, String>) -> Self {
        for (k, v) in headers {
            self.headers.insert(k.to_ascii_lowercase(), v);
        }
        self
    }

    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    #[must_use]
    pub fn is_head(&self) -> bool {
        self.method == Method::HEAD
    }
}

/// Convert signed headers into the map sent on the wire
///
/// # Errors
///
/// Will return `Err` if a header name or value is not valid
pub fn header_map(headers: &BTreeMap<String, String>) -> Result<HeaderMap> {
    headers
        .iter()
        .map(|(k, v)| {
            let name = k
                .parse::<HeaderName>()
                .map_err(|e| Error::Validation(format!("invalid header name {k}: {e}")))?;
            let value = v
                .parse::<HeaderValue>()
                .map_err(|e| Error::Validation(format!("invalid value for header {k}: {e}")))?;
            Ok((name, value))
        })
        .collect::<Result<HeaderMap>>()
}

/// Read a response header as a string
#[must_use]
pub fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let request = Request::new(Method::PUT)
            .bucket("bucket")
            .key("a/b.txt")
            .query("partNumber", "1")
            .header("Content-Type", "text/plain")
            .body("data");
        assert_eq!(request.bucket.as_deref(), Some("bucket"));
        assert_eq!(request.key.as_deref(), Some("a/b.txt"));
        assert_eq!(request.query.get("partNumber").unwrap(), "1");
        assert_eq!(request.headers.get("content-type").unwrap(), "text/plain");
        assert_eq!(request.body.as_ref(), b"data");
        assert!(!request.is_head());
    }

    #[test]
    fn test_header_map() {
        let mut headers = BTreeMap::new();
        headers.insert("x-amz-date".to_string(), "20130524T000000Z".to_string());
        let map = header_map(&headers).unwrap();
        assert_eq!(header_value(&map, "x-amz-date").unwrap(), "20130524T000000Z");

        headers.insert("bad header".to_string(), "x".to_string());
        assert!(header_map(&headers).is_err());
    }
}
