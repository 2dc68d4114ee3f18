//! Server-side encryption
//! <https://docs.aws.amazon.com/AmazonS3/latest/userguide/serv-side-encryption.html>

use crate::s3::tools::{base64, base64_md5};
use std::{collections::BTreeMap, fmt};

#[derive(Clone, PartialEq, Eq)]
pub enum Sse {
    /// SSE-S3, keys managed by the service
    S3,
    /// SSE-KMS, `context` is the JSON encryption context
    Kms {
        key_id: String,
        context: Option<String>,
    },
    /// SSE-C, the 256-bit key travels with every request
    CustomerKey([u8; 32]),
}

impl fmt::Debug for Sse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::S3 => write!(f, "Sse::S3"),
            Self::Kms { key_id, .. } => write!(f, "Sse::Kms({key_id})"),
            Self::CustomerKey(_) => write!(f, "Sse::CustomerKey(****)"),
        }
    }
}

impl Sse {
    /// SSE-C needs TLS
    #[must_use]
    pub const fn requires_tls(&self) -> bool {
        matches!(self, Self::CustomerKey(_))
    }

    #[must_use]
    pub const fn is_customer_key(&self) -> bool {
        matches!(self, Self::CustomerKey(_))
    }

    /// Headers for writes
    #[must_use]
    pub fn headers(&self) -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();
        match self {
            Self::S3 => {
                map.insert(
                    "x-amz-server-side-encryption".to_string(),
                    "AES256".to_string(),
                );
            }
            Self::Kms { key_id, context } => {
                map.insert(
                    "x-amz-server-side-encryption".to_string(),
                    "aws:kms".to_string(),
                );
                map.insert(
                    "x-amz-server-side-encryption-aws-kms-key-id".to_string(),
                    key_id.clone(),
                );
                if let Some(context) = context {
                    map.insert(
                        "x-amz-server-side-encryption-context".to_string(),
                        base64(context),
                    );
                }
            }
            Self::CustomerKey(key) => {
                customer_key_headers(&mut map, "x-amz-server-side-encryption-customer", key);
            }
        }
        map
    }

    /// Headers describing the key of a copy source, only SSE-C has any
    #[must_use]
    pub fn copy_headers(&self) -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();
        if let Self::CustomerKey(key) = self {
            customer_key_headers(
                &mut map,
                "x-amz-copy-source-server-side-encryption-customer",
                key,
            );
        }
        map
    }
}

fn customer_key_headers(map: &mut BTreeMap<String, String>, prefix: &str, key: &[u8; 32]) {
    map.insert(format!("{prefix}-algorithm"), "AES256".to_string());
    map.insert(format!("{prefix}-key"), base64(key));
    map.insert(format!("{prefix}-key-md5"), base64_md5(key));
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_sse_s3() {
        let headers = Sse::S3.headers();
        assert_eq!(headers.get("x-amz-server-side-encryption").unwrap(), "AES256");
        assert!(Sse::S3.copy_headers().is_empty());
        assert!(!Sse::S3.requires_tls());
    }

    #[test]
    fn test_sse_kms() {
        let sse = Sse::Kms {
            key_id: "my-key".to_string(),
            context: Some(r#"{"a":"b"}"#.to_string()),
        };
        let headers = sse.headers();
        assert_eq!(headers.get("x-amz-server-side-encryption").unwrap(), "aws:kms");
        assert_eq!(
            headers.get("x-amz-server-side-encryption-aws-kms-key-id").unwrap(),
            "my-key"
        );
        assert_eq!(
            headers.get("x-amz-server-side-encryption-context").unwrap(),
            "eyJhIjoiYiJ9"
        );
    }

    #[test]
    fn test_sse_customer_key() {
        let sse = Sse::CustomerKey([7; 32]);
        assert!(sse.requires_tls());

        let headers = sse.headers();
        assert_eq!(
            headers
                .get("x-amz-server-side-encryption-customer-algorithm")
                .unwrap(),
            "AES256"
        );
        assert_eq!(
            headers.get("x-amz-server-side-encryption-customer-key").unwrap(),
            &base64([7; 32])
        );
        assert_eq!(
            headers
                .get("x-amz-server-side-encryption-customer-key-md5")
                .unwrap(),
            &base64_md5([7; 32])
        );

        let copy = sse.copy_headers();
        assert_eq!(copy.len(), 3);
        assert!(copy.contains_key("x-amz-copy-source-server-side-encryption-customer-key"));
    }

    #[test]
    fn test_debug_hides_key() {
        let debug = format!("{:?}", Sse::CustomerKey([65; 32]));
        assert!(!debug.contains("65"));
        assert!(!debug.contains(&base64([65; 32])));
    }
}
