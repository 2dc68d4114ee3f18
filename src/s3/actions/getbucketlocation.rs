use crate::s3::actions::Action;
use reqwest::Method;
use std::collections::BTreeMap;

/// Sent by the client itself while resolving a bucket region
#[derive(Debug)]
pub struct GetBucketLocation<'a> {
    bucket: &'a str,
}

impl<'a> GetBucketLocation<'a> {
    #[must_use]
    pub const fn new(bucket: &'a str) -> Self {
        Self { bucket }
    }
}

// https://docs.aws.amazon.com/AmazonS3/latest/API/API_GetBucketLocation.html
impl Action for GetBucketLocation<'_> {
    fn http_method(&self) -> Method {
        Method::GET
    }

    fn bucket(&self) -> &str {
        self.bucket
    }

    fn query_pairs(&self) -> Option<BTreeMap<&str, &str>> {
        let mut map: BTreeMap<&str, &str> = BTreeMap::new();
        map.insert("location", "");
        Some(map)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_to_request() {
        let request = GetBucketLocation::new("bucket").to_request().unwrap();
        assert_eq!(request.method, Method::GET);
        assert_eq!(request.query.get("location").unwrap(), "");
        assert_eq!(request.key, None);
    }
}
