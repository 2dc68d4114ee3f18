//! Endpoint parsing and request URL building (path-style addressing)

use crate::s3::{
    error::{Error, Result},
    signature::{canonical_query_string, encode_path},
};
use std::collections::BTreeMap;
use url::Url;

#[derive(Debug, Clone)]
pub struct BaseUrl {
    url: Url,
    aws: bool,
}

impl BaseUrl {
    /// Parse an endpoint, `https` is assumed when no scheme is given
    ///
    /// # Errors
    ///
    /// Will return `Err` if the endpoint is not a valid http(s) URL without
    /// path or query
    pub fn parse(endpoint: &str) -> Result<Self> {
        let endpoint = if endpoint.contains("://") {
            endpoint.to_string()
        } else {
            format!("https://{endpoint}")
        };

        let url = Url::parse(&endpoint)?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::Validation(format!(
                "scheme must be http or https: {endpoint}"
            )));
        }

        if url.host_str().is_none_or(str::is_empty) {
            return Err(Error::Validation(format!("missing host: {endpoint}")));
        }

        if url.path() != "/" || url.query().is_some() {
            return Err(Error::Validation(format!(
                "path or query is not allowed in endpoint: {endpoint}"
            )));
        }

        let aws = url
            .host_str()
            .is_some_and(|host| host.ends_with(".amazonaws.com"));

        Ok(Self { url, aws })
    }

    #[must_use]
    pub fn is_https(&self) -> bool {
        self.url.scheme() == "https"
    }

    #[must_use]
    pub const fn is_aws(&self) -> bool {
        self.aws
    }

    #[must_use]
    pub fn host(&self) -> &str {
        self.url.host_str().unwrap_or_default()
    }

    /// Build the URL of a request, `key` is encoded keeping `/`
    ///
    /// # Errors
    ///
    /// Will return `Err` if the regional host can not be set
    pub fn build(
        &self,
        region: &str,
        bucket: Option<&str>,
        key: Option<&str>,
        query: &BTreeMap<String, String>,
    ) -> Result<Url> {
        let mut url = self.url.clone();

        // s3.amazonaws.com and s3.<region>.amazonaws.com route by region
        if self.aws && self.host().starts_with("s3.") {
            url.set_host(Some(&format!("s3.{region}.amazonaws.com")))?;
        }

        let mut path = String::from("/");
        if let Some(bucket) = bucket {
            path.push_str(bucket);
            if let Some(key) = key {
                path.push('/');
                path.push_str(&encode_path(key));
            }
        }
        url.set_path(&path);

        if query.is_empty() {
            url.set_query(None);
        } else {
            url.set_query(Some(&canonical_query_string(
                query.iter().map(|(k, v)| (k.as_str(), v.as_str())),
            )));
        }

        Ok(url)
    }
}
