pub mod actions;
pub mod bucket;
pub mod credentials;
pub mod endpoint;
pub mod error;
pub mod limits;
pub mod object;
pub mod options;
pub mod postpolicy;
pub mod presign;
pub mod region;
pub mod request;
pub mod responses;
pub mod signature;
pub mod sse;
pub mod tools;
pub mod types;

pub use self::{
    credentials::{Credentials, EnvProvider, Provider, StaticProvider},
    error::{Error, Result, ServiceError},
    object::GetObjectOptions,
    options::{Directive, ObjectOptions, Retention, RetentionMode},
    postpolicy::PostPolicy,
    presign::PresignOptions,
    region::RegionCache,
    request::Request,
    sse::Sse,
    types::{ObjectStat, ObjectWriteResult},
};

use crate::s3::{
    actions::Action,
    endpoint::BaseUrl,
    limits::DEFAULT_REGION,
    region::{classify_redirect, region_from_location},
    request::{header_map, header_value},
    responses::{ErrorResponse, LocationConstraint},
    signature::{UNSIGNED_PAYLOAD, amz_date, host_header, sign_v4},
    tools::{base64_md5, sha256_hex},
};
use chrono::Utc;
use reqwest::Response;
use std::sync::Arc;

const USER_AGENT: &str = concat!("s3kit/", env!("CARGO_PKG_VERSION"));

// Outcome of a failed request, `RetryHead` never leaves this module
#[derive(Debug)]
enum Failure {
    RetryHead(ServiceError),
    Error(Error),
}

impl From<Failure> for Error {
    fn from(failure: Failure) -> Self {
        match failure {
            Failure::RetryHead(err) => err.into(),
            Failure::Error(err) => err,
        }
    }
}

/// Client for an S3-compatible service.
///
/// Clones share the HTTP connection pool and the region cache.
#[derive(Debug, Clone)]
pub struct S3 {
    base_url: BaseUrl,
    provider: Option<Arc<dyn Provider>>,
    // region fixed at construction time
    region: Option<String>,
    regions: RegionCache,
    client: reqwest::Client,
    user_agent: String,
}

// Amazon S3 API Reference
// <https://docs.aws.amazon.com/AmazonS3/latest/API/API_Operations.html>
impl S3 {
    /// Anonymous clients pass no provider, requests are sent unsigned.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the endpoint is invalid or the HTTP client can not
    /// be built
    pub fn new(
        endpoint: &str,
        provider: Option<Arc<dyn Provider>>,
        region: Option<&str>,
    ) -> Result<Self> {
        let base_url = BaseUrl::parse(endpoint)?;

        let client = reqwest::Client::builder().build()?;

        Ok(Self {
            base_url,
            provider,
            region: region.filter(|r| !r.is_empty()).map(ToString::to_string),
            regions: RegionCache::new(),
            client,
            user_agent: USER_AGENT.to_string(),
        })
    }

    /// Share a region cache between clients
    #[must_use]
    pub fn with_region_cache(mut self, regions: RegionCache) -> Self {
        self.regions = regions;
        self
    }

    #[must_use]
    pub const fn region_cache(&self) -> &RegionCache {
        &self.regions
    }

    /// Region fixed at construction time
    #[must_use]
    pub fn fixed_region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    #[must_use]
    pub fn is_https(&self) -> bool {
        self.base_url.is_https()
    }

    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Append the application name and version to the `User-Agent`
    ///
    /// # Errors
    ///
    /// Will return `Err` if the name or version is empty
    pub fn set_app_info(&mut self, name: &str, version: &str) -> Result<()> {
        if name.trim().is_empty() || version.trim().is_empty() {
            return Err(Error::Validation(
                "application name/version cannot be empty".to_string(),
            ));
        }
        self.user_agent = format!("{USER_AGENT} {name}/{version}");
        Ok(())
    }

    /// Ask the provider for credentials, `None` for anonymous clients
    ///
    /// # Errors
    ///
    /// Will return `Err` if the provider fails
    pub fn credentials(&self) -> Result<Option<Credentials>> {
        self.provider
            .as_ref()
            .map(|provider| provider.retrieve())
            .transpose()
    }

    /// Resolve the region of a bucket
    ///
    /// # Errors
    ///
    /// Will return `Err` if `region` does not match the fixed region or the
    /// location lookup fails
    pub async fn get_region(&self, bucket: Option<&str>, region: Option<&str>) -> Result<String> {
        if let Some(region) = region.filter(|r| !r.is_empty()) {
            if let Some(fixed) = &self.region
                && fixed != region
            {
                return Err(Error::Validation(format!(
                    "region must be {fixed}, but passed {region}"
                )));
            }
            return Ok(region.to_string());
        }

        if let Some(fixed) = &self.region {
            return Ok(fixed.clone());
        }

        let Some(bucket) = bucket else {
            return Ok(DEFAULT_REGION.to_string());
        };

        if let Some(region) = self.regions.get(bucket) {
            return Ok(region);
        }

        if self.provider.is_none() {
            return Ok(DEFAULT_REGION.to_string());
        }

        // GetBucketLocation is answered from any region
        let request = actions::GetBucketLocation::new(bucket).to_request()?;
        let response = self
            .url_open(DEFAULT_REGION, &request)
            .await
            .map_err(Error::from)?;

        let body = response.text().await?;
        let location = if body.trim().is_empty() {
            LocationConstraint::default()
        } else {
            quick_xml::de::from_str::<LocationConstraint>(&body)?
        };

        let region = region_from_location(location.region.as_deref());
        self.regions.insert(bucket, &region);

        Ok(region)
    }

    /// Execute a request in the region of its bucket.
    ///
    /// A HEAD request against a cached bucket answered with a redirect is
    /// replayed once.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the request fails or the status is not a success
    pub async fn execute(&self, request: &Request) -> Result<Response> {
        let region = self.get_region(request.bucket.as_deref(), None).await?;

        match self.url_open(&region, request).await {
            Ok(response) => return Ok(response),
            Err(Failure::Error(err)) => return Err(err),
            Err(Failure::RetryHead(err)) => {
                log::warn!("replaying HEAD request: {err}");
            }
        }

        self.url_open(&region, request).await.map_err(Error::from)
    }

    /// Execute a request in a given region, without replay
    ///
    /// # Errors
    ///
    /// Will return `Err` if the request fails or the status is not a success
    pub async fn execute_in(&self, region: &str, request: &Request) -> Result<Response> {
        self.url_open(region, request).await.map_err(Error::from)
    }

    async fn url_open(
        &self,
        region: &str,
        request: &Request,
    ) -> std::result::Result<Response, Failure> {
        let response = self.send(region, request).await.map_err(Failure::Error)?;

        if matches!(response.status().as_u16(), 200 | 204 | 206) {
            return Ok(response);
        }

        Err(self.failure(request, response).await)
    }

    async fn send(&self, region: &str, request: &Request) -> Result<Response> {
        let credentials = self.credentials()?;

        let url = self.base_url.build(
            region,
            request.bucket.as_deref(),
            request.key.as_deref(),
            &request.query,
        )?;

        let mut headers = request.headers.clone();
        headers.insert("host".to_string(), host_header(&url));
        headers.insert("user-agent".to_string(), self.user_agent.clone());

        let md5_added = headers.contains_key("content-md5");
        let body = request.body.clone();

        let content_sha256 = if let Some(credentials) = &credentials {
            if let Some(token) = credentials.session_token() {
                headers.insert("x-amz-security-token".to_string(), token.to_string());
            }

            if self.base_url.is_https() {
                if !md5_added && !body.is_empty() {
                    headers.insert("content-md5".to_string(), base64_md5(&body));
                }
                Some(UNSIGNED_PAYLOAD.to_string())
            } else {
                let payload = body.clone();
                Some(tokio::task::spawn_blocking(move || sha256_hex(&payload)).await?)
            }
        } else {
            if !md5_added && !body.is_empty() {
                headers.insert("content-md5".to_string(), base64_md5(&body));
            }
            None
        };

        let date = Utc::now();
        headers.insert("x-amz-date".to_string(), amz_date(&date));

        if let (Some(credentials), Some(content_sha256)) = (&credentials, content_sha256) {
            headers.insert("x-amz-content-sha256".to_string(), content_sha256.clone());
            sign_v4(
                &request.method,
                &url,
                region,
                &mut headers,
                credentials,
                &content_sha256,
                &date,
            );
        }

        log::debug!("{} {url}", request.method);

        let mut builder = self
            .client
            .request(request.method.clone(), url)
            .headers(header_map(&headers)?);

        if !body.is_empty() {
            builder = builder.body(body);
        }

        Ok(builder.send().await?)
    }

    // Turn an error response into a `ServiceError`, a redirect signal or a
    // protocol error
    async fn failure(&self, request: &Request, response: Response) -> Failure {
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let content_type = header_value(&headers, "content-type").unwrap_or_default();

        let body = match response.text().await {
            Ok(body) => body,
            Err(err) => return Failure::Error(err.into()),
        };

        let is_xml = content_type
            .split(';')
            .any(|part| part.trim() == "application/xml");

        if !request.is_head() && (!is_xml || body.is_empty()) {
            return Failure::Error(Error::Protocol(format!(
                "status: {status}, content-type: {content_type}, body: {body}"
            )));
        }

        let bucket = request.bucket.as_deref();
        let object = request.key.as_deref();
        let mut retry_head = false;

        let error = if body.is_empty() {
            let (code, message) = match status {
                301 | 307 | 400 => {
                    let region = header_value(&headers, "x-amz-bucket-region");
                    let cached = bucket.is_some_and(|b| self.regions.contains(b));
                    match classify_redirect(status, region.as_deref(), request.is_head(), cached)
                    {
                        Some(redirect) => {
                            retry_head = redirect.retry_head;
                            (redirect.code, redirect.message)
                        }
                        None => return Failure::Error(unmapped_status(status)),
                    }
                }
                403 => ("AccessDenied", "Access denied".to_string()),
                404 => match (object, bucket) {
                    (Some(_), _) => ("NoSuchKey", "Object does not exist".to_string()),
                    (None, Some(_)) => ("NoSuchBucket", "Bucket does not exist".to_string()),
                    (None, None) => (
                        "ResourceNotFound",
                        "Request resource not found".to_string(),
                    ),
                },
                405 | 501 => (
                    "MethodNotAllowed",
                    "The specified method is not allowed against this resource".to_string(),
                ),
                409 => match bucket {
                    Some(_) => ("NoSuchBucket", "Bucket does not exist".to_string()),
                    None => (
                        "ResourceConflict",
                        "Request resource conflicts".to_string(),
                    ),
                },
                _ => return Failure::Error(unmapped_status(status)),
            };

            ServiceError {
                status,
                code: code.to_string(),
                message,
                resource: Some(resource(bucket, object)),
                request_id: header_value(&headers, "x-amz-request-id"),
                host_id: header_value(&headers, "x-amz-id-2"),
                bucket: bucket.map(ToString::to_string),
                object: object.map(ToString::to_string),
            }
        } else {
            match quick_xml::de::from_str::<ErrorResponse>(&body) {
                Ok(doc) => doc.into_service_error(status, bucket, object),
                Err(err) => return Failure::Error(err.into()),
            }
        };

        if let Some(bucket) = bucket
            && (retry_head || error.code == "NoSuchBucket")
        {
            self.regions.evict(bucket);
        }

        if retry_head {
            Failure::RetryHead(error)
        } else {
            Failure::Error(error.into())
        }
    }
}

fn unmapped_status(status: u16) -> Error {
    Error::Protocol(format!("server failed with HTTP status code {status}"))
}

fn resource(bucket: Option<&str>, object: Option<&str>) -> String {
    match (bucket, object) {
        (Some(bucket), Some(object)) => format!("/{bucket}/{object}"),
        (Some(bucket), None) => format!("/{bucket}"),
        _ => "/".to_string(),
    }
}
