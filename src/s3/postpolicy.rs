//! Browser-based uploads with a signed POST policy
//! <https://docs.aws.amazon.com/AmazonS3/latest/API/sigv4-HTTPPOSTConstructPolicy.html>

use crate::s3::{
    S3,
    credentials::Credentials,
    error::{Error, Result},
    signature::{ALGORITHM, amz_date, credential, post_presign_v4},
    tools::base64,
};
use chrono::{DateTime, Utc};
use serde_json::{Value, json};
use std::collections::BTreeMap;

// form fields filled in when the policy is signed
const RESERVED: [&str; 6] = [
    "bucket",
    "policy",
    "x-amz-algorithm",
    "x-amz-credential",
    "x-amz-date",
    "x-amz-signature",
];

fn element_name(element: &str) -> Result<String> {
    let name = element.trim_start_matches('$').to_lowercase();
    if name.is_empty() {
        return Err(Error::Validation("condition element cannot be empty".to_string()));
    }
    if RESERVED.contains(&name.as_str()) {
        return Err(Error::Validation(format!(
            "{name} is set when the policy is signed"
        )));
    }
    Ok(name)
}

/// Conditions a browser upload must satisfy before `expiration`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostPolicy {
    bucket: String,
    expiration: DateTime<Utc>,
    equals: BTreeMap<String, String>,
    starts_with: BTreeMap<String, String>,
    content_length_range: Option<(u64, u64)>,
}

impl PostPolicy {
    /// # Errors
    ///
    /// Will return `Err` if the bucket name is empty
    pub fn new(bucket: &str, expiration: DateTime<Utc>) -> Result<Self> {
        if bucket.is_empty() {
            return Err(Error::Validation("bucket name cannot be empty".to_string()));
        }
        Ok(Self {
            bucket: bucket.to_string(),
            expiration,
            equals: BTreeMap::new(),
            starts_with: BTreeMap::new(),
            content_length_range: None,
        })
    }

    #[must_use]
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// `["eq", "$element", "value"]`
    ///
    /// # Errors
    ///
    /// Will return `Err` if the element is empty or reserved
    pub fn add_equals_condition(&mut self, element: &str, value: &str) -> Result<()> {
        let name = element_name(element)?;
        self.starts_with.remove(&name);
        self.equals.insert(name, value.to_string());
        Ok(())
    }

    pub fn remove_equals_condition(&mut self, element: &str) {
        self.equals
            .remove(&element.trim_start_matches('$').to_lowercase());
    }

    /// `["starts-with", "$element", "prefix"]`, an empty prefix accepts any
    /// value
    ///
    /// # Errors
    ///
    /// Will return `Err` if the element is empty or reserved
    pub fn add_starts_with_condition(&mut self, element: &str, prefix: &str) -> Result<()> {
        let name = element_name(element)?;
        if name == "success_action_status" {
            return Err(Error::Validation(format!(
                "{name} only supports equality"
            )));
        }
        self.equals.remove(&name);
        self.starts_with.insert(name, prefix.to_string());
        Ok(())
    }

    pub fn remove_starts_with_condition(&mut self, element: &str) {
        self.starts_with
            .remove(&element.trim_start_matches('$').to_lowercase());
    }

    /// Accepted size of the uploaded file, bounds inclusive
    ///
    /// # Errors
    ///
    /// Will return `Err` if `lower` is greater than `upper`
    pub fn add_content_length_range_condition(&mut self, lower: u64, upper: u64) -> Result<()> {
        if lower > upper {
            return Err(Error::Validation(format!(
                "content length range {lower}-{upper}: lower bound is greater than upper bound"
            )));
        }
        self.content_length_range = Some((lower, upper));
        Ok(())
    }

    pub fn remove_content_length_range_condition(&mut self) {
        self.content_length_range = None;
    }

    /// # Errors
    ///
    /// Will return `Err` if the key is empty
    pub fn set_key(&mut self, key: &str) -> Result<()> {
        if key.is_empty() {
            return Err(Error::Validation("object name cannot be empty".to_string()));
        }
        self.add_equals_condition("key", key)
    }

    /// # Errors
    ///
    /// Will return `Err` if the key condition can not be added
    pub fn set_key_starts_with(&mut self, prefix: &str) -> Result<()> {
        self.add_starts_with_condition("key", prefix)
    }

    /// # Errors
    ///
    /// Will return `Err` if the content type condition can not be added
    pub fn set_content_type(&mut self, content_type: &str) -> Result<()> {
        self.add_equals_condition("Content-Type", content_type)
    }

    fn document(&self, credentials: &Credentials, region: &str, date: &DateTime<Utc>) -> Value {
        let mut conditions = vec![json!(["eq", "$bucket", self.bucket])];

        conditions.extend(
            self.equals
                .iter()
                .map(|(name, value)| json!(["eq", format!("${name}"), value])),
        );
        conditions.extend(
            self.starts_with
                .iter()
                .map(|(name, prefix)| json!(["starts-with", format!("${name}"), prefix])),
        );

        if let Some((lower, upper)) = self.content_length_range {
            conditions.push(json!(["content-length-range", lower, upper]));
        }

        conditions.push(json!(["eq", "$x-amz-algorithm", ALGORITHM]));
        conditions.push(json!([
            "eq",
            "$x-amz-credential",
            credential(credentials, date, region)
        ]));
        if let Some(token) = credentials.session_token() {
            conditions.push(json!(["eq", "$x-amz-security-token", token]));
        }
        conditions.push(json!(["eq", "$x-amz-date", amz_date(date)]));

        json!({
            "expiration": self.expiration.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
            "conditions": conditions,
        })
    }

    /// Form fields to send along with the file: the base64 policy, its
    /// signature and the signing parameters it names
    ///
    /// # Errors
    ///
    /// Will return `Err` if the policy document can not be serialized
    pub fn form_data(
        &self,
        credentials: &Credentials,
        region: &str,
        date: &DateTime<Utc>,
    ) -> Result<BTreeMap<String, String>> {
        let document = serde_json::to_string(&self.document(credentials, region, date))
            .map_err(|e| Error::Protocol(format!("policy document: {e}")))?;

        log::trace!("post policy: {document}");

        let policy = base64(document);
        let signature = post_presign_v4(&policy, credentials, date, region);

        let mut form = BTreeMap::new();
        form.insert("x-amz-algorithm".to_string(), ALGORITHM.to_string());
        form.insert(
            "x-amz-credential".to_string(),
            credential(credentials, date, region),
        );
        form.insert("x-amz-date".to_string(), amz_date(date));
        if let Some(token) = credentials.session_token() {
            form.insert("x-amz-security-token".to_string(), token.to_string());
        }
        form.insert("policy".to_string(), policy);
        form.insert("x-amz-signature".to_string(), signature);
        Ok(form)
    }
}

impl S3 {
    /// Sign a POST policy for the bucket region, the returned fields go into
    /// the upload form
    ///
    /// # Errors
    ///
    /// Will return `Err` if the client is anonymous or the region can not be
    /// resolved
    pub async fn presigned_post_policy(
        &self,
        policy: &PostPolicy,
    ) -> Result<BTreeMap<String, String>> {
        let Some(credentials) = self.credentials()? else {
            return Err(Error::Credentials(
                "anonymous access does not require a presigned post policy".to_string(),
            ));
        };

        let region = self.get_region(Some(policy.bucket()), None).await?;

        log::debug!("presigning post policy for bucket {}", policy.bucket());

        policy.form_data(&credentials, &region, &Utc::now())
    }
}
