//! Options shared by every object write: metadata, encryption, tags,
//! retention and legal hold.

use crate::s3::{
    error::{Error, Result},
    signature::encode_value,
    sse::Sse,
};
use chrono::{DateTime, SecondsFormat, Utc};
use std::{collections::BTreeMap, fmt};

// headers sent as they are, anything else becomes x-amz-meta-*
const STANDARD_HEADERS: [&str; 6] = [
    "cache-control",
    "content-disposition",
    "content-encoding",
    "content-language",
    "content-type",
    "expires",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetentionMode {
    Governance,
    Compliance,
}

impl fmt::Display for RetentionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Governance => write!(f, "GOVERNANCE"),
            Self::Compliance => write!(f, "COMPLIANCE"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Retention {
    pub mode: RetentionMode,
    pub retain_until: DateTime<Utc>,
}

/// How `CopyObject` treats metadata or tags of the source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    Copy,
    Replace,
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Copy => write!(f, "COPY"),
            Self::Replace => write!(f, "REPLACE"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ObjectOptions {
    pub metadata: BTreeMap<String, String>,
    pub sse: Option<Sse>,
    pub tags: BTreeMap<String, String>,
    pub retention: Option<Retention>,
    pub legal_hold: bool,
}

impl ObjectOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_metadata(mut self, key: &str, value: &str) -> Self {
        self.metadata.insert(key.to_string(), value.to_string());
        self
    }

    #[must_use]
    pub fn with_sse(mut self, sse: Sse) -> Self {
        self.sse = Some(sse);
        self
    }

    #[must_use]
    pub fn with_tag(mut self, key: &str, value: &str) -> Self {
        self.tags.insert(key.to_string(), value.to_string());
        self
    }

    #[must_use]
    pub const fn with_retention(mut self, retention: Retention) -> Self {
        self.retention = Some(retention);
        self
    }

    #[must_use]
    pub const fn with_legal_hold(mut self, legal_hold: bool) -> Self {
        self.legal_hold = legal_hold;
        self
    }

    /// Check the options against the connection before anything is sent
    ///
    /// # Errors
    ///
    /// Will return `Err` if SSE-C is requested over plain HTTP or a metadata
    /// key is empty
    pub fn validate(&self, is_https: bool) -> Result<()> {
        if let Some(sse) = &self.sse
            && sse.requires_tls()
            && !is_https
        {
            return Err(Error::Validation(
                "SSE-C operations must be performed over a secure connection".to_string(),
            ));
        }

        if self.metadata.keys().any(|k| k.trim().is_empty()) {
            return Err(Error::Validation("metadata key cannot be empty".to_string()));
        }

        Ok(())
    }

    /// SSE-C headers, replayed on every part upload
    #[must_use]
    pub fn ssec_headers(&self) -> BTreeMap<String, String> {
        match &self.sse {
            Some(sse) if sse.is_customer_key() => sse.headers(),
            _ => BTreeMap::new(),
        }
    }

    /// Headers for `PutObject`, `CreateMultipartUpload` and `CopyObject`
    #[must_use]
    pub fn headers(&self) -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();

        for (key, value) in &self.metadata {
            let key = key.to_ascii_lowercase();
            if key.starts_with("x-amz-") || STANDARD_HEADERS.contains(&key.as_str()) {
                map.insert(key, value.clone());
            } else {
                map.insert(format!("x-amz-meta-{key}"), value.clone());
            }
        }

        if let Some(sse) = &self.sse {
            map.extend(sse.headers());
        }

        if !self.tags.is_empty() {
            let tagging = self
                .tags
                .iter()
                .map(|(k, v)| format!("{}={}", encode_value(k), encode_value(v)))
                .collect::<Vec<String>>()
                .join("&");
            map.insert("x-amz-tagging".to_string(), tagging);
        }

        if let Some(retention) = &self.retention {
            map.insert(
                "x-amz-object-lock-mode".to_string(),
                retention.mode.to_string(),
            );
            map.insert(
                "x-amz-object-lock-retain-until-date".to_string(),
                retention
                    .retain_until
                    .to_rfc3339_opts(SecondsFormat::Millis, true),
            );
        }

        if self.legal_hold {
            map.insert(
                "x-amz-object-lock-legal-hold".to_string(),
                "ON".to_string(),
            );
        }

        map
    }
}
