use anyhow::{Result, anyhow};
use colored::Colorize;

/// `<host>/<bucket>/<key>` as written on the command line
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct S3Location {
    pub host: String,
    pub bucket: String,
    pub key: String,
}

impl S3Location {
    /// # Errors
    ///
    /// Will return `Err` if the host, bucket or key is missing
    pub fn parse(location: &str) -> Result<Self> {
        let parts: Vec<&str> = location.splitn(3, '/').collect();

        let host = parts
            .first()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| anyhow!("host cannot be empty"))?;

        let bucket = parts.get(1).filter(|b| !b.is_empty()).ok_or_else(|| {
            anyhow!(
                "bucket name missing, expected format: <s3 provider>/{}/key",
                "<bucket name>".red()
            )
        })?;

        let key = parts.get(2).filter(|k| !k.is_empty()).ok_or_else(|| {
            anyhow!(
                "object name missing, expected format: <s3 provider>/<bucket>/{}",
                "<object name>".red()
            )
        })?;

        if key.starts_with('/') {
            return Err(anyhow!("please remove leading slashes from key"));
        }

        Ok(Self {
            host: (*host).to_string(),
            bucket: (*bucket).to_string(),
            key: (*key).to_string(),
        })
    }
}
