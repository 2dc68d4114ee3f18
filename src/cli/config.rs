use crate::s3::{Credentials, EnvProvider, Provider, S3, StaticProvider};
use anyhow::{Context, Result};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::{collections::BTreeMap, fs::File, path::Path, sync::Arc};

#[derive(Debug, Deserialize)]
pub struct Config {
    pub hosts: BTreeMap<String, Host>,
}

#[derive(Debug, Deserialize)]
pub struct Host {
    pub endpoint: Option<String>,
    /// Fixes the region of every bucket on this host
    pub region: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<SecretString>,
    pub session_token: Option<SecretString>,
}

impl Config {
    /// # Errors
    ///
    /// Will return `Err` if the file can not be read or parsed
    pub fn new(config_path: &Path) -> Result<Self> {
        let file = File::open(config_path)
            .with_context(|| format!("unable to open: {}", config_path.display()))?;

        let config: Self =
            serde_yaml_ng::from_reader(file).context("unable to parse config file")?;

        Ok(config)
    }

    /// Get the host from the config.yml
    ///
    /// # Errors
    ///
    /// Will return `Err` if the host is not defined
    pub fn get_host(&self, name: &str) -> Result<&Host> {
        self.hosts
            .get(name)
            .with_context(|| format!("could not find host {name}"))
    }
}

impl Host {
    /// AWS when no endpoint is set
    #[must_use]
    pub fn endpoint(&self) -> &str {
        self.endpoint.as_deref().unwrap_or("s3.amazonaws.com")
    }

    /// Build a client, keys in the config win over the environment
    ///
    /// # Errors
    ///
    /// Will return `Err` if the endpoint is invalid
    pub fn client(&self, anonymous: bool) -> Result<S3> {
        let provider: Option<Arc<dyn Provider>> = if anonymous {
            None
        } else {
            match (&self.access_key, &self.secret_key) {
                (Some(key), Some(secret)) if !secret.expose_secret().is_empty() => {
                    let mut credentials = Credentials::new(key, secret);
                    if let Some(token) = &self.session_token {
                        credentials = credentials.with_session_token(token);
                    }
                    Some(Arc::new(StaticProvider::new(credentials)))
                }
                _ => Some(Arc::new(EnvProvider)),
            }
        };

        Ok(S3::new(self.endpoint(), provider, self.region.as_deref())?)
    }
}
