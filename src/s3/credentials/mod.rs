use crate::s3::error::{Error, Result};
use secrecy::{ExposeSecret, SecretString};
use std::{env, fmt::Debug};

#[derive(Clone, Debug)]
pub struct Credentials {
    // AWS_ACCESS_KEY_ID
    key: String,
    // AWS_SECRET_ACCESS_KEY
    secret: SecretString,
    // AWS_SESSION_TOKEN
    session_token: Option<SecretString>,
}

impl Credentials {
    #[must_use]
    pub fn new(access: &str, secret: &SecretString) -> Self {
        Self {
            key: access.to_string(),
            secret: secret.clone(),
            session_token: None,
        }
    }

    #[must_use]
    pub fn with_session_token(mut self, token: &SecretString) -> Self {
        self.session_token = Some(token.clone());
        self
    }

    /// Get a reference to the access key ID.
    #[must_use]
    pub fn aws_access_key_id(&self) -> &str {
        &self.key
    }

    /// Get a reference to the secret access key.
    #[must_use]
    pub fn aws_secret_access_key(&self) -> &str {
        self.secret.expose_secret()
    }

    #[must_use]
    pub fn session_token(&self) -> Option<&str> {
        self.session_token.as_ref().map(ExposeSecret::expose_secret)
    }
}

/// Supplies credentials on demand. Implementations may return different values
/// between calls, the client asks again for every request.
pub trait Provider: Debug + Send + Sync {
    /// # Errors
    ///
    /// Will return `Err` if no credentials are available
    fn retrieve(&self) -> Result<Credentials>;
}

/// Always returns the same credentials
#[derive(Debug, Clone)]
pub struct StaticProvider {
    credentials: Credentials,
}

impl StaticProvider {
    #[must_use]
    pub const fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }
}

impl Provider for StaticProvider {
    fn retrieve(&self) -> Result<Credentials> {
        Ok(self.credentials.clone())
    }
}

/// Reads `AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY` and `AWS_SESSION_TOKEN`
/// on every call
#[derive(Debug, Clone, Default)]
pub struct EnvProvider;

impl Provider for EnvProvider {
    fn retrieve(&self) -> Result<Credentials> {
        let key = env::var("AWS_ACCESS_KEY_ID")
            .map_err(|_| Error::Credentials("AWS_ACCESS_KEY_ID is not set".to_string()))?;
        let secret = env::var("AWS_SECRET_ACCESS_KEY")
            .map_err(|_| Error::Credentials("AWS_SECRET_ACCESS_KEY is not set".to_string()))?;

        let credentials = Credentials::new(&key, &SecretString::new(secret.into()));

        Ok(match env::var("AWS_SESSION_TOKEN") {
            Ok(token) if !token.is_empty() => {
                credentials.with_session_token(&SecretString::new(token.into()))
            }
            _ => credentials,
        })
    }
}
