use std::fmt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Caller supplied arguments violate a precondition, raised before any
    /// request is sent whenever possible.
    #[error("invalid argument: {0}")]
    Validation(String),

    /// The response did not have the expected wire shape.
    #[error("invalid response: {0}")]
    Protocol(String),

    /// The service answered with an error code.
    #[error(transparent)]
    Service(Box<ServiceError>),

    #[error("credentials: {0}")]
    Credentials(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    #[error("task error: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl Error {
    /// The service error code, if this error came from the service
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Service(e) => Some(&e.code),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<ServiceError> for Error {
    fn from(err: ServiceError) -> Self {
        Self::Service(Box::new(err))
    }
}

impl From<quick_xml::DeError> for Error {
    fn from(err: quick_xml::DeError) -> Self {
        Self::Protocol(format!("XML parse error: {err}"))
    }
}

impl From<quick_xml::SeError> for Error {
    fn from(err: quick_xml::SeError) -> Self {
        Self::Protocol(format!("XML write error: {err}"))
    }
}

/// Error returned by the service, either parsed from the `<Error>` document or
/// synthesized from the HTTP status when the body is empty (HEAD requests).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceError {
    pub status: u16,
    pub code: String,
    pub message: String,
    pub resource: Option<String>,
    pub request_id: Option<String>,
    pub host_id: Option<String>,
    pub bucket: Option<String>,
    pub object: Option<String>,
}

impl std::error::Error for ServiceError {}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S3 operation failed; code: {}, message: {}", self.code, self.message)?;
        if let Some(resource) = &self.resource {
            write!(f, ", resource: {resource}")?;
        }
        if let Some(request_id) = &self.request_id {
            write!(f, ", request_id: {request_id}")?;
        }
        if let Some(bucket) = &self.bucket {
            write!(f, ", bucket: {bucket}")?;
        }
        if let Some(object) = &self.object {
            write!(f, ", object: {object}")?;
        }
        Ok(())
    }
}
