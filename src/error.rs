use std::path::PathBuf;
use std::time::Duration;

use crate::params::OutputType;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A request field is missing or holds a value outside its domain.
    #[error("invalid parameter `{field}`: {reason}")]
    Validation { field: String, reason: String },

    /// The server answered with a non-2xx status. The body is not decoded.
    #[error("API request failed: HTTP {status} for url ({url})")]
    Http { status: u16, url: String },

    #[error("failed to decode response from {url}: {reason}")]
    Decode { url: String, reason: String },

    /// A helper needed a different response shape than the request produced.
    #[error("expected a {expected:?} response, got {actual:?}")]
    UnexpectedResponse {
        expected: OutputType,
        actual: OutputType,
    },

    /// The server reported a job failure.
    #[error("{0}")]
    Job(String),

    #[error("movie {id} did not finish before the timeout of {}s", .timeout.as_secs_f64())]
    JobTimeout { id: String, timeout: Duration },

    #[error("{} already exists; pass overwrite=true to replace it", .0.display())]
    FileExists(PathBuf),

    #[error("failed to write {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Connection, TLS or body-read failure reported by the transport.
    #[error(transparent)]
    Transport(#[from] anyhow::Error),
}

impl Error {
    pub(crate) fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// The field named by a validation error.
    pub fn field(&self) -> Option<&str> {
        match self {
            Error::Validation { field, .. } => Some(field),
            _ => None,
        }
    }

    /// The HTTP status of a failed request.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
