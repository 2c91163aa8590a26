//! Error types for the FGA SDK.

use std::path::PathBuf;

use fga_schema::{ErrorKind, SchemaError};
use thiserror::Error;

/// Errors surfaced by the SDK.
///
/// Decoding failures reach callers inside a `Failure` produced by
/// [`ResponseDecoder`](crate::ResponseDecoder); they are not raised.
#[derive(Debug, Error)]
pub enum SdkError {
    /// The response body is not structured data.
    #[error("response payload could not be decoded: {source}")]
    Response {
        #[source]
        source: serde_json::Error,
    },

    /// The payload does not match the schema of the requested type.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Configuration sources could not be merged or extracted.
    #[error("invalid configuration: {0}")]
    Config(#[from] Box<figment::Error>),

    /// An explicitly requested configuration file does not exist.
    #[error("configuration file not found: {}", path.display())]
    ConfigNotFound { path: PathBuf },

    /// Logging could not be installed.
    #[error("failed to initialize tracing: {0}")]
    Telemetry(String),
}

impl SdkError {
    /// Schema taxonomy of a [`SdkError::Schema`] error.
    #[must_use]
    pub fn schema_kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Schema(err) => Some(err.kind()),
            _ => None,
        }
    }

    /// Returns `true` if the payload itself was undecodable.
    #[must_use]
    pub const fn is_response(&self) -> bool {
        matches!(self, Self::Response { .. })
    }
}

impl From<figment::Error> for SdkError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}
