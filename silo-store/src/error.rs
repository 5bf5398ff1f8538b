//! Leaf error type for blob storage backends. Converts into
//! `silo_core::ContentError` at the crate boundary, wrapping backend
//! errors via `StoreError::io(...)`.

use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("object not found: {key}")]
    NotFound { key: String },

    #[error("invalid object key: {key}: {reason}")]
    InvalidKey { key: String, reason: String },

    #[error("operation not supported by this backend")]
    Unsupported,

    #[error("backend I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl StoreError {
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    pub fn invalid_key(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidKey {
            key: key.into(),
            reason: reason.into(),
        }
    }

    pub fn io<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Io {
            message: message.into(),
            source: Box::new(source),
        }
    }
}

impl From<StoreError> for silo_core::ContentError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { key } => silo_core::ContentError::object_not_found(key),
            StoreError::InvalidKey { key, reason } => {
                silo_core::ContentError::invalid_input(format!("invalid object key {key}: {reason}"))
            }
            StoreError::Unsupported => silo_core::ContentError::UnsupportedOperation,
            StoreError::Io { message, source } => {
                silo_core::ContentError::backend_io_from(message, AnyhowCompat(source))
            }
        }
    }
}

/// Bridges a boxed `std::error::Error` back into a concrete type so it can
/// be threaded through `ContentError::backend_io_from`'s generic bound.
#[derive(Debug)]
struct AnyhowCompat(Box<dyn std::error::Error + Send + Sync>);

impl std::fmt::Display for AnyhowCompat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for AnyhowCompat {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}
