//! The closed error taxonomy for the content service.
//!
//! Each variant carries a stable kind, a status-code mapping, and a
//! "safe for clients" projection, with the kinds themselves coming
//! straight from the content service's error design rather than a generic
//! REST framework's error classes.

use thiserror::Error;

/// Result alias used throughout the `silo-*` crates once an error has been
/// normalized into the closed taxonomy.
pub type ContentResult<T> = Result<T, ContentError>;

/// The closed set of error kinds a caller of the content service can see.
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("content not found: {id}")]
    ContentNotFound { id: String },

    #[error("object not found: {id}")]
    ObjectNotFound { id: String },

    #[error("invalid content status: {status}")]
    InvalidContentStatus { status: String },

    #[error("invalid object status: {status}")]
    InvalidObjectStatus { status: String },

    #[error("storage backend not registered: {name}")]
    StorageBackendNotFound { name: String },

    #[error("operation not supported by this backend")]
    UnsupportedOperation,

    #[error("invalid signature")]
    InvalidSignature,

    #[error("signature expired")]
    SignatureExpired,

    #[error("missing signature")]
    MissingSignature,

    #[error("missing expiration")]
    MissingExpiration,

    #[error("invalid expiration")]
    InvalidExpiration,

    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    #[error("backend I/O error: {message}")]
    BackendIo {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl ContentError {
    pub fn content_not_found<S: Into<String>>(id: S) -> Self {
        Self::ContentNotFound { id: id.into() }
    }

    pub fn object_not_found<S: Into<String>>(id: S) -> Self {
        Self::ObjectNotFound { id: id.into() }
    }

    pub fn invalid_content_status<S: Into<String>>(status: S) -> Self {
        Self::InvalidContentStatus {
            status: status.into(),
        }
    }

    pub fn invalid_object_status<S: Into<String>>(status: S) -> Self {
        Self::InvalidObjectStatus {
            status: status.into(),
        }
    }

    pub fn storage_backend_not_found<S: Into<String>>(name: S) -> Self {
        Self::StorageBackendNotFound { name: name.into() }
    }

    pub fn invalid_input<S: Into<String>>(message: S) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub fn backend_io<S: Into<String>>(message: S) -> Self {
        Self::BackendIo {
            message: message.into(),
            source: None,
        }
    }

    pub fn backend_io_from<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::BackendIo {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Stable identifier for logs/metrics, independent of the Display message.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::ContentNotFound { .. } => "ContentNotFound",
            Self::ObjectNotFound { .. } => "ObjectNotFound",
            Self::InvalidContentStatus { .. } => "InvalidContentStatus",
            Self::InvalidObjectStatus { .. } => "InvalidObjectStatus",
            Self::StorageBackendNotFound { .. } => "StorageBackendNotFound",
            Self::UnsupportedOperation => "UnsupportedOperation",
            Self::InvalidSignature => "InvalidSignature",
            Self::SignatureExpired => "SignatureExpired",
            Self::MissingSignature => "MissingSignature",
            Self::MissingExpiration => "MissingExpiration",
            Self::InvalidExpiration => "InvalidExpiration",
            Self::InvalidInput { .. } => "InvalidInput",
            Self::BackendIo { .. } => "BackendIO",
        }
    }

    /// The HTTP status an external transport should map this to.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::ContentNotFound { .. } | Self::ObjectNotFound { .. } => 404,
            Self::InvalidContentStatus { .. }
            | Self::InvalidObjectStatus { .. }
            | Self::InvalidInput { .. }
            | Self::InvalidExpiration
            | Self::MissingExpiration => 400,
            Self::MissingSignature => 401,
            Self::SignatureExpired | Self::InvalidSignature => 403,
            Self::StorageBackendNotFound { .. } | Self::UnsupportedOperation => 400,
            Self::BackendIo { .. } => 500,
        }
    }
}
