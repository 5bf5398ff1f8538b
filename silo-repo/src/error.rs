use thiserror::Error;

pub type RepoResult<T> = Result<T, RepoError>;

/// Leaf error for repository implementations. Converts into
/// `silo_core::ContentError` at the crate boundary, same shape as
/// `silo_store::StoreError`.
#[derive(Error, Debug)]
pub enum RepoError {
    #[error("content not found: {id}")]
    ContentNotFound { id: String },

    #[error("object not found: {id}")]
    ObjectNotFound { id: String },

    #[error("duplicate object key for backend {backend}: {key}")]
    DuplicateObjectKey { backend: String, key: String },

    #[error("invalid input: {message}")]
    InvalidInput { message: String },
}

impl RepoError {
    pub fn content_not_found(id: impl Into<String>) -> Self {
        Self::ContentNotFound { id: id.into() }
    }

    pub fn object_not_found(id: impl Into<String>) -> Self {
        Self::ObjectNotFound { id: id.into() }
    }

    pub fn duplicate_object_key(backend: impl Into<String>, key: impl Into<String>) -> Self {
        Self::DuplicateObjectKey {
            backend: backend.into(),
            key: key.into(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}

impl From<RepoError> for silo_core::ContentError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::ContentNotFound { id } => silo_core::ContentError::content_not_found(id),
            RepoError::ObjectNotFound { id } => silo_core::ContentError::object_not_found(id),
            RepoError::DuplicateObjectKey { backend, key } => silo_core::ContentError::invalid_input(
                format!("object key {key} already in use on backend {backend}"),
            ),
            RepoError::InvalidInput { message } => silo_core::ContentError::invalid_input(message),
        }
    }
}
