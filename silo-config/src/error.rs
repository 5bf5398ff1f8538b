use thiserror::Error;

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while composing or applying a [`crate::ServerConfig`].
/// Kept separate from `silo_core::ContentError` — config
/// composition happens before a `Service` exists, so there is nothing yet
/// to report these as.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("unrecognized DATABASE_URL scheme: {0}")]
    UnknownDatabaseUrl(String),

    #[error("unrecognized STORAGE_URL scheme: {0}")]
    UnknownStorageUrl(String),

    #[error("postgres repository requested but no repository was supplied via with_repository; the Postgres driver is an external collaborator")]
    PostgresRepositoryNotSupplied,

    #[error("storage backend error during service startup: {0}")]
    Storage(#[from] silo_store::StoreError),

    #[error("service construction failed: {0}")]
    Service(#[from] silo_core::ContentError),
}
