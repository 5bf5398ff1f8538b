//! silo-config: functional-option configuration and service wiring.
//! [`ServerConfig::build`] composes a list of `With*` options left
//! to right into a validated config; [`build_service`] walks that config
//! and produces a fully wired [`silo_service::Service`].

mod build;
mod config;
mod error;

pub use build::{build_service, build_service_from_config};
pub use config::{
    with_aws_credentials, with_backend, with_database_url, with_default_backend, with_env,
    with_environment, with_key_generator, with_port, with_repository, with_signer_expiry,
    with_signer_secret, with_storage_url, with_url_strategy, ConfigOption, DatabaseBackend,
    KeyGeneratorKind, ServerConfig, StorageBackendKind, UrlStrategyKind,
};
pub use error::{ConfigError, ConfigResult};
