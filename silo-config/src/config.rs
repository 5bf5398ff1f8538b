//! `ServerConfig` plus its functional options. Each `with_*`
//! helper is a pure `Fn(&mut ServerConfig) -> Result<(), ConfigError>`
//! closure — the Rust idiom for Go's `func(*Config) error` options —
//! applied left to right by
//! [`ServerConfig::build`], not a key/value string bag like
//! `dog_core::DogConfig` (see DESIGN.md for why that pattern was not
//! copied literally).

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use silo_repo::Repository;
use silo_store::S3Config;

use crate::error::{ConfigError, ConfigResult};

/// Which repository backend `BuildService` should instantiate.
#[derive(Debug, Clone, Default)]
pub enum DatabaseBackend {
    #[default]
    Memory,
    /// `postgres://…` / `postgresql://…`. The Postgres driver itself is an
    /// external collaborator — `BuildService` only recognizes the
    /// URL and expects a concrete repository to arrive via
    /// [`ServerConfig::with_repository`] or it fails with
    /// [`ConfigError::PostgresRepositoryNotSupplied`].
    Postgres(String),
}

/// Which storage backend a named slot in the registry should become.
#[derive(Debug, Clone)]
pub enum StorageBackendKind {
    Memory,
    File { base_dir: String },
    S3(S3Config),
}

/// Which [`silo_store::ObjectKeyGenerator`] `BuildService` should wire in.
#[derive(Debug, Clone, Copy, Default)]
pub enum KeyGeneratorKind {
    #[default]
    GitLike,
    TenantAware,
    HighPerformance,
    Legacy,
}

/// Which [`silo_urls::UrlStrategy`] `BuildService` should wire in.
#[derive(Debug, Clone, Default)]
pub enum UrlStrategyKind {
    #[default]
    StorageDelegated,
    ContentBased {
        base_url: String,
    },
    Cdn {
        cdn_base_url: String,
        upload_base_url: Option<String>,
    },
}

/// The composed configuration `BuildService` walks. Every
/// field has a test-friendly default (in-memory repository, in-memory
/// default backend, storage-delegated URL strategy) so a caller that wants
/// the simplest possible wiring can call `ServerConfig::default().build_service()`
/// with zero options.
#[derive(Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub environment: String,
    pub database: DatabaseBackend,
    pub backends: Vec<(String, StorageBackendKind)>,
    pub default_backend: Option<String>,
    pub key_generator: KeyGeneratorKind,
    pub url_strategy: UrlStrategyKind,
    pub signer_secret: Option<Vec<u8>>,
    pub signer_default_expires_in: Duration,
    pub repository_override: Option<Arc<dyn Repository>>,
    pub aws_region: Option<String>,
    pub aws_access_key_id: Option<String>,
    pub aws_secret_access_key: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            environment: "development".to_string(),
            database: DatabaseBackend::Memory,
            backends: vec![("default".to_string(), StorageBackendKind::Memory)],
            default_backend: None,
            key_generator: KeyGeneratorKind::GitLike,
            url_strategy: UrlStrategyKind::StorageDelegated,
            signer_secret: None,
            signer_default_expires_in: Duration::from_secs(900),
            repository_override: None,
            aws_region: None,
            aws_access_key_id: None,
            aws_secret_access_key: None,
        }
    }
}

/// A functional option: `(*ServerConfig) -> Result<(), ConfigError>`,
/// applied left to right by [`ServerConfig::build`].
pub type ConfigOption = Box<dyn FnOnce(&mut ServerConfig) -> ConfigResult<()> + Send + Sync>;

impl ServerConfig {
    /// Applies every option in order to a fresh default config, then
    /// validates the result. "Options are pure functions ... applied left
    /// to right, followed by validation".
    pub fn build(options: Vec<ConfigOption>) -> ConfigResult<Self> {
        let mut config = Self::default();
        for option in options {
            option(&mut config)?;
        }
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.backends.is_empty() {
            return Err(ConfigError::Invalid("at least one storage backend must be configured".into()));
        }
        if let Some(name) = &self.default_backend {
            if !self.backends.iter().any(|(n, _)| n == name) {
                return Err(ConfigError::Invalid(format!(
                    "default_backend {name:?} does not name a registered backend"
                )));
            }
        }
        for (name, kind) in &self.backends {
            if let StorageBackendKind::S3(_) = kind {
                if self.aws_region.is_none() {
                    tracing::debug!(backend = %name, "S3 backend configured without an explicit aws_region override; falling back to the SDK's own region resolution");
                }
            }
        }
        Ok(())
    }
}

pub fn with_port(port: u16) -> ConfigOption {
    Box::new(move |config| {
        config.port = port;
        Ok(())
    })
}

pub fn with_environment(environment: impl Into<String> + Send + Sync + 'static) -> ConfigOption {
    Box::new(move |config| {
        config.environment = environment.into();
        Ok(())
    })
}

/// Parses `memory`, `postgres://…`, or `postgresql://…`.
pub fn with_database_url(url: impl Into<String> + Send + Sync + 'static) -> ConfigOption {
    Box::new(move |config| {
        let url = url.into();
        config.database = parse_database_url(&url)?;
        Ok(())
    })
}

pub(crate) fn parse_database_url(url: &str) -> ConfigResult<DatabaseBackend> {
    if url == "memory" || url.is_empty() {
        Ok(DatabaseBackend::Memory)
    } else if url.starts_with("postgres://") || url.starts_with("postgresql://") {
        Ok(DatabaseBackend::Postgres(url.to_string()))
    } else {
        Err(ConfigError::UnknownDatabaseUrl(url.to_string()))
    }
}

/// Parses `memory://`, `file://{path}`, or `s3://{bucket}` and
/// registers it as the `"default"` backend, replacing whatever
/// `ServerConfig::default()` put there.
pub fn with_storage_url(url: impl Into<String> + Send + Sync + 'static) -> ConfigOption {
    Box::new(move |config| {
        let url = url.into();
        let kind = parse_storage_url(&url, config)?;
        config.backends.retain(|(name, _)| name != "default");
        config.backends.insert(0, ("default".to_string(), kind));
        Ok(())
    })
}

pub(crate) fn parse_storage_url(url: &str, config: &ServerConfig) -> ConfigResult<StorageBackendKind> {
    if let Some(rest) = url.strip_prefix("memory://") {
        let _ = rest;
        Ok(StorageBackendKind::Memory)
    } else if let Some(path) = url.strip_prefix("file://") {
        Ok(StorageBackendKind::File { base_dir: path.to_string() })
    } else if let Some(bucket) = url.strip_prefix("s3://") {
        let mut s3 = S3Config::new(config.aws_region.clone().unwrap_or_else(|| "us-east-1".to_string()), bucket);
        if let (Some(key), Some(secret)) = (&config.aws_access_key_id, &config.aws_secret_access_key) {
            s3 = s3.with_credentials(key.clone(), secret.clone());
        }
        Ok(StorageBackendKind::S3(s3))
    } else {
        Err(ConfigError::UnknownStorageUrl(url.to_string()))
    }
}

/// Registers an additional named backend beyond the one `with_storage_url`
/// installs as `"default"` — e.g. a second backend for `UploadContent`'s
/// `backend="fs"` path when callers want to route specific uploads there.
pub fn with_backend(name: impl Into<String> + Send + Sync + 'static, kind: StorageBackendKind) -> ConfigOption {
    Box::new(move |config| {
        let name = name.into();
        config.backends.retain(|(n, _)| n != &name);
        config.backends.push((name, kind));
        Ok(())
    })
}

pub fn with_default_backend(name: impl Into<String> + Send + Sync + 'static) -> ConfigOption {
    Box::new(move |config| {
        config.default_backend = Some(name.into());
        Ok(())
    })
}

pub fn with_key_generator(kind: KeyGeneratorKind) -> ConfigOption {
    Box::new(move |config| {
        config.key_generator = kind;
        Ok(())
    })
}

pub fn with_url_strategy(kind: UrlStrategyKind) -> ConfigOption {
    Box::new(move |config| {
        config.url_strategy = kind;
        Ok(())
    })
}

pub fn with_signer_secret(secret: impl Into<Vec<u8>> + Send + Sync + 'static) -> ConfigOption {
    Box::new(move |config| {
        config.signer_secret = Some(secret.into());
        Ok(())
    })
}

pub fn with_signer_expiry(expires_in: Duration) -> ConfigOption {
    Box::new(move |config| {
        config.signer_default_expires_in = expires_in;
        Ok(())
    })
}

pub fn with_aws_credentials(
    region: impl Into<String> + Send + Sync + 'static,
    access_key_id: impl Into<String> + Send + Sync + 'static,
    secret_access_key: impl Into<String> + Send + Sync + 'static,
) -> ConfigOption {
    Box::new(move |config| {
        config.aws_region = Some(region.into());
        config.aws_access_key_id = Some(access_key_id.into());
        config.aws_secret_access_key = Some(secret_access_key.into());
        Ok(())
    })
}

/// Escape hatch for a caller supplying its own `Repository` (e.g. a
/// Postgres-backed one assembled outside this crate) instead of letting
/// `BuildService` pick memory-or-error based on `DatabaseBackend`.
pub fn with_repository(repository: Arc<dyn Repository>) -> ConfigOption {
    Box::new(move |config| {
        config.repository_override = Some(repository);
        Ok(())
    })
}

/// `WithEnv(prefix)`: layers `PORT`/`ENVIRONMENT`/`DATABASE_URL`/
/// `STORAGE_URL` and the AWS credential variables on top of whatever came
/// before it in the option list — "env may override programmatic defaults
/// or vice versa depending on ordering" is achieved simply by where this
/// option sits in the `Vec` passed to [`ServerConfig::build`].
pub fn with_env(prefix: &str) -> ConfigOption {
    let vars: HashMap<String, String> = std::env::vars().collect();
    let prefix = prefix.to_string();
    Box::new(move |config| {
        let lookup = |name: &str| -> Option<String> {
            vars.get(&format!("{prefix}{name}")).cloned().or_else(|| vars.get(name).cloned())
        };

        if let Some(port) = lookup("PORT") {
            config.port = port
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("PORT={port:?} is not a valid u16")))?;
        }
        if let Some(environment) = lookup("ENVIRONMENT") {
            config.environment = environment;
        }
        if let Some(region) = lookup("AWS_REGION") {
            config.aws_region = Some(region);
        }
        if let Some(key) = lookup("AWS_ACCESS_KEY_ID") {
            config.aws_access_key_id = Some(key);
        }
        if let Some(secret) = lookup("AWS_SECRET_ACCESS_KEY") {
            config.aws_secret_access_key = Some(secret);
        }
        if let Some(database_url) = lookup("DATABASE_URL") {
            config.database = parse_database_url(&database_url)?;
        }
        if let Some(storage_url) = lookup("STORAGE_URL") {
            let kind = parse_storage_url(&storage_url, config)?;
            config.backends.retain(|(name, _)| name != "default");
            config.backends.insert(0, ("default".to_string(), kind));
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_memory_repository_and_backend() {
        let config = ServerConfig::build(vec![]).unwrap();
        assert!(matches!(config.database, DatabaseBackend::Memory));
        assert_eq!(config.backends.len(), 1);
        assert_eq!(config.backends[0].0, "default");
    }

    #[test]
    fn storage_url_parses_each_scheme() {
        let config = ServerConfig::build(vec![with_storage_url("memory://")]).unwrap();
        assert!(matches!(config.backends[0].1, StorageBackendKind::Memory));

        let config = ServerConfig::build(vec![with_storage_url("file:///var/data")]).unwrap();
        match &config.backends[0].1 {
            StorageBackendKind::File { base_dir } => assert_eq!(base_dir, "/var/data"),
            other => panic!("expected File, got {other:?}"),
        }

        let config = ServerConfig::build(vec![with_storage_url("s3://my-bucket")]).unwrap();
        match &config.backends[0].1 {
            StorageBackendKind::S3(s3) => assert_eq!(s3.bucket, "my-bucket"),
            other => panic!("expected S3, got {other:?}"),
        }
    }

    #[test]
    fn database_url_rejects_unknown_scheme() {
        let err = ServerConfig::build(vec![with_database_url("mysql://host/db")]).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownDatabaseUrl(_)));
    }

    #[test]
    fn default_backend_must_name_a_registered_backend() {
        let err = ServerConfig::build(vec![with_default_backend("nope")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn options_apply_left_to_right() {
        let config = ServerConfig::build(vec![with_port(1), with_port(2), with_port(3)]).unwrap();
        assert_eq!(config.port, 3);
    }
}
