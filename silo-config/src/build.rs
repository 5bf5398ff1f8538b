//! `BuildService`: walks a [`ServerConfig`], instantiates the
//! repository, each storage backend, the key generator, and the URL
//! strategy, then hands them to [`silo_service::ServiceBuilder`].

use std::sync::Arc;

use silo_repo::{InMemoryRepository, Repository};
use silo_service::{Service, ServiceBuilder};
use silo_sign::{PresignedSigner, SignerConfig};
use silo_store::{
    BlobStore, FilesystemBlobStore, GitLikeKeyGenerator, HighPerformanceKeyGenerator,
    LegacyKeyGenerator, MemoryBlobStore, ObjectKeyGenerator, S3CompatibleStore, TenantAwareKeyGenerator,
};
use silo_urls::{CdnUrlStrategy, ContentBasedUrlStrategy, StorageDelegatedUrlStrategy, UrlStrategy};

use crate::config::{DatabaseBackend, KeyGeneratorKind, StorageBackendKind, UrlStrategyKind};
use crate::error::{ConfigError, ConfigResult};
use crate::ServerConfig;

fn build_repository(config: &ServerConfig) -> ConfigResult<Arc<dyn Repository>> {
    if let Some(repository) = &config.repository_override {
        return Ok(Arc::clone(repository));
    }

    match &config.database {
        DatabaseBackend::Memory => Ok(Arc::new(InMemoryRepository::new())),
        DatabaseBackend::Postgres(_) => Err(ConfigError::PostgresRepositoryNotSupplied),
    }
}

async fn build_backend(name: &str, kind: &StorageBackendKind, config: &ServerConfig) -> ConfigResult<Arc<dyn BlobStore>> {
    match kind {
        StorageBackendKind::Memory => Ok(Arc::new(MemoryBlobStore::new(name)) as Arc<dyn BlobStore>),
        StorageBackendKind::File { base_dir } => {
            let mut store = FilesystemBlobStore::new(name, base_dir.clone());
            if let Some(secret) = &config.signer_secret {
                let signer_config = SignerConfig {
                    secret: secret.clone(),
                    default_expires_in: config.signer_default_expires_in,
                    url_pattern: "/download/{key}".to_string(),
                };
                store = store.with_signer(PresignedSigner::with_config(signer_config));
            }
            Ok(Arc::new(store) as Arc<dyn BlobStore>)
        }
        StorageBackendKind::S3(s3_config) => {
            let store = S3CompatibleStore::new(name, s3_config.clone());
            // "CreateBucketIfNotExist lazily creates the bucket at service
            // startup".
            store.create_bucket_if_not_exist().await?;
            Ok(Arc::new(store) as Arc<dyn BlobStore>)
        }
    }
}

fn build_key_generator(kind: KeyGeneratorKind) -> Arc<dyn ObjectKeyGenerator> {
    match kind {
        KeyGeneratorKind::GitLike => Arc::new(GitLikeKeyGenerator),
        KeyGeneratorKind::TenantAware => Arc::new(TenantAwareKeyGenerator),
        KeyGeneratorKind::HighPerformance => Arc::new(HighPerformanceKeyGenerator),
        KeyGeneratorKind::Legacy => Arc::new(LegacyKeyGenerator),
    }
}

fn build_url_strategy(kind: &UrlStrategyKind) -> Arc<dyn UrlStrategy> {
    match kind {
        UrlStrategyKind::StorageDelegated => Arc::new(StorageDelegatedUrlStrategy),
        UrlStrategyKind::ContentBased { base_url } => Arc::new(ContentBasedUrlStrategy::new(base_url.clone())),
        UrlStrategyKind::Cdn { cdn_base_url, upload_base_url } => {
            let mut strategy = CdnUrlStrategy::new(cdn_base_url.clone());
            if let Some(upload_base_url) = upload_base_url {
                strategy = strategy.with_upload_base_url(upload_base_url.clone());
            }
            Arc::new(strategy)
        }
    }
}

/// Builds a fully wired [`Service`] from the given options. An
/// `async fn` rather than a plain constructor because S3 backends may need
/// to lazily create their bucket before the service is usable.
pub async fn build_service(options: Vec<crate::ConfigOption>) -> ConfigResult<Service> {
    let config = ServerConfig::build(options)?;
    build_service_from_config(&config).await
}

pub async fn build_service_from_config(config: &ServerConfig) -> ConfigResult<Service> {
    let repository = build_repository(config)?;

    let mut builder = ServiceBuilder::new()
        .with_repository(repository)
        .with_key_generator(build_key_generator(config.key_generator))
        .with_url_strategy(build_url_strategy(&config.url_strategy));

    for (name, kind) in &config.backends {
        let backend = build_backend(name, kind, config).await?;
        builder = builder.with_backend(name.clone(), backend);
    }
    if let Some(default_backend) = &config.default_backend {
        builder = builder.with_default_backend(default_backend.clone());
    }

    builder.build().map_err(ConfigError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{with_database_url, with_port, with_storage_url};

    #[tokio::test]
    async fn builds_a_working_service_from_defaults() {
        let service = build_service(vec![]).await.unwrap();
        let content = service
            .create_content(silo_service::CreateContentRequest {
                tenant_id: "t".into(),
                owner_id: "o".into(),
                owner_type: "user".into(),
                name: "a.txt".into(),
                document_type: "text/plain".into(),
                description: None,
            })
            .await
            .unwrap();
        assert_eq!(content.tenant_id, "t");
    }

    #[tokio::test]
    async fn builds_a_filesystem_backed_service() {
        let dir = tempfile::tempdir().unwrap();
        let storage_url = format!("file://{}", dir.path().display());
        let service = build_service(vec![with_storage_url(storage_url), with_port(9000)])
            .await
            .unwrap();
        let _ = service;
    }

    #[tokio::test]
    async fn postgres_database_url_without_override_fails() {
        let err = build_service(vec![with_database_url("postgres://localhost/db")])
            .await
            .unwrap_err();
        assert!(matches!(err, ConfigError::PostgresRepositoryNotSupplied));
    }
}
