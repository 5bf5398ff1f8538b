use async_trait::async_trait;
use aws_credential_types::Credentials;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream as AwsByteStream;
use aws_sdk_s3::types::ServerSideEncryption;
use aws_sdk_s3::Client;
use bytes::{Bytes, BytesMut};
use futures_util::StreamExt;

use crate::config::{S3Config, SseMode};
use crate::error::{StoreError, StoreResult};
use crate::store::BlobStore;
use crate::types::{ByteStream, ObjectMeta};

/// S3-compatible backend: uses the AWS SDK's put/get/delete and presigning.
/// Config captures region, bucket, endpoint (MinIO/LocalStack),
/// SSE options, path-style addressing, presign duration.
pub struct S3CompatibleStore {
    name: String,
    client: Client,
    bucket: String,
    sse: SseMode,
    presign_duration: std::time::Duration,
}

impl S3CompatibleStore {
    pub fn new(name: impl Into<String>, config: S3Config) -> Self {
        let mut builder = aws_sdk_s3::Config::builder()
            .region(Region::new(config.region.clone()))
            .force_path_style(config.path_style)
            .behavior_version(aws_sdk_s3::config::BehaviorVersion::latest());

        if let (Some(key), Some(secret)) = (&config.access_key_id, &config.secret_access_key) {
            builder = builder.credentials_provider(Credentials::new(
                key, secret, None, None, "silo-store",
            ));
        }
        if let Some(endpoint) = &config.endpoint {
            builder = builder.endpoint_url(endpoint);
        }

        let client = Client::from_conf(builder.build());
        Self {
            name: name.into(),
            client,
            bucket: config.bucket,
            sse: config.sse,
            presign_duration: config.presign_duration,
        }
    }

    /// Lazily creates the configured bucket at service startup if it does
    /// not already exist. Idempotent: `create_bucket` failing
    /// because the bucket already exists is swallowed.
    pub async fn create_bucket_if_not_exist(&self) -> StoreResult<()> {
        match self.client.head_bucket().bucket(&self.bucket).send().await {
            Ok(_) => Ok(()),
            Err(_) => match self.client.create_bucket().bucket(&self.bucket).send().await {
                Ok(_) => Ok(()),
                Err(e) => {
                    if e.as_service_error()
                        .map(|se| se.is_bucket_already_owned_by_you() || se.is_bucket_already_exists())
                        .unwrap_or(false)
                    {
                        Ok(())
                    } else {
                        Err(StoreError::io("creating bucket", e))
                    }
                }
            },
        }
    }

    fn apply_sse(&self, req: aws_sdk_s3::operation::put_object::builders::PutObjectFluentBuilder) -> aws_sdk_s3::operation::put_object::builders::PutObjectFluentBuilder {
        match &self.sse {
            SseMode::None => req,
            SseMode::Aes256 => req.server_side_encryption(ServerSideEncryption::Aes256),
            SseMode::KmsManaged { key_id } => req
                .server_side_encryption(ServerSideEncryption::AwsKms)
                .ssekms_key_id(key_id),
        }
    }
}

#[async_trait]
impl BlobStore for S3CompatibleStore {
    async fn upload(
        &self,
        key: &str,
        content_type: Option<&str>,
        mut stream: ByteStream,
    ) -> StoreResult<ObjectMeta> {
        let mut buf = BytesMut::new();
        while let Some(chunk) = stream.next().await {
            let chunk: Bytes = chunk.map_err(|e| StoreError::io("reading upload stream", e))?;
            buf.extend_from_slice(&chunk);
        }
        let size = buf.len() as u64;
        let body = AwsByteStream::from(buf.freeze());

        let mut req = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(body);
        if let Some(ct) = content_type {
            req = req.content_type(ct);
        }
        req = self.apply_sse(req);

        let output = req
            .send()
            .await
            .map_err(|e| StoreError::io(format!("putting object {key}"), e))?;

        Ok(ObjectMeta {
            content_type: content_type.map(str::to_string),
            size_bytes: size,
            etag: output.e_tag().map(str::to_string),
        })
    }

    async fn download(&self, key: &str) -> StoreResult<ByteStream> {
        let output = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                if e.as_service_error().map(|se| se.is_no_such_key()).unwrap_or(false) {
                    StoreError::not_found(key)
                } else {
                    StoreError::io(format!("getting object {key}"), e)
                }
            })?;

        let stream = output.body.into_async_read();
        Ok(Box::pin(tokio_util::io::ReaderStream::new(stream)))
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StoreError::io(format!("deleting object {key}"), e))?;
        Ok(())
    }

    async fn get_object_meta(&self, key: &str) -> StoreResult<ObjectMeta> {
        let output = self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                if e.as_service_error().map(|se| se.is_not_found()).unwrap_or(false) {
                    StoreError::not_found(key)
                } else {
                    StoreError::io(format!("heading object {key}"), e)
                }
            })?;

        Ok(ObjectMeta {
            content_type: output.content_type().map(str::to_string),
            size_bytes: output.content_length().unwrap_or(0).max(0) as u64,
            etag: output.e_tag().map(str::to_string),
        })
    }

    async fn get_upload_url(&self, key: &str) -> StoreResult<String> {
        let presigned = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(
                PresigningConfig::expires_in(self.presign_duration)
                    .map_err(|e| StoreError::io("building presign config", e))?,
            )
            .await
            .map_err(|e| StoreError::io(format!("presigning upload for {key}"), e))?;
        Ok(presigned.uri().to_string())
    }

    async fn get_download_url(&self, key: &str, filename: Option<&str>) -> StoreResult<String> {
        let mut req = self.client.get_object().bucket(&self.bucket).key(key);
        if let Some(name) = filename {
            req = req.response_content_disposition(format!("attachment; filename=\"{name}\""));
        }
        let presigned = req
            .presigned(
                PresigningConfig::expires_in(self.presign_duration)
                    .map_err(|e| StoreError::io("building presign config", e))?,
            )
            .await
            .map_err(|e| StoreError::io(format!("presigning download for {key}"), e))?;
        Ok(presigned.uri().to_string())
    }

    async fn get_preview_url(&self, key: &str) -> StoreResult<String> {
        let presigned = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .response_content_disposition("inline")
            .presigned(
                PresigningConfig::expires_in(self.presign_duration)
                    .map_err(|e| StoreError::io("building presign config", e))?,
            )
            .await
            .map_err(|e| StoreError::io(format!("presigning preview for {key}"), e))?;
        Ok(presigned.uri().to_string())
    }

    fn backend_name(&self) -> &str {
        &self.name
    }
}
