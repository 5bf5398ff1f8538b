use std::time::Duration;

/// Server-side encryption mode for the S3-compatible backend.
#[derive(Debug, Clone, Default)]
pub enum SseMode {
    #[default]
    None,
    Aes256,
    KmsManaged {
        key_id: String,
    },
}

/// Construction options for [`crate::s3::S3CompatibleStore`].
#[derive(Debug, Clone)]
pub struct S3Config {
    pub region: String,
    pub bucket: String,
    /// Custom endpoint for MinIO/LocalStack; `None` uses AWS's own endpoint
    /// resolution.
    pub endpoint: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub sse: SseMode,
    /// Required for MinIO/LocalStack-style gateways (`http://endpoint/bucket/key`
    /// instead of virtual-hosted-style).
    pub path_style: bool,
    pub presign_duration: Duration,
}

impl S3Config {
    pub fn new(region: impl Into<String>, bucket: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            bucket: bucket.into(),
            endpoint: None,
            access_key_id: None,
            secret_access_key: None,
            sse: SseMode::None,
            path_style: false,
            presign_duration: Duration::from_secs(900),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn with_credentials(
        mut self,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
    ) -> Self {
        self.access_key_id = Some(access_key_id.into());
        self.secret_access_key = Some(secret_access_key.into());
        self
    }

    pub fn with_path_style(mut self, path_style: bool) -> Self {
        self.path_style = path_style;
        self
    }

    pub fn with_sse(mut self, sse: SseMode) -> Self {
        self.sse = sse;
        self
    }

    pub fn with_presign_duration(mut self, duration: Duration) -> Self {
        self.presign_duration = duration;
        self
    }
}
