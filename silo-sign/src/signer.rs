use std::time::Duration;

use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::error::SignError;

type HmacSha256 = Hmac<Sha256>;

/// Configuration for a [`PresignedSigner`].
#[derive(Clone)]
pub struct SignerConfig {
    pub secret: Vec<u8>,
    pub default_expires_in: Duration,
    /// Must contain exactly one `{key}` placeholder, used by
    /// [`PresignedSigner::extract_object_key`].
    pub url_pattern: String,
}

impl SignerConfig {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
            default_expires_in: Duration::from_secs(900),
            url_pattern: "/download/{key}".to_string(),
        }
    }
}

/// Stateless HMAC-SHA256 signer/validator for presigned storage URLs.
/// Multiple instances constructed with the same secret are interchangeable.
#[derive(Clone)]
pub struct PresignedSigner {
    config: SignerConfig,
}

/// Outcome of a successful [`PresignedSigner::validate_request`] call.
#[derive(Debug, Clone)]
pub struct ValidatedRequest {
    /// Path with `signature`/`expires` stripped, other query params
    /// preserved in their original order.
    pub cleaned_path: String,
    /// The object key extracted from `cleaned_path` via the configured
    /// URL pattern, if it matches.
    pub object_key: Option<String>,
}

impl PresignedSigner {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self::with_config(SignerConfig::new(secret))
    }

    pub fn with_config(config: SignerConfig) -> Self {
        Self { config }
    }

    pub fn with_default_expires_in(mut self, expires_in: Duration) -> Self {
        self.config.default_expires_in = expires_in;
        self
    }

    pub fn with_url_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.config.url_pattern = pattern.into();
        self
    }

    /// `SignURL(method, path, expiresIn)` — compute `expiresAt`, sign the
    /// `METHOD|PATH|EXPIRES` payload, and return `path?signature=…&expires=…`.
    pub fn sign_url(&self, method: &str, path: &str, expires_in: Duration) -> String {
        let expires_at = Utc::now().timestamp() + expires_in.as_secs() as i64;
        let (base_path, mut params) = split_query(path);
        let signature = self.sign_payload(method, &base_path, &params, expires_at);
        params.push(("signature".to_string(), signature));
        params.push(("expires".to_string(), expires_at.to_string()));
        rebuild(&base_path, &params)
    }

    /// Same as [`Self::sign_url`] but using the configured default expiry.
    pub fn sign_url_default(&self, method: &str, path: &str) -> String {
        self.sign_url(method, path, self.config.default_expires_in)
    }

    /// `ValidateRequest(request)`. `path_and_query` is the request target
    /// (path plus query string, leading `/`).
    pub fn validate_request(
        &self,
        method: &str,
        path_and_query: &str,
    ) -> Result<ValidatedRequest, SignError> {
        let (base_path, params) = split_query(path_and_query);

        let signature = find(&params, "signature").ok_or(SignError::MissingSignature)?;
        let expires_raw = find(&params, "expires").ok_or(SignError::MissingExpiration)?;
        let expires_at: i64 = expires_raw
            .parse()
            .map_err(|_| SignError::InvalidExpiration)?;

        if Utc::now().timestamp() > expires_at {
            return Err(SignError::SignatureExpired);
        }

        let remaining: Vec<(String, String)> = params
            .into_iter()
            .filter(|(k, _)| k != "signature" && k != "expires")
            .collect();

        let expected = self.sign_payload(method, &base_path, &remaining, expires_at);
        if !constant_time_eq_hex(&expected, &signature) {
            return Err(SignError::InvalidSignature);
        }

        let cleaned_path = rebuild(&base_path, &remaining);
        let object_key = self.extract_object_key(&cleaned_path);
        Ok(ValidatedRequest {
            cleaned_path,
            object_key,
        })
    }

    /// `ExtractObjectKey(path)` — parse `path` according to the configured
    /// single-placeholder URL pattern.
    pub fn extract_object_key(&self, path: &str) -> Option<String> {
        let (prefix, suffix) = self.config.url_pattern.split_once("{key}")?;
        let path = path.split('?').next().unwrap_or(path);
        if path.len() < prefix.len() + suffix.len() {
            return None;
        }
        if !path.starts_with(prefix) || !path.ends_with(suffix) {
            return None;
        }
        let key = &path[prefix.len()..path.len() - suffix.len()];
        if key.is_empty() {
            None
        } else {
            Some(key.to_string())
        }
    }

    fn sign_payload(
        &self,
        method: &str,
        path: &str,
        query_params: &[(String, String)],
        expires_at: i64,
    ) -> String {
        let full_path = rebuild(path, query_params);
        let payload = format!("{}|{}|{}", method.to_uppercase(), full_path, expires_at);
        let mut mac = HmacSha256::new_from_slice(&self.config.secret)
            .expect("HMAC accepts a key of any length");
        mac.update(payload.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }
}

/// Implements the capability queried by the HTTP boundary to
/// validate an incoming presigned request without depending on the
/// concrete signer type.
pub trait SignatureValidator: Send + Sync {
    fn validate(&self, method: &str, path_and_query: &str) -> Result<ValidatedRequest, SignError>;
}

impl SignatureValidator for PresignedSigner {
    fn validate(&self, method: &str, path_and_query: &str) -> Result<ValidatedRequest, SignError> {
        self.validate_request(method, path_and_query)
    }
}

fn constant_time_eq_hex(expected_hex: &str, given_hex: &str) -> bool {
    match (hex::decode(expected_hex), hex::decode(given_hex)) {
        (Ok(a), Ok(b)) => a.ct_eq(&b).into(),
        _ => false,
    }
}

fn split_query(path: &str) -> (String, Vec<(String, String)>) {
    match path.split_once('?') {
        None => (path.to_string(), Vec::new()),
        Some((base, query)) => {
            let params = query
                .split('&')
                .filter(|p| !p.is_empty())
                .map(|pair| match pair.split_once('=') {
                    Some((k, v)) => (k.to_string(), v.to_string()),
                    None => (pair.to_string(), String::new()),
                })
                .collect();
            (base.to_string(), params)
        }
    }
}

fn rebuild(base_path: &str, params: &[(String, String)]) -> String {
    if params.is_empty() {
        return base_path.to_string();
    }
    let query = params
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");
    format!("{base_path}?{query}")
}

fn find(params: &[(String, String)], key: &str) -> Option<String> {
    params.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer() -> PresignedSigner {
        PresignedSigner::new("k".repeat(32).into_bytes()).with_url_pattern("/upload/{key}")
    }

    #[test]
    fn sign_then_validate_round_trips() {
        let s = signer();
        let url = s.sign_url("PUT", "/upload/foo", Duration::from_secs(60));
        assert!(url.starts_with("/upload/foo?signature="));
        let validated = s.validate_request("PUT", &url).unwrap();
        assert_eq!(validated.object_key.as_deref(), Some("foo"));
    }

    #[test]
    fn expired_signature_is_rejected() {
        let s = signer();
        let url = s.sign_url("PUT", "/upload/foo", Duration::from_secs(0));
        std::thread::sleep(Duration::from_millis(1100));
        let err = s.validate_request("PUT", &url).unwrap_err();
        assert_eq!(err, SignError::SignatureExpired);
    }

    #[test]
    fn perturbing_signature_is_rejected() {
        let s = signer();
        let mut url = s.sign_url("PUT", "/upload/foo", Duration::from_secs(60));
        let pos = url.find("signature=").unwrap() + "signature=".len();
        let bytes = unsafe { url.as_bytes_mut() };
        bytes[pos] = if bytes[pos] == b'a' { b'b' } else { b'a' };
        let err = s.validate_request("PUT", &url).unwrap_err();
        assert_eq!(err, SignError::InvalidSignature);
    }

    #[test]
    fn missing_signature_and_expires_are_distinct_errors() {
        let s = signer();
        assert_eq!(
            s.validate_request("GET", "/upload/foo").unwrap_err(),
            SignError::MissingSignature
        );
        assert_eq!(
            s.validate_request("GET", "/upload/foo?signature=ab").unwrap_err(),
            SignError::MissingExpiration
        );
    }

    #[test]
    fn extract_object_key_respects_pattern() {
        let s = signer();
        assert_eq!(
            s.extract_object_key("/upload/originals/ab/cd_file.txt"),
            Some("originals/ab/cd_file.txt".to_string())
        );
        assert_eq!(s.extract_object_key("/download/nope"), None);
    }
}
