use thiserror::Error;

/// Presigned URL validation failures. Each maps to a stable
/// HTTP status at the boundary: missing signature → 401, the rest → 403/400.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignError {
    #[error("missing signature")]
    MissingSignature,

    #[error("missing expiration")]
    MissingExpiration,

    #[error("invalid expiration")]
    InvalidExpiration,

    #[error("signature expired")]
    SignatureExpired,

    #[error("invalid signature")]
    InvalidSignature,
}
