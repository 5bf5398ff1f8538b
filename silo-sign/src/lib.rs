//! silo-sign: stateless HMAC-SHA256 presigned URL signing and validation.

mod error;
mod signer;

pub use error::SignError;
pub use signer::{PresignedSigner, SignatureValidator, SignerConfig, ValidatedRequest};
