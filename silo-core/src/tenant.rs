//! Tenant and actor identity carried through every content operation.
//!
//! The content service does not implement authorization itself;
//! `TenantId`/`OwnerRef` exist purely so callers can scope
//! listings and so the repository can filter by owner+tenant.

use std::fmt;

/// A tenant identifier. Free-form: callers decide what a tenant is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TenantId(pub String);

impl TenantId {
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TenantId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for TenantId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// The owner of a Content: an opaque id plus a free-form "owner type" tag
/// (e.g. "user", "team", "bot"). Neither field is validated against an
/// external identity system.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OwnerRef {
    pub owner_id: String,
    pub owner_type: String,
}

impl OwnerRef {
    pub fn new<S: Into<String>, T: Into<String>>(owner_id: S, owner_type: T) -> Self {
        Self {
            owner_id: owner_id.into(),
            owner_type: owner_type.into(),
        }
    }
}
