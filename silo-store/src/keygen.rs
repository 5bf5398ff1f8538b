//! `ObjectKeyGenerator`: a pure function from
//! `(tenant, content, object, derivationType, variant, fileName)` to a
//! backend-local storage key. Invoked once per Object at creation time;
//! the result is persisted on `Object.object_key` and never recomputed.

use silo_model::{ContentId, ObjectId};

/// Inputs to a key generator call. Borrowed fields only — the generator
/// never owns anything, so one `KeyGenInput` can be built per call without
/// cloning ids or strings.
#[derive(Debug, Clone, Copy)]
pub struct KeyGenInput<'a> {
    pub tenant_id: &'a str,
    pub content_id: &'a ContentId,
    pub object_id: &'a ObjectId,
    /// Empty for originals.
    pub derivation_type: &'a str,
    pub variant: &'a str,
    pub file_name: Option<&'a str>,
}

impl<'a> KeyGenInput<'a> {
    fn file_name(&self) -> &str {
        self.file_name.unwrap_or("blob")
    }

    fn is_derived(&self) -> bool {
        !self.derivation_type.is_empty()
    }

    /// `{objectID[0:2]}`, `{objectID[2:]}` split on the object id's
    /// lowercase hex digest with dashes removed.
    fn object_id_prefix_and_rest(&self) -> (String, String) {
        let hex = self.object_id.as_uuid().simple().to_string();
        let (prefix, rest) = hex.split_at(2);
        (prefix.to_string(), rest.to_string())
    }
}

pub trait ObjectKeyGenerator: Send + Sync {
    fn generate_key(&self, input: KeyGenInput<'_>) -> String;
}

/// Default generator, with a bit-exact layout of:
///
/// ```text
/// originals/objects/{objectID[0:2]}/{objectID[2:]}_{fileName}
/// derived/{derivationType}/{variant}/{objectID[0:2]}/{objectID[2:]}_{fileName}
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct GitLikeKeyGenerator;

impl ObjectKeyGenerator for GitLikeKeyGenerator {
    fn generate_key(&self, input: KeyGenInput<'_>) -> String {
        let (prefix, rest) = input.object_id_prefix_and_rest();
        let file_name = input.file_name();
        if input.is_derived() {
            format!(
                "derived/{}/{}/{}/{}_{}",
                input.derivation_type, input.variant, prefix, rest, file_name
            )
        } else {
            format!("originals/objects/{}/{}_{}", prefix, rest, file_name)
        }
    }
}

/// Same layout as [`GitLikeKeyGenerator`] with `tenants/{tenantID}/...`
/// prepended.
#[derive(Debug, Clone, Copy, Default)]
pub struct TenantAwareKeyGenerator;

impl ObjectKeyGenerator for TenantAwareKeyGenerator {
    fn generate_key(&self, input: KeyGenInput<'_>) -> String {
        format!(
            "tenants/{}/{}",
            input.tenant_id,
            GitLikeKeyGenerator.generate_key(input)
        )
    }
}

/// Shallower hierarchy than the git-like scheme: one directory level keyed
/// by a 4-hex-char prefix instead of a per-object directory, trading
/// listing locality for fewer directory entries per level.
#[derive(Debug, Clone, Copy, Default)]
pub struct HighPerformanceKeyGenerator;

impl ObjectKeyGenerator for HighPerformanceKeyGenerator {
    fn generate_key(&self, input: KeyGenInput<'_>) -> String {
        let hex = input.object_id.as_uuid().simple().to_string();
        let shard = &hex[..4];
        let file_name = input.file_name();
        if input.is_derived() {
            format!(
                "derived/{}_{}/{}/{}_{}",
                input.derivation_type, input.variant, shard, hex, file_name
            )
        } else {
            format!("objects/{}/{}_{}", shard, hex, file_name)
        }
    }
}

/// The historical flat scheme, kept for backends migrating off it:
/// `{contentID}/{objectID}`, ignoring derivation and file name.
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyKeyGenerator;

impl ObjectKeyGenerator for LegacyKeyGenerator {
    fn generate_key(&self, input: KeyGenInput<'_>) -> String {
        format!("{}/{}", input.content_id, input.object_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input<'a>(
        tenant_id: &'a str,
        content_id: &'a ContentId,
        object_id: &'a ObjectId,
        derivation_type: &'a str,
        variant: &'a str,
        file_name: Option<&'a str>,
    ) -> KeyGenInput<'a> {
        KeyGenInput {
            tenant_id,
            content_id,
            object_id,
            derivation_type,
            variant,
            file_name,
        }
    }

    #[test]
    fn git_like_is_pure() {
        let content_id = ContentId::new();
        let object_id = ObjectId::new();
        let i = input("t1", &content_id, &object_id, "", "", Some("a.txt"));
        let a = GitLikeKeyGenerator.generate_key(i);
        let b = GitLikeKeyGenerator.generate_key(i);
        assert_eq!(a, b);
        let hex = object_id.as_uuid().simple().to_string();
        assert_eq!(a, format!("originals/objects/{}/{}_a.txt", &hex[..2], &hex[2..]));
    }

    #[test]
    fn git_like_derived_layout() {
        let content_id = ContentId::new();
        let object_id = ObjectId::new();
        let i = input("t1", &content_id, &object_id, "thumbnail", "thumbnail_256", Some("a.png"));
        let key = GitLikeKeyGenerator.generate_key(i);
        let hex = object_id.as_uuid().simple().to_string();
        assert_eq!(
            key,
            format!("derived/thumbnail/thumbnail_256/{}/{}_a.png", &hex[..2], &hex[2..])
        );
    }

    #[test]
    fn tenant_aware_prepends_tenant() {
        let content_id = ContentId::new();
        let object_id = ObjectId::new();
        let i = input("acme", &content_id, &object_id, "", "", Some("a.txt"));
        let key = TenantAwareKeyGenerator.generate_key(i);
        assert!(key.starts_with("tenants/acme/originals/objects/"));
    }

    #[test]
    fn legacy_is_flat() {
        let content_id = ContentId::new();
        let object_id = ObjectId::new();
        let i = input("t1", &content_id, &object_id, "thumbnail", "thumbnail_256", Some("a.txt"));
        assert_eq!(
            LegacyKeyGenerator.generate_key(i),
            format!("{}/{}", content_id, object_id)
        );
    }
}
