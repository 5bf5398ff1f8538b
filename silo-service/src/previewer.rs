use async_trait::async_trait;

/// Optional capability `Service` may be configured with. The content
/// service never generates previews itself — no content transformation is
/// in scope here; this trait exists purely as an extension point a caller
/// can wire in without changing `Service`'s signature. `Service` stores the
/// handle but never invokes it.
#[async_trait]
pub trait Previewer: Send + Sync {
    /// Whether this previewer claims to be able to produce a preview for
    /// the given document type. Not called anywhere in this crate today.
    async fn supports(&self, document_type: &str) -> bool;
}
