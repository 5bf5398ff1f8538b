use std::collections::BTreeMap;

use serde::Serialize;
use silo_core::{ContentError, ContentResult};
use silo_model::{Content, ContentId, ContentMetadata, DerivedContent, Object, ReadyNode};

use crate::requests::ContentDetailsOptions;
use crate::Service;

/// One node of the tree returned by `GetDerivedTree`
/// (`/contents/{id}/derived-tree`), with recursive children. `edge` is
/// `None` for the root node and `Some` for every descendant.
#[derive(Debug, Clone, Serialize)]
pub struct DerivedTreeNode {
    pub content: Content,
    pub edge: Option<DerivedContent>,
    pub children: Vec<DerivedTreeNode>,
}

/// Aggregated descriptor returned by `GetContentDetails`: the
/// Content, its metadata, its latest Object, and URLs for every directly
/// derived child grouped by derivation type into `thumbnails` / `previews`
/// / `transcodes` maps keyed by variant. `download_url`/`preview_url` are
/// `""` when `options.with_urls` is false or the URL strategy has none to
/// offer — an empty string means no URL.
#[derive(Debug, Clone, Serialize)]
pub struct ContentDetails {
    pub content: Content,
    pub metadata: Option<ContentMetadata>,
    pub latest_object: Option<Object>,
    pub download_url: String,
    pub preview_url: String,
    pub thumbnails: BTreeMap<String, String>,
    pub previews: BTreeMap<String, String>,
    pub transcodes: BTreeMap<String, String>,
    pub ready: bool,
}

impl Service {
    /// `GetContentDetails(id, options...)`.
    pub async fn get_content_details(
        &self,
        id: &ContentId,
        options: ContentDetailsOptions,
    ) -> ContentResult<ContentDetails> {
        let content = self.repository.get_content(id).await.map_err(ContentError::from)?;
        let metadata = self.repository.get_content_metadata(id).await.ok();

        let latest_object = self
            .repository
            .get_objects_by_content_id(id)
            .await
            .map_err(ContentError::from)?
            .into_iter()
            .next();

        let (download_url, preview_url) = if options.with_urls {
            match &latest_object {
                Some(object) => {
                    let backend = self.resolve_backend(&object.storage_backend_name)?;
                    let download_url = self
                        .url_strategy
                        .download_url(&content, object, backend.as_ref())
                        .await?;
                    let preview_url = self
                        .url_strategy
                        .preview_url(&content, object, backend.as_ref())
                        .await?;
                    (download_url, preview_url)
                }
                None => (String::new(), String::new()),
            }
        } else {
            (String::new(), String::new())
        };

        let mut thumbnails = BTreeMap::new();
        let mut previews = BTreeMap::new();
        let mut transcodes = BTreeMap::new();

        let children = self
            .repository
            .list_derived_content(silo_repo::DerivedContentFilter::default().with_parent_id(id.clone()))
            .await
            .map_err(ContentError::from)?;

        if options.with_urls {
            for edge in &children {
                let child_object = self
                    .repository
                    .get_objects_by_content_id(&edge.child_content_id)
                    .await
                    .map_err(ContentError::from)?
                    .into_iter()
                    .next();
                let Some(child_object) = child_object else {
                    continue;
                };
                let child_content = self
                    .repository
                    .get_content(&edge.child_content_id)
                    .await
                    .map_err(ContentError::from)?;
                let backend = self.resolve_backend(&child_object.storage_backend_name)?;
                let url = self
                    .url_strategy
                    .download_url(&child_content, &child_object, backend.as_ref())
                    .await?;

                let variant = edge.resolved_variant();
                match edge.derivation_type.as_str() {
                    "thumbnail" => {
                        thumbnails.insert(variant, url);
                    }
                    "preview" => {
                        previews.insert(variant, url);
                    }
                    "transcode" => {
                        transcodes.insert(variant, url);
                    }
                    _ => {}
                }
            }
        }

        let ready = self.compute_ready(&content, &children).await?;

        Ok(ContentDetails {
            content,
            metadata,
            latest_object,
            download_url,
            preview_url,
            thumbnails,
            previews,
            transcodes,
            ready,
        })
    }

    /// `GetContentDetailsBatch(ids, options...)`: N single
    /// calls, no SQL-level batching promised.
    pub async fn get_content_details_batch(
        &self,
        ids: &[ContentId],
        options: ContentDetailsOptions,
    ) -> Vec<ContentResult<ContentDetails>> {
        let mut results = Vec::with_capacity(ids.len());
        for id in ids {
            results.push(self.get_content_details(id, options).await);
        }
        results
    }

    /// Assembles the ready-tree rooted at `content` and evaluates the
    /// recursive ready predicate over it. Tree assembly needs
    /// repository access for each level, which is why only the pure
    /// predicate over an already-built [`ReadyNode`] tree lives in
    /// `silo-model`.
    async fn compute_ready(
        &self,
        content: &Content,
        direct_children: &[silo_model::DerivedContent],
    ) -> ContentResult<bool> {
        let mut child_nodes = Vec::with_capacity(direct_children.len());
        for edge in direct_children {
            let child_content = self
                .repository
                .get_content(&edge.child_content_id)
                .await
                .map_err(ContentError::from)?;
            let grandchildren = self
                .repository
                .list_derived_content(
                    silo_repo::DerivedContentFilter::default().with_parent_id(edge.child_content_id.clone()),
                )
                .await
                .map_err(ContentError::from)?;
            child_nodes.push(self.ready_node(child_content, grandchildren).await?);
        }

        let root = ReadyNode::with_children(content.status, child_nodes);
        Ok(silo_model::is_ready(&root))
    }

    /// `GetDerivedTree(id)`: the full subtree rooted at `id`,
    /// recursing through every level of `DerivedContent` edges.
    pub async fn get_derived_tree(&self, id: &ContentId) -> ContentResult<DerivedTreeNode> {
        let content = self.repository.get_content(id).await.map_err(ContentError::from)?;
        self.derived_tree_node(content, None).await
    }

    fn derived_tree_node<'a>(
        &'a self,
        content: Content,
        edge: Option<DerivedContent>,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = ContentResult<DerivedTreeNode>> + Send + 'a>> {
        Box::pin(async move {
            let edges = self
                .repository
                .list_derived_content(silo_repo::DerivedContentFilter::default().with_parent_id(content.id.clone()))
                .await
                .map_err(ContentError::from)?;

            let mut children = Vec::with_capacity(edges.len());
            for child_edge in edges {
                let child_content = self
                    .repository
                    .get_content(&child_edge.child_content_id)
                    .await
                    .map_err(ContentError::from)?;
                children.push(self.derived_tree_node(child_content, Some(child_edge)).await?);
            }

            Ok(DerivedTreeNode { content, edge, children })
        })
    }

    fn ready_node<'a>(
        &'a self,
        content: Content,
        children: Vec<silo_model::DerivedContent>,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = ContentResult<ReadyNode>> + Send + 'a>> {
        Box::pin(async move {
            let mut child_nodes = Vec::with_capacity(children.len());
            for edge in &children {
                let child_content = self
                    .repository
                    .get_content(&edge.child_content_id)
                    .await
                    .map_err(ContentError::from)?;
                let grandchildren = self
                    .repository
                    .list_derived_content(
                        silo_repo::DerivedContentFilter::default()
                            .with_parent_id(edge.child_content_id.clone()),
                    )
                    .await
                    .map_err(ContentError::from)?;
                child_nodes.push(self.ready_node(child_content, grandchildren).await?);
            }
            Ok(ReadyNode::with_children(content.status, child_nodes))
        })
    }
}
