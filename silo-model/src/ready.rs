//! The recursive "ready" predicate:
//!
//! `ready(c) = status(c) ∈ {uploaded, processed} ∧ ∀ child d of c: ready(d)`
//!
//! Assembling the tree requires repository access (children of children),
//! so that part lives in `silo-service`. This module only holds the pure
//! function over an already-assembled tree, so it can be unit tested in
//! isolation on a hand-built 3-level tree.

use crate::status::ContentStatus;

/// A node in a Content's derivation tree, carrying just what `ready()` needs.
#[derive(Debug, Clone)]
pub struct ReadyNode {
    pub status: ContentStatus,
    pub children: Vec<ReadyNode>,
}

impl ReadyNode {
    pub fn leaf(status: ContentStatus) -> Self {
        Self {
            status,
            children: Vec::new(),
        }
    }

    pub fn with_children(status: ContentStatus, children: Vec<ReadyNode>) -> Self {
        Self { status, children }
    }
}

pub fn is_ready(node: &ReadyNode) -> bool {
    node.status.is_ready_status() && node.children.iter().all(is_ready)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ContentStatus::*;

    #[test]
    fn ready_requires_every_descendant_ready() {
        let leaf_ready = ReadyNode::leaf(Processed);
        let leaf_not_ready = ReadyNode::leaf(Processing);

        let mid_all_ready = ReadyNode::with_children(Uploaded, vec![leaf_ready.clone()]);
        let mid_one_not_ready =
            ReadyNode::with_children(Uploaded, vec![leaf_ready.clone(), leaf_not_ready.clone()]);

        let root_ready = ReadyNode::with_children(Processed, vec![mid_all_ready.clone()]);
        let root_not_ready = ReadyNode::with_children(Processed, vec![mid_one_not_ready]);
        let root_bad_status = ReadyNode::with_children(Processing, vec![mid_all_ready]);

        assert!(is_ready(&root_ready));
        assert!(!is_ready(&root_not_ready));
        assert!(!is_ready(&root_bad_status));
    }

    #[test]
    fn leaf_with_no_children_is_ready_iff_status_is_ready() {
        assert!(is_ready(&ReadyNode::leaf(Uploaded)));
        assert!(is_ready(&ReadyNode::leaf(Processed)));
        assert!(!is_ready(&ReadyNode::leaf(Created)));
        assert!(!is_ready(&ReadyNode::leaf(Failed)));
    }
}
