//! Aggregate numbers describing a repertoire tree.

use crate::model::node::RepertoireNode;
use crate::model::tree::BreadthFirstIter;
use serde::{Deserialize, Serialize};

/// Summary of a tree, derived from it and never authored on its own.
///
/// Recomputed with [Metadata::of] (or
/// [compute_metadata](crate::model::tree::compute_metadata)) after every
/// structural change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    /// Number of nodes including the root
    pub total_nodes: usize,
    /// Number of nodes reached by a move, transposition pointers included
    pub total_moves: usize,
    /// Length of the longest root-to-leaf path (root = 0)
    pub deepest_depth: usize,
}

impl Metadata {
    /// Computes the metadata of the tree rooted at `root` in one traversal.
    pub fn of(root: &RepertoireNode) -> Self {
        let mut metadata = Metadata::default();
        for (node, depth) in BreadthFirstIter::new(root) {
            metadata.total_nodes += 1;
            if node.san().is_some() {
                metadata.total_moves += 1;
            }
            metadata.deepest_depth = metadata.deepest_depth.max(depth);
        }
        metadata
    }
}
