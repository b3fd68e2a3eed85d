//! Collapsing transpositions inside one tree.
//!
//! Two nodes are the same position when they share `(fen, move_number)`.
//! The first such node in breadth-first order stays *canonical*; every later
//! one is folded into it: its continuation is merged into the canonical node
//! and it is left as a childless pointer (`transposition_of`) to the canonical
//! node. The same board at a different move number is a different position.
//!
//! Since a position fixes the number of moves played to reach it, all nodes
//! sharing a key sit at the same depth. The tree is therefore processed level
//! by level: folding at one level only changes the levels below it, which are
//! visited afterwards, so a single pass reaches a fixpoint.

use crate::model::node::{NodeId, RepertoireNode};
use crate::model::tree::{node_at_path, node_at_path_mut};
use crate::ops::merge::merge_children;
use std::collections::HashMap;
use std::mem;
use tracing::{debug, trace};

/// Identity of a position: normalized FEN and full-move number.
type PositionKey = (String, u32);

/// Index path of a node (see [tree](crate::model::tree)).
type IndexPath = Vec<usize>;

/// What [canonicalize] changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CanonicalizeReport {
    /// Duplicates turned into pointers to their canonical node
    pub folded: usize,
    /// Existing pointers redirected to another canonical node
    pub retargeted: usize,
    /// Existing pointers without any canonical node, turned back into regular nodes
    pub released: usize,
}

impl CanonicalizeReport {
    /// Returns `true` if the tree was not changed.
    pub fn is_unchanged(&self) -> bool {
        self.folded == 0 && self.retargeted == 0 && self.released == 0
    }
}

/// Folds all transpositions of `tree` into their canonical nodes, in place.
///
/// Children of a duplicate are merged into the canonical node with the rule
/// of [merge_into](crate::ops::merge_into) (match by move, else copy under
/// fresh ids). Afterwards the duplicate has no children and its
/// `transposition_of` names the canonical node. Pointers left by an earlier
/// run are kept pointing at the current canonical node. Running it again on
/// its own output changes nothing.
///
/// Metadata is not updated; recompute it afterwards.
///
/// # Example
/// ```
/// use repertoire::ops::canonicalize;
/// use repertoire::pgn::parse_movetext;
///
/// let mut tree = parse_movetext("1. e4 (1. Nf3 e5 2. e4 Nf6) 1... e5 2. Nf3 Nc6").unwrap();
/// let report = canonicalize(&mut tree);
/// assert_eq!(report.folded, 1);
/// ```
pub fn canonicalize(tree: &mut RepertoireNode) -> CanonicalizeReport {
    let mut report = CanonicalizeReport::default();
    let mut canonical: HashMap<PositionKey, (NodeId, IndexPath)> = HashMap::new();
    let mut level: Vec<IndexPath> = vec![Vec::new()];

    while !level.is_empty() {
        // 1. pick the canonical node per key: first regular node in order
        let mut duplicates: Vec<(IndexPath, PositionKey)> = Vec::new();
        let mut pointers: Vec<(IndexPath, PositionKey)> = Vec::new();
        for path in &level {
            let Some(node) = node_at_path(tree, path) else { continue };
            let key = (node.fen.clone(), node.move_number);
            if node.is_transposition() {
                pointers.push((path.clone(), key));
            } else if canonical.contains_key(&key) {
                duplicates.push((path.clone(), key));
            } else {
                canonical.insert(key, (node.id, path.clone()));
            }
        }

        // 2. fold duplicates into their canonical node
        for (path, key) in duplicates {
            let Some((canonical_id, canonical_path)) = canonical.get(&key).cloned() else { continue };
            let Some(duplicate) = node_at_path_mut(tree, &path) else { continue };
            let continuation = mem::take(&mut duplicate.children);
            duplicate.transposition_of = Some(canonical_id);
            trace!(node = %duplicate.id, canonical = %canonical_id, "[TRANSPOSITION] Folded");

            if let Some(target) = node_at_path_mut(tree, &canonical_path) {
                merge_children(target, &continuation);
            }
            report.folded += 1;
        }

        // 3. keep earlier pointers consistent with the canonical nodes
        for (path, key) in pointers {
            let Some(pointer) = node_at_path_mut(tree, &path) else { continue };
            match canonical.get(&key) {
                Some((canonical_id, _)) => {
                    if pointer.transposition_of != Some(*canonical_id) {
                        pointer.transposition_of = Some(*canonical_id);
                        report.retargeted += 1;
                    }
                }
                None => {
                    pointer.transposition_of = None;
                    canonical.insert(key, (pointer.id, path));
                    report.released += 1;
                }
            }
        }

        // 4. descend
        let mut next = Vec::new();
        for path in &level {
            let Some(node) = node_at_path(tree, path) else { continue };
            for index in 0..node.children.len() {
                let mut child_path = path.clone();
                child_path.push(index);
                next.push(child_path);
            }
        }
        level = next;
    }

    debug!(
        folded = report.folded,
        retargeted = report.retargeted,
        released = report.released,
        "[TRANSPOSITION] Canonicalized"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::node::Color;

    fn node(parent: &RepertoireNode, san: &str, fen: &str, move_number: u32) -> RepertoireNode {
        RepertoireNode::new_child(parent.id, san.to_string(), fen.to_string(), move_number, Color::White)
    }

    #[test]
    fn test_pointer_without_canonical_is_released() {
        let mut root = RepertoireNode::new_root();
        let mut a = node(&root, "a", "X", 1);
        a.transposition_of = Some(NodeId::new());
        root.children.push(a);

        let report = canonicalize(&mut root);
        assert_eq!(report.released, 1);
        assert!(!root.children[0].is_transposition());
    }

    #[test]
    fn test_stale_pointer_is_retargeted() {
        let mut root = RepertoireNode::new_root();
        let mut pointer = node(&root, "a", "X", 1);
        pointer.transposition_of = Some(NodeId::new());
        let regular = node(&root, "b", "X", 1);
        let regular_id = regular.id;
        root.children.push(pointer);
        root.children.push(regular);

        let report = canonicalize(&mut root);
        assert_eq!(report.retargeted, 1);
        assert_eq!(report.folded, 0);
        assert_eq!(root.children[0].transposition_of(), Some(regular_id));
    }

    #[test]
    fn test_second_run_is_unchanged() {
        let mut root = RepertoireNode::new_root();
        let mut a = node(&root, "a", "X", 1);
        a.children.push(node(&a, "c", "Y", 2));
        let b = node(&root, "b", "X", 1);
        root.children.push(a);
        root.children.push(b);

        // "b" comes after "a" in breadth-first order, so "a" stays canonical
        assert_eq!(canonicalize(&mut root).folded, 1);
        assert_eq!(root.children[1].transposition_of(), Some(root.children[0].id()));
        assert!(canonicalize(&mut root).is_unchanged());
    }
}
