//! Merging repertoire trees.
//!
//! Two nodes match when they are reached by the same move text from matching
//! parents. Matching nodes are merged recursively; everything else from the
//! source is copied in under fresh ids. Sources are never modified.

use crate::model::node::RepertoireNode;
use crate::model::tree::{CopiedIds, deep_clone_recording};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Merges the children of `source` into `target`.
///
/// For each child `c` of `source`:
/// * If `target` has a child `t` with the same move, `c` is merged into `t`
///   recursively, and `c`'s comment is copied onto `t` only if `t` has none
/// * Otherwise a copy of `c` and its subtree, under fresh ids, is appended to
///   `target`'s children
///
/// Transposition links among the copied lines are kept when their canonical
/// node was copied or matched as well, and then name that node in `target`.
///
/// Roots are matched by definition; `source`'s position is not compared.
///
/// # Example
/// ```
/// use repertoire::ops::merge_into;
/// use repertoire::pgn::parse_movetext;
///
/// let mut target = parse_movetext("1. e4 e5").unwrap();
/// let source = parse_movetext("1. e4 (1. d4) 1... c5").unwrap();
/// merge_into(&mut target, &source);
///
/// assert_eq!(target.children().len(), 2); // e4, d4
/// assert_eq!(target.children()[0].children().len(), 2); // e5, c5
/// ```
pub fn merge_into(target: &mut RepertoireNode, source: &RepertoireNode) {
    merge_children(target, source.children());
}

/// Merges `children` into the children of `target` (see [merge_into]).
pub fn merge_children(target: &mut RepertoireNode, children: &[RepertoireNode]) {
    let mut copied = CopiedIds::default();
    // (target node, source nodes whose children still have to be merged into it)
    let mut work: Vec<(&mut RepertoireNode, Vec<&RepertoireNode>)> =
        vec![(&mut *target, children.iter().collect())];

    while let Some((target, sources)) = work.pop() {
        warn_on_duplicate_moves(target);

        // source nodes matched by each child of target, by child index
        let mut matched: Vec<Vec<&RepertoireNode>> = Vec::new();
        for source in sources {
            let existing = target
                .children
                .iter()
                .position(|t| t.san.is_some() && t.san == source.san);
            match existing {
                Some(index) => {
                    if index >= matched.len() {
                        matched.resize_with(index + 1, Vec::new);
                    }
                    matched[index].push(source);
                }
                None => {
                    let target_id = target.id;
                    let copy = deep_clone_recording(source, Some(target_id), &mut copied);
                    target.children.push(copy);
                }
            }
        }

        for (existing, sources) in target.children.iter_mut().zip(matched) {
            for source in &sources {
                copied.alias(source.id, existing.id);
                if existing.comment.is_none() {
                    existing.comment = source.comment.clone();
                }
            }

            let continuations: Vec<&RepertoireNode> =
                sources.iter().flat_map(|&s| s.children.iter()).collect();
            if continuations.is_empty() {
                continue;
            }
            if existing.transposition_of.take().is_some() {
                // a pointer receiving a continuation becomes a regular node again
                debug!(node = %existing.id, "[MERGE] Transposition pointer extended");
            }
            work.push((existing, continuations));
        }
    }

    let restored = copied.restore_pointers(target);
    if restored > 0 {
        debug!(restored, "[MERGE] Transposition pointers carried over");
    }
}

/// Merges all `sources`, in order, into a new tree rooted at the standard start.
///
/// # Arguments
/// * `sources` - Trees to merge; left untouched
///
/// # Returns
/// A new tree with fresh ids containing every line of every source
pub fn merge_trees<'a>(sources: impl IntoIterator<Item = &'a RepertoireNode>) -> RepertoireNode {
    let mut merged = RepertoireNode::new_root();
    for source in sources {
        merge_into(&mut merged, source);
    }
    merged
}

/// Logs if `node` has two children with the same move, which merging by move
/// text cannot tell apart.
fn warn_on_duplicate_moves(node: &RepertoireNode) {
    let mut seen = HashSet::with_capacity(node.children.len());
    for child in &node.children {
        if let Some(san) = child.san() {
            if !seen.insert(san) {
                warn!(node = %node.id, san, "[MERGE] Sibling moves are not unique");
            }
        }
    }
}
