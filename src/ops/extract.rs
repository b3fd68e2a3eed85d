//! Splitting a subtree off a repertoire tree.

use crate::error::RepertoireError;
use crate::model::node::{NodeId, RepertoireNode};
use crate::model::node_arena::{ArenaIndex, NodeArena, ROOT};
use crate::model::tree::{
    CopiedIds, clear_dangling_transpositions, deep_clone, delete_by_id, find_node, find_node_mut,
    path_to,
};
use std::collections::HashSet;
use tracing::debug;

/// Result of [extract].
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    /// The original tree without the target and its subtree
    pub pruned: RepertoireNode,
    /// The line from the root to the target, followed by the target's subtree
    pub extracted: RepertoireNode,
    /// Move reaching the target, e.g. for naming the extracted tree
    pub target_move: String,
}

/// Splits the subtree at `target_id` off `tree`.
///
/// The extracted tree is a *spine*, a copy of the path from the root to the
/// target (each spine node with fresh id, same position, move and comment,
/// and the next spine node as only child), whose last node carries a copy of
/// the target's subtree. The pruned tree is a copy of `tree` with the target
/// removed. `tree` itself is left untouched.
///
/// No line is lost to a transposition pointer on either side. A pointer in
/// the copied subtree whose canonical node lies outside it receives a copy of
/// the canonical node's continuation and becomes a regular node; so does a
/// pointer left in the pruned tree whose canonical node was removed. Pointers
/// whose canonical node is on the same side keep pointing at it.
///
/// # Errors
/// * `CannotExtractRoot` - If `target_id` is the root
/// * `NodeNotFound` - If no node has `target_id`
///
/// # Example
/// ```
/// use repertoire::ops::extract;
/// use repertoire::pgn::parse_movetext;
///
/// let tree = parse_movetext("1. e4 e5 (1... c5 2. Nf3) 2. Nf3").unwrap();
/// let c5 = tree.children()[0].children()[1].id();
///
/// let extraction = extract(&tree, c5).unwrap();
/// assert_eq!(extraction.target_move, "c5");
/// assert_eq!(extraction.extracted.children()[0].children()[0].san(), Some("c5"));
/// assert_eq!(extraction.pruned.children()[0].children().len(), 1);
/// ```
pub fn extract(tree: &RepertoireNode, target_id: NodeId) -> Result<Extraction, RepertoireError> {
    if tree.id() == target_id {
        return Err(RepertoireError::CannotExtractRoot);
    }
    let path = path_to(tree, target_id).ok_or(RepertoireError::NodeNotFound(target_id))?;
    let Some((&target, _)) = path.split_last() else {
        return Err(RepertoireError::NodeNotFound(target_id));
    };
    let target_move = target.san().unwrap_or_default().to_string();

    let extracted = build_spine(tree, &path).ok_or(RepertoireError::NodeNotFound(target_id))?;

    let removed: HashSet<NodeId> = target.pre_order_iter().map(RepertoireNode::id).collect();
    let mut pruned = tree.clone();
    delete_by_id(&mut pruned, target_id).ok_or(RepertoireError::NodeNotFound(target_id))?;
    let restored = restore_removed_continuations(&mut pruned, tree, &removed);
    let cleared = clear_dangling_transpositions(&mut pruned);

    debug!(
        spine = path.len(),
        restored,
        cleared,
        target = %target_id,
        "[EXTRACT] Split subtree"
    );
    Ok(Extraction {
        pruned,
        extracted,
        target_move,
    })
}

/// Copies the nodes of `path` into a linear chain under fresh ids; the last
/// node is replaced by a copy of the whole subtree of the last node of `path`
/// (see [copy_subtree]).
///
/// Returns `None` for an empty path.
fn build_spine(tree: &RepertoireNode, path: &[&RepertoireNode]) -> Option<RepertoireNode> {
    // ids are assigned top-down so every node knows its parent's id
    let ids: Vec<NodeId> = path.iter().map(|_| NodeId::new()).collect();

    let mut chain: Option<RepertoireNode> = None;
    for (depth, original) in path.iter().enumerate().rev() {
        let parent_id = depth.checked_sub(1).map(|parent| ids[parent]);
        let node = match chain.take() {
            Some(next) => {
                let mut node = original.detached_copy(ids[depth], parent_id);
                node.children.push(next);
                node
            }
            None => copy_subtree(tree, original, ids[depth], parent_id),
        };
        chain = Some(node);
    }

    chain
}

/// Copies `start` and its subtree under fresh ids, `start`'s copy taking
/// `id` and `parent_id`.
///
/// A pointer whose canonical node (looked up in `tree`) is not part of the
/// copy takes a copy of the canonical node's children instead of its link.
/// Later pointers to the same canonical node then point at that copy.
fn copy_subtree(
    tree: &RepertoireNode,
    start: &RepertoireNode,
    id: NodeId,
    parent_id: Option<NodeId>,
) -> RepertoireNode {
    let inside: HashSet<NodeId> = start.pre_order_iter().map(RepertoireNode::id).collect();
    let mut copied = CopiedIds::default();
    let mut arena = NodeArena::new(start.detached_copy(id, parent_id));

    let mut stack: Vec<(&RepertoireNode, ArenaIndex)> = vec![(start, ROOT)];
    while let Some((source, index)) = stack.pop() {
        let copy_id = arena.node(index).id();
        let continuation = match source.transposition_of() {
            Some(canonical) if !inside.contains(&canonical) && !copied.contains(canonical) => {
                copied.alias(source.id(), copy_id);
                copied.alias(canonical, copy_id);
                find_node(tree, canonical).map_or(source.children(), RepertoireNode::children)
            }
            _ => {
                copied.record(source, copy_id);
                source.children()
            }
        };
        for child in continuation.iter().rev() {
            let child_index = arena.add_child(index, child.detached_copy(NodeId::new(), None));
            stack.push((child, child_index));
        }
    }

    let mut copy = arena.into_tree();
    copied.restore_pointers(&mut copy);
    copy
}

/// Gives every pointer in `pruned` whose canonical node is in `removed` a
/// copy of that node's children (taken from `original`), turning it into a
/// regular node.
///
/// # Returns
/// Number of pointers turned into regular nodes
fn restore_removed_continuations(
    pruned: &mut RepertoireNode,
    original: &RepertoireNode,
    removed: &HashSet<NodeId>,
) -> usize {
    let orphaned: Vec<(NodeId, NodeId)> = pruned
        .pre_order_iter()
        .filter_map(|node| {
            node.transposition_of()
                .filter(|canonical| removed.contains(canonical))
                .map(|canonical| (node.id(), canonical))
        })
        .collect();

    let mut restored = 0;
    for (pointer_id, canonical_id) in orphaned {
        let (Some(canonical), Some(pointer)) =
            (find_node(original, canonical_id), find_node_mut(pruned, pointer_id))
        else {
            continue;
        };
        let mut continuation = deep_clone(canonical, Some(pointer_id)).children;
        for child in &mut continuation {
            child.parent_id = Some(pointer_id);
        }
        pointer.children = continuation;
        pointer.transposition_of = None;
        restored += 1;
    }
    restored
}
