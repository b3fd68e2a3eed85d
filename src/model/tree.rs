//! Tree primitives over owned [RepertoireNode] trees.
//!
//! This module provides lookup, deletion, deep cloning and metadata for
//! repertoire trees, plus the pre-order and breadth-first iterators everything
//! else is built on. Traversals use explicit work-lists, so the depth of a tree
//! is limited by memory rather than by the call stack.
//!
//! Internally, nodes are located by their *index path*: the sequence of child
//! positions leading from the root to the node. An index path is stable for as
//! long as no sibling before any node on the path is removed.

use crate::model::metadata::Metadata;
use crate::model::node::{NodeId, RepertoireNode};
use crate::model::node_arena::{ArenaIndex, NodeArena, ROOT};
use std::collections::{HashMap, HashSet, VecDeque};

// =#========================================================================#=
// LOOKUP
// =#========================================================================#=
/// Finds the node with the given id (depth-first, pre-order; first match).
pub fn find_node(root: &RepertoireNode, id: NodeId) -> Option<&RepertoireNode> {
    root.pre_order_iter().find(|node| node.id() == id)
}

/// Finds the node with the given id and returns it mutably.
pub fn find_node_mut(root: &mut RepertoireNode, id: NodeId) -> Option<&mut RepertoireNode> {
    let path = index_path(root, id)?;
    node_at_path_mut(root, &path)
}

/// Returns whether `parent` already has a child reached by `san`.
pub fn exists_as_child(parent: &RepertoireNode, san: &str) -> bool {
    parent.children().iter().any(|child| child.san() == Some(san))
}

/// Returns the nodes on the path from `root` to the node with the given id,
/// both ends included, or `None` if no such node exists.
pub fn path_to(root: &RepertoireNode, id: NodeId) -> Option<Vec<&RepertoireNode>> {
    let path = index_path(root, id)?;

    let mut nodes = Vec::with_capacity(path.len() + 1);
    let mut current = root;
    nodes.push(current);
    for &index in &path {
        current = current.children().get(index)?;
        nodes.push(current);
    }
    Some(nodes)
}

/// Returns the index path to the node with the given id (empty for the root).
pub(crate) fn index_path(root: &RepertoireNode, id: NodeId) -> Option<Vec<usize>> {
    let mut path: Vec<usize> = Vec::new();
    // (node, depth, index among siblings)
    let mut stack = vec![(root, 0usize, 0usize)];

    while let Some((node, depth, index)) = stack.pop() {
        // in pre-order, path[..depth - 1] still describes the parent of `node`
        if depth > 0 {
            path.truncate(depth - 1);
            path.push(index);
        }
        if node.id() == id {
            return Some(path);
        }
        for (i, child) in node.children().iter().enumerate().rev() {
            stack.push((child, depth + 1, i));
        }
    }
    None
}

/// Follows an index path from `root`.
pub(crate) fn node_at_path<'a>(root: &'a RepertoireNode, path: &[usize]) -> Option<&'a RepertoireNode> {
    path.iter()
        .try_fold(root, |node, &index| node.children.get(index))
}

/// Follows an index path from `root`, returning the node mutably.
pub(crate) fn node_at_path_mut<'a>(
    root: &'a mut RepertoireNode,
    path: &[usize],
) -> Option<&'a mut RepertoireNode> {
    path.iter()
        .try_fold(root, |node, &index| node.children.get_mut(index))
}

// =#========================================================================#=
// MUTATION
// =#========================================================================#=
/// Removes the node with the given id, together with its subtree, from its
/// parent's children.
///
/// # Returns
/// The removed subtree, or `None` if no node has this id. The root is never
/// found as anyone's child, so passing the root's id also yields `None`.
pub fn delete_by_id(root: &mut RepertoireNode, id: NodeId) -> Option<RepertoireNode> {
    let path = index_path(root, id)?;
    let (&index, parent_path) = path.split_last()?;
    let parent = node_at_path_mut(root, parent_path)?;
    if index < parent.children.len() {
        Some(parent.children.remove(index))
    } else {
        None
    }
}

/// Copies `node` and its whole subtree under brand-new ids.
///
/// Moves, positions, move numbers, side to move and comments are preserved;
/// every `parent_id` is rewritten to the new ids, with the copy of `node`
/// itself pointing at `new_parent_id`. A transposition link survives if its
/// canonical node is copied too (it then names the copy); links to nodes
/// outside the copied subtree are dropped.
///
/// # Arguments
/// * `node` - Root of the subtree to copy
/// * `new_parent_id` - Parent id for the copy of `node` (`None` for a new root)
pub fn deep_clone(node: &RepertoireNode, new_parent_id: Option<NodeId>) -> RepertoireNode {
    let mut copied = CopiedIds::default();
    let mut copy = deep_clone_recording(node, new_parent_id, &mut copied);
    copied.restore_pointers(&mut copy);
    copy
}

/// [deep_clone] without restoring transposition links; every copied node is
/// recorded in `copied` so links can be restored once all copies are placed.
pub(crate) fn deep_clone_recording(
    node: &RepertoireNode,
    new_parent_id: Option<NodeId>,
    copied: &mut CopiedIds,
) -> RepertoireNode {
    let root_id = NodeId::new();
    copied.record(node, root_id);
    let mut arena = NodeArena::new(node.detached_copy(root_id, new_parent_id));

    let mut stack: Vec<(&RepertoireNode, ArenaIndex)> =
        node.children().iter().rev().map(|child| (child, ROOT)).collect();
    while let Some((source, parent)) = stack.pop() {
        let id = NodeId::new();
        copied.record(source, id);
        let index = arena.add_child(parent, source.detached_copy(id, None));
        for child in source.children().iter().rev() {
            stack.push((child, index));
        }
    }

    arena.into_tree()
}

/// Ids handed out while copying nodes from one tree into another.
///
/// Copies lose their transposition links (see
/// [RepertoireNode::detached_copy]). Recording which node became which lets
/// the links be restored afterwards, pointing at the copies.
#[derive(Debug, Default)]
pub(crate) struct CopiedIds {
    /// source id -> id of the node standing in for it
    ids: HashMap<NodeId, NodeId>,
    /// (id of a pointer's copy, canonical id in the source)
    pointers: Vec<(NodeId, NodeId)>,
}

impl CopiedIds {
    /// Records that `copy` was made from `source`.
    pub(crate) fn record(&mut self, source: &RepertoireNode, copy: NodeId) {
        self.alias(source.id, copy);
        if let Some(canonical) = source.transposition_of {
            self.pointers.push((copy, canonical));
        }
    }

    /// Records that `stand_in` takes the place of the source node `source_id`,
    /// without copying its transposition link. The first stand-in wins.
    pub(crate) fn alias(&mut self, source_id: NodeId, stand_in: NodeId) {
        self.ids.entry(source_id).or_insert(stand_in);
    }

    /// Returns whether some node stands in for the source node `source_id`.
    pub(crate) fn contains(&self, source_id: NodeId) -> bool {
        self.ids.contains_key(&source_id)
    }

    /// Re-links copied pointers below `root` whose canonical node was copied
    /// (or matched) as well. Copies that gained children meanwhile stay
    /// regular nodes. A link is never made to name another pointer.
    ///
    /// # Returns
    /// Number of links restored
    pub(crate) fn restore_pointers(self, root: &mut RepertoireNode) -> usize {
        let resolved: HashMap<NodeId, NodeId> = self
            .pointers
            .iter()
            .filter_map(|(copy, canonical)| self.ids.get(canonical).map(|&target| (*copy, target)))
            .collect();
        if resolved.is_empty() {
            return 0;
        }

        let existing: HashMap<NodeId, NodeId> = root
            .pre_order_iter()
            .filter_map(|node| node.transposition_of.map(|target| (node.id, target)))
            .collect();

        let mut restored = 0;
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            if let Some(&target) = resolved.get(&node.id) {
                let target = existing.get(&target).copied().unwrap_or(target);
                if node.children.is_empty() && target != node.id {
                    node.transposition_of = Some(target);
                    restored += 1;
                }
            }
            stack.extend(node.children.iter_mut());
        }
        restored
    }
}

/// Clears every `transposition_of` that names an id no longer in the tree.
///
/// # Returns
/// Number of pointers cleared
pub fn clear_dangling_transpositions(root: &mut RepertoireNode) -> usize {
    let ids: HashSet<NodeId> = root.pre_order_iter().map(RepertoireNode::id).collect();

    let mut cleared = 0;
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.transposition_of.is_some_and(|target| !ids.contains(&target)) {
            node.transposition_of = None;
            cleared += 1;
        }
        stack.extend(node.children.iter_mut());
    }
    cleared
}

// =#========================================================================#=
// METADATA
// =#========================================================================#=
/// Computes the [Metadata] of the tree rooted at `root`.
pub fn compute_metadata(root: &RepertoireNode) -> Metadata {
    Metadata::of(root)
}

// =#========================================================================#=
// ITERATORS
// =#========================================================================#=
impl RepertoireNode {
    /// Returns an iterator over this node and its descendants in pre-order,
    /// children in order (main line first).
    pub fn pre_order_iter(&self) -> PreOrderIter<'_> {
        PreOrderIter::new(self)
    }

    /// Returns an iterator over this node and its descendants level by level,
    /// each paired with its depth below this node.
    pub fn breadth_first_iter(&self) -> BreadthFirstIter<'_> {
        BreadthFirstIter::new(self)
    }
}

/// Iterator for pre-order traversal (parents before children).
///
/// This iterator uses a stack-based approach to traverse the tree without recursion.
/// Each node is visited before any of its descendants.
pub struct PreOrderIter<'a> {
    stack: Vec<&'a RepertoireNode>,
}

impl<'a> PreOrderIter<'a> {
    pub(crate) fn new(root: &'a RepertoireNode) -> Self {
        PreOrderIter { stack: vec![root] }
    }
}

impl<'a> Iterator for PreOrderIter<'a> {
    type Item = &'a RepertoireNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;

        // Push children last first, so the main line is processed first
        self.stack.extend(node.children().iter().rev());

        Some(node)
    }
}

/// Iterator for breadth-first traversal, yielding `(node, depth)`.
///
/// Depth is counted from the node the iterator was started at (depth 0).
pub struct BreadthFirstIter<'a> {
    queue: VecDeque<(&'a RepertoireNode, usize)>,
}

impl<'a> BreadthFirstIter<'a> {
    pub(crate) fn new(root: &'a RepertoireNode) -> Self {
        BreadthFirstIter {
            queue: VecDeque::from([(root, 0)]),
        }
    }
}

impl<'a> Iterator for BreadthFirstIter<'a> {
    type Item = (&'a RepertoireNode, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let (node, depth) = self.queue.pop_front()?;
        self.queue
            .extend(node.children().iter().map(|child| (child, depth + 1)));
        Some((node, depth))
    }
}
