//! Index-based scratch storage for building a repertoire tree.
//!
//! While a tree is under construction the builder needs to walk from a node
//! back to its parent (to open a variation) and from a node down to a child
//! by move. An owned [RepertoireNode] tree can do neither cheaply, so nodes
//! are first collected in a [NodeArena] and referenced by [ArenaIndex].
//! [NodeArena::into_tree] then assembles the owned tree in one pass.

use crate::model::node::RepertoireNode;

/// Index of a node in a [NodeArena].
pub(crate) type ArenaIndex = usize;

/// Arena index of the root.
pub(crate) const ROOT: ArenaIndex = 0;

/// Arena of childless [RepertoireNode] payloads plus their links.
///
/// # Structure
/// - The root has index [ROOT]; every other node lives at `nodes[index - 1]`
/// - A child always has a larger index than its parent
/// - `children[index]` keeps the insertion order of the children of `index`
#[derive(Debug)]
pub(crate) struct NodeArena {
    root: RepertoireNode,
    nodes: Vec<RepertoireNode>,
    parents: Vec<ArenaIndex>,
    children: Vec<Vec<ArenaIndex>>,
}

impl NodeArena {
    /// Creates an arena holding only `root`. Children of `root` are dropped.
    pub(crate) fn new(mut root: RepertoireNode) -> Self {
        root.children.clear();
        Self {
            root,
            nodes: Vec::new(),
            parents: Vec::new(),
            children: vec![Vec::new()],
        }
    }

    /// Returns the number of nodes, root included.
    pub(crate) fn len(&self) -> usize {
        self.nodes.len() + 1
    }

    /// Appends `node` as last child of `parent` and returns its index.
    ///
    /// The node's `parent_id` is rewritten to the id of `parent`; any children
    /// the payload carries are dropped.
    pub(crate) fn add_child(&mut self, parent: ArenaIndex, mut node: RepertoireNode) -> ArenaIndex {
        node.parent_id = Some(self.node(parent).id());
        node.children.clear();

        let index = self.len();
        self.nodes.push(node);
        self.parents.push(parent);
        self.children.push(Vec::new());
        self.children[parent].push(index);
        index
    }

    /// Returns the node at `index`.
    pub(crate) fn node(&self, index: ArenaIndex) -> &RepertoireNode {
        if index == ROOT {
            &self.root
        } else {
            &self.nodes[index - 1]
        }
    }

    /// Returns the node at `index` mutably.
    pub(crate) fn node_mut(&mut self, index: ArenaIndex) -> &mut RepertoireNode {
        if index == ROOT {
            &mut self.root
        } else {
            &mut self.nodes[index - 1]
        }
    }

    /// Returns the parent of `index`, or `None` for the root.
    pub(crate) fn parent(&self, index: ArenaIndex) -> Option<ArenaIndex> {
        if index == ROOT {
            None
        } else {
            Some(self.parents[index - 1])
        }
    }

    /// Returns the child of `parent` reached by `san`, if present.
    pub(crate) fn child_with_move(&self, parent: ArenaIndex, san: &str) -> Option<ArenaIndex> {
        self.children[parent]
            .iter()
            .copied()
            .find(|&child| self.node(child).san() == Some(san))
    }

    /// Returns the moves leading from the root to `index`, in playing order.
    pub(crate) fn moves_from_root(&self, index: ArenaIndex) -> Vec<&str> {
        let mut moves = Vec::new();
        let mut current = index;
        while let Some(parent) = self.parent(current) {
            if let Some(san) = self.node(current).san() {
                moves.push(san);
            }
            current = parent;
        }
        moves.reverse();
        moves
    }

    /// Assembles the owned tree.
    ///
    /// Nodes are popped from the back: since children always follow their
    /// parent, every node is complete by the time it is popped.
    pub(crate) fn into_tree(self) -> RepertoireNode {
        let NodeArena {
            mut root,
            mut nodes,
            parents,
            ..
        } = self;

        while let Some(mut node) = nodes.pop() {
            // children were attached last-to-first
            node.children.reverse();
            let parent = parents[nodes.len()];
            if parent == ROOT {
                root.children.push(node);
            } else {
                nodes[parent - 1].children.push(node);
            }
        }

        root.children.reverse();
        root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::node::{Color, NodeId};

    fn child(san: &str) -> RepertoireNode {
        RepertoireNode::new_child(NodeId::new(), san.to_string(), String::new(), 1, Color::White)
    }

    #[test]
    fn test_into_tree_keeps_child_order() {
        let root = RepertoireNode::new_root();
        let root_id = root.id();
        let mut arena = NodeArena::new(root);

        let e4 = arena.add_child(ROOT, child("e4"));
        let d4 = arena.add_child(ROOT, child("d4"));
        let e5 = arena.add_child(e4, child("e5"));
        arena.add_child(e4, child("c5"));
        arena.add_child(d4, child("d5"));
        arena.add_child(e5, child("Nf3"));
        arena.add_child(ROOT, child("c4"));
        assert_eq!(arena.len(), 8);

        let tree = arena.into_tree();
        assert_eq!(tree.id(), root_id);
        let moves: Vec<_> = tree.children().iter().filter_map(|c| c.san()).collect();
        assert_eq!(moves, vec!["e4", "d4", "c4"]);

        let e4 = &tree.children()[0];
        assert_eq!(e4.parent_id(), Some(root_id));
        let replies: Vec<_> = e4.children().iter().filter_map(|c| c.san()).collect();
        assert_eq!(replies, vec!["e5", "c5"]);
        assert_eq!(e4.children()[0].children()[0].san(), Some("Nf3"));
        assert_eq!(e4.children()[0].children()[0].parent_id(), Some(e4.children()[0].id()));
    }

    #[test]
    fn test_parent_and_moves_from_root() {
        let mut arena = NodeArena::new(RepertoireNode::new_root());
        let e4 = arena.add_child(ROOT, child("e4"));
        let e5 = arena.add_child(e4, child("e5"));
        let nf3 = arena.add_child(e5, child("Nf3"));

        assert_eq!(arena.parent(ROOT), None);
        assert_eq!(arena.parent(nf3), Some(e5));
        assert_eq!(arena.moves_from_root(nf3), vec!["e4", "e5", "Nf3"]);
        assert!(arena.moves_from_root(ROOT).is_empty());
        assert_eq!(arena.child_with_move(e4, "e5"), Some(e5));
        assert_eq!(arena.child_with_move(e4, "c5"), None);
    }
}
