//! Repertoire tree model.
//!
//! A repertoire is an ordered tree of [RepertoireNode]s: the root is a starting
//! position without a move, each child is reached from its parent by one move
//! (in SAN), and the first child of a node is its main line.
//!
//! Unlike an arena, the tree *owns* its children directly. Back-references
//! (`parent_id`, `transposition_of`) are plain [NodeId]s, resolved through the
//! lookups in [tree]. During construction, the PGN reader collects nodes in an
//! index-based arena first and assembles the owned tree at the end.

/// Aggregate numbers describing a tree
pub mod metadata;
/// Node, id and color types
pub mod node;
/// Arena used while building trees
pub(crate) mod node_arena;
/// Tree primitives and iterators
pub mod tree;

pub use metadata::Metadata;
pub use node::{Color, NodeId, RepertoireNode};
pub use tree::{BreadthFirstIter, PreOrderIter};
