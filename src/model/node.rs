//! Node module for repertoire tree representation.

use crate::position::STANDARD_START_FEN;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// =#========================================================================#=
// NODE ID
// =#========================================================================#=
/// Opaque unique identifier of a [RepertoireNode].
///
/// Fresh ids are random (UUID v4); an id is never reused for another node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(Uuid);

impl NodeId {
    /// Creates a fresh, unique id.
    pub fn new() -> Self {
        NodeId(Uuid::new_v4())
    }

    /// Wraps an existing UUID, e.g. one read back from storage.
    pub fn from_uuid(uuid: Uuid) -> Self {
        NodeId(uuid)
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// =#========================================================================#=
// COLOR
// =#========================================================================#=
/// Side in a chess game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// Returns the other side.
    pub fn opposite(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "white"),
            Color::Black => write!(f, "black"),
        }
    }
}

// =#========================================================================#=
// REPERTOIRE NODE
// =#========================================================================#=
/// One position in a repertoire tree, reached by one move from its parent.
///
/// Children are owned and ordered; the first child is the main line.
/// `parent_id` and `transposition_of` are plain ids into the same tree,
/// resolved through [find_node](crate::model::tree::find_node) when needed.
///
/// # Invariants
/// - Only the root has no move (`san() == None`); the root never carries a comment
/// - No two direct children share the same move
/// - A node with `transposition_of` set has no children
/// - `fen` holds exactly four fields (board, side to move, castling, en passant)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepertoireNode {
    pub(crate) id: NodeId,
    pub(crate) fen: String,
    #[serde(rename = "move", default, skip_serializing_if = "Option::is_none")]
    pub(crate) san: Option<String>,
    pub(crate) move_number: u32,
    pub(crate) color_to_move: Color,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) parent_id: Option<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) transposition_of: Option<NodeId>,
    #[serde(default)]
    pub(crate) children: Vec<RepertoireNode>,
}

impl RepertoireNode {
    /// Creates a root node at the standard starting position.
    pub fn new_root() -> Self {
        Self::root_at(STANDARD_START_FEN.to_string(), Color::White, 1)
    }

    /// Creates a root node at the given (normalized) position.
    pub fn root_at(fen: String, color_to_move: Color, move_number: u32) -> Self {
        RepertoireNode {
            id: NodeId::new(),
            fen,
            san: None,
            move_number,
            color_to_move,
            parent_id: None,
            comment: None,
            transposition_of: None,
            children: Vec::new(),
        }
    }

    /// Creates a childless node reached by `san` from the node `parent_id`.
    pub fn new_child(
        parent_id: NodeId,
        san: String,
        fen: String,
        move_number: u32,
        color_to_move: Color,
    ) -> Self {
        RepertoireNode {
            id: NodeId::new(),
            fen,
            san: Some(san),
            move_number,
            color_to_move,
            parent_id: Some(parent_id),
            comment: None,
            transposition_of: None,
            children: Vec::new(),
        }
    }

    /// Returns a childless copy of this node under a new id and parent.
    ///
    /// Keeps position, move and comment; the transposition link is dropped
    /// since it refers to an id of the tree this node came from.
    pub(crate) fn detached_copy(&self, id: NodeId, parent_id: Option<NodeId>) -> Self {
        RepertoireNode {
            id,
            fen: self.fen.clone(),
            san: self.san.clone(),
            move_number: self.move_number,
            color_to_move: self.color_to_move,
            parent_id,
            comment: self.comment.clone(),
            transposition_of: None,
            children: Vec::new(),
        }
    }

    /// Returns the id of this node.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Returns the normalized four-field FEN of this position.
    pub fn fen(&self) -> &str {
        &self.fen
    }

    /// Returns the move (SAN) that reached this node, or `None` for the root.
    pub fn san(&self) -> Option<&str> {
        self.san.as_deref()
    }

    /// Returns the full-move number at this position.
    pub fn move_number(&self) -> u32 {
        self.move_number
    }

    /// Returns whose turn it is at this position.
    pub fn color_to_move(&self) -> Color {
        self.color_to_move
    }

    /// Returns the id of the parent, or `None` for the root.
    pub fn parent_id(&self) -> Option<NodeId> {
        self.parent_id
    }

    /// Returns the comment attached to this node, if any.
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Returns the id of the canonical node if this node is a transposition pointer.
    pub fn transposition_of(&self) -> Option<NodeId> {
        self.transposition_of
    }

    /// Returns the children of this node, main line first.
    pub fn children(&self) -> &[RepertoireNode] {
        &self.children
    }

    /// Returns the child reached by `san`, if any.
    pub fn child(&self, san: &str) -> Option<&RepertoireNode> {
        self.children.iter().find(|c| c.san() == Some(san))
    }

    /// Returns `true` if this node is a root (has no move).
    pub fn is_root(&self) -> bool {
        self.san.is_none()
    }

    /// Returns `true` if this node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Returns `true` if this node is a transposition pointer.
    pub fn is_transposition(&self) -> bool {
        self.transposition_of.is_some()
    }

    /// Returns the side that played the move reaching this node,
    /// or `None` for the root.
    pub fn mover(&self) -> Option<Color> {
        self.san.as_ref().map(|_| self.color_to_move.opposite())
    }
}
