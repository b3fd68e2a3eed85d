//! Single-node edits of a repertoire tree.

use crate::error::RepertoireError;
use crate::model::node::{NodeId, RepertoireNode};
use crate::model::tree::{clear_dangling_transpositions, delete_by_id, exists_as_child, find_node_mut};
use crate::position::PositionOracle;
use tracing::trace;

/// Adds the move `san` below the node `parent_id`.
///
/// # Arguments
/// * `tree` - Root of the tree to change
/// * `parent_id` - Node the move is played from
/// * `san` - The move, in SAN
/// * `oracle` - Decides legality and the resulting position
///
/// # Returns
/// * `Ok(NodeId)` - Id of the new node (appended as last child)
/// * `Err(ParentNotFound)` - If `parent_id` is not in the tree
/// * `Err(MoveAlreadyExists)` - If the parent already has a child with this move
/// * `Err(IllegalMove)` - If the oracle rejects the move
pub fn add_move<O: PositionOracle>(
    tree: &mut RepertoireNode,
    parent_id: NodeId,
    san: &str,
    oracle: &O,
) -> Result<NodeId, RepertoireError> {
    let parent = find_node_mut(tree, parent_id).ok_or(RepertoireError::ParentNotFound(parent_id))?;
    let san = san.trim();
    if exists_as_child(parent, san) {
        return Err(RepertoireError::MoveAlreadyExists(san.to_string()));
    }

    // nodes keep four FEN fields; the move number is restored for the oracle
    let position = oracle
        .from_fen(&format!("{} 0 {}", parent.fen(), parent.move_number()))
        .ok_or_else(|| RepertoireError::IllegalMove(san.to_string()))?;
    if !oracle.is_legal(&position, san) {
        return Err(RepertoireError::IllegalMove(san.to_string()));
    }
    let next = oracle
        .apply(&position, san)
        .ok_or_else(|| RepertoireError::IllegalMove(san.to_string()))?;

    let child = RepertoireNode::new_child(
        parent.id(),
        san.to_string(),
        oracle.fen(&next),
        oracle.move_number(&next),
        oracle.side_to_move(&next),
    );
    let child_id = child.id();
    // a pointer that gets a continuation is no longer a pointer
    parent.transposition_of = None;
    parent.children.push(child);

    trace!(node = %child_id, san, "[EDIT] Added move");
    Ok(child_id)
}

/// Deletes the node `id` and its subtree.
///
/// Transposition pointers to deleted nodes are cleared.
///
/// # Returns
/// * `Ok(RepertoireNode)` - The removed subtree
/// * `Err(CannotDeleteRoot)` - If `id` is the root
/// * `Err(NodeNotFound)` - If `id` is not in the tree
pub fn delete_node(tree: &mut RepertoireNode, id: NodeId) -> Result<RepertoireNode, RepertoireError> {
    if tree.id() == id {
        return Err(RepertoireError::CannotDeleteRoot);
    }
    let removed = delete_by_id(tree, id).ok_or(RepertoireError::NodeNotFound(id))?;
    clear_dangling_transpositions(tree);
    Ok(removed)
}

/// Sets or clears the comment of node `id`.
///
/// `None`, or a comment that is blank after trimming, clears the comment.
///
/// # Errors
/// * `NodeNotFound` - If `id` is not in the tree
/// * `CannotCommentRoot` - If `id` is the root
pub fn set_comment(tree: &mut RepertoireNode, id: NodeId, comment: Option<&str>) -> Result<(), RepertoireError> {
    let node = find_node_mut(tree, id).ok_or(RepertoireError::NodeNotFound(id))?;
    if node.is_root() {
        return Err(RepertoireError::CannotCommentRoot);
    }

    node.comment = comment
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string);
    Ok(())
}
