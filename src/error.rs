//! Errors of tree operations and of the repertoire service.
//!
//! Reading PGN reports a [ParsingError](crate::parser::ParsingError); everything
//! that works on existing trees or repertoires reports a [RepertoireError].
//!
//! # Example
//! ```
//! use repertoire::error::RepertoireError;
//!
//! let err = RepertoireError::NameTooLong { max: 100 };
//! assert_eq!(err.to_string(), "name is longer than 100 characters");
//! ```

use crate::model::NodeId;
use crate::parser::ParsingError;
use crate::service::{RepertoireId, StoreError};
use thiserror::Error;

/// Errors from tree operations and repertoire management.
#[derive(Debug, Error)]
pub enum RepertoireError {
    // Structural
    /// No node with this id exists in the tree.
    #[error("node {0} not found")]
    NodeNotFound(NodeId),

    /// The node a move should be added to does not exist.
    #[error("parent node {0} not found")]
    ParentNotFound(NodeId),

    /// The parent already has a child reached by this move.
    #[error("move '{0}' already exists at this position")]
    MoveAlreadyExists(String),

    #[error("the root cannot be deleted")]
    CannotDeleteRoot,

    #[error("the root cannot be extracted")]
    CannotExtractRoot,

    #[error("the root cannot carry a comment")]
    CannotCommentRoot,

    /// The oracle rejected the move at the parent's position.
    #[error("illegal move '{0}'")]
    IllegalMove(String),

    // Policy
    #[error("name is required")]
    NameRequired,

    #[error("name is longer than {max} characters")]
    NameTooLong {
        /// Allowed number of characters
        max: usize,
    },

    /// The owner already has the maximum number of repertoires.
    #[error("repertoire limit of {max} reached")]
    LimitReached {
        /// Allowed number of repertoires per owner
        max: usize,
    },

    #[error("merging needs at least two repertoires")]
    MergeMinimumTwo,

    #[error("only repertoires of the same color can be merged")]
    MergeColorMismatch,

    #[error("a repertoire was named more than once")]
    MergeDuplicateIds,

    // Persistence
    /// No repertoire with this id exists for the caller.
    #[error("repertoire {0} not found")]
    NotFound(RepertoireId),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// The merged repertoire was saved, but some sources could not be deleted.
    /// The merged repertoire is kept.
    #[error("merged into {merged}, but {} source(s) could not be deleted", failed.len())]
    SourceDeletionFailed {
        /// Id of the saved, merged repertoire
        merged: RepertoireId,
        /// Sources still present
        failed: Vec<RepertoireId>,
    },

    // Import
    #[error("PGN import failed: {0}")]
    Parsing(#[from] ParsingError),
}
