//! Repertoire is a library to build and maintain chess opening repertoires
//! as trees of positions.
//!
//! This crate reads PGN (including nested variations and comments) into a
//! tree of positions and offers the operations needed to maintain such trees.
//! Core functionality provided:
//! - PGN: Tokenize movetext, read tag pairs, build a tree, write movetext back.
//!   See [crate::pgn].
//! - Tree model: [RepertoireNode] trees owning their children, with ids as
//!   back-references, plus lookup, deletion, deep clone and [Metadata].
//!   See [crate::model].
//! - Operations: merge trees by move, collapse transpositions, extract a
//!   subtree, single-node edits. See [crate::ops].
//! - Service: the same operations on persisted repertoires, with owner
//!   policies, behind the [RepertoireStore](service::RepertoireStore) trait.
//!   See [crate::service].
//! - Chess rules are not implemented here but asked from a
//!   [PositionOracle](position::PositionOracle); the default one uses `shakmaty`.
//!
//! Limitations:
//! - Only the standard starting position
//! - Move annotation glyphs and NAGs are read but not stored
//! - Merging matches moves by their SAN text only
//!
//! # Usage patterns
//! 1. Several functions provide quick access with default settings,
//!    e.g. [parse_pgn_str] or [pgn::parse_movetext].
//! 2. Configure a [PgnParser](pgn::PgnParser) or a
//!    [RepertoireService](service::RepertoireService) for full control.
//!
//! ## Example Default Configuration
//! ```
//! use repertoire::parse_pgn_str;
//!
//! let tree = parse_pgn_str("1. e4 e5 2. Nf3 Nc6 *").unwrap();
//! let metadata = repertoire::model::tree::compute_metadata(&tree);
//! assert_eq!(metadata.total_nodes, 5);
//! assert_eq!(metadata.total_moves, 4);
//! assert_eq!(metadata.deepest_depth, 4);
//! ```
//!
//! ## Example Tree Operations
//! ```
//! use repertoire::ops::{canonicalize, merge_trees};
//! use repertoire::pgn::parse_movetext;
//!
//! let italian = parse_movetext("1. e4 e5 2. Nf3 Nc6 3. Bc4").unwrap();
//! let reti = parse_movetext("1. Nf3 e5 2. e4 Nc6 3. Bb5").unwrap();
//!
//! let mut merged = merge_trees([&italian, &reti]);
//! let report = canonicalize(&mut merged);
//! assert_eq!(report.folded, 1); // 2. Nf3 and 2. e4 reach the same position
//! ```

pub mod error;
pub mod model;
pub mod ops;
pub mod parser;
pub mod pgn;
pub mod position;
pub mod service;

pub use model::{Metadata, RepertoireNode};

use crate::parser::ParsingError;

/// Parses a PGN game (tag pairs optional) from a string with default settings.
///
/// # Arguments
/// * `pgn` - PGN game, e.g. `"1. e4 e5 (1... c5) 2. Nf3 *"`
///
/// # Returns
/// * `RepertoireNode` - Root of the tree, at the standard starting position
/// * [ParsingError] - If the PGN is malformed or contains an illegal move
pub fn parse_pgn_str(pgn: &str) -> Result<RepertoireNode, ParsingError> {
    pgn::parse_str(pgn)
}
