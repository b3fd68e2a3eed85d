//! PGN reader and writer for repertoire trees.
//!
//! This module provides [`PgnParser`] to turn PGN into a [`RepertoireNode`]
//! tree, and [`to_pgn`] to write a tree back as movetext. Reading happens in
//! two stages: a [`Tokenizer`] splits movetext into [`Token`]s, then the
//! parser builds the tree from the tokens, asking a
//! [`PositionOracle`](crate::position::PositionOracle) about every move.
//!
//! # Quick API
//! For simple use cases with default settings:
//! * [`parse_str`] - parses a PGN game (tag pairs optional), returns the tree
//! * [`parse_movetext`] - parses bare movetext, returns the tree
//! * [`tokenize`] - splits movetext into tokens
//!
//! # Full API
//! For more control, configure a [`PgnParser`]:
//! * [`PgnParser::parse_str`] - parse a game, returning tree and tag pairs
//! * [`PgnParser::parse_movetext`] - parse bare movetext
//! * [`PgnParser::build`] - build from a token stream
//!
//! # Format
//! * `game ::= tag_pair* movetext`
//! * `tag_pair ::= '[' name '"' value '"' ']'`
//! * `movetext ::= (move_number | move | nag | comment | variation)* result?`
//! * `variation ::= '(' movetext ')'`
//!
//! Furthermore:
//! * A variation is an alternative to the move right before it
//! * Moves already present in the tree are reused, so repeated lines merge
//! * Only the standard starting position is supported

mod defs;
pub mod headers;
mod parser;
pub mod tokenizer;
pub mod writer;

pub use self::headers::PgnHeaders;
pub use self::parser::PgnParser;
pub use self::tokenizer::{Token, Tokenizer, tokenize};
pub use self::writer::to_pgn;

use crate::model::RepertoireNode;
use crate::parser::ParsingError;

// =#========================================================================#=
// QUICK PARSING API (pub)
// =#========================================================================#=
/// Parses a single PGN game with default settings and returns its tree.
///
/// Tag pairs are optional; a `FEN` tag must name the standard starting position.
///
/// # Arguments
/// * `pgn` - Tag pairs (optional) followed by movetext
///
/// # Returns
/// * `RepertoireNode` - Root of the tree
/// * [`ParsingError`] - If a tag pair is malformed, a move is illegal or the
///   variation structure is invalid
///
/// # Example
/// ```
/// use repertoire::pgn::parse_str;
///
/// let tree = parse_str("[Event \"Training\"]\n\n1. e4 e5 2. Nf3 Nc6 *").unwrap();
/// assert_eq!(tree.children()[0].san(), Some("e4"));
/// ```
pub fn parse_str(pgn: &str) -> Result<RepertoireNode, ParsingError> {
    PgnParser::new().parse_str(pgn).map(|(tree, _headers)| tree)
}

/// Parses bare movetext with default settings and returns its tree.
pub fn parse_movetext(movetext: &str) -> Result<RepertoireNode, ParsingError> {
    PgnParser::new().parse_movetext(movetext)
}
