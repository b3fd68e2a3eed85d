//! Error types for PGN import.
//!
//! This module provides [ParsingError] and [ParsingErrorType] for representing
//! and reporting errors that occur while reading PGN headers or building a
//! repertoire tree from movetext.

use crate::parser::byte_parser::ByteParser;
use crate::parser::byte_source::ByteSource;
use std::error::Error;
use std::fmt;
use thiserror::Error;

/// Default length of context provided by error from parser
const DEFAULT_CONTEXT_LENGTH: usize = 50;

// =#========================================================================#=
// PARSING ERROR TYPE
// =#========================================================================#=
/// Error types that can occur during PGN import.
#[derive(Error, PartialEq, Debug, Clone)]
pub enum ParsingErrorType {
    /// The oracle rejected a move in the position it was played from.
    #[error("Illegal move '{0}'")]
    IllegalMove(String),
    /// A token appeared where the tree structure cannot accept it.
    #[error("Unexpected token - {0}")]
    UnexpectedToken(String),
    /// The source declares a starting position other than the standard one.
    #[error("Custom starting position is not supported: {0}")]
    CustomStartingPosition(String),
    /// Variations are nested deeper than the configured maximum.
    #[error("Variations nested deeper than {0} levels")]
    VariationTooDeep(usize),
    /// A tag pair in the PGN header is malformed.
    #[error("Invalid header - {0}")]
    InvalidHeader(String),
}

// =#========================================================================#=
// PARSING ERROR
// =#========================================================================#=
/// Parsing error with contextual information (position and surrounding text).
///
/// For header errors the position is a byte offset into the input; for
/// errors raised while building the tree it is the index of the offending
/// token in the token stream.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsingError {
    kind: ParsingErrorType,
    position: usize,
    context: String,
}

impl ParsingError {
    /// Create a ParsingError from an error type and scanner state
    pub fn from_parser<S: ByteSource>(kind: ParsingErrorType, parser: &ByteParser<S>) -> Self {
        Self {
            kind,
            position: parser.position(),
            context: parser.get_context_as_string(DEFAULT_CONTEXT_LENGTH),
        }
    }

    /// Create a ParsingError for the token at `token_index`
    pub fn at_token(kind: ParsingErrorType, token_index: usize, context: impl Into<String>) -> Self {
        Self {
            kind,
            position: token_index,
            context: context.into(),
        }
    }

    /// Convenience constructor for IllegalMove
    pub fn illegal_move(token_index: usize, san: &str) -> Self {
        Self::at_token(ParsingErrorType::IllegalMove(san.to_string()), token_index, san)
    }

    /// Convenience constructor for UnexpectedToken
    pub fn unexpected_token(token_index: usize, msg: String, context: impl Into<String>) -> Self {
        Self::at_token(ParsingErrorType::UnexpectedToken(msg), token_index, context)
    }

    /// Convenience constructor for InvalidHeader
    pub fn invalid_header<S: ByteSource>(parser: &ByteParser<S>, msg: String) -> Self {
        Self::from_parser(ParsingErrorType::InvalidHeader(msg), parser)
    }

    /// Create a ParsingError without any context
    pub fn without_context(kind: ParsingErrorType) -> Self {
        Self {
            kind,
            position: 0,
            context: String::new(),
        }
    }

    /// Get the error kind
    pub fn kind(&self) -> &ParsingErrorType {
        &self.kind
    }

    /// Get the position where the error occurred
    pub fn position(&self) -> usize {
        self.position
    }

    /// Get the text surrounding the error
    pub fn context(&self) -> &str {
        &self.context
    }
}

impl fmt::Display for ParsingError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} at position {}", self.kind, self.position)?;

        if !self.context.is_empty() {
            write!(f, "\n  Context: {}", self.context)?;
        }

        Ok(())
    }
}

impl Error for ParsingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.kind)
    }
}
