//! Basic low-level scanner functionality shared by the PGN reader.
//!
//! This module provides the byte scanner ([ByteParser]) over a
//! [ByteSource](byte_source::ByteSource), and the error type
//! ([ParsingError]) reported by everything that reads PGN.

pub mod byte_parser;
pub(crate) mod byte_source;
pub mod parsing_error;

pub use byte_parser::ByteParser;
pub use parsing_error::{ParsingError, ParsingErrorType};
