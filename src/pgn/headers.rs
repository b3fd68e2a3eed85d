//! PGN tag pairs (`[Name "value"]`) preceding the movetext.

use crate::parser::byte_parser::ByteParser;
use crate::parser::byte_source::ByteSource;
use crate::parser::parsing_error::ParsingError;
use crate::pgn::defs::FEN_TAG;

/// The tag pairs of one PGN game, in order of appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PgnHeaders {
    tags: Vec<(String, String)>,
}

impl PgnHeaders {
    /// Returns the value of the first tag named `name` (case-sensitive).
    pub fn get(&self, name: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|(tag, _)| tag == name)
            .map(|(_, value)| value.as_str())
    }

    /// Returns an iterator over `(name, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.tags.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Returns the declared starting position (`FEN` tag), if any.
    pub fn starting_fen(&self) -> Option<&str> {
        self.get(FEN_TAG)
    }
}

/// Reads all tag pairs at the current position of `parser`.
///
/// Stops at the first non-whitespace byte that does not open a tag pair and
/// leaves the parser there, so the movetext can be read next. Input without
/// any tag pairs yields empty headers.
///
/// # Errors
/// [InvalidHeader](crate::parser::ParsingErrorType::InvalidHeader) if a tag
/// pair lacks its name, its quoted value or its closing bracket.
pub fn parse_headers<S: ByteSource>(parser: &mut ByteParser<S>) -> Result<PgnHeaders, ParsingError> {
    let mut headers = PgnHeaders::default();

    parser.skip_whitespace();
    while parser.consume_if(b'[') {
        parser.skip_whitespace();
        let name = parser.parse_word(b"\"]");
        if name.is_empty() {
            return Err(ParsingError::invalid_header(parser, "Missing tag name".to_string()));
        }

        parser.skip_whitespace();
        if !parser.peek_is(b'"') {
            return Err(ParsingError::invalid_header(
                parser,
                format!("Expected quoted value for tag '{name}'"),
            ));
        }
        let Some(value) = parser.parse_quoted() else {
            return Err(ParsingError::invalid_header(
                parser,
                format!("Unterminated value for tag '{name}'"),
            ));
        };

        parser.skip_whitespace();
        if !parser.consume_if(b']') {
            return Err(ParsingError::invalid_header(
                parser,
                format!("Expected ']' closing tag '{name}'"),
            ));
        }

        headers.tags.push((name, value));
        parser.skip_whitespace();
    }

    Ok(headers)
}
