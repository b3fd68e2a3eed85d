//! Low-level byte-by-byte scanner for PGN text.
//!
//! This module provides [ByteParser] for scanning PGN tag pairs and movetext
//! with support for peeking, consuming, delimiter-bounded words and
//! brace- or quote-enclosed text. Used as the foundation for both the
//! [tokenizer](crate::pgn::tokenizer) and the [header reader](crate::pgn::headers).

use crate::parser::byte_source::{ByteSource, InMemoryByteSource};

// =#========================================================================#=
// BYTE PARSER
// =#========================================================================#=
/// A byte-by-byte scanner with support for peeking, consuming, and delimiter matching.
///
/// All structural characters of PGN are ASCII, so the scanner works on bytes
/// and only decodes (lossily, as UTF-8) the text it hands out: words, comments
/// and quoted tag values. Matching is case-sensitive since SAN is.
///
/// # Example
/// ```
/// use repertoire::parser::ByteParser;
///
/// let mut parser = ByteParser::for_str("  1. e4 {King's pawn}");
/// parser.skip_whitespace();
/// assert_eq!(parser.parse_word(b" ."), "1");
/// assert!(parser.consume_if(b'.'));
/// parser.skip_whitespace();
/// assert_eq!(parser.parse_word(b" {"), "e4");
/// ```
#[derive(Debug, Clone)]
pub struct ByteParser<S: ByteSource> {
    source: S,
}

impl ByteParser<InMemoryByteSource> {
    /// Creates a new `ByteParser` from a string by copying it into memory.
    pub fn for_str(input: &str) -> Self {
        Self::new(InMemoryByteSource::from_vec(input.as_bytes().to_vec()))
    }
}

impl<S: ByteSource> ByteParser<S> {
    /// Creates a new `ByteParser` from a byte source.
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Peeks at the current byte without consuming it.
    #[inline(always)]
    pub fn peek(&self) -> Option<u8> {
        self.source.peek()
    }

    /// Gets the current byte and advances the position (consumes it).
    #[inline(always)]
    pub fn next_byte(&mut self) -> Option<u8> {
        self.source.next_byte()
    }

    /// Skips (consumes) all consecutive whitespace characters.
    ///
    /// Whitespace includes: space, tab, newline, carriage return and form feed.
    pub fn skip_whitespace(&mut self) {
        while let Some(b) = self.peek() {
            if b.is_ascii_whitespace() {
                self.next_byte();
            } else {
                break;
            }
        }
    }

    /// Checks if the current byte is exactly `ch`.
    pub fn peek_is(&self, ch: u8) -> bool {
        self.peek() == Some(ch)
    }

    /// Consumes the current byte if it is `ch`.
    ///
    /// # Returns
    /// `true` if the byte was matched and consumed, `false` otherwise
    pub fn consume_if(&mut self, ch: u8) -> bool {
        if self.peek_is(ch) {
            self.next_byte();
            true
        } else {
            false
        }
    }

    /// Consumes bytes until the target byte is found.
    ///
    /// # Arguments
    /// * `target` - The byte to search for
    /// * `mode` - Whether to consume the target byte (`Inclusive`) or stop before it (`Exclusive`)
    ///
    /// # Returns
    /// `true` if the target was found, `false` if EOF was reached first
    pub fn consume_until(&mut self, target: u8, mode: ConsumeMode) -> bool {
        while let Some(b) = self.peek() {
            if b == target {
                if mode == ConsumeMode::Inclusive {
                    self.next_byte();
                }
                return true;
            }
            self.next_byte();
        }
        false
    }

    /// Consumes bytes while they are ASCII digits and returns them as text.
    pub fn parse_digits(&mut self) -> String {
        let start = self.position();
        while self.peek().is_some_and(|b| b.is_ascii_digit()) {
            self.next_byte();
        }
        self.text_from(start)
    }

    /// Parses a word until whitespace or any of the given delimiters is encountered.
    ///
    /// The delimiter itself is not consumed. Returns an empty string if the
    /// parser already sits on a delimiter.
    pub fn parse_word(&mut self, delimiters: &[u8]) -> String {
        let start = self.position();
        while let Some(b) = self.peek() {
            if b.is_ascii_whitespace() || delimiters.contains(&b) {
                break;
            }
            self.next_byte();
        }
        self.text_from(start)
    }

    /// Parses text enclosed by the current byte and `close`, e.g. a `{...}` comment.
    ///
    /// Assumes the parser sits on the opening byte, which is consumed.
    /// The enclosed text is returned verbatim, without the delimiters.
    ///
    /// # Returns
    /// The enclosed text and whether the closing byte was found. Without a
    /// closing byte, the text runs to the end of input.
    pub fn parse_enclosed(&mut self, close: u8) -> (String, bool) {
        self.next_byte(); // consume opening byte
        let start = self.position();
        let closed = self.consume_until(close, ConsumeMode::Exclusive);
        let text = self.text_from(start);
        if closed {
            self.next_byte(); // consume closing byte
        }
        (text, closed)
    }

    /// Parses a double-quoted string with backslash escapes (`\"`, `\\`),
    /// as used for PGN tag values.
    ///
    /// Assumes the parser sits on the opening quote.
    ///
    /// # Returns
    /// `Some(value)` without quotes, or `None` if the closing quote is missing.
    pub fn parse_quoted(&mut self) -> Option<String> {
        self.next_byte(); // consume opening "

        let mut bytes = Vec::new();
        while let Some(b) = self.next_byte() {
            match b {
                b'\\' => {
                    if let Some(escaped) = self.next_byte() {
                        bytes.push(escaped);
                    }
                }
                b'"' => return Some(String::from_utf8_lossy(&bytes).into_owned()),
                _ => bytes.push(b),
            }
        }

        None
    }

    /// Returns whether the end of data (EOF) has been reached.
    pub fn is_eof(&self) -> bool {
        self.source.is_eof()
    }

    /// Returns the current parser position (byte offset) in the input.
    pub fn position(&self) -> usize {
        self.source.position()
    }

    /// Sets the position in the byte stream.
    pub fn set_position(&mut self, pos: usize) {
        self.source.set_position(pos);
    }

    /// Returns a slice of the input from a start position to the current position.
    pub fn slice_from(&self, start: usize) -> &[u8] {
        self.source.slice_from(start).unwrap_or(&[])
    }

    /// Returns the input from `start` to the current position as text.
    ///
    /// Invalid UTF-8 sequences are replaced with the Unicode replacement character.
    pub fn text_from(&self, start: usize) -> String {
        String::from_utf8_lossy(self.slice_from(start)).into_owned()
    }

    /// Returns a string from up to `k` bytes from the current position for error context.
    pub fn get_context_as_string(&self, k: usize) -> String {
        String::from_utf8_lossy(self.source.peek_slice(k)).into_owned()
    }
}

/// Specifies whether to consume or leave the target when using `consume_until`.
///
/// # Examples
/// ```
/// use repertoire::parser::byte_parser::{ByteParser, ConsumeMode};
///
/// let mut parser = ByteParser::for_str("[Event \"Casual\"]\n1. e4");
///
/// // Inclusive: consume up to and including ']', e.g. to the end of a tag pair
/// parser.consume_until(b']', ConsumeMode::Inclusive);
/// assert_eq!(parser.peek(), Some(b'\n'));
///
/// let mut parser = ByteParser::for_str("e4 {best by test}");
///
/// // Exclusive: stop at '{', e.g. at the start of a comment
/// parser.consume_until(b'{', ConsumeMode::Exclusive);
/// assert_eq!(parser.peek(), Some(b'{'));
/// ```
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ConsumeMode {
    /// Consume the target byte along with everything before it.
    Inclusive,

    /// Stop before the target byte without consuming it.
    Exclusive,
}
