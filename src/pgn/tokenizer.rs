//! Lexical scanner for PGN movetext.
//!
//! Turns movetext such as `1. e4 e5 (1... c5 {Sicilian}) 2. Nf3!? *` into a
//! flat sequence of [Token]s. The tokenizer knows nothing about chess rules
//! or about how variations nest; both are up to the
//! [tree builder](crate::pgn::PgnParser).
//!
//! # Rules
//! Applied left to right:
//! * Whitespace is skipped
//! * `{...}` is one [Token::Comment], verbatim and not nested. An unclosed
//!   brace captures the rest of the input
//! * `;` starts a line comment, discarded through the end of the line
//! * `(` and `)` become [Token::VariationStart] and [Token::VariationEnd]
//! * `$` followed by digits is a [Token::Nag]
//! * `1-0`, `0-1`, `1/2-1/2` and `*` are [Token::Result]s
//! * `!`, `?`, `!!`, `??`, `!?` and `?!` standing alone are [Token::Nag]s
//! * Digits followed by one or more dots are a [Token::MoveNumber], even when
//!   glued to the next move (`1.e4`, `12...Nf6`)
//! * Any other word is a [Token::Move]. A trailing glyph (`Nf3!?`) is split
//!   off and emitted as a [Token::Nag] right after the move

use crate::parser::byte_parser::{ByteParser, ConsumeMode};
use crate::parser::byte_source::InMemoryByteSource;
use crate::pgn::defs::{GLYPH_SUFFIXES, MOVETEXT_DELIMITERS, RESULT_MARKERS, STANDALONE_GLYPHS};
use std::fmt;

// =#========================================================================#=
// TOKEN
// =#========================================================================#=
/// A lexical unit of PGN movetext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A move in SAN, annotation glyphs stripped (e.g. `Nf3`, `exd5`, `O-O`, `e8=Q+`)
    Move(String),
    /// The digits of a move number indicator (`12` for `12.` or `12...`)
    MoveNumber(String),
    /// `(`
    VariationStart,
    /// `)`
    VariationEnd,
    /// Text between `{` and `}`, verbatim
    Comment(String),
    /// Numeric (`$1`) or glyph (`!?`) annotation
    Nag(String),
    /// Game termination marker
    Result(String),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Move(san) => write!(f, "{san}"),
            Token::MoveNumber(number) => write!(f, "{number}."),
            Token::VariationStart => write!(f, "("),
            Token::VariationEnd => write!(f, ")"),
            Token::Comment(text) => write!(f, "{{{text}}}"),
            Token::Nag(nag) => write!(f, "{nag}"),
            Token::Result(result) => write!(f, "{result}"),
        }
    }
}

// =#========================================================================#=
// TOKENIZER
// =#========================================================================#=
/// Lazy iterator over the [Token]s of PGN movetext.
///
/// The iterator is finite and never fails: text it cannot classify ends up
/// as a [Token::Move] and is rejected later by the tree builder. Cloning a
/// `Tokenizer` clones its read position, so a clone restarts from the same
/// point.
///
/// # Example
/// ```
/// use repertoire::pgn::{Token, Tokenizer};
///
/// let tokens: Vec<Token> = Tokenizer::new("1. e4 e5!? *").collect();
/// assert_eq!(tokens, vec![
///     Token::MoveNumber("1".to_string()),
///     Token::Move("e4".to_string()),
///     Token::Move("e5".to_string()),
///     Token::Nag("!?".to_string()),
///     Token::Result("*".to_string()),
/// ]);
/// ```
#[derive(Debug, Clone)]
pub struct Tokenizer {
    parser: ByteParser<InMemoryByteSource>,
    /// Glyph split off the previous move, emitted next
    pending: Option<Token>,
}

impl Tokenizer {
    /// Creates a tokenizer over the given movetext.
    pub fn new(movetext: &str) -> Self {
        Self::from_parser(ByteParser::for_str(movetext))
    }

    /// Creates a tokenizer continuing from the current position of `parser`,
    /// e.g. right after the tag pairs of a PGN game.
    pub fn from_parser(parser: ByteParser<InMemoryByteSource>) -> Self {
        Self {
            parser,
            pending: None,
        }
    }

    /// Reads a word starting with a digit: either a move number indicator or,
    /// if no dot follows the digits, a regular word such as `1-0`.
    fn read_number_or_word(&mut self) -> Option<Token> {
        let start = self.parser.position();
        let digits = self.parser.parse_digits();

        if self.parser.peek_is(b'.') {
            while self.parser.consume_if(b'.') {}
            return Some(Token::MoveNumber(digits));
        }

        self.parser.set_position(start);
        let word = self.parser.parse_word(MOVETEXT_DELIMITERS);
        self.classify_word(word)
    }

    /// Classifies a word as result, standalone glyph or move.
    ///
    /// Returns `None` for words made of dots only (`...` after a spaced move number).
    fn classify_word(&mut self, word: String) -> Option<Token> {
        if word.bytes().all(|b| b == b'.') {
            return None;
        }
        if RESULT_MARKERS.contains(&word.as_str()) {
            return Some(Token::Result(word));
        }
        if STANDALONE_GLYPHS.contains(&word.as_str()) {
            return Some(Token::Nag(word));
        }

        for suffix in GLYPH_SUFFIXES {
            if word.len() > suffix.len() && word.ends_with(suffix) {
                self.pending = Some(Token::Nag(suffix.to_string()));
                let san = word[..word.len() - suffix.len()].to_string();
                return Some(Token::Move(san));
            }
        }

        Some(Token::Move(word))
    }
}

impl Iterator for Tokenizer {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if let Some(token) = self.pending.take() {
            return Some(token);
        }

        loop {
            self.parser.skip_whitespace();
            let token = match self.parser.peek()? {
                b'{' => {
                    let (text, _closed) = self.parser.parse_enclosed(b'}');
                    Some(Token::Comment(text))
                }
                b';' => {
                    self.parser.consume_until(b'\n', ConsumeMode::Inclusive);
                    None
                }
                b'(' => {
                    self.parser.next_byte();
                    Some(Token::VariationStart)
                }
                b')' => {
                    self.parser.next_byte();
                    Some(Token::VariationEnd)
                }
                b'$' => {
                    self.parser.next_byte();
                    let digits = self.parser.parse_digits();
                    (!digits.is_empty()).then(|| Token::Nag(format!("${digits}")))
                }
                b'}' => {
                    // stray closing brace
                    self.parser.next_byte();
                    None
                }
                b if b.is_ascii_digit() => self.read_number_or_word(),
                _ => {
                    let word = self.parser.parse_word(MOVETEXT_DELIMITERS);
                    self.classify_word(word)
                }
            };

            if token.is_some() {
                return token;
            }
        }
    }
}

/// Tokenizes the whole movetext eagerly.
///
/// # Example
/// ```
/// use repertoire::pgn::{tokenize, Token};
///
/// let tokens = tokenize("1.e4 (1.d4) {main} $1");
/// assert_eq!(tokens.len(), 8);
/// assert_eq!(tokens[2], Token::VariationStart);
/// assert_eq!(tokens[7], Token::Nag("$1".to_string()));
/// ```
pub fn tokenize(movetext: &str) -> Vec<Token> {
    Tokenizer::new(movetext).collect()
}
