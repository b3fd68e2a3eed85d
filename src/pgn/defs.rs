//! Constants and definitions for the PGN reader and writer.

/// Word delimiters in movetext besides whitespace
pub(crate) const MOVETEXT_DELIMITERS: &[u8] = b"{}();$";

/// Game termination markers
pub(crate) const RESULT_MARKERS: [&str; 4] = ["1-0", "0-1", "1/2-1/2", "*"];

/// Move annotation glyphs that may stand alone as a word
pub(crate) const STANDALONE_GLYPHS: [&str; 6] = ["!", "?", "!!", "??", "!?", "?!"];

/// Annotation glyphs that may be glued to a move, longest first
pub(crate) const GLYPH_SUFFIXES: [&str; 6] = ["!!", "??", "!?", "?!", "!", "?"];

/// Default bound on how deeply variations may nest
pub(crate) const DEFAULT_MAX_VARIATION_DEPTH: usize = 64;

/// Tag name declaring a custom starting position
pub(crate) const FEN_TAG: &str = "FEN";

/// Termination written at the end of exported movetext
pub(crate) const UNKNOWN_RESULT: &str = "*";
