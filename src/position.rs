//! Chess rules as an external capability.
//!
//! The tree engine never decides on its own whether a move is legal or what
//! position it leads to. It asks a [PositionOracle]. The default oracle,
//! [ShakmatyOracle], delegates to the `shakmaty` crate.
//!
//! FEN strings handed out by an oracle are *normalized* to four fields
//! (board, side to move, castling rights, en-passant square). Move clocks are
//! irrelevant to repertoire identity and are dropped.

use crate::model::Color;
use shakmaty::fen::Fen;
use shakmaty::san::SanPlus;
use shakmaty::{CastlingMode, Chess, EnPassantMode, Position};

/// Four-field FEN of the standard starting position.
pub const STANDARD_START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -";

/// Number of FEN fields that make up a normalized position.
const NORMALIZED_FEN_FIELDS: usize = 4;

// =#========================================================================#=
// POSITION ORACLE (trait)
// =#========================================================================#=
/// Answers rule questions about positions and moves given in SAN.
///
/// The associated [`Position`](Self::Position) is whatever state the oracle
/// needs to answer quickly; callers treat it as opaque and only clone it,
/// advance it with [`apply`](Self::apply) and read it back out.
pub trait PositionOracle {
    /// Opaque position state.
    type Position: Clone;

    /// Returns the standard starting position.
    fn start(&self) -> Self::Position;

    /// Reads a position from FEN (four or six fields), or `None` if invalid.
    fn from_fen(&self, fen: &str) -> Option<Self::Position>;

    /// Returns whether `san` is a legal move in `position`.
    fn is_legal(&self, position: &Self::Position, san: &str) -> bool;

    /// Plays `san` in `position` and returns the resulting position,
    /// or `None` if the move is not legal there.
    fn apply(&self, position: &Self::Position, san: &str) -> Option<Self::Position>;

    /// Returns the normalized four-field FEN of `position`.
    fn fen(&self, position: &Self::Position) -> String;

    /// Returns whose turn it is in `position`.
    fn side_to_move(&self, position: &Self::Position) -> Color;

    /// Returns the full-move number of `position`.
    fn move_number(&self, position: &Self::Position) -> u32;
}

// =#========================================================================#=
// SHAKMATY ORACLE
// =#========================================================================#=
/// [PositionOracle] for standard chess backed by [shakmaty].
#[derive(Debug, Clone, Copy, Default)]
pub struct ShakmatyOracle;

impl ShakmatyOracle {
    /// Creates a new oracle.
    pub fn new() -> Self {
        Self
    }
}

impl PositionOracle for ShakmatyOracle {
    type Position = Chess;

    fn start(&self) -> Chess {
        Chess::default()
    }

    fn from_fen(&self, fen: &str) -> Option<Chess> {
        let fen = fen.trim();
        // A four-field FEN lacks move clocks, which the FEN reader requires
        let full = if fen.split_whitespace().count() == NORMALIZED_FEN_FIELDS {
            format!("{fen} 0 1")
        } else {
            fen.to_string()
        };

        full.parse::<Fen>()
            .ok()?
            .into_position::<Chess>(CastlingMode::Standard)
            .ok()
    }

    fn is_legal(&self, position: &Chess, san: &str) -> bool {
        san.parse::<SanPlus>()
            .is_ok_and(|san_plus| san_plus.san.to_move(position).is_ok())
    }

    fn apply(&self, position: &Chess, san: &str) -> Option<Chess> {
        let san_plus = san.parse::<SanPlus>().ok()?;
        let mv = san_plus.san.to_move(position).ok()?;
        position.clone().play(mv).ok()
    }

    fn fen(&self, position: &Chess) -> String {
        normalize_fen(&Fen::from_position(position, EnPassantMode::Legal).to_string())
    }

    fn side_to_move(&self, position: &Chess) -> Color {
        position.turn().into()
    }

    fn move_number(&self, position: &Chess) -> u32 {
        position.fullmoves().get()
    }
}

/// Reduces a FEN string to its first four fields, joined by single spaces.
///
/// # Example
/// ```
/// use repertoire::position::normalize_fen;
///
/// let fen = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1";
/// assert_eq!(normalize_fen(fen), "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq -");
/// ```
pub fn normalize_fen(fen: &str) -> String {
    fen.split_whitespace()
        .take(NORMALIZED_FEN_FIELDS)
        .collect::<Vec<_>>()
        .join(" ")
}

impl From<shakmaty::Color> for Color {
    fn from(color: shakmaty::Color) -> Self {
        match color {
            shakmaty::Color::White => Color::White,
            shakmaty::Color::Black => Color::Black,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_is_standard() {
        let oracle = ShakmatyOracle::new();
        let start = oracle.start();
        assert_eq!(oracle.fen(&start), STANDARD_START_FEN);
        assert_eq!(oracle.side_to_move(&start), Color::White);
        assert_eq!(oracle.move_number(&start), 1);
    }

    #[test]
    fn test_apply_legal_and_illegal() {
        let oracle = ShakmatyOracle::new();
        let start = oracle.start();

        assert!(oracle.is_legal(&start, "e4"));
        assert!(oracle.is_legal(&start, "Nf3"));
        assert!(!oracle.is_legal(&start, "e5"));
        assert!(!oracle.is_legal(&start, "Ke2"));
        assert!(!oracle.is_legal(&start, "not-a-move"));

        let after = oracle.apply(&start, "e4").unwrap();
        assert_eq!(oracle.side_to_move(&after), Color::Black);
        assert_eq!(oracle.move_number(&after), 1);
        assert!(oracle.apply(&start, "Qh5").is_none());
    }

    #[test]
    fn test_check_suffix_accepted() {
        let oracle = ShakmatyOracle::new();
        let mut position = oracle.start();
        for san in ["e4", "e5", "Qh5", "Nc6", "Bc4", "Nf6"] {
            position = oracle.apply(&position, san).unwrap();
        }
        assert!(oracle.is_legal(&position, "Qxf7#"));
        assert!(oracle.is_legal(&position, "Qxf7"));
    }

    #[test]
    fn test_from_fen_four_and_six_fields() {
        let oracle = ShakmatyOracle::new();
        let four = oracle.from_fen(STANDARD_START_FEN).unwrap();
        let six = oracle
            .from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1")
            .unwrap();
        assert_eq!(oracle.fen(&four), oracle.fen(&six));
        assert!(oracle.from_fen("not a fen").is_none());
    }
}
