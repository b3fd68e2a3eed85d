use crate::model::node::RepertoireNode;
use crate::model::node_arena::{ArenaIndex, NodeArena, ROOT};
use crate::parser::byte_parser::ByteParser;
use crate::parser::parsing_error::{ParsingError, ParsingErrorType};
use crate::pgn::defs::DEFAULT_MAX_VARIATION_DEPTH;
use crate::pgn::headers::{parse_headers, PgnHeaders};
use crate::pgn::tokenizer::{Token, Tokenizer};
use crate::position::{normalize_fen, PositionOracle, ShakmatyOracle, STANDARD_START_FEN};
use std::mem;
use tracing::{debug, trace};

/// Builder turning PGN into a [RepertoireNode] tree.
///
/// Moves are checked and played by a [PositionOracle]; the parser itself knows
/// no chess rules. Every tree starts at the standard starting position.
///
/// # Configuration
/// * `with_oracle(oracle)` - Use another [PositionOracle] (default: [ShakmatyOracle])
/// * `with_max_variation_depth(depth)` - Bound on how deeply variations may nest
///   (default: 64). Deeper input fails with
///   [VariationTooDeep](ParsingErrorType::VariationTooDeep)
///
/// # Building
/// The token stream is consumed left to right with an explicit stack of
/// frames `(current node, position)`, seeded with the root:
/// * `Move` - play it from the top frame's position; reuse an existing child with
///   the same move or append a new one, then advance the frame
/// * `(` - open an alternative to the top frame's last move: push a frame
///   at that move's parent
/// * `)` - pop the top frame (the root frame is never popped)
/// * `Comment` - attach to the top frame's node, unless it is the root
/// * `MoveNumber`, `Nag`, `Result` - ignored
///
/// # Example
/// ```
/// use repertoire::pgn::PgnParser;
///
/// let parser = PgnParser::new().with_max_variation_depth(8);
/// let tree = parser.parse_movetext("1. e4 e5 (1... c5 2. Nf3) 2. Nf3 *").unwrap();
///
/// let e4 = &tree.children()[0];
/// assert_eq!(e4.san(), Some("e4"));
/// assert_eq!(e4.children().len(), 2); // e5 and c5
/// ```
#[derive(Debug, Clone)]
pub struct PgnParser<O: PositionOracle = ShakmatyOracle> {
    oracle: O,
    max_variation_depth: usize,
}

/// One level of the variation stack.
struct Frame<P> {
    node: ArenaIndex,
    position: P,
}

impl PgnParser<ShakmatyOracle> {
    /// Creates a new `PgnParser` with the default oracle and settings.
    pub fn new() -> Self {
        Self::with_oracle(ShakmatyOracle::new())
    }
}

impl Default for PgnParser<ShakmatyOracle> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O: PositionOracle> PgnParser<O> {
    /// Creates a new `PgnParser` deciding moves with the given oracle.
    pub fn with_oracle(oracle: O) -> Self {
        Self {
            oracle,
            max_variation_depth: DEFAULT_MAX_VARIATION_DEPTH,
        }
    }

    /// Sets how deeply variations may nest (`0` forbids variations).
    pub fn with_max_variation_depth(mut self, depth: usize) -> Self {
        self.max_variation_depth = depth;
        self
    }

    /// Returns the oracle used to check and play moves.
    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Parses a complete PGN game: optional tag pairs, then movetext.
    ///
    /// A `FEN` tag declares the starting position; it must be the standard one.
    ///
    /// # Returns
    /// * `Ok((RepertoireNode, PgnHeaders))` - The tree and the tag pairs read
    /// * `Err(ParsingError)` - If a tag pair is malformed or building the tree fails
    pub fn parse_str(&self, pgn: &str) -> Result<(RepertoireNode, PgnHeaders), ParsingError> {
        let mut byte_parser = ByteParser::for_str(pgn);
        let headers = parse_headers(&mut byte_parser)?;
        debug!(tags = headers.len(), "[PGN] Read tag pairs");

        let tokens: Vec<Token> = Tokenizer::from_parser(byte_parser).collect();
        let tree = self.build(&tokens, headers.starting_fen())?;
        Ok((tree, headers))
    }

    /// Parses bare movetext (no tag pairs) from the standard starting position.
    pub fn parse_movetext(&self, movetext: &str) -> Result<RepertoireNode, ParsingError> {
        let tokens: Vec<Token> = Tokenizer::new(movetext).collect();
        self.build(&tokens, None)
    }

    /// Builds a tree from a token stream.
    ///
    /// # Arguments
    /// * `tokens` - Tokens of the movetext, as produced by a [Tokenizer]
    /// * `starting_fen` - Declared starting position, if any
    ///
    /// # Returns
    /// * `Ok(RepertoireNode)` - Root of the new tree (no children for empty input)
    /// * `Err(ParsingError)` - Positioned at the index of the offending token:
    ///   - `CustomStartingPosition` if `starting_fen` is not the standard start
    ///   - `IllegalMove` if the oracle rejects a move
    ///   - `UnexpectedToken` if a variation opens before any move
    ///   - `VariationTooDeep` if variations nest too deeply
    pub fn build(&self, tokens: &[Token], starting_fen: Option<&str>) -> Result<RepertoireNode, ParsingError> {
        if let Some(fen) = starting_fen {
            let normalized = normalize_fen(fen);
            if normalized != STANDARD_START_FEN {
                return Err(ParsingError::without_context(
                    ParsingErrorType::CustomStartingPosition(normalized),
                ));
            }
        }

        debug!(tokens = tokens.len(), "[PGN] Building tree");
        let start = self.oracle.start();
        let mut arena = NodeArena::new(RepertoireNode::new_root());
        // innermost line being read; `outer` holds the lines it interrupts
        let mut current = Frame {
            node: ROOT,
            position: start,
        };
        let mut outer: Vec<Frame<O::Position>> = Vec::new();

        for (index, token) in tokens.iter().enumerate() {
            match token {
                Token::Move(san) => {
                    self.play(&mut arena, &mut current, index, san)?;
                }
                Token::VariationStart => {
                    let Some(parent) = arena.parent(current.node) else {
                        return Err(ParsingError::unexpected_token(
                            index,
                            "Variation opened before any move".to_string(),
                            token.to_string(),
                        ));
                    };
                    if outer.len() >= self.max_variation_depth {
                        return Err(ParsingError::at_token(
                            ParsingErrorType::VariationTooDeep(self.max_variation_depth),
                            index,
                            token.to_string(),
                        ));
                    }
                    let position = self.replay(&arena, parent, index)?;
                    trace!(depth = outer.len() + 1, "[PGN] Open variation");
                    outer.push(mem::replace(&mut current, Frame { node: parent, position }));
                }
                Token::VariationEnd => {
                    if let Some(interrupted) = outer.pop() {
                        current = interrupted;
                    }
                }
                Token::Comment(text) => {
                    let text = text.trim();
                    let node = arena.node_mut(current.node);
                    if !text.is_empty() && !node.is_root() {
                        node.comment = Some(text.to_string());
                    }
                }
                Token::MoveNumber(_) | Token::Nag(_) | Token::Result(_) => {}
            }
        }

        debug!(nodes = arena.len(), "[PGN] Tree built");
        Ok(arena.into_tree())
    }

    /// Plays `san` from the frame's position and advances the frame to the
    /// resulting child, creating it if needed.
    fn play(
        &self,
        arena: &mut NodeArena,
        frame: &mut Frame<O::Position>,
        index: usize,
        san: &str,
    ) -> Result<(), ParsingError> {
        if !self.oracle.is_legal(&frame.position, san) {
            return Err(ParsingError::illegal_move(index, san));
        }
        let Some(position) = self.oracle.apply(&frame.position, san) else {
            return Err(ParsingError::illegal_move(index, san));
        };

        let child = match arena.child_with_move(frame.node, san) {
            Some(existing) => existing,
            None => {
                let parent_id = arena.node(frame.node).id();
                let node = RepertoireNode::new_child(
                    parent_id,
                    san.to_string(),
                    self.oracle.fen(&position),
                    self.oracle.move_number(&position),
                    self.oracle.side_to_move(&position),
                );
                arena.add_child(frame.node, node)
            }
        };

        frame.node = child;
        frame.position = position;
        Ok(())
    }

    /// Reconstructs the position at `node` by replaying the moves from the root.
    fn replay(&self, arena: &NodeArena, node: ArenaIndex, index: usize) -> Result<O::Position, ParsingError> {
        let mut position = self.oracle.start();
        for san in arena.moves_from_root(node) {
            position = self
                .oracle
                .apply(&position, san)
                .ok_or_else(|| ParsingError::illegal_move(index, san))?;
        }
        Ok(position)
    }
}
