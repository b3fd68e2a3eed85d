//! PGN movetext export of repertoire trees.

use crate::model::node::{Color, RepertoireNode};
use crate::pgn::defs::UNKNOWN_RESULT;

/// Returns the movetext of the tree below `root`, terminated with `*`.
///
/// The first child of every node is written as the main line, any further
/// children as parenthesized variations right after the main move they
/// replace. Comments follow their move in braces. Transposition pointers are
/// written as plain moves; their continuation lives at the canonical node.
///
/// Reading the output back with a [PgnParser](crate::pgn::PgnParser) yields the
/// same moves and comments in the same order, except that a `}` inside a
/// comment is dropped: brace comments cannot nest or escape it.
///
/// # Example
/// ```
/// use repertoire::pgn::{to_pgn, PgnParser};
///
/// let tree = PgnParser::new()
///     .parse_movetext("1.e4 e5 (1...c5 {Sicilian}) 2.Nf3")
///     .unwrap();
/// assert_eq!(to_pgn(&tree), "1. e4 e5 (1... c5 {Sicilian}) 2. Nf3 *");
/// ```
pub fn to_pgn(root: &RepertoireNode) -> String {
    let mut pgn = String::new();
    write_line(&mut pgn, root, true);

    if !pgn.is_empty() {
        pgn.push(' ');
    }
    pgn.push_str(UNKNOWN_RESULT);
    pgn
}

/// Writes the main line continuing from `start`, with the alternatives to
/// each of its moves as nested variations.
///
/// # Arguments
/// * `pgn` - Output buffer
/// * `start` - Node whose continuation is written (not `start` itself)
/// * `force_number` - Whether the first move needs a move number even if it is Black's
fn write_line(pgn: &mut String, start: &RepertoireNode, mut force_number: bool) {
    let mut current = start;

    while let Some((main, alternatives)) = current.children().split_first() {
        write_move(pgn, main, force_number);
        force_number = main.comment().is_some();

        for alternative in alternatives {
            push_separator(pgn);
            pgn.push('(');
            write_move(pgn, alternative, true);
            write_line(pgn, alternative, alternative.comment().is_some());
            pgn.push(')');
            force_number = true;
        }

        current = main;
    }
}

/// Writes one move with its number (if needed) and comment.
fn write_move(pgn: &mut String, node: &RepertoireNode, force_number: bool) {
    let Some(san) = node.san() else { return };
    push_separator(pgn);

    match node.mover() {
        Some(Color::White) => {
            pgn.push_str(&format!("{}. ", node.move_number()));
        }
        Some(Color::Black) if force_number => {
            // after Black's move the full-move number has already advanced
            let number = node.move_number().saturating_sub(1).max(1);
            pgn.push_str(&format!("{number}... "));
        }
        _ => {}
    }
    pgn.push_str(san);

    if let Some(comment) = node.comment() {
        pgn.push_str(" {");
        // brace comments do not nest
        pgn.extend(comment.chars().filter(|&c| c != '}'));
        pgn.push('}');
    }
}

fn push_separator(pgn: &mut String) {
    if !pgn.is_empty() && !pgn.ends_with('(') {
        pgn.push(' ');
    }
}
