use repertoire::pgn::{Token, Tokenizer, tokenize};

fn mv(san: &str) -> Token {
    Token::Move(san.to_string())
}

fn nag(text: &str) -> Token {
    Token::Nag(text.to_string())
}

fn number(digits: &str) -> Token {
    Token::MoveNumber(digits.to_string())
}

// --- TESTS BASIC MOVETEXT ---
#[test]
fn test_simple_line() {
    let tokens = tokenize("1. e4 e5 2. Nf3 Nc6 *");
    assert_eq!(
        tokens,
        vec![
            number("1"),
            mv("e4"),
            mv("e5"),
            number("2"),
            mv("Nf3"),
            mv("Nc6"),
            Token::Result("*".to_string()),
        ]
    );
}

#[test]
fn test_empty_and_whitespace_only() {
    assert!(tokenize("").is_empty());
    assert!(tokenize("  \n\t \r\n").is_empty());
}

#[test]
fn test_move_numbers_glued_and_black() {
    let tokens = tokenize("1.e4 e5 2.Nf3 (2...Nc6) 12...Nf6");
    assert_eq!(
        tokens,
        vec![
            number("1"),
            mv("e4"),
            mv("e5"),
            number("2"),
            mv("Nf3"),
            Token::VariationStart,
            number("2"),
            mv("Nc6"),
            Token::VariationEnd,
            number("12"),
            mv("Nf6"),
        ]
    );
}

#[test]
fn test_special_moves_kept_verbatim() {
    let tokens = tokenize("O-O O-O-O exd6 e8=Q+ Qxf7#");
    assert_eq!(
        tokens,
        vec![mv("O-O"), mv("O-O-O"), mv("exd6"), mv("e8=Q+"), mv("Qxf7#")]
    );
}

// --- TESTS COMMENTS ---
#[test]
fn test_brace_comment_verbatim() {
    let tokens = tokenize("e4 { The most (popular) move; by far } e5");
    assert_eq!(
        tokens,
        vec![
            mv("e4"),
            Token::Comment(" The most (popular) move; by far ".to_string()),
            mv("e5"),
        ]
    );
}

#[test]
fn test_brace_comment_not_nested() {
    let tokens = tokenize("e4 {a {b} c}");
    assert_eq!(
        tokens,
        vec![mv("e4"), Token::Comment("a {b".to_string()), mv("c")]
    );
}

#[test]
fn test_unclosed_brace_runs_to_end() {
    let tokens = tokenize("e4 {never closed e5 Nf3");
    assert_eq!(
        tokens,
        vec![mv("e4"), Token::Comment("never closed e5 Nf3".to_string())]
    );
}

#[test]
fn test_line_comment_discarded() {
    let tokens = tokenize("e4 ; rest of line e5 {x}\nd5");
    assert_eq!(tokens, vec![mv("e4"), mv("d5")]);
}

// --- TESTS ANNOTATIONS AND RESULTS ---
#[test]
fn test_numeric_nags() {
    let tokens = tokenize("e4 $1 e5 $14");
    assert_eq!(tokens, vec![mv("e4"), nag("$1"), mv("e5"), nag("$14")]);
}

#[test]
fn test_standalone_glyphs() {
    let tokens = tokenize("e4 ! e5 ?? Nf3 !?");
    assert_eq!(
        tokens,
        vec![mv("e4"), nag("!"), mv("e5"), nag("??"), mv("Nf3"), nag("!?")]
    );
}

#[test]
fn test_glyph_suffixes_split() {
    let tokens = tokenize("e4!! e5?? Nf3!? Nc6?! Bb5! a6?");
    assert_eq!(
        tokens,
        vec![
            mv("e4"),
            nag("!!"),
            mv("e5"),
            nag("??"),
            mv("Nf3"),
            nag("!?"),
            mv("Nc6"),
            nag("?!"),
            mv("Bb5"),
            nag("!"),
            mv("a6"),
            nag("?"),
        ]
    );
}

#[test]
fn test_check_with_glyph_suffix() {
    let tokens = tokenize("Qh5+!");
    assert_eq!(tokens, vec![mv("Qh5+"), nag("!")]);
}

#[test]
fn test_results() {
    for result in ["1-0", "0-1", "1/2-1/2", "*"] {
        let tokens = tokenize(&format!("e4 {result}"));
        assert_eq!(tokens, vec![mv("e4"), Token::Result(result.to_string())]);
    }
}

// --- TESTS VARIATIONS ---
#[test]
fn test_parentheses_without_spaces() {
    let tokens = tokenize("e4(d4)e5");
    assert_eq!(
        tokens,
        vec![
            mv("e4"),
            Token::VariationStart,
            mv("d4"),
            Token::VariationEnd,
            mv("e5"),
        ]
    );
}

#[test]
fn test_unbalanced_parentheses_are_just_tokens() {
    let tokens = tokenize(")) e4 ((");
    assert_eq!(tokens.len(), 5);
    assert_eq!(tokens[0], Token::VariationEnd);
    assert_eq!(tokens[4], Token::VariationStart);
}

#[test]
fn test_display_round_trip_of_simple_tokens() {
    let text: Vec<String> = Tokenizer::new("1. e4 {ok} (d4) $3 1-0")
        .map(|t| t.to_string())
        .collect();
    assert_eq!(text, vec!["1.", "e4", "{ok}", "(", "d4", ")", "$3", "1-0"]);
}
