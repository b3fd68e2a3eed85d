use criterion::{Criterion, criterion_group, criterion_main};
use repertoire::RepertoireNode;
use repertoire::ops::{canonicalize, merge_trees};
use repertoire::pgn::{parse_movetext, to_pgn};
use std::hint::black_box;

/// Opening lines with several transpositions between them.
const LINES: &[&str] = &[
    "1. e4 e5 2. Nf3 Nc6 3. Bb5 a6 4. Ba4 Nf6 5. O-O Be7 6. Re1 b5 7. Bb3 d6 8. c3 O-O",
    "1. e4 e5 2. Nf3 Nc6 3. Bc4 Bc5 4. c3 Nf6 5. d3 d6 6. O-O O-O",
    "1. Nf3 Nc6 2. e4 e5 3. Bb5 Nf6 4. O-O Nxe4 5. d4 Nd6",
    "1. e4 c5 2. Nf3 d6 3. d4 cxd4 4. Nxd4 Nf6 5. Nc3 a6 6. Be3 e5",
    "1. Nf3 c5 2. e4 d6 3. d4 cxd4 4. Nxd4 Nf6 5. Nc3 g6",
    "1. d4 d5 2. c4 e6 3. Nc3 Nf6 4. Bg5 Be7 5. e3 O-O 6. Nf3 h6",
    "1. c4 e6 2. Nc3 d5 3. d4 Nf6 4. Nf3 Be7 5. Bf4 O-O",
    "1. d4 Nf6 2. c4 e6 3. Nf3 d5 4. Nc3 c6 5. e3 Nbd7 6. Qc2 Bd6",
    "1. d4 Nf6 2. c4 g6 3. Nc3 Bg7 4. e4 d6 5. Nf3 O-O 6. Be2 e5 7. O-O Nc6",
    "1. c4 g6 2. Nc3 Bg7 3. d4 Nf6 4. e4 d6 5. f3 O-O",
];

/// One movetext holding every line: the first is the main line, the others
/// are variations of its first move.
fn combined_movetext() -> String {
    let (first, rest) = LINES[0].split_at("1. e4".len());
    let mut movetext = String::from(first);
    for line in &LINES[1..] {
        movetext.push_str(" (");
        movetext.push_str(line);
        movetext.push(')');
    }
    movetext.push_str(" 1...");
    movetext.push_str(rest);
    movetext
}

fn parsed_lines() -> Vec<RepertoireNode> {
    LINES
        .iter()
        .map(|line| parse_movetext(line).unwrap())
        .collect()
}

fn pgn_parsing(c: &mut Criterion) {
    let movetext = combined_movetext();
    c.bench_function("parse_combined", |b| {
        b.iter(|| parse_movetext(black_box(&movetext)).unwrap());
    });

    let tree = parse_movetext(&movetext).unwrap();
    c.bench_function("write_pgn", |b| {
        b.iter(|| to_pgn(black_box(&tree)));
    });
}

fn tree_operations(c: &mut Criterion) {
    let trees = parsed_lines();
    c.bench_function("merge_lines", |b| {
        b.iter(|| merge_trees(black_box(&trees)));
    });

    let merged = merge_trees(&trees);
    c.bench_function("canonicalize", |b| {
        b.iter(|| {
            let mut tree = merged.clone();
            canonicalize(&mut tree)
        });
    });
}

criterion_group!(regression, pgn_parsing, tree_operations);
criterion_main!(regression);
