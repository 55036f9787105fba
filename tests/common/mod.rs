#![allow(dead_code)]

use chess_core::{Game, GameMetadata, MemoryCatalog, Opening, PlayerName, SequenceKey};

/// Parse a space-separated square-pair line (`"e2e4 e7e5"`).
pub fn line(moves: &str) -> SequenceKey {
    moves.parse().unwrap_or_else(|e| panic!("bad line {moves:?}: {e}"))
}

pub fn add_opening(catalog: &mut MemoryCatalog, name: &str, moves: &str) -> Opening {
    catalog.add_opening(name, line(moves)).expect("unique opening name")
}

pub fn add_game(catalog: &mut MemoryCatalog, white: &str, black: &str, moves: &str) -> Game {
    catalog.add_game(
        line(moves),
        GameMetadata {
            white: PlayerName::from_header(white),
            black: PlayerName::from_header(black),
            result: "1-0".to_string(),
            ..GameMetadata::default()
        },
    )
}

pub fn names(openings: &[Opening]) -> Vec<&str> {
    openings.iter().map(|o| o.name.as_str()).collect()
}
