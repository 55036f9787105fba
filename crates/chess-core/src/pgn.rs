//! PGN ingestion: main line and headers of each game, ready to encode.
//!
//! Variations are skipped. SAN is resolved against the position reached so
//! far, so castling comes out as the king's two-square move (`e1g1`).

use std::io::Read;
use std::ops::ControlFlow;

use pgn_reader::{RawTag, Reader, SanPlus, Skip, Visitor};
use shakmaty::fen::Fen;
use shakmaty::{CastlingMode, Chess, Position};

use crate::codec::{Move, SequenceKey};
use crate::error::CatalogError;
use crate::game_data::{GameMetadata, PlayerName};

/// One game's headers and main line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedGame {
    pub metadata: GameMetadata,
    pub moves: Vec<Move>,
}

impl ParsedGame {
    pub fn key(&self) -> SequenceKey {
        self.moves.iter().copied().collect()
    }
}

/// Header value as text. Old databases are often Windows-1252 rather than
/// UTF-8; those bytes are read as Latin-1, which agrees outside 0x80..0xA0.
fn tag_text(value: &RawTag<'_>) -> String {
    match value.decode_utf8() {
        Ok(text) => text.into_owned(),
        Err(_) => value.decode().iter().map(|&b| char::from(b)).collect(),
    }
}

/// Whether a FEN tag describes the standard initial position. Move counters
/// and spacing are ignored.
fn is_standard_start(fen: &str) -> bool {
    let Ok(fen) = fen.trim().parse::<Fen>() else {
        return false;
    };
    let Ok(position) = fen.into_position::<Chess>(CastlingMode::Standard) else {
        return false;
    };
    let start = Chess::default();
    position.board() == start.board()
        && position.turn() == start.turn()
        && position.castles().castling_rights() == start.castles().castling_rights()
}

/// Tags collected during header parsing.
#[derive(Default)]
pub struct Headers {
    metadata: GameMetadata,
    fen: Option<String>,
}

impl Headers {
    fn set(&mut self, name: &[u8], value: String) {
        let known = |v: String| if v.trim() == "?" || v.trim().is_empty() { None } else { Some(v) };
        match name {
            b"White" => self.metadata.white = PlayerName::from_header(&value),
            b"Black" => self.metadata.black = PlayerName::from_header(&value),
            b"Result" => self.metadata.result = value,
            b"Event" => self.metadata.event = known(value),
            b"Site" => self.metadata.site = known(value),
            // incomplete dates are dropped rather than guessed
            b"Date" if !value.contains('?') => self.metadata.date = known(value),
            b"FEN" => self.fen = Some(value),
            _ => {}
        }
    }
}

/// State during movetext parsing.
pub struct MainLineState {
    position: Chess,
    metadata: GameMetadata,
    moves: Vec<Move>,
    error: Option<CatalogError>,
}

/// Visitor that keeps only the main line.
#[derive(Debug, Default)]
pub struct MainLine;

impl Visitor for MainLine {
    type Tags = Headers;
    type Movetext = MainLineState;
    type Output = Result<ParsedGame, CatalogError>;

    fn begin_tags(&mut self) -> ControlFlow<Self::Output, Self::Tags> {
        ControlFlow::Continue(Headers::default())
    }

    fn tag(&mut self, tags: &mut Headers, name: &[u8], value: RawTag<'_>) -> ControlFlow<Self::Output> {
        tags.set(name, tag_text(&value));
        ControlFlow::Continue(())
    }

    fn begin_movetext(&mut self, tags: Headers) -> ControlFlow<Self::Output, MainLineState> {
        if let Some(fen) = tags.fen.as_deref() {
            if !is_standard_start(fen) {
                return ControlFlow::Break(Err(CatalogError::UnsupportedSetup));
            }
        }

        ControlFlow::Continue(MainLineState {
            position: Chess::default(),
            metadata: tags.metadata,
            moves: Vec::new(),
            error: None,
        })
    }

    fn san(&mut self, state: &mut MainLineState, san_plus: SanPlus) -> ControlFlow<Self::Output> {
        if state.error.is_some() {
            return ControlFlow::Continue(());
        }

        let ply = state.moves.len() + 1;
        let played = san_plus
            .san
            .to_move(&state.position)
            .map_err(|_| CatalogError::IllegalMove {
                ply,
                san: san_plus.to_string(),
            })
            .and_then(|m| {
                let mv = Move::from_uci(&m.to_uci(CastlingMode::Standard))?;
                state.position.play_unchecked(m);
                Ok(mv)
            });

        match played {
            Ok(mv) => state.moves.push(mv),
            Err(e) => state.error = Some(e),
        }
        ControlFlow::Continue(())
    }

    fn begin_variation(&mut self, _state: &mut MainLineState) -> ControlFlow<Self::Output, Skip> {
        ControlFlow::Continue(Skip(true))
    }

    fn end_game(&mut self, state: MainLineState) -> Self::Output {
        match state.error {
            Some(e) => Err(e),
            None => Ok(ParsedGame {
                metadata: state.metadata,
                moves: state.moves,
            }),
        }
    }
}

/// Iterator over the games of a PGN stream.
///
/// The outer `Result` is an I/O failure of the stream; the inner one is a
/// game that could not be ingested, after which reading can continue.
pub struct PgnGames<R: Read> {
    reader: Reader<R>,
    visitor: MainLine,
}

impl<R: Read> Iterator for PgnGames<R> {
    type Item = std::io::Result<Result<ParsedGame, CatalogError>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader.read_game(&mut self.visitor).transpose()
    }
}

pub fn read_games<R: Read>(reader: R) -> PgnGames<R> {
    PgnGames {
        reader: Reader::new(reader),
        visitor: MainLine,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_one(pgn: &str) -> Result<ParsedGame, CatalogError> {
        read_games(pgn.as_bytes())
            .next()
            .expect("one game")
            .expect("in-memory read")
    }

    #[test]
    fn test_main_line_and_headers() {
        let pgn = r#"[Event "Casual"]
[Site "?"]
[Date "2025.01.15"]
[White "Player, One"]
[Black "?"]
[Result "1-0"]

1. e4 e5 2. Nf3 (2. f4 exf4) Nc6 3. Bb5 {Ruy Lopez} a6 1-0"#;

        let game = parse_one(pgn).unwrap();
        assert_eq!(game.key().to_string(), "e2e4 e7e5 g1f3 b8c6 f1b5 a7a6");
        assert_eq!(game.metadata.event.as_deref(), Some("Casual"));
        assert_eq!(game.metadata.site, None);
        assert_eq!(game.metadata.date.as_deref(), Some("2025.01.15"));
        assert_eq!(game.metadata.white.as_ref().map(|p| p.lastname.as_str()), Some("Player"));
        assert_eq!(game.metadata.black, None);
        assert_eq!(game.metadata.result, "1-0");
    }

    #[test]
    fn test_castling_and_promotion() {
        let pgn = "1. e4 e5 2. Nf3 Nc6 3. Bc4 Bc5 4. O-O *";
        let game = parse_one(pgn).unwrap();
        assert_eq!(game.moves.last().map(ToString::to_string).as_deref(), Some("e1g1"));

        let pgn = r#"[FEN "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"]

1. h4 g5 2. hxg5 h6 3. gxh6 Nf6 4. h7 Rg8 5. hxg8=Q *"#;
        let game = parse_one(pgn).unwrap();
        assert_eq!(
            game.key().to_string(),
            "h2h4 g7g5 h4g5 h7h6 g5h6 g8f6 h6h7 h8g8 h7g8q"
        );
    }

    #[test]
    fn test_standard_start_fen_written_differently() {
        for fen in [
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 5 12",
            "  rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1 ",
        ] {
            let pgn = format!("[FEN \"{fen}\"]\n\n1. e4 e5 *");
            let game = parse_one(&pgn).unwrap_or_else(|e| panic!("{fen:?}: {e}"));
            assert_eq!(game.key().to_string(), "e2e4 e7e5");
        }

        // same board, black to move
        let pgn = "[FEN \"rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR b KQkq - 0 1\"]\n\n1... e5 *";
        assert_eq!(parse_one(pgn), Err(CatalogError::UnsupportedSetup));
        assert_eq!(
            parse_one("[FEN \"not a fen\"]\n\n1. e4 *"),
            Err(CatalogError::UnsupportedSetup)
        );
    }

    #[test]
    fn test_windows_1252_header_read_as_latin1() {
        let pgn: &[u8] = b"[White \"Lasker, \xC9m\"]\n[Black \"R\xE9ti, Richard\"]\n\n1. e4 *\n";
        let game = read_games(pgn)
            .next()
            .expect("one game")
            .expect("in-memory read")
            .unwrap();
        let white = game.metadata.white.expect("white");
        assert_eq!(white.firstname, "\u{c9}m");
        assert_eq!(game.metadata.black.expect("black").lastname, "R\u{e9}ti");
    }

    #[test]
    fn test_incomplete_date_dropped() {
        let game = parse_one("[Date \"1851.??.??\"]\n\n1. e4 *").unwrap();
        assert_eq!(game.metadata.date, None);
    }

    #[test]
    fn test_illegal_move_reported() {
        let err = parse_one("1. e4 e5 2. Ke3 *").unwrap_err();
        assert_eq!(
            err,
            CatalogError::IllegalMove {
                ply: 3,
                san: "Ke3".into()
            }
        );
    }

    #[test]
    fn test_non_standard_setup_rejected() {
        let pgn = "[SetUp \"1\"]\n[FEN \"4k3/8/8/8/8/8/4P3/4K3 w - - 0 1\"]\n\n1. e4 *";
        assert_eq!(parse_one(pgn), Err(CatalogError::UnsupportedSetup));
    }

    #[test]
    fn test_reading_continues_after_a_bad_game() {
        let pgn = "1. e4 e5 2. Ke3 *\n\n1. d4 d5 *\n";
        let results: Vec<_> = read_games(pgn.as_bytes())
            .map(|r| r.expect("in-memory read"))
            .collect();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_err());
        assert_eq!(results[1].as_ref().unwrap().key().to_string(), "d2d4 d7d5");
    }
}
