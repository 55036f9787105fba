//! Openings, games, and the prefix relations between them.
//!
//! Relations are derived on every call from the stored keys; nothing here
//! caches or records them.

use serde::Serialize;

use crate::codec::SequenceKey;
use crate::error::CatalogError;
use crate::game_data::GameMetadata;
use crate::prefix::{move_prefixes, KeyRange};

pub type RecordId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Opening {
    pub id: RecordId,
    pub name: String,
    pub moves: SequenceKey,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Game {
    pub id: RecordId,
    pub moves: SequenceKey,
    pub metadata: GameMetadata,
}

/// An ordered store of opening and game keys.
///
/// Results come back in key order. Implementations must answer range and
/// point queries from their index rather than by scanning every record.
pub trait OrderedIndex {
    fn openings_in(&self, range: &KeyRange) -> Vec<Opening>;

    /// Openings whose key equals `key` exactly.
    fn openings_at(&self, key: &[u8]) -> Vec<Opening>;

    fn games_in(&self, range: &KeyRange) -> Vec<Game>;

    fn opening_named(&self, name: &str) -> Option<Opening>;
}

/// Openings whose key is a prefix of `moves`, shortest first.
pub fn openings_matching<I: OrderedIndex + ?Sized>(index: &I, moves: &SequenceKey) -> Vec<Opening> {
    move_prefixes(moves.as_bytes())
        .flat_map(|prefix| index.openings_at(prefix))
        .collect()
}

/// Openings that classify `game`.
pub fn openings_of<I: OrderedIndex + ?Sized>(index: &I, game: &Game) -> Vec<Opening> {
    openings_matching(index, &game.moves)
}

/// Games whose moves begin with the opening's moves.
pub fn games_of<I: OrderedIndex + ?Sized>(index: &I, opening: &Opening) -> Vec<Game> {
    index.games_in(&KeyRange::starting_with(opening.moves.as_bytes()))
}

/// Other openings that extend this one. Records sharing the same key count
/// as variations; only the opening itself is excluded.
pub fn variations_of<I: OrderedIndex + ?Sized>(index: &I, opening: &Opening) -> Vec<Opening> {
    index
        .openings_in(&KeyRange::starting_with(opening.moves.as_bytes()))
        .into_iter()
        .filter(|other| other.id != opening.id)
        .collect()
}

/// Other openings this one extends, shortest first.
pub fn ancestors_of<I: OrderedIndex + ?Sized>(index: &I, opening: &Opening) -> Vec<Opening> {
    openings_matching(index, &opening.moves)
        .into_iter()
        .filter(|other| other.id != opening.id)
        .collect()
}

pub fn lookup_by_name<I: OrderedIndex + ?Sized>(index: &I, name: &str) -> Result<Opening, CatalogError> {
    index
        .opening_named(name)
        .ok_or_else(|| CatalogError::NotFound(name.to_string()))
}

/// Resolve a name and list its games; an unknown name yields no games.
pub fn games_of_named<I: OrderedIndex + ?Sized>(index: &I, name: &str) -> Result<Vec<Game>, CatalogError> {
    match lookup_by_name(index, name) {
        Ok(opening) => Ok(games_of(index, &opening)),
        Err(e) if e.is_not_found() => Ok(Vec::new()),
        Err(e) => Err(e),
    }
}
