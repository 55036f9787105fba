//! In-memory catalog on sorted maps, for small catalogs and tests.

use std::collections::{BTreeMap, HashMap};

use crate::catalog::{Game, Opening, OrderedIndex, RecordId};
use crate::codec::SequenceKey;
use crate::error::CatalogError;
use crate::game_data::GameMetadata;
use crate::prefix::KeyRange;

#[derive(Debug, Default)]
pub struct MemoryCatalog {
    openings: BTreeMap<SequenceKey, Vec<Opening>>,
    games: BTreeMap<SequenceKey, Vec<Game>>,
    names: HashMap<String, SequenceKey>,
    next_id: RecordId,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&mut self) -> RecordId {
        self.next_id += 1;
        self.next_id
    }

    pub fn add_opening(
        &mut self,
        name: impl Into<String>,
        moves: SequenceKey,
    ) -> Result<Opening, CatalogError> {
        let name = name.into();
        if self.names.contains_key(&name) {
            return Err(CatalogError::DuplicateName(name));
        }
        let opening = Opening {
            id: self.allocate_id(),
            name: name.clone(),
            moves: moves.clone(),
        };
        self.names.insert(name, moves.clone());
        self.openings.entry(moves).or_default().push(opening.clone());
        Ok(opening)
    }

    pub fn add_game(&mut self, moves: SequenceKey, metadata: GameMetadata) -> Game {
        let game = Game {
            id: self.allocate_id(),
            moves: moves.clone(),
            metadata,
        };
        self.games.entry(moves).or_default().push(game.clone());
        game
    }

    pub fn opening_count(&self) -> usize {
        self.names.len()
    }

    pub fn game_count(&self) -> usize {
        self.games.values().map(Vec::len).sum()
    }

    /// Games where `player` is either side. Not key-ordered, so this scans.
    pub fn games_with_player(&self, player: &str) -> Vec<Game> {
        self.games
            .values()
            .flatten()
            .filter(|game| game.metadata.involves(player))
            .cloned()
            .collect()
    }
}

impl OrderedIndex for MemoryCatalog {
    fn openings_in(&self, range: &KeyRange) -> Vec<Opening> {
        self.openings
            .range::<[u8], _>(range.bounds())
            .flat_map(|(_, openings)| openings.iter().cloned())
            .collect()
    }

    fn openings_at(&self, key: &[u8]) -> Vec<Opening> {
        self.openings.get(key).cloned().unwrap_or_default()
    }

    fn games_in(&self, range: &KeyRange) -> Vec<Game> {
        self.games
            .range::<[u8], _>(range.bounds())
            .flat_map(|(_, games)| games.iter().cloned())
            .collect()
    }

    fn opening_named(&self, name: &str) -> Option<Opening> {
        let moves = self.names.get(name)?;
        self.openings
            .get(moves)?
            .iter()
            .find(|opening| opening.name == name)
            .cloned()
    }
}
