//! Load PGN files into the store, one row per game.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use chess_core::pgn::{read_games, ParsedGame};
use chess_core::RecordId;
use chrono::NaiveDate;
use sqlx::PgPool;
use tracing::{info, warn};

use crate::db::games::{self, NewGame};
use crate::db::players;
use crate::error::DbError;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadStats {
    pub loaded: u64,
    pub skipped: u64,
}

impl LoadStats {
    pub fn total(&self) -> u64 {
        self.loaded + self.skipped
    }

    pub fn add(&mut self, other: LoadStats) {
        self.loaded += other.loaded;
        self.skipped += other.skipped;
    }
}

/// PGN dates are `YYYY.MM.DD`.
pub fn parse_pgn_date(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), "%Y.%m.%d").ok()
}

/// Store one parsed game, creating its players and event on first sight.
pub async fn load_game(pool: &PgPool, game: &ParsedGame) -> Result<RecordId, DbError> {
    let meta = &game.metadata;

    let white_id = match &meta.white {
        Some(name) => Some(players::find_or_add_player(pool, name).await?),
        None => None,
    };
    let black_id = match &meta.black {
        Some(name) => Some(players::find_or_add_player(pool, name).await?),
        None => None,
    };
    let event_id = match meta.event.as_deref() {
        Some(event) => Some(players::find_or_add_event(pool, event).await?),
        None => None,
    };

    let moves = game.key();
    games::insert_game(
        pool,
        &NewGame {
            moves: &moves,
            white_id,
            black_id,
            event_id,
            location: meta.site.as_deref(),
            start_date: meta.date.as_deref().and_then(parse_pgn_date),
            result: &meta.result,
        },
    )
    .await
}

/// Stream every game of a PGN file into the store.
///
/// Games that cannot be ingested are skipped and counted; I/O and database
/// failures abort the file.
pub async fn load_file(pool: &PgPool, path: &Path, log_every: u64) -> Result<LoadStats, DbError> {
    let file = File::open(path)?;
    let mut stats = LoadStats::default();

    for parsed in read_games(BufReader::new(file)) {
        match parsed? {
            Ok(game) => {
                load_game(pool, &game).await?;
                stats.loaded += 1;
            }
            Err(e) => {
                warn!(file = %path.display(), game = stats.total() + 1, error = %e, "Skipping game");
                stats.skipped += 1;
            }
        }

        if log_every > 0 && stats.total() % log_every == 0 {
            info!(file = %path.display(), loaded = stats.loaded, skipped = stats.skipped, "Loading");
        }
    }

    info!(file = %path.display(), loaded = stats.loaded, skipped = stats.skipped, "Loaded file");
    Ok(stats)
}
