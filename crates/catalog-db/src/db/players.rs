use chess_core::{Game, PlayerName, RecordId};
use sqlx::PgPool;

use crate::db::games::{games_from_rows, GAME_SELECT};
use crate::error::DbError;

/// Id of the player with this exact name, creating the row if needed.
pub async fn find_or_add_player(pool: &PgPool, name: &PlayerName) -> Result<RecordId, DbError> {
    // the no-op update makes RETURNING yield the existing row on conflict
    let (id,): (RecordId,) = sqlx::query_as(
        r#"INSERT INTO players (firstname, lastname) VALUES ($1, $2)
           ON CONFLICT (firstname, lastname) DO UPDATE SET firstname = EXCLUDED.firstname
           RETURNING id"#,
    )
    .bind(&name.firstname)
    .bind(&name.lastname)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

pub async fn find_or_add_event(pool: &PgPool, event_name: &str) -> Result<RecordId, DbError> {
    let (id,): (RecordId,) = sqlx::query_as(
        r#"INSERT INTO events (event_name) VALUES ($1)
           ON CONFLICT (event_name) DO UPDATE SET event_name = EXCLUDED.event_name
           RETURNING id"#,
    )
    .bind(event_name)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

/// `%needle%` with LIKE metacharacters escaped.
fn contains_pattern(needle: &str) -> String {
    let escaped = needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

/// Filters for browsing games. `None` matches anything; names and events
/// match case-insensitively as substrings.
#[derive(Debug, Clone, Default)]
pub struct GameFilter {
    /// Last name on either side.
    pub player: Option<String>,
    pub white: Option<String>,
    pub black: Option<String>,
    pub event: Option<String>,
    /// Exact result tag: `1-0`, `0-1`, `1/2-1/2` or `*`.
    pub result: Option<String>,
}

pub async fn search_games(pool: &PgPool, filter: &GameFilter, limit: i64) -> Result<Vec<Game>, DbError> {
    let query = format!(
        r#"{GAME_SELECT}
    WHERE ($1::text IS NULL OR w.lastname ILIKE $1 OR b.lastname ILIKE $1)
      AND ($2::text IS NULL OR w.lastname ILIKE $2)
      AND ($3::text IS NULL OR b.lastname ILIKE $3)
      AND ($4::text IS NULL OR e.event_name ILIKE $4)
      AND ($5::text IS NULL OR g.result = $5)
    ORDER BY g.start_date DESC NULLS LAST, g.id
    LIMIT $6"#
    );

    let rows = sqlx::query(&query)
        .bind(filter.player.as_deref().map(contains_pattern))
        .bind(filter.white.as_deref().map(contains_pattern))
        .bind(filter.black.as_deref().map(contains_pattern))
        .bind(filter.event.as_deref().map(contains_pattern))
        .bind(filter.result.as_deref())
        .bind(limit)
        .fetch_all(pool)
        .await?;

    games_from_rows(&rows)
}

/// Games where the player's last name matches on either side.
pub async fn games_of_player(pool: &PgPool, player: &str, limit: i64) -> Result<Vec<Game>, DbError> {
    let filter = GameFilter {
        player: Some(player.to_string()),
        ..GameFilter::default()
    };
    search_games(pool, &filter, limit).await
}

pub async fn games_of_event(pool: &PgPool, event: &str, limit: i64) -> Result<Vec<Game>, DbError> {
    let filter = GameFilter {
        event: Some(event.to_string()),
        ..GameFilter::default()
    };
    search_games(pool, &filter, limit).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("Carlsen"), "%Carlsen%");
        assert_eq!(contains_pattern("50%_"), "%50\\%\\_%");
    }
}
