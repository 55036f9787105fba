use chess_core::prefix::KeyRange;
use chess_core::{CatalogError, Game, GameMetadata, Opening, PlayerName, RecordId, SequenceKey};
use chrono::NaiveDate;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::db::openings;
use crate::error::DbError;

/// Game columns joined with both players and the event.
pub(crate) const GAME_SELECT: &str = r#"
    SELECT g.id, g.moves, g.result, g.location, g.start_date,
           w.firstname AS white_first, w.lastname AS white_last,
           b.firstname AS black_first, b.lastname AS black_last,
           e.event_name
    FROM games g
    LEFT JOIN players w ON w.id = g.white_id
    LEFT JOIN players b ON b.id = g.black_id
    LEFT JOIN events e ON e.id = g.event_id"#;

/// Row to insert; player and event ids are already resolved.
#[derive(Debug, Clone)]
pub struct NewGame<'a> {
    pub moves: &'a SequenceKey,
    pub white_id: Option<RecordId>,
    pub black_id: Option<RecordId>,
    pub event_id: Option<RecordId>,
    pub location: Option<&'a str>,
    pub start_date: Option<NaiveDate>,
    pub result: &'a str,
}

fn player_from_row(row: &PgRow, first: &str, last: &str) -> Result<Option<PlayerName>, DbError> {
    let firstname: Option<String> = row.try_get(first)?;
    let lastname: Option<String> = row.try_get(last)?;
    Ok(match (firstname, lastname) {
        (None, None) => None,
        (firstname, lastname) => Some(PlayerName {
            firstname: firstname.unwrap_or_default(),
            lastname: lastname.unwrap_or_default(),
        }),
    })
}

pub(crate) fn game_from_row(row: &PgRow) -> Result<Game, DbError> {
    let moves: Vec<u8> = row.try_get("moves")?;
    let start_date: Option<NaiveDate> = row.try_get("start_date")?;

    Ok(Game {
        id: row.try_get("id")?,
        moves: SequenceKey::from_bytes(moves)?,
        metadata: GameMetadata {
            white: player_from_row(row, "white_first", "white_last")?,
            black: player_from_row(row, "black_first", "black_last")?,
            result: row.try_get("result")?,
            event: row.try_get("event_name")?,
            site: row.try_get("location")?,
            date: start_date.map(|d| d.format("%Y.%m.%d").to_string()),
        },
    })
}

pub(crate) fn games_from_rows(rows: &[PgRow]) -> Result<Vec<Game>, DbError> {
    rows.iter().map(game_from_row).collect()
}

pub async fn insert_game(pool: &PgPool, game: &NewGame<'_>) -> Result<RecordId, DbError> {
    let (id,): (RecordId,) = sqlx::query_as(
        r#"INSERT INTO games (moves, white_id, black_id, event_id, location, start_date, result)
           VALUES ($1, $2, $3, $4, $5, $6, $7)
           RETURNING id"#,
    )
    .bind(game.moves.as_bytes())
    .bind(game.white_id)
    .bind(game.black_id)
    .bind(game.event_id)
    .bind(game.location)
    .bind(game.start_date)
    .bind(game.result)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

pub async fn get_game(pool: &PgPool, game_id: RecordId) -> Result<Game, DbError> {
    let query = format!("{GAME_SELECT} WHERE g.id = $1");
    let row = sqlx::query(&query)
        .bind(game_id)
        .fetch_optional(pool)
        .await?;

    match row {
        Some(row) => game_from_row(&row),
        None => Err(CatalogError::NotFound(format!("game {game_id}")).into()),
    }
}

/// Games whose moves begin with `prefix`, as one range scan on the index.
pub async fn games_starting_with(
    pool: &PgPool,
    prefix: &SequenceKey,
    limit: i64,
) -> Result<Vec<Game>, DbError> {
    let range = KeyRange::starting_with(prefix.as_bytes());
    let query = format!(
        "{GAME_SELECT} WHERE g.moves BETWEEN $1 AND $2 ORDER BY g.moves, g.id LIMIT $3"
    );

    let rows = sqlx::query(&query)
        .bind(range.lower())
        .bind(range.upper())
        .bind(limit)
        .fetch_all(pool)
        .await?;

    games_from_rows(&rows)
}

pub async fn games_of(pool: &PgPool, opening: &Opening, limit: i64) -> Result<Vec<Game>, DbError> {
    games_starting_with(pool, &opening.moves, limit).await
}

/// Games of a named opening; an unknown name has no games.
pub async fn games_of_named(pool: &PgPool, name: &str, limit: i64) -> Result<Vec<Game>, DbError> {
    match openings::lookup_by_name(pool, name).await {
        Ok(opening) => games_of(pool, &opening, limit).await,
        Err(e) if e.is_not_found() => Ok(Vec::new()),
        Err(e) => Err(e),
    }
}

pub async fn count_games(pool: &PgPool) -> Result<i64, DbError> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM games")
        .fetch_one(pool)
        .await?;
    Ok(count)
}
