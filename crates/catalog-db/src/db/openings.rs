use chess_core::prefix::{move_prefixes, KeyRange};
use chess_core::{CatalogError, Game, Opening, RecordId, SequenceKey};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::error::DbError;

fn opening_from_row(row: &PgRow) -> Result<Opening, DbError> {
    let moves: Vec<u8> = row.try_get("moves")?;
    Ok(Opening {
        id: row.try_get("id")?,
        name: row.try_get("opening_name")?,
        moves: SequenceKey::from_bytes(moves)?,
    })
}

fn openings_from_rows(rows: &[PgRow]) -> Result<Vec<Opening>, DbError> {
    rows.iter().map(opening_from_row).collect()
}

/// Add a curated opening. Names are unique.
pub async fn insert_opening(pool: &PgPool, name: &str, moves: &SequenceKey) -> Result<Opening, DbError> {
    let row = sqlx::query(
        r#"INSERT INTO openings (opening_name, moves) VALUES ($1, $2)
           ON CONFLICT (opening_name) DO NOTHING
           RETURNING id, opening_name, moves"#,
    )
    .bind(name)
    .bind(moves.as_bytes())
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => opening_from_row(&row),
        None => Err(CatalogError::DuplicateName(name.to_string()).into()),
    }
}

pub async fn lookup_by_name(pool: &PgPool, name: &str) -> Result<Opening, DbError> {
    let row = sqlx::query("SELECT id, opening_name, moves FROM openings WHERE opening_name = $1")
        .bind(name)
        .fetch_optional(pool)
        .await?;

    match row {
        Some(row) => opening_from_row(&row),
        None => Err(CatalogError::NotFound(name.to_string()).into()),
    }
}

pub async fn list_openings(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Opening>, DbError> {
    let rows = sqlx::query(
        "SELECT id, opening_name, moves FROM openings ORDER BY opening_name LIMIT $1 OFFSET $2",
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    openings_from_rows(&rows)
}

/// Openings whose moves are a prefix of `moves`, shortest first.
///
/// Only the whole-move prefixes of `moves` can match, so this is a set of
/// point lookups on the `moves` index rather than a scan.
async fn openings_at_prefixes(
    pool: &PgPool,
    moves: &SequenceKey,
    exclude: Option<RecordId>,
    limit: i64,
) -> Result<Vec<Opening>, DbError> {
    let prefixes: Vec<Vec<u8>> = move_prefixes(moves.as_bytes()).map(<[u8]>::to_vec).collect();

    let rows = sqlx::query(
        r#"SELECT id, opening_name, moves FROM openings
           WHERE moves = ANY($1::bytea[]) AND ($2::bigint IS NULL OR id <> $2)
           ORDER BY moves, id
           LIMIT $3"#,
    )
    .bind(&prefixes)
    .bind(exclude)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    openings_from_rows(&rows)
}

/// Openings classifying a line that need not be stored.
pub async fn openings_matching(
    pool: &PgPool,
    moves: &SequenceKey,
    limit: i64,
) -> Result<Vec<Opening>, DbError> {
    openings_at_prefixes(pool, moves, None, limit).await
}

pub async fn openings_of(pool: &PgPool, game: &Game, limit: i64) -> Result<Vec<Opening>, DbError> {
    openings_at_prefixes(pool, &game.moves, None, limit).await
}

/// Other openings extending this one.
pub async fn variations_of(pool: &PgPool, opening: &Opening, limit: i64) -> Result<Vec<Opening>, DbError> {
    let range = KeyRange::starting_with(opening.moves.as_bytes());

    let rows = sqlx::query(
        r#"SELECT id, opening_name, moves FROM openings
           WHERE moves BETWEEN $1 AND $2 AND id <> $3
           ORDER BY moves, id
           LIMIT $4"#,
    )
    .bind(range.lower())
    .bind(range.upper())
    .bind(opening.id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    openings_from_rows(&rows)
}

/// Other openings this one extends.
pub async fn ancestors_of(pool: &PgPool, opening: &Opening, limit: i64) -> Result<Vec<Opening>, DbError> {
    openings_at_prefixes(pool, &opening.moves, Some(opening.id), limit).await
}
