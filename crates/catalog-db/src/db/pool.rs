use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::config::Config;

pub async fn create_pool(config: &Config) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await
}

/// Run the full Postgres schema migration inline.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(SCHEMA_SQL).execute(pool).await?;
    Ok(())
}

// BYTEA compares bytewise, so the B-tree indexes on `moves` serve the
// `moves BETWEEN $lower AND $upper` prefix scans directly.
const SCHEMA_SQL: &str = r#"
-- Players (either side of a game)
CREATE TABLE IF NOT EXISTS players (
    id          BIGSERIAL PRIMARY KEY,
    firstname   TEXT NOT NULL DEFAULT '',
    lastname    TEXT NOT NULL DEFAULT '',
    elo_rating  INTEGER,
    nationality TEXT,
    UNIQUE(firstname, lastname)
);

-- Substring name search scans players; games are then reached through
-- the white_id / black_id indexes.
CREATE INDEX IF NOT EXISTS idx_players_lastname ON players (lastname);

-- Events (tournaments, matches)
CREATE TABLE IF NOT EXISTS events (
    id          BIGSERIAL PRIMARY KEY,
    event_name  TEXT UNIQUE NOT NULL,
    location    TEXT,
    start_date  DATE,
    end_date    DATE
);

-- Games, keyed by the encoded main line
CREATE TABLE IF NOT EXISTS games (
    id          BIGSERIAL PRIMARY KEY,
    moves       BYTEA NOT NULL,
    white_id    BIGINT REFERENCES players(id) ON DELETE SET NULL,
    black_id    BIGINT REFERENCES players(id) ON DELETE SET NULL,
    event_id    BIGINT REFERENCES events(id) ON DELETE SET NULL,
    location    TEXT,
    start_date  DATE,
    result      TEXT NOT NULL,
    created_at  TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX IF NOT EXISTS idx_games_moves    ON games (moves);
CREATE INDEX IF NOT EXISTS idx_games_white_id ON games (white_id);
CREATE INDEX IF NOT EXISTS idx_games_black_id ON games (black_id);
CREATE INDEX IF NOT EXISTS idx_games_event_id ON games (event_id);

-- Curated openings
CREATE TABLE IF NOT EXISTS openings (
    id            BIGSERIAL PRIMARY KEY,
    opening_name  TEXT UNIQUE NOT NULL,
    moves         BYTEA NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_openings_moves ON openings (moves);
"#;
