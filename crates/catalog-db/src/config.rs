use std::env;

use crate::error::DbError;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
    /// Row cap for listing queries.
    pub result_limit: i64,
    /// Loader progress is logged every this many games.
    pub log_every: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, DbError> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .map_err(|_| DbError::Config("DATABASE_URL must be set"))?,
            max_connections: env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(20),
            result_limit: env::var("RESULT_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(50),
            log_every: env::var("PGN_BATCH_LOG_EVERY")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|&n: &u64| n > 0)
                .unwrap_or(10_000),
        })
    }
}
