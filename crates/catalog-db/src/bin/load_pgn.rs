//! Load games from PGN files into the catalog database.
//!
//! Usage: cargo run --release --bin load-pgn -- <pattern>...
//!
//! Example:
//!   cargo run --release --bin load-pgn -- '../KingBase*.pgn'

use std::env;
use std::time::Instant;

use catalog_db::config::Config;
use catalog_db::db::{games, pool};
use catalog_db::ingest::{self, LoadStats};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("load-pgn");
    let patterns = args.get(1..).unwrap_or_default();
    if patterns.is_empty() {
        eprintln!("Usage: {program} <pattern>...");
        eprintln!();
        eprintln!("Example:");
        eprintln!("  {program} '../KingBase*.pgn'");
        std::process::exit(1);
    }

    let config = Config::from_env()?;

    tracing::info!("Connecting to database...");
    let pool = pool::create_pool(&config).await?;
    pool::run_migrations(&pool).await?;

    let mut pgn_files = Vec::new();
    for pattern in patterns {
        pgn_files.extend(glob::glob(pattern)?.filter_map(Result::ok));
    }

    if pgn_files.is_empty() {
        anyhow::bail!("no PGN files match {:?}", patterns);
    }
    tracing::info!(files = pgn_files.len(), "Found PGN files");

    let start = Instant::now();
    let mut totals = LoadStats::default();
    for path in &pgn_files {
        tracing::info!(file = %path.display(), "Loading file");
        let stats = ingest::load_file(&pool, path, config.log_every).await?;
        totals.add(stats);
    }

    let stored = games::count_games(&pool).await?;
    tracing::info!(
        loaded = totals.loaded,
        skipped = totals.skipped,
        stored,
        secs = start.elapsed().as_secs_f64(),
        "Load complete"
    );

    Ok(())
}
