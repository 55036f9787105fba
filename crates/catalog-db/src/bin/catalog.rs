//! Query and curate the opening catalog.
//!
//! Usage:
//!   catalog add-opening <name> <move>...
//!   catalog openings-of <move>...
//!   catalog games-of <name>
//!   catalog variations <name>
//!   catalog ancestors <name>
//!   catalog player-games <last name>
//!   catalog event-games <event>
//!   catalog search-games [--player P] [--white W] [--black B] [--event E] [--result R]
//!   catalog list-openings [offset]
//!
//! Moves use square-pair notation: e2e4 e7e5 g1f3, e7e8q.

use std::env;

use catalog_db::config::Config;
use catalog_db::db::players::GameFilter;
use catalog_db::db::{games, openings, players, pool};
use chess_core::encode_moves_from_notation;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn usage(program: &str) -> ! {
    eprintln!("Usage:");
    eprintln!("  {program} add-opening <name> <move>...");
    eprintln!("  {program} openings-of <move>...");
    eprintln!("  {program} games-of <name>");
    eprintln!("  {program} variations <name>");
    eprintln!("  {program} ancestors <name>");
    eprintln!("  {program} player-games <last name>");
    eprintln!("  {program} event-games <event>");
    eprintln!("  {program} search-games [--player P] [--white W] [--black B] [--event E] [--result R]");
    eprintln!("  {program} list-openings [offset]");
    std::process::exit(1);
}

/// `--flag value` pairs into a filter; `None` on an unknown flag or a
/// missing value.
fn parse_filter(args: &[String]) -> Option<GameFilter> {
    let mut filter = GameFilter::default();
    for pair in args.chunks(2) {
        let [flag, value] = pair else {
            return None;
        };
        let slot = match flag.as_str() {
            "--player" => &mut filter.player,
            "--white" => &mut filter.white,
            "--black" => &mut filter.black,
            "--event" => &mut filter.event,
            "--result" => &mut filter.result,
            _ => return None,
        };
        *slot = Some(value.clone());
    }
    Some(filter)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("catalog");
    let (command, rest) = match args.get(1..) {
        Some([command, rest @ ..]) => (command.as_str(), rest),
        _ => usage(program),
    };

    let config = Config::from_env()?;
    let pool = pool::create_pool(&config).await?;
    pool::run_migrations(&pool).await?;
    let limit = config.result_limit;

    match (command, rest) {
        ("add-opening", [name, moves @ ..]) => {
            let key = encode_moves_from_notation(moves)?;
            let opening = openings::insert_opening(&pool, name, &key).await?;
            tracing::info!(id = opening.id, name = %opening.name, "Added opening");
            print_json(&opening)
        }
        ("openings-of", moves) => {
            let key = encode_moves_from_notation(moves)?;
            print_json(&openings::openings_matching(&pool, &key, limit).await?)
        }
        ("games-of", [name]) => print_json(&games::games_of_named(&pool, name, limit).await?),
        ("variations", [name]) => {
            let opening = openings::lookup_by_name(&pool, name).await?;
            print_json(&openings::variations_of(&pool, &opening, limit).await?)
        }
        ("ancestors", [name]) => {
            let opening = openings::lookup_by_name(&pool, name).await?;
            print_json(&openings::ancestors_of(&pool, &opening, limit).await?)
        }
        ("player-games", [player]) => {
            print_json(&players::games_of_player(&pool, player, limit).await?)
        }
        ("event-games", [event]) => print_json(&players::games_of_event(&pool, event, limit).await?),
        ("search-games", flags) => match parse_filter(flags) {
            Some(filter) => print_json(&players::search_games(&pool, &filter, limit).await?),
            None => usage(program),
        },
        ("list-openings", []) => print_json(&openings::list_openings(&pool, limit, 0).await?),
        ("list-openings", [offset]) => {
            let offset: i64 = offset.parse()?;
            print_json(&openings::list_openings(&pool, limit, offset).await?)
        }
        _ => usage(program),
    }
}
