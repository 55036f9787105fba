//! Postgres store for the opening catalog and the PGN loader that feeds it.

pub mod config;
pub mod db;
pub mod error;
pub mod ingest;
