//! Error kinds raised by the codec, the catalog and PGN ingestion.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// Odd-length byte string presented for decoding.
    #[error("malformed move sequence: {len} bytes is not a whole number of moves")]
    MalformedSequence { len: usize },

    #[error("invalid move notation: {0:?}")]
    InvalidNotation(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("opening name already in catalog: {0}")]
    DuplicateName(String),

    #[error("illegal move {san} at ply {ply}")]
    IllegalMove { ply: usize, san: String },

    #[error("game does not start from the standard position")]
    UnsupportedSetup,
}

impl CatalogError {
    /// `NotFound` is an empty result for callers, not a failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::NotFound(_))
    }
}
