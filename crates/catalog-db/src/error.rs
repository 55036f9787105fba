use chess_core::CatalogError;

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("Configuration error: {0}")]
    Config(&'static str),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DbError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, DbError::Catalog(e) if e.is_not_found())
    }
}
