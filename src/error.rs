use thiserror::Error;

#[derive(Error, Debug)]
pub enum TallyError {
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Selection must match exactly one row: {0}")]
    AmbiguousSelection(String),

    #[error("Integrity error: {0}")]
    Integrity(String),

    #[error("No built-in schema: {0}")]
    Schema(String),

    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Settings error: {0}")]
    Settings(String),
}

pub type Result<T> = std::result::Result<T, TallyError>;
