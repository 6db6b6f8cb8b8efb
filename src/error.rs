//! Error types for the translation engine

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("parse error: {0}")]
    Parse(String),

    #[error("translation error: {0}")]
    Translation(String),

    #[error("invalid group function name: {0}")]
    UnknownGroupFunction(String),

    #[error("embedding error: {0}")]
    Embedding(String),

    #[error("schema error: {0}")]
    Schema(String),

    #[error("row source error: {0}")]
    Source(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Schema(err.to_string())
    }
}
