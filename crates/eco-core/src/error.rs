//! Error types for the simulation.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid grid dimensions: {width}x{height}")]
    InvalidDimensions { width: i32, height: i32 },

    #[error("Index {index} out of bounds for grid of capacity {capacity}")]
    IndexOutOfBounds { index: usize, capacity: usize },

    #[error("Unknown species: {0}")]
    UnknownSpecies(String),

    #[error("Duplicate species: {0}")]
    DuplicateSpecies(String),

    #[error("Invalid species parameter for {species}: {reason}")]
    InvalidSpecies { species: String, reason: String },

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
