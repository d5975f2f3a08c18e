//! Error types for seeding operations.

use thiserror::Error;
use users::UserError;

#[derive(Debug, Error)]
pub enum SeedingError {
    #[error("Seeder {0} not found")]
    NotFound(String),

    #[error("Seeder {name} could not be created: {source}")]
    Resolve {
        name: String,
        #[source]
        source: Box<SeedingError>,
    },

    #[error("Service {0} is not available")]
    MissingService(&'static str),

    #[error("Amount must be at least 1")]
    InvalidAmount,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] UserError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SeedingResult<T> = Result<T, SeedingError>;
