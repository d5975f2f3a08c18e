//! Configuration types for seeding.

use serde::{Deserialize, Serialize};

/// Configuration for seeding operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    /// Number of users the user storage seeder inserts.
    pub user_count: usize,

    /// Rows per bulk insert.
    pub chunk_size: usize,

    /// Locales picked for generated users and addresses.
    pub locales: Vec<String>,

    /// Country keys picked for generated addresses.
    pub country_keys: Vec<String>,

    /// Fixed RNG seed for reproducible data; random when unset.
    pub rng_seed: Option<u64>,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            user_count: 100,
            chunk_size: 10_000,
            locales: vec!["en".to_string(), "de".to_string(), "fr".to_string()],
            country_keys: vec![
                "US".to_string(),
                "CH".to_string(),
                "DE".to_string(),
                "FR".to_string(),
            ],
            rng_seed: None,
        }
    }
}

impl SeedConfig {
    pub fn with_user_count(mut self, count: usize) -> Self {
        self.user_count = count;
        self
    }

    /// Sets the chunk size; zero is clamped to one.
    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size.max(1);
        self
    }

    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }
}
