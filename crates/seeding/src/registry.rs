//! Seeder registry.
//!
//! Maps unique names to seeders, in registration order. A seeder is either
//! registered ready-made or as a constructor that is resolved against
//! [`Services`] the first time it is fetched; the constructed seeder then
//! replaces the constructor.

use std::sync::Arc;

use indexmap::IndexMap;
use tracing::debug;

use crate::error::{SeedingError, SeedingResult};
use crate::seeder::Seeder;
use crate::services::Services;

/// Builds a seeder from the available services.
pub type SeederConstructor =
    Box<dyn Fn(&Services) -> SeedingResult<Arc<dyn Seeder>> + Send + Sync>;

enum Entry {
    Ready(Arc<dyn Seeder>),
    Lazy(SeederConstructor),
}

pub struct Seeders {
    services: Services,
    seeders: IndexMap<String, Entry>,
}

impl Seeders {
    pub fn new(services: Services) -> Self {
        Self {
            services,
            seeders: IndexMap::new(),
        }
    }

    /// Registers a ready seeder; re-using a name replaces the earlier entry.
    pub fn add_seeder(&mut self, name: impl Into<String>, seeder: Arc<dyn Seeder>) -> &mut Self {
        self.seeders.insert(name.into(), Entry::Ready(seeder));
        self
    }

    /// Registers a seeder constructed on first fetch.
    pub fn add_lazy<F>(&mut self, name: impl Into<String>, constructor: F) -> &mut Self
    where
        F: Fn(&Services) -> SeedingResult<Arc<dyn Seeder>> + Send + Sync + 'static,
    {
        self.seeders
            .insert(name.into(), Entry::Lazy(Box::new(constructor)));
        self
    }

    pub fn has_seeder(&self, name: &str) -> bool {
        self.seeders.contains_key(name)
    }

    /// Returns the seeder registered as `name`, constructing it if needed.
    ///
    /// A failed construction leaves the entry lazy.
    pub fn get_seeder(&mut self, name: &str) -> SeedingResult<Arc<dyn Seeder>> {
        let entry = self
            .seeders
            .get_mut(name)
            .ok_or_else(|| SeedingError::NotFound(name.to_string()))?;

        let seeder = match &*entry {
            Entry::Ready(seeder) => return Ok(seeder.clone()),
            Entry::Lazy(constructor) => {
                debug!("Resolving seeder {name}");
                constructor(&self.services).map_err(|e| SeedingError::Resolve {
                    name: name.to_string(),
                    source: Box::new(e),
                })?
            }
        };

        *entry = Entry::Ready(seeder.clone());
        Ok(seeder)
    }

    /// All seeder names in registration order.
    pub fn names(&self) -> Vec<String> {
        self.seeders.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.seeders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seeders.is_empty()
    }

    pub fn services(&self) -> &Services {
        &self.services
    }
}

impl Default for Seeders {
    fn default() -> Self {
        Self::new(Services::default())
    }
}
