//! Collaborators that lazily constructed seeders and factories draw from.

use std::sync::{Arc, Mutex, PoisonError};

use users::{AddressRepository, MemoryStore, Roles, UserRepository};

use crate::config::SeedConfig;
use crate::error::{SeedingError, SeedingResult};
use crate::seed::Seed;

/// Explicit bundle of the services seeders may depend on.
///
/// Repositories are optional; asking for a missing one fails with
/// [`SeedingError::MissingService`]. Clones share one master [`Seed`].
#[derive(Clone, Default)]
pub struct Services {
    users: Option<Arc<dyn UserRepository>>,
    addresses: Option<Arc<dyn AddressRepository>>,
    roles: Roles,
    config: SeedConfig,
    seed: Arc<Mutex<Seed>>,
}

impl Services {
    pub fn new(config: SeedConfig) -> Self {
        Self {
            seed: Arc::new(Mutex::new(Seed::from_optional(config.rng_seed))),
            config,
            ..Self::default()
        }
    }

    /// Services backed by a single in-memory store.
    pub fn in_memory(config: SeedConfig) -> (Self, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let services = Self::new(config)
            .with_user_repository(store.clone())
            .with_address_repository(store.clone());
        (services, store)
    }

    pub fn with_user_repository(mut self, repository: Arc<dyn UserRepository>) -> Self {
        self.users = Some(repository);
        self
    }

    pub fn with_address_repository(mut self, repository: Arc<dyn AddressRepository>) -> Self {
        self.addresses = Some(repository);
        self
    }

    pub fn with_roles(mut self, roles: Roles) -> Self {
        self.roles = roles;
        self
    }

    pub fn user_repository(&self) -> SeedingResult<Arc<dyn UserRepository>> {
        self.users
            .clone()
            .ok_or(SeedingError::MissingService("UserRepository"))
    }

    pub fn address_repository(&self) -> SeedingResult<Arc<dyn AddressRepository>> {
        self.addresses
            .clone()
            .ok_or(SeedingError::MissingService("AddressRepository"))
    }

    pub fn roles(&self) -> &Roles {
        &self.roles
    }

    pub fn config(&self) -> &SeedConfig {
        &self.config
    }

    /// A fake value provider forked from the master seed.
    ///
    /// Every call yields a different stream; with a configured `rng_seed`
    /// the sequence of streams is reproducible.
    pub fn seed(&self) -> Seed {
        self.seed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .fork()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_missing_repositories() {
        let services = Services::default();

        assert!(matches!(
            services.user_repository(),
            Err(SeedingError::MissingService("UserRepository"))
        ));
        assert!(matches!(
            services.address_repository(),
            Err(SeedingError::MissingService("AddressRepository"))
        ));
    }

    #[test]
    fn test_in_memory_provides_both_repositories() {
        let (services, _store) = Services::in_memory(SeedConfig::default());

        assert!(services.user_repository().is_ok());
        assert!(services.address_repository().is_ok());
    }

    #[test]
    fn test_seed_follows_config() {
        let a = Services::new(SeedConfig::default().with_rng_seed(9));
        let b = Services::new(SeedConfig::default().with_rng_seed(9));

        assert_eq!(a.seed().email("Ada"), b.seed().email("Ada"));
        assert_eq!(a.seed().email("Ada"), b.seed().email("Ada"));
    }

    #[test]
    fn test_successive_seeds_differ() {
        let services = Services::new(SeedConfig::default().with_rng_seed(9));
        let shared = services.clone();

        let mut first = services.seed();
        let mut second = shared.seed();
        assert_ne!(first.rng().r#gen::<u64>(), second.rng().r#gen::<u64>());
    }
}
