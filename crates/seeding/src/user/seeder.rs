//! Bulk user seeding.

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use tracing::info;
use users::{AddressRepository, NewAddress, NewUser, UserRepository};
use uuid::Uuid;

use crate::error::SeedingResult;
use crate::factory::Blueprint;
use crate::seed::Seed;
use crate::seeder::{ItemSink, Seeder};
use crate::services::Services;
use crate::user::UserBlueprint;

/// Inserts generated users and their primary addresses in chunks.
///
/// Each chunk inserts its users first, then their addresses; every stored
/// row is handed to the sink as it comes back from the repository.
pub struct UserStorageSeeder {
    users: Arc<dyn UserRepository>,
    addresses: Arc<dyn AddressRepository>,
    blueprint: UserBlueprint,
    user_count: usize,
    chunk_size: usize,
    seed: Mutex<Seed>,
}

impl UserStorageSeeder {
    pub fn new(
        users: Arc<dyn UserRepository>,
        addresses: Arc<dyn AddressRepository>,
        blueprint: UserBlueprint,
    ) -> Self {
        Self {
            users,
            addresses,
            blueprint,
            user_count: 100,
            chunk_size: 10_000,
            seed: Mutex::new(Seed::default()),
        }
    }

    /// Fails when either repository is missing.
    pub fn from_services(services: &Services) -> SeedingResult<Self> {
        let config = services.config();
        Ok(Self::new(
            services.user_repository()?,
            services.address_repository()?,
            UserBlueprint::from_services(services)?,
        )
        .with_user_count(config.user_count)
        .with_chunk_size(config.chunk_size)
        .with_seed(services.seed()))
    }

    pub fn with_user_count(mut self, count: usize) -> Self {
        self.user_count = count;
        self
    }

    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size.max(1);
        self
    }

    pub fn with_rng_seed(self, seed: u64) -> Self {
        self.with_seed(Seed::from_seed(seed))
    }

    /// Each run forks its own stream from `seed`.
    pub fn with_seed(mut self, seed: Seed) -> Self {
        self.seed = Mutex::new(seed);
        self
    }

    fn next_seed(&self) -> Seed {
        self.seed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .fork()
    }

    fn generate_chunk(&self, seed: &mut Seed, size: usize) -> SeedingResult<Vec<NewUser>> {
        (0..size)
            .map(|_| {
                let definition = self.blueprint.definition(seed);
                self.blueprint.new_user(definition)
            })
            .collect()
    }
}

#[async_trait]
impl Seeder for UserStorageSeeder {
    async fn run(&self, sink: &mut dyn ItemSink) -> SeedingResult<usize> {
        let existing = self.users.count_users().await?;
        info!(
            "Seeding {} users ({} already stored)...",
            self.user_count, existing
        );

        let mut seed = self.next_seed();
        let mut produced = 0;
        let mut remaining = self.user_count;

        while remaining > 0 {
            let size = remaining.min(self.chunk_size);
            let mut chunk = self.generate_chunk(&mut seed, size)?;

            let addresses: Vec<(Uuid, NewAddress)> = chunk
                .iter_mut()
                .map(|user| (user.id, user.address.take().unwrap_or_default()))
                .collect();

            for user in self.users.insert_users(&chunk).await? {
                sink.accept(serde_json::to_value(&user)?);
                produced += 1;
            }

            for address in self.addresses.insert_addresses(&addresses).await? {
                sink.accept(serde_json::to_value(&address)?);
                produced += 1;
            }

            remaining -= size;
            info!(
                "  Seeded {}/{} users",
                self.user_count - remaining,
                self.user_count
            );
        }

        info!("Seeded {} users", self.user_count);
        Ok(produced)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SeedConfig;
    use crate::seeder::CountingSink;
    use serde_json::Value;
    use users::MemoryStore;

    fn seeder(store: Arc<MemoryStore>, count: usize, chunk: usize) -> UserStorageSeeder {
        let blueprint = UserBlueprint::new(Default::default(), &SeedConfig::default()).unwrap();
        UserStorageSeeder::new(store.clone(), store, blueprint)
            .with_user_count(count)
            .with_chunk_size(chunk)
            .with_rng_seed(1)
    }

    #[tokio::test]
    async fn test_inserts_users_and_addresses_in_chunks() {
        let store = Arc::new(MemoryStore::new());
        let mut items: Vec<Value> = Vec::new();

        let produced = seeder(store.clone(), 5, 2).run(&mut items).await.unwrap();

        assert_eq!(produced, 10);
        assert_eq!(items.len(), 10);
        assert_eq!(store.users().await.len(), 5);
        assert_eq!(store.addresses().await.len(), 5);

        // Chunk order: two users, their two addresses, and so on.
        assert!(items[0].get("email").is_some());
        assert!(items[2].get("user_id").is_some());
        assert_eq!(items[2]["user_id"], items[0]["id"]);
    }

    #[tokio::test]
    async fn test_every_address_belongs_to_a_user() {
        let store = Arc::new(MemoryStore::new());

        seeder(store.clone(), 7, 3)
            .run(&mut CountingSink::default())
            .await
            .unwrap();

        let users = store.users().await;
        for address in store.addresses().await {
            assert!(users.iter().any(|u| u.id == address.user_id));
        }
    }

    #[tokio::test]
    async fn test_zero_users_is_a_no_op() {
        let store = Arc::new(MemoryStore::new());
        let mut sink = CountingSink::default();

        let produced = seeder(store.clone(), 0, 10).run(&mut sink).await.unwrap();

        assert_eq!(produced, 0);
        assert_eq!(sink.count, 0);
    }

    #[tokio::test]
    async fn test_repeated_runs_generate_new_users() {
        let store = Arc::new(MemoryStore::new());
        let seeder = seeder(store.clone(), 3, 10);

        seeder.run(&mut CountingSink::default()).await.unwrap();
        seeder.run(&mut CountingSink::default()).await.unwrap();

        assert_eq!(store.users().await.len(), 6);
    }

    #[test]
    fn test_from_services_requires_repositories() {
        assert!(UserStorageSeeder::from_services(&Services::default()).is_err());

        let (services, _store) = Services::in_memory(SeedConfig::default());
        assert!(UserStorageSeeder::from_services(&services).is_ok());
    }
}
