//! Wires services, the registry and the console commands together.

use std::io::Write;
use std::sync::Arc;

use crate::console::{ConsoleIo, SeedCommand, SeedListCommand};
use crate::error::SeedingResult;
use crate::registry::Seeders;
use crate::services::Services;
use crate::user::UserStorageSeeder;

/// Name the user storage seeder is registered under.
pub const USERS_SEEDER: &str = "users";

/// Console commands an application can dispatch.
#[derive(Debug, Clone)]
pub enum Command {
    Seed(SeedCommand),
    List,
}

pub struct Seeding;

impl Seeding {
    /// Starts an application with an empty registry.
    pub fn boot(services: Services) -> SeedingApp {
        SeedingApp {
            seeders: Seeders::new(services),
        }
    }
}

pub struct SeedingApp {
    seeders: Seeders,
}

impl SeedingApp {
    /// Registers the bundled seeders.
    pub fn with_default_seeders(mut self) -> Self {
        self.seeders.add_lazy(USERS_SEEDER, |services| {
            Ok(Arc::new(UserStorageSeeder::from_services(services)?))
        });
        self
    }

    pub fn services(&self) -> &Services {
        self.seeders.services()
    }

    pub fn seeders(&self) -> &Seeders {
        &self.seeders
    }

    pub fn seeders_mut(&mut self) -> &mut Seeders {
        &mut self.seeders
    }

    /// Runs `command`, returning its exit code.
    pub async fn run_command<W: Write + Send>(
        &mut self,
        command: Command,
        io: &mut ConsoleIo<W>,
    ) -> SeedingResult<i32> {
        match command {
            Command::Seed(seed) => seed.handle(io, &mut self.seeders).await,
            Command::List => SeedListCommand.handle(io, &self.seeders),
        }
    }
}
