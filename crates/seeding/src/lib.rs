//! Fixture seeding for the users application.
//!
//! This crate provides named seeders that insert generated data, model
//! factories for building or storing fake users with overrides, and the
//! console commands that list and run seeders.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use seeding::prelude::*;
//!
//! let (services, _store) = Services::in_memory(SeedConfig::default().with_user_count(50));
//! let mut app = Seeding::boot(services).with_default_seeders();
//!
//! let mut io = ConsoleIo::new(std::io::stdout()).with_verbosity(1);
//! app.run_command(Command::Seed(SeedCommand::default()), &mut io).await?;
//!
//! let admin = UserFactory::from_services(app.services())?
//!     .with_email("admin@example.com")
//!     .with_role_key("admin")
//!     .create_one()
//!     .await?;
//! ```

pub mod boot;
pub mod config;
pub mod console;
pub mod error;
pub mod factory;
pub mod registry;
pub mod seed;
pub mod seeder;
pub mod services;
pub mod user;

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::boot::{Command, Seeding, SeedingApp};
    pub use crate::config::SeedConfig;
    pub use crate::console::{ConsoleIo, SeedCommand, SeedListCommand};
    pub use crate::definition;
    pub use crate::error::{SeedingError, SeedingResult};
    pub use crate::factory::{Blueprint, Definition, Factory, JsonBlueprint};
    pub use crate::registry::Seeders;
    pub use crate::seed::Seed;
    pub use crate::seeder::{CountingSink, ItemSink, Seeder, StaticSeeder};
    pub use crate::services::Services;
    pub use crate::user::{DEFAULT_PASSWORD, UserBlueprint, UserFactory, UserStorageSeeder};
}
