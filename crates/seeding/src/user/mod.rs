//! User fixtures: a factory for individual users and a seeder for bulk inserts.

mod factory;
mod seeder;

pub use factory::{DEFAULT_PASSWORD, UserBlueprint, UserFactory};
pub use seeder::UserStorageSeeder;
