pub mod auth;
pub mod database;
pub mod errors;
pub mod memory;
pub mod models;
pub mod roles;

pub use database::{AddressRepository, PgStore, UserRepository};
pub use errors::UserError;
pub use memory::MemoryStore;
pub use models::{Address, NewAddress, NewUser, User};
pub use roles::{GUEST, Roles};
