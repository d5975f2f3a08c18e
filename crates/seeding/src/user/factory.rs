//! User factory.

use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use serde_json::{Map, Value, json};
use time::{Duration, OffsetDateTime};
use users::auth::hash_password;
use users::{NewUser, Roles, User, UserRepository};

use crate::config::SeedConfig;
use crate::error::{SeedingError, SeedingResult};
use crate::factory::{Blueprint, Definition, Factory, merge};
use crate::seed::Seed;
use crate::services::Services;

/// Password every generated user gets unless overridden.
pub const DEFAULT_PASSWORD: &str = "password";

static DEFAULT_PASSWORD_HASH: OnceLock<String> = OnceLock::new();

/// Hash of [`DEFAULT_PASSWORD`], computed once per process.
fn default_password_hash() -> SeedingResult<String> {
    if let Some(hash) = DEFAULT_PASSWORD_HASH.get() {
        return Ok(hash.clone());
    }
    let hash = hash_password(DEFAULT_PASSWORD)?;
    Ok(DEFAULT_PASSWORD_HASH.get_or_init(|| hash).clone())
}

const YEAR: Duration = Duration::days(365);

/// Generates user definitions and turns them into [`User`]s.
#[derive(Clone)]
pub struct UserBlueprint {
    roles: Roles,
    password_hash: String,
    locales: Vec<String>,
    country_keys: Vec<String>,
    repository: Option<Arc<dyn UserRepository>>,
}

impl UserBlueprint {
    /// Fails when the default password cannot be hashed.
    pub fn new(roles: Roles, config: &SeedConfig) -> SeedingResult<Self> {
        Ok(Self {
            roles,
            password_hash: default_password_hash()?,
            locales: config.locales.clone(),
            country_keys: config.country_keys.clone(),
            repository: None,
        })
    }

    pub fn from_services(services: &Services) -> SeedingResult<Self> {
        let blueprint = Self::new(services.roles().clone(), services.config())?;
        Ok(match services.user_repository() {
            Ok(repository) => blueprint.with_repository(repository),
            Err(_) => blueprint,
        })
    }

    /// Repository used by `store_entity`.
    pub fn with_repository(mut self, repository: Arc<dyn UserRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    /// Parses a definition into insertable attributes, resolving the role key.
    pub fn new_user(&self, definition: Definition) -> SeedingResult<NewUser> {
        let mut user: NewUser = serde_json::from_value(Value::Object(definition))?;
        user.role_key = self.roles.resolve(&user.role_key).to_string();
        Ok(user)
    }

    fn pick(seed: &mut Seed, items: &[String], fallback: &str) -> String {
        seed.pick(items)
            .cloned()
            .unwrap_or_else(|| fallback.to_string())
    }
}

#[async_trait]
impl Blueprint for UserBlueprint {
    type Entity = User;

    fn definition(&self, seed: &mut Seed) -> Definition {
        let firstname = seed.firstname();
        let lastname = seed.lastname();
        let locale = Self::pick(seed, &self.locales, "en");
        let email = seed.email(&format!("{firstname} {lastname}"));
        let birthday = seed.past_date(YEAR * 30, YEAR * 10);

        let address = json!({
            "salutation": "mr",
            "firstname": firstname,
            "lastname": lastname,
            "city": seed.city(),
            "address1": seed.street(),
            "postcode": seed.postcode(),
            "locale": locale,
            "country_key": Self::pick(seed, &self.country_keys, "US"),
        });

        crate::definition! {
            "password" => self.password_hash.as_str(),
            "email" => email,
            "locale" => locale,
            "birthday" => birthday.to_string(),
            "address" => address,
        }
    }

    fn create_entity(&self, definition: Definition) -> SeedingResult<User> {
        Ok(self.new_user(definition)?.into_user(OffsetDateTime::now_utc()))
    }

    async fn store_entity(&self, definition: Definition) -> SeedingResult<User> {
        let repository = self
            .repository
            .clone()
            .ok_or(SeedingError::MissingService("UserRepository"))?;

        let mut user = self.new_user(definition)?;
        let address = user.address.take().unwrap_or_default();
        Ok(repository.create_with_address(user, address).await?)
    }
}

pub type UserFactory = Factory<UserBlueprint>;

impl Factory<UserBlueprint> {
    /// A user factory wired to the given services.
    pub fn from_services(services: &Services) -> SeedingResult<Self> {
        Ok(Factory::new(
            UserBlueprint::from_services(services)?,
            services.seed(),
        ))
    }

    pub fn with_email(self, email: impl Into<String>) -> Self {
        self.with_attribute("email", email.into())
    }

    pub fn with_smartphone(self, phone: impl Into<String>) -> Self {
        self.with_attribute("smartphone", phone.into())
    }

    pub fn with_username(self, username: impl Into<String>) -> Self {
        self.with_attribute("username", username.into())
    }

    /// Hashes `plain_password` once; every generated user shares the hash.
    pub fn with_password(self, plain_password: &str) -> SeedingResult<Self> {
        let hash = hash_password(plain_password)?;
        Ok(self.with_attribute("password", hash))
    }

    pub fn with_role_key(self, role_key: impl Into<String>) -> Self {
        self.with_attribute("role_key", role_key.into())
    }

    /// Merges `address` into the generated address instead of replacing it.
    pub fn with_address(self, address: Definition) -> Self {
        self.modify(move |_, definition| {
            let mut merged = match definition.get("address") {
                Some(Value::Object(current)) => current.clone(),
                _ => Map::new(),
            };
            merge(&mut merged, address.clone());
            crate::definition! { "address" => Value::Object(merged) }
        })
    }

    fn with_attribute(self, key: &'static str, value: String) -> Self {
        self.modify(move |_, _| crate::definition! { key => value.clone() })
    }
}
