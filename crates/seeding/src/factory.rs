//! Model factories.
//!
//! A [`Factory`] wraps a [`Blueprint`], the per-model part that produces a
//! fresh [`Definition`] and knows how to turn it into an entity, and adds
//! the shared machinery:
//!
//! - an amount set with [`Factory::times`],
//! - definition modifiers, applied in order; each returns the keys it wants
//!   to change and those are shallow-merged over the definition, so later
//!   modifiers win and untouched keys survive,
//! - entity modifiers, applied in order to each built or stored entity.
//!
//! ```rust,ignore
//! let users = UserFactory::from_services(&services)?
//!     .times(2)
//!     .with_email("ada@example.com")
//!     .modify(|seed, _| definition! { "username" => seed.firstname() })
//!     .create()
//!     .await?;
//! ```

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::{SeedingError, SeedingResult};
use crate::seed::Seed;

/// Attribute map a single entity is built from.
pub type Definition = Map<String, Value>;

/// Returns the keys to change given the current definition.
pub type Modifier = Box<dyn Fn(&mut Seed, &Definition) -> Definition + Send + Sync>;

/// Transforms a built or stored entity.
pub type EntityModifier<E> = Box<dyn Fn(&mut Seed, E) -> E + Send + Sync>;

/// Shallow merge: every key in `changes` replaces the same key in `definition`.
pub fn merge(definition: &mut Definition, changes: Definition) {
    for (key, value) in changes {
        definition.insert(key, value);
    }
}

/// The model-specific half of a factory.
#[async_trait]
pub trait Blueprint: Send + Sync {
    type Entity: Send;

    /// Produces a fresh randomized definition.
    fn definition(&self, seed: &mut Seed) -> Definition;

    /// Builds an entity without storing it.
    fn create_entity(&self, definition: Definition) -> SeedingResult<Self::Entity>;

    /// Stores an entity. Blueprints without storage just build it.
    async fn store_entity(&self, definition: Definition) -> SeedingResult<Self::Entity> {
        self.create_entity(definition)
    }
}

/// Blueprint whose entity is the definition itself, as a JSON object.
pub struct JsonBlueprint<F> {
    definition: F,
}

impl<F> JsonBlueprint<F>
where
    F: Fn(&mut Seed) -> Definition + Send + Sync,
{
    pub fn new(definition: F) -> Self {
        Self { definition }
    }
}

#[async_trait]
impl<F> Blueprint for JsonBlueprint<F>
where
    F: Fn(&mut Seed) -> Definition + Send + Sync,
{
    type Entity = Value;

    fn definition(&self, seed: &mut Seed) -> Definition {
        (self.definition)(seed)
    }

    fn create_entity(&self, definition: Definition) -> SeedingResult<Value> {
        Ok(Value::Object(definition))
    }
}

pub struct Factory<B: Blueprint> {
    blueprint: B,
    seed: Seed,
    amount: usize,
    modifiers: Vec<Modifier>,
    entity_modifiers: Vec<EntityModifier<B::Entity>>,
}

impl<B: Blueprint> Factory<B> {
    pub fn new(blueprint: B, seed: Seed) -> Self {
        Self {
            blueprint,
            seed,
            amount: 1,
            modifiers: Vec::new(),
            entity_modifiers: Vec::new(),
        }
    }

    /// Adds a modifier that always returns `replaces`; empty maps are ignored.
    pub fn with_replaces(self, replaces: Definition) -> Self {
        if replaces.is_empty() {
            return self;
        }
        self.modify(move |_, _| replaces.clone())
    }

    /// How many entities `raw`, `make` and `create` produce.
    pub fn times(mut self, amount: usize) -> Self {
        self.amount = amount;
        self
    }

    pub fn modify<F>(mut self, modifier: F) -> Self
    where
        F: Fn(&mut Seed, &Definition) -> Definition + Send + Sync + 'static,
    {
        self.modifiers.push(Box::new(modifier));
        self
    }

    pub fn modify_entity<F>(mut self, modifier: F) -> Self
    where
        F: Fn(&mut Seed, B::Entity) -> B::Entity + Send + Sync + 'static,
    {
        self.entity_modifiers.push(Box::new(modifier));
        self
    }

    pub fn blueprint(&self) -> &B {
        &self.blueprint
    }

    pub fn seed(&mut self) -> &mut Seed {
        &mut self.seed
    }

    /// The blueprint's definition, before any modifier.
    pub fn definition(&mut self) -> Definition {
        self.blueprint.definition(&mut self.seed)
    }

    /// Definitions with all modifiers applied, without building entities.
    pub fn raw(&mut self) -> SeedingResult<Vec<Definition>> {
        let amount = self.checked_amount()?;
        Ok((0..amount).map(|_| self.modified_definition()).collect())
    }

    pub fn raw_one(&mut self) -> Definition {
        self.modified_definition()
    }

    /// Builds entities without storing them.
    pub fn make(&mut self) -> SeedingResult<Vec<B::Entity>> {
        let amount = self.checked_amount()?;
        (0..amount).map(|_| self.make_entity()).collect()
    }

    pub fn make_one(&mut self) -> SeedingResult<B::Entity> {
        self.make_entity()
    }

    /// Stores entities through the blueprint.
    pub async fn create(&mut self) -> SeedingResult<Vec<B::Entity>> {
        let amount = self.checked_amount()?;
        let mut entities = Vec::with_capacity(amount);
        for _ in 0..amount {
            entities.push(self.store_entity().await?);
        }
        Ok(entities)
    }

    pub async fn create_one(&mut self) -> SeedingResult<B::Entity> {
        self.store_entity().await
    }

    fn checked_amount(&self) -> SeedingResult<usize> {
        if self.amount == 0 {
            return Err(SeedingError::InvalidAmount);
        }
        Ok(self.amount)
    }

    fn modified_definition(&mut self) -> Definition {
        let mut definition = self.blueprint.definition(&mut self.seed);
        for modifier in &self.modifiers {
            let changes = modifier(&mut self.seed, &definition);
            merge(&mut definition, changes);
        }
        definition
    }

    fn apply_entity_modifiers(&mut self, mut entity: B::Entity) -> B::Entity {
        for modifier in &self.entity_modifiers {
            entity = modifier(&mut self.seed, entity);
        }
        entity
    }

    fn make_entity(&mut self) -> SeedingResult<B::Entity> {
        let definition = self.modified_definition();
        let entity = self.blueprint.create_entity(definition)?;
        Ok(self.apply_entity_modifiers(entity))
    }

    async fn store_entity(&mut self) -> SeedingResult<B::Entity> {
        let definition = self.modified_definition();
        let entity = self.blueprint.store_entity(definition).await?;
        Ok(self.apply_entity_modifiers(entity))
    }
}

/// Builds a [`Definition`] from `key => value` pairs.
#[macro_export]
macro_rules! definition {
    () => {
        $crate::factory::Definition::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut definition = $crate::factory::Definition::new();
        $(definition.insert(($key).into(), ::serde_json::json!($value));)+
        definition
    }};
}
