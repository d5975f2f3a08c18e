//! The seeder trait and item sinks.
//!
//! A [`Seeder`] produces its items one at a time and hands each one to an
//! [`ItemSink`] as soon as it exists, so callers can report progress or
//! print items without the seeder collecting them first.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::SeedingResult;

/// Receives the items a seeder produces, in order.
pub trait ItemSink: Send {
    fn accept(&mut self, item: Value);
}

impl ItemSink for Vec<Value> {
    fn accept(&mut self, item: Value) {
        self.push(item);
    }
}

impl<F> ItemSink for F
where
    F: FnMut(Value) + Send,
{
    fn accept(&mut self, item: Value) {
        self(item)
    }
}

/// Counts items and drops them.
#[derive(Debug, Default)]
pub struct CountingSink {
    pub count: usize,
}

impl ItemSink for CountingSink {
    fn accept(&mut self, _item: Value) {
        self.count += 1;
    }
}

#[async_trait]
pub trait Seeder: Send + Sync {
    /// Runs the seeder, returning the number of items delivered to `sink`.
    async fn run(&self, sink: &mut dyn ItemSink) -> SeedingResult<usize>;
}

/// Yields a fixed list of items without touching storage.
#[derive(Debug, Clone, Default)]
pub struct StaticSeeder {
    items: Vec<Value>,
}

impl StaticSeeder {
    pub fn new(items: Vec<Value>) -> Self {
        Self { items }
    }
}

#[async_trait]
impl Seeder for StaticSeeder {
    async fn run(&self, sink: &mut dyn ItemSink) -> SeedingResult<usize> {
        for item in &self.items {
            sink.accept(item.clone());
        }
        Ok(self.items.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_static_seeder_yields_items_in_order() {
        let seeder = StaticSeeder::new(vec![json!({"name": "Foo"}), json!({"name": "Bar"})]);
        let mut items: Vec<Value> = Vec::new();

        let count = seeder.run(&mut items).await.unwrap();

        assert_eq!(count, 2);
        assert_eq!(items[0]["name"], "Foo");
        assert_eq!(items[1]["name"], "Bar");
    }

    #[tokio::test]
    async fn test_closure_sink() {
        let seeder = StaticSeeder::new(vec![json!(1), json!(2), json!(3)]);
        let mut total = 0;

        seeder
            .run(&mut |item: Value| total += item.as_i64().unwrap_or(0))
            .await
            .unwrap();

        assert_eq!(total, 6);
    }

    #[tokio::test]
    async fn test_counting_sink() {
        let seeder = StaticSeeder::new(vec![json!(null); 4]);
        let mut sink = CountingSink::default();

        seeder.run(&mut sink).await.unwrap();

        assert_eq!(sink.count, 4);
    }
}
