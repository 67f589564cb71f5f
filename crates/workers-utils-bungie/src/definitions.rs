//! Destiny manifest definition lookup
//!
//! Definitions are keyed `"{table}/{hash}"`, e.g.
//! `DestinyInventoryItemDefinition/3628991658`. Where they live is up to the
//! host: a KV namespace, a database, or memory.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;

use crate::error::Result;

/// Build the store key for a definition
pub fn definition_key(table: &str, hash: u32) -> String {
    format!("{table}/{hash}")
}

/// Read access to manifest definitions
#[async_trait]
pub trait DefinitionStore: Send + Sync {
    /// Returns `None` when no definition is stored under `key`
    async fn get(&self, key: &str) -> Result<Option<Value>>;
}

/// Definitions held in a map, for tests and small tools
#[derive(Debug, Clone, Default)]
pub struct InMemoryDefinitionStore {
    entries: HashMap<String, Value>,
}

impl InMemoryDefinitionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, table: &str, hash: u32, definition: Value) {
        self.entries.insert(definition_key(table, hash), definition);
    }

    #[must_use]
    pub fn with_definition(mut self, table: &str, hash: u32, definition: Value) -> Self {
        self.insert(table, hash, definition);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, Value)> for InMemoryDefinitionStore {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[async_trait]
impl DefinitionStore for InMemoryDefinitionStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.entries.get(key).cloned())
    }
}
