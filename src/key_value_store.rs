use std::collections::{HashMap, VecDeque};

use tokio::time::Instant;
use tracing::debug;

use crate::stream::Stream;

#[derive(Debug, Clone, PartialEq)]
pub enum DataType {
    String(String),
    List(VecDeque<String>),
    Stream(Stream),
}

impl DataType {
    /// The name TYPE reports for this kind of value.
    pub fn type_name(&self) -> &'static str {
        match self {
            DataType::String(_) => "string",
            DataType::List(_) => "list",
            DataType::Stream(_) => "stream",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Value {
    pub data: DataType,
    pub expiration: Option<Instant>,
}

impl Value {
    pub fn new(data: DataType) -> Self {
        Self {
            data,
            expiration: None,
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        self.expiration.is_some_and(|expiration| expiration <= now)
    }
}

/// The key → value table behind every command.
///
/// Expiry is lazy: any access that finds an expired record deletes it before
/// answering, so even `get` and `exists` can shrink the map.
#[derive(Debug, Default)]
pub struct KeySpace {
    entries: HashMap<String, Value>,
}

impl KeySpace {
    pub fn new() -> Self {
        Self::default()
    }

    fn purge_if_expired(&mut self, key: &str) {
        let now = Instant::now();

        if self
            .entries
            .get(key)
            .is_some_and(|value| value.is_expired(now))
        {
            self.entries.remove(key);
            debug!(key, "expired key removed");
        }
    }

    pub fn get(&mut self, key: &str) -> Option<&Value> {
        self.purge_if_expired(key);
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.purge_if_expired(key);
        self.entries.get_mut(key)
    }

    /// Inserts or replaces, discarding the previous kind and expiration.
    pub fn set(&mut self, key: String, value: Value) {
        self.entries.insert(key, value);
    }

    pub fn exists(&mut self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Returns true if a live record was removed.
    pub fn delete(&mut self, key: &str) -> bool {
        self.purge_if_expired(key);
        self.entries.remove(key).is_some()
    }

    pub fn type_of(&mut self, key: &str) -> &'static str {
        self.get(key)
            .map(|value| value.data.type_name())
            .unwrap_or("none")
    }

    /// Number of records, including expired ones nobody has looked at yet.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
