//! Inter-step data bag and the append-only representation log.

use crate::core::Representation;
use crate::errors::DataError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Free-form data shared between steps of a run.
///
/// A collector stashes what it found under a key; a later step reads it back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataBag {
    data: HashMap<String, serde_json::Value>,
}

impl DataBag {
    /// Creates a new empty data bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a data bag from existing data.
    #[must_use]
    pub fn from_data(data: HashMap<String, serde_json::Value>) -> Self {
        Self { data }
    }

    /// Gets a value from the bag.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.data.get(key)
    }

    /// Gets a value and decodes it into `T`.
    ///
    /// # Errors
    ///
    /// Returns `DataError::Missing` if the key is absent and
    /// `DataError::Decode` if the value has another shape.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<T, DataError> {
        let value = self.data.get(key).ok_or_else(|| DataError::Missing {
            key: key.to_string(),
        })?;
        T::deserialize(value).map_err(|source| DataError::Decode {
            key: key.to_string(),
            source,
        })
    }

    /// Checks if a key exists.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Inserts a value, returning the one it replaced.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Option<serde_json::Value> {
        self.data.insert(key.into(), value.into())
    }

    /// Inserts a value only if the key is free.
    ///
    /// # Errors
    ///
    /// Returns `DataError::Conflict` if the key already exists.
    pub fn insert_new(
        &mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Result<(), DataError> {
        let key = key.into();
        if self.data.contains_key(&key) {
            return Err(DataError::Conflict { key });
        }
        self.data.insert(key, value.into());
        Ok(())
    }

    /// Removes a value.
    pub fn remove(&mut self, key: &str) -> Option<serde_json::Value> {
        self.data.remove(key)
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the bag is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns all keys, sorted.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.data.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Returns a view of all data.
    #[must_use]
    pub fn as_map(&self) -> &HashMap<String, serde_json::Value> {
        &self.data
    }
}

/// Ordered record of the artifacts produced during a run.
///
/// Entries can only be appended. There is no removal, reordering or mutable
/// access to an entry once it is in the log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RepresentationLog {
    entries: Vec<Representation>,
}

impl RepresentationLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a representation and returns its position.
    pub fn push(&mut self, representation: Representation) -> usize {
        self.entries.push(representation);
        self.entries.len() - 1
    }

    /// Returns the representation at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Representation> {
        self.entries.get(index)
    }

    /// Returns the most recently appended representation.
    #[must_use]
    pub fn last(&self) -> Option<&Representation> {
        self.entries.last()
    }

    /// Finds the first representation with the given name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Representation> {
        self.entries.iter().find(|r| r.name == name)
    }

    /// Returns the number of representations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing was produced yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates in production order.
    pub fn iter(&self) -> std::slice::Iter<'_, Representation> {
        self.entries.iter()
    }

    /// Returns the entries in production order.
    #[must_use]
    pub fn as_slice(&self) -> &[Representation] {
        &self.entries
    }
}

impl<'a> IntoIterator for &'a RepresentationLog {
    type Item = &'a Representation;
    type IntoIter = std::slice::Iter<'a, Representation>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
