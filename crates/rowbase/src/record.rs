//! Row records: ordered column-to-value mappings.

use crate::error::{ModelError, ModelResult};
use crate::value::Value;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// One database row (or row-to-be): an ordered mapping from column name to
/// [`Value`].
///
/// Insertion order is preserved and drives column order in generated INSERT
/// and UPDATE statements. Setting an existing column overwrites it in place.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    entries: Vec<(String, Value)>,
}

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column value, preserving first-insertion order.
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        let column = column.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(name, _)| *name == column) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((column, value)),
        }
        self
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(column, value);
        self
    }

    /// Get a column value.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// Remove a column, returning its value.
    pub fn remove(&mut self, column: &str) -> Option<Value> {
        let idx = self.entries.iter().position(|(name, _)| name == column)?;
        Some(self.entries.remove(idx).1)
    }

    /// Column names in insertion order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Overwrite this record with the single record in `rows`.
    ///
    /// This is the single-row mapping path: anything other than exactly one
    /// row is a shape error.
    pub fn map_rows(&mut self, rows: &[Record]) -> ModelResult<()> {
        if rows.len() != 1 {
            return Err(ModelError::Shape(rows.len()));
        }
        for (column, value) in rows[0].iter() {
            self.set(column, value.clone());
        }
        Ok(())
    }
}

impl<K: Into<String>, V: Into<Value>, const N: usize> From<[(K, V); N]> for Record {
    fn from(pairs: [(K, V); N]) -> Self {
        let mut record = Record::new();
        for (column, value) in pairs {
            record.set(column, value);
        }
        record
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (column, value) in iter {
            record.set(column, value);
        }
        record
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (column, value) in &self.entries {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}
