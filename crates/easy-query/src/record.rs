//! Ordered column/value input for INSERT and UPDATE.

use crate::error::{DbError, DbResult};
use crate::value::Value;
use serde::Serialize;

/// An insertion-ordered mapping of column names to values.
///
/// # Example
///
/// ```
/// use easy_query::Record;
///
/// let record = Record::new()
///     .set("id", 1)
///     .set("name", "x")
///     .set("remark", Option::<&str>::None);
/// assert_eq!(record.len(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    entries: Vec<(String, Value)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column value. Setting an existing column replaces its value in place.
    pub fn set(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(column, value);
        self
    }

    /// Non-consuming form of [`Record::set`].
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        let column = column.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(c, _)| *c == column) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((column, value)),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(c, v)| (c.as_str(), v))
    }

    /// Build a record from any `serde` struct or map.
    ///
    /// Fields keep their serialization order (declaration order for structs).
    pub fn from_serialize<T: Serialize>(data: &T) -> DbResult<Self> {
        match serde_json::to_value(data) {
            Ok(serde_json::Value::Object(map)) => Ok(Self::from(map)),
            Ok(other) => Err(DbError::validation(format!(
                "record must serialize to an object, got {other}"
            ))),
            Err(e) => Err(DbError::validation(e.to_string())),
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for Record {
    fn from(map: serde_json::Map<String, serde_json::Value>) -> Self {
        map.into_iter().collect()
    }
}
