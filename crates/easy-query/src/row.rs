//! Result rows and row mapping traits

use crate::error::{DbError, DbResult};
use crate::value::{FromValue, Value};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde::ser::SerializeMap;

/// One result row: column names mapped to values, in select order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    columns: Vec<String>,
    values: Vec<Value>,
}

impl Row {
    /// Build a row from parallel column/value lists.
    ///
    /// A column without a matching value reads as missing.
    pub fn new(columns: Vec<String>, values: Vec<Value>) -> Self {
        Self { columns, values }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Look up a column by name (first match wins).
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .position(|c| c == column)
            .and_then(|i| self.values.get(i))
    }

    /// Typed access, returning [`DbError::Decode`] on a missing column or a mismatch.
    pub fn try_get<T: FromValue>(&self, column: &str) -> DbResult<T> {
        let value = self
            .get(column)
            .ok_or_else(|| DbError::decode(column, "column not found"))?;
        T::from_value(column, value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }

    /// Convert into a JSON object.
    pub fn to_json(&self) -> serde_json::Value {
        let map = self
            .iter()
            .map(|(c, v)| (c.to_string(), value_to_json(v)))
            .collect();
        serde_json::Value::Object(map)
    }

    /// Deserialize the row into any `serde` type via its JSON form.
    pub fn deserialize<T: DeserializeOwned>(&self) -> DbResult<T> {
        serde_json::from_value(self.to_json()).map_err(|e| DbError::decode("*", e.to_string()))
    }
}

impl FromIterator<(String, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        let (columns, values) = iter.into_iter().unzip();
        Self { columns, values }
    }
}

fn value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Int(i) => serde_json::Value::from(*i),
        Value::Float(f) => serde_json::Value::from(*f),
        Value::Text(s) => serde_json::Value::String(s.clone()),
    }
}

impl Serialize for Row {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.iter().count()))?;
        for (column, value) in self.iter() {
            map.serialize_entry(column, &value_to_json(value))?;
        }
        map.end()
    }
}

/// Trait for converting a result row into a Rust struct.
///
/// # Example
///
/// ```
/// use easy_query::{DbResult, FromRow, Row};
///
/// struct Profile {
///     id: i64,
///     name: String,
/// }
///
/// impl FromRow for Profile {
///     fn from_row(row: &Row) -> DbResult<Self> {
///         Ok(Self {
///             id: row.try_get("id")?,
///             name: row.try_get("name")?,
///         })
///     }
/// }
/// ```
pub trait FromRow: Sized {
    /// Convert a row into Self
    fn from_row(row: &Row) -> DbResult<Self>;
}

impl FromRow for Row {
    fn from_row(row: &Row) -> DbResult<Self> {
        Ok(row.clone())
    }
}

impl FromRow for serde_json::Value {
    fn from_row(row: &Row) -> DbResult<Self> {
        Ok(row.to_json())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    fn profile_row() -> Row {
        Row::new(
            vec!["id".into(), "name".into(), "remark".into()],
            vec![Value::Int(1), Value::from("x"), Value::Null],
        )
    }

    #[test]
    fn get_by_name() {
        let row = profile_row();
        assert_eq!(row.get("name"), Some(&Value::from("x")));
        assert_eq!(row.get("missing"), None);
    }

    #[test]
    fn column_without_value_reads_as_missing() {
        let row = Row::new(vec!["a".into(), "b".into()], vec![Value::Int(1)]);
        assert_eq!(row.get("a"), Some(&Value::Int(1)));
        assert_eq!(row.get("b"), None);
        let err = row.try_get::<i64>("b").unwrap_err();
        assert!(matches!(err, DbError::Decode { ref column, .. } if column == "b"));
        assert_eq!(row.iter().count(), 1);
    }

    #[test]
    fn try_get_typed() {
        let row = profile_row();
        assert_eq!(row.try_get::<i64>("id").unwrap(), 1);
        assert_eq!(row.try_get::<Option<String>>("remark").unwrap(), None);
        assert!(row.try_get::<i64>("missing").is_err());
    }

    #[test]
    fn serializes_as_object() {
        let json = serde_json::to_string(&profile_row()).unwrap();
        assert_eq!(json, r#"{"id":1,"name":"x","remark":null}"#);
    }

    #[test]
    fn deserialize_into_struct() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Profile {
            id: i64,
            name: String,
            remark: Option<String>,
        }

        let p: Profile = profile_row().deserialize().unwrap();
        assert_eq!(
            p,
            Profile {
                id: 1,
                name: "x".into(),
                remark: None
            }
        );
    }
}
