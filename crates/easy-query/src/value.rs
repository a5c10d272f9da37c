//! Tagged literal values.
//!
//! Every value that reaches a statement is a [`Value`], chosen at the call site through
//! `From` conversions. The tag decides two things:
//!
//! - how the literal is displayed (`Text` single-quoted, everything else bare)
//! - how it is bound when the statement runs against PostgreSQL
//!
//! ```
//! use easy_query::Value;
//!
//! assert_eq!(Value::from("x").to_literal(), "'x'");
//! assert_eq!(Value::from(400).to_literal(), "400");
//! assert_eq!(Value::from(Option::<i32>::None).to_literal(), "NULL");
//! ```

use crate::error::{DbError, DbResult};
use bytes::BytesMut;
use rust_decimal::Decimal;
use std::error::Error;
use std::fmt;
use tokio_postgres::types::{IsNull, ToSql, Type};

/// A literal value embedded in (or bound to) a statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    /// Returns `true` for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Render as a SQL literal: text is single-quoted (embedded `'` doubled), other
    /// values are bare tokens.
    pub fn to_literal(&self) -> String {
        match self {
            Value::Null => "NULL".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Text(s) => format!("'{}'", s.replace('\'', "''")),
        }
    }

    /// Short name of the tag, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_literal())
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::Text(v.clone())
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::Int(i64::from(v))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

macro_rules! impl_from_wide_int {
    ($($t:ty),*) => {
        $(
            /// Values beyond `i64::MAX` are kept as their decimal text.
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    i64::try_from(v).map_or_else(|_| Value::Text(v.to_string()), Value::Int)
                }
            }
        )*
    };
}

impl_from_wide_int!(u64, usize, i128, u128);

impl From<Decimal> for Value {
    /// Kept as text so no precision is lost.
    fn from(v: Decimal) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl From<serde_json::Value> for Value {
    /// Scalars map onto their tag; arrays and objects become their JSON text.
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => n
                    .as_f64()
                    .map_or_else(|| Value::Text(n.to_string()), Value::Float),
            },
            serde_json::Value::String(s) => Value::Text(s),
            other => Value::Text(other.to_string()),
        }
    }
}

type BoxError = Box<dyn Error + Sync + Send>;

fn mismatch(value: &Value, ty: &Type) -> BoxError {
    format!("cannot bind {} value to parameter of type {}", value.kind(), ty).into()
}

fn bind_text(s: &str, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
    match *ty {
        Type::BOOL => s.parse::<bool>()?.to_sql(ty, out),
        Type::INT2 => s.parse::<i16>()?.to_sql(ty, out),
        Type::INT4 => s.parse::<i32>()?.to_sql(ty, out),
        Type::INT8 => s.parse::<i64>()?.to_sql(ty, out),
        Type::FLOAT4 => s.parse::<f32>()?.to_sql(ty, out),
        Type::FLOAT8 => s.parse::<f64>()?.to_sql(ty, out),
        Type::NUMERIC => s.trim().parse::<Decimal>()?.to_sql(ty, out),
        Type::UUID => s.parse::<uuid::Uuid>()?.to_sql(ty, out),
        Type::DATE => s.parse::<chrono::NaiveDate>()?.to_sql(ty, out),
        Type::TIMESTAMP => s.parse::<chrono::NaiveDateTime>()?.to_sql(ty, out),
        Type::TIMESTAMPTZ => s
            .parse::<chrono::DateTime<chrono::Utc>>()?
            .to_sql(ty, out),
        Type::JSON | Type::JSONB => serde_json::from_str::<serde_json::Value>(s)?.to_sql(ty, out),
        _ if <&str as ToSql>::accepts(ty) => s.to_sql(ty, out),
        _ => Err(format!("cannot bind text value to parameter of type {}", ty).into()),
    }
}

impl ToSql for Value {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
        match self {
            Value::Null => Ok(IsNull::Yes),
            Value::Bool(b) => match *ty {
                Type::BOOL => b.to_sql(ty, out),
                _ => Err(mismatch(self, ty)),
            },
            Value::Int(i) => match *ty {
                Type::INT2 => i16::try_from(*i)?.to_sql(ty, out),
                Type::INT4 => i32::try_from(*i)?.to_sql(ty, out),
                Type::INT8 => i.to_sql(ty, out),
                Type::FLOAT4 => (*i as f32).to_sql(ty, out),
                Type::FLOAT8 => (*i as f64).to_sql(ty, out),
                Type::NUMERIC => Decimal::from(*i).to_sql(ty, out),
                _ if <&str as ToSql>::accepts(ty) => i.to_string().as_str().to_sql(ty, out),
                _ => Err(mismatch(self, ty)),
            },
            Value::Float(f) => match *ty {
                Type::FLOAT4 => (*f as f32).to_sql(ty, out),
                Type::FLOAT8 => f.to_sql(ty, out),
                Type::NUMERIC => Decimal::try_from(*f)?.to_sql(ty, out),
                _ if <&str as ToSql>::accepts(ty) => f.to_string().as_str().to_sql(ty, out),
                _ => Err(mismatch(self, ty)),
            },
            Value::Text(s) => bind_text(s, ty, out),
        }
    }

    fn accepts(_ty: &Type) -> bool {
        true
    }

    tokio_postgres::types::to_sql_checked!();
}

/// Conversion out of a [`Value`], used for typed row access.
pub trait FromValue: Sized {
    /// Convert `value` (read from `column`) into `Self`.
    fn from_value(column: &str, value: &Value) -> DbResult<Self>;
}

fn unexpected<T>(column: &str, expected: &str, value: &Value) -> DbResult<T> {
    Err(DbError::decode(
        column,
        format!("expected {expected}, found {}", value.kind()),
    ))
}

impl FromValue for Value {
    fn from_value(_column: &str, value: &Value) -> DbResult<Self> {
        Ok(value.clone())
    }
}

impl FromValue for i64 {
    fn from_value(column: &str, value: &Value) -> DbResult<Self> {
        match value {
            Value::Int(i) => Ok(*i),
            Value::Text(s) => s
                .parse()
                .map_err(|e: std::num::ParseIntError| DbError::decode(column, e.to_string())),
            other => unexpected(column, "int", other),
        }
    }
}

impl FromValue for i32 {
    fn from_value(column: &str, value: &Value) -> DbResult<Self> {
        let wide = i64::from_value(column, value)?;
        i32::try_from(wide).map_err(|e| DbError::decode(column, e.to_string()))
    }
}

impl FromValue for f64 {
    fn from_value(column: &str, value: &Value) -> DbResult<Self> {
        match value {
            Value::Float(f) => Ok(*f),
            Value::Int(i) => Ok(*i as f64),
            Value::Text(s) => s
                .parse()
                .map_err(|e: std::num::ParseFloatError| DbError::decode(column, e.to_string())),
            other => unexpected(column, "float", other),
        }
    }
}

impl FromValue for Decimal {
    fn from_value(column: &str, value: &Value) -> DbResult<Self> {
        match value {
            Value::Int(i) => Ok(Decimal::from(*i)),
            Value::Float(f) => {
                Decimal::try_from(*f).map_err(|e| DbError::decode(column, e.to_string()))
            }
            Value::Text(s) => s
                .trim()
                .parse()
                .map_err(|e: rust_decimal::Error| DbError::decode(column, e.to_string())),
            other => unexpected(column, "numeric", other),
        }
    }
}

impl FromValue for bool {
    fn from_value(column: &str, value: &Value) -> DbResult<Self> {
        match value {
            Value::Bool(b) => Ok(*b),
            Value::Int(i) => Ok(*i != 0),
            other => unexpected(column, "bool", other),
        }
    }
}

impl FromValue for String {
    fn from_value(column: &str, value: &Value) -> DbResult<Self> {
        match value {
            Value::Text(s) => Ok(s.clone()),
            Value::Null => unexpected(column, "text", value),
            other => Ok(other.to_literal()),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(column: &str, value: &Value) -> DbResult<Self> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(column, other).map(Some),
        }
    }
}
