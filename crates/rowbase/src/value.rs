//! Scalar value model for filter predicates and decoded row cells.
//!
//! [`Value`] is what flows through the whole layer: callers put values into a
//! [`Filter`](crate::Filter), the compiler carries them as positional
//! parameters, and row decoding produces them again on the way out. Lists are
//! only valid pre-compilation (IN predicates, multi-placeholder raw
//! fragments); the compiler flattens them before anything is bound.

use bytes::BytesMut;
use serde::ser::{Serialize, SerializeMap, Serializer};
use tokio_postgres::types::{IsNull, ToSql, Type, to_sql_checked};

/// A dynamically-typed SQL value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    /// A sequence of scalars, for `IN` lists and multi-placeholder raw
    /// fragments. Flattened into individual parameters at compile time.
    List(Vec<Value>),
    /// An ordered key/value bag. Only valid as a result-hook payload.
    Map(Vec<(String, Value)>),
}

impl Value {
    /// Whether this value is SQL NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Borrow the list items, if this is a list.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Borrow the text content, if this is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Integer view with truncating coercion.
    ///
    /// Text values are read as a leading optionally-signed digit run, so
    /// `"5.5"` coerces to `5` and non-numeric text to `0`. Used for the
    /// `limit`/`offset` directives.
    pub fn coerce_int(&self) -> i64 {
        match self {
            Value::Null => 0,
            Value::Bool(b) => i64::from(*b),
            Value::Int(i) => *i,
            Value::Float(f) => *f as i64,
            Value::Text(s) => {
                let s = s.trim();
                let (sign, digits) = match s.strip_prefix('-') {
                    Some(rest) => (-1, rest),
                    None => (1, s.strip_prefix('+').unwrap_or(s)),
                };
                let run: String = digits.chars().take_while(|c| c.is_ascii_digit()).collect();
                run.parse::<i64>().map(|n| sign * n).unwrap_or(0)
            }
            Value::List(_) | Value::Map(_) => 0,
        }
    }

    /// Render this value for verbatim inclusion in a clause fragment
    /// (`GROUP BY`, `HAVING`, `ORDER BY`, raw `select_fields`).
    pub fn to_fragment_string(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(b) => if *b { "1" } else { "0" }.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Text(s) => s.clone(),
            Value::List(_) | Value::Map(_) => String::new(),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i16> for Value {
    fn from(v: i16) -> Self {
        Value::Int(v.into())
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v.into())
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v.into())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
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

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => Value::Null,
        }
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else {
                    Value::Float(n.as_f64().unwrap_or(0.0))
                }
            }
            serde_json::Value::String(s) => Value::Text(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Into::into).collect())
            }
            serde_json::Value::Object(entries) => {
                Value::Map(entries.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::Text(s) => serializer.serialize_str(s),
            Value::List(items) => items.serialize(serializer),
            Value::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

impl ToSql for Value {
    fn to_sql(
        &self,
        ty: &Type,
        out: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn std::error::Error + Sync + Send>> {
        match self {
            Value::Null => Ok(IsNull::Yes),
            Value::Bool(b) => b.to_sql(ty, out),
            Value::Int(i) => match *ty {
                Type::INT2 => (*i as i16).to_sql(ty, out),
                Type::INT4 => (*i as i32).to_sql(ty, out),
                Type::FLOAT4 => (*i as f32).to_sql(ty, out),
                Type::FLOAT8 => (*i as f64).to_sql(ty, out),
                _ => i.to_sql(ty, out),
            },
            Value::Float(f) => match *ty {
                Type::FLOAT4 => (*f as f32).to_sql(ty, out),
                _ => f.to_sql(ty, out),
            },
            Value::Text(s) => match *ty {
                Type::INT2 | Type::INT4 | Type::INT8 => {
                    let parsed: i64 = s.trim().parse()?;
                    Value::Int(parsed).to_sql(ty, out)
                }
                Type::FLOAT4 | Type::FLOAT8 => {
                    let parsed: f64 = s.trim().parse()?;
                    Value::Float(parsed).to_sql(ty, out)
                }
                Type::BOOL => {
                    let parsed: bool = s.trim().parse()?;
                    parsed.to_sql(ty, out)
                }
                _ => s.to_sql(ty, out),
            },
            Value::List(_) => {
                Err("list value must be expanded into placeholders before binding".into())
            }
            Value::Map(_) => Err("map value cannot be bound as a query parameter".into()),
        }
    }

    fn accepts(_ty: &Type) -> bool {
        true
    }

    to_sql_checked!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coerce_int_truncates_fractional_text() {
        assert_eq!(Value::Text("5.5".into()).coerce_int(), 5);
        assert_eq!(Value::Text("5".into()).coerce_int(), 5);
        assert_eq!(Value::Text("-12.9".into()).coerce_int(), -12);
        assert_eq!(Value::Text("12abc".into()).coerce_int(), 12);
        assert_eq!(Value::Text("abc".into()).coerce_int(), 0);
        assert_eq!(Value::Float(5.5).coerce_int(), 5);
        assert_eq!(Value::Int(7).coerce_int(), 7);
    }

    #[test]
    fn fragment_string_keeps_text_verbatim() {
        assert_eq!(
            Value::Text("some_field > 60".into()).to_fragment_string(),
            "some_field > 60"
        );
        assert_eq!(Value::Int(5).to_fragment_string(), "5");
        assert_eq!(Value::Text("5.5".into()).to_fragment_string(), "5.5");
    }

    #[test]
    fn option_and_vec_conversions() {
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some("hi")), Value::Text("hi".into()));
        assert_eq!(
            Value::from(vec![1i64, 2]),
            Value::List(vec![Value::Int(1), Value::Int(2)])
        );
    }

    #[test]
    fn from_json_value() {
        let json = serde_json::json!({"a": 1, "b": [true, null]});
        let value = Value::from(json);
        let Value::Map(entries) = value else {
            panic!("expected map");
        };
        assert_eq!(entries[0], ("a".to_string(), Value::Int(1)));
        assert_eq!(
            entries[1],
            (
                "b".to_string(),
                Value::List(vec![Value::Bool(true), Value::Null])
            )
        );
    }
}
