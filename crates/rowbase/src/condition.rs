//! Predicate parsing: the embedded-operator key grammar.
//!
//! A predicate key is either a bare field name (`"status"`) or a field name
//! with an operator suffix after the first hyphen (`"age->="`,
//! `"name-like"`, `"id-in"`, `"created-raw-BETWEEN ? AND ?"`). [`parse`]
//! resolves a key/value pair into a [`Predicate`] without mutating anything
//! the caller owns; the resolved field, operator, and (possibly rewritten)
//! value travel together from here on.

use crate::error::{ModelError, ModelResult};
use crate::value::Value;

/// Resolved comparison operator for one predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlOp {
    /// Binary comparison binding a single placeholder: `= ?`, `LIKE ?`, ...
    Compare(&'static str),
    /// `IS NULL`
    IsNull,
    /// `IS NOT NULL`
    IsNotNull,
    /// `IN(??)` / `NOT IN(??)`. The `(??)` sentinel is expanded to one
    /// placeholder per list element by the statement assembler.
    In { negated: bool },
    /// Caller-trusted raw fragment, inserted verbatim after the column.
    Raw(String),
}

/// One resolved WHERE predicate: field, operator, bound value.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub field: String,
    pub op: SqlOp,
    pub value: Value,
}

impl Predicate {
    /// The pre-expansion operator fragment, as it appears after the
    /// qualified column name.
    pub fn fragment(&self) -> String {
        match &self.op {
            SqlOp::Compare(op) => format!("{op} ?"),
            SqlOp::IsNull => "IS NULL".to_string(),
            SqlOp::IsNotNull => "IS NOT NULL".to_string(),
            SqlOp::In { negated: false } => "IN(??)".to_string(),
            SqlOp::In { negated: true } => "NOT IN(??)".to_string(),
            SqlOp::Raw(raw) => raw.clone(),
        }
    }
}

/// Parse one predicate key and its value.
///
/// Suffix matching is case-insensitive; the field name keeps its casing. A
/// `Null` value (or the null-form strings `"null"` / `"is null"` /
/// `"not null"` / `"is not null"`) on a bare key compiles to a NULL check
/// and rewrites the value to `Null` so it never reaches the parameter list.
pub fn parse(key: &str, value: Value) -> ModelResult<Predicate> {
    let Some((field, suffix)) = key.split_once('-') else {
        let upper = value.as_text().map(str::to_uppercase);
        return Ok(match upper.as_deref() {
            _ if value.is_null() => Predicate {
                field: key.to_string(),
                op: SqlOp::IsNull,
                value: Value::Null,
            },
            Some("IS NULL") | Some("NULL") => Predicate {
                field: key.to_string(),
                op: SqlOp::IsNull,
                value: Value::Null,
            },
            Some("IS NOT NULL") | Some("NOT NULL") => Predicate {
                field: key.to_string(),
                op: SqlOp::IsNotNull,
                value: Value::Null,
            },
            _ => Predicate {
                field: key.to_string(),
                op: SqlOp::Compare("="),
                value,
            },
        });
    };

    let suffix = suffix.to_uppercase();
    let op = match suffix.as_str() {
        "!=" => SqlOp::Compare("!="),
        "<>" => SqlOp::Compare("<>"),
        "=" => SqlOp::Compare("="),
        ">=" => SqlOp::Compare(">="),
        ">" => SqlOp::Compare(">"),
        "<" => SqlOp::Compare("<"),
        "<=" => SqlOp::Compare("<="),
        "LIKE" => SqlOp::Compare("LIKE"),
        "NOT LIKE" | "NOT-LIKE" => SqlOp::Compare("NOT LIKE"),
        "IN" => SqlOp::In { negated: false },
        "NOT IN" | "NOT-IN" => SqlOp::In { negated: true },
        _ => match suffix.strip_prefix("RAW") {
            Some(rest) => SqlOp::Raw(rest.strip_prefix('-').unwrap_or(rest).to_string()),
            None => return Err(ModelError::UnknownOperator(suffix)),
        },
    };

    Ok(Predicate {
        field: field.to_string(),
        op,
        value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragment_of(key: &str, value: Value) -> (String, String, Value) {
        let p = parse(key, value).unwrap();
        (p.field.clone(), p.fragment(), p.value)
    }

    #[test]
    fn bare_key_is_equality() {
        let (field, frag, value) = fragment_of("field", Value::from("value"));
        assert_eq!(field, "field");
        assert_eq!(frag, "= ?");
        assert_eq!(value, Value::Text("value".into()));
    }

    #[test]
    fn null_value_becomes_is_null() {
        let (_, frag, value) = fragment_of("field", Value::Null);
        assert_eq!(frag, "IS NULL");
        assert_eq!(value, Value::Null);
    }

    #[test]
    fn null_form_strings_become_is_null() {
        for text in ["is null", "IS NULL", "null", "NuLl"] {
            let (_, frag, value) = fragment_of("field", Value::from(text));
            assert_eq!(frag, "IS NULL", "input {text:?}");
            assert_eq!(value, Value::Null);
        }
    }

    #[test]
    fn not_null_form_strings_become_is_not_null() {
        for text in ["is not null", "not null", "NOT NULL"] {
            let (_, frag, value) = fragment_of("field", Value::from(text));
            assert_eq!(frag, "IS NOT NULL", "input {text:?}");
            assert_eq!(value, Value::Null);
        }
    }

    #[test]
    fn comparison_suffixes() {
        for (key, expected) in [
            ("field-=", "= ?"),
            ("field-!=", "!= ?"),
            ("field-<>", "<> ?"),
            ("field->=", ">= ?"),
            ("field->", "> ?"),
            ("field-<", "< ?"),
            ("field-<=", "<= ?"),
        ] {
            let (field, frag, value) = fragment_of(key, Value::from("value"));
            assert_eq!(field, "field");
            assert_eq!(frag, expected);
            assert_eq!(value, Value::Text("value".into()));
        }
    }

    #[test]
    fn like_suffixes_any_casing() {
        for key in ["field-like", "field-LIKE", "field-LiKe"] {
            assert_eq!(fragment_of(key, Value::from("v")).1, "LIKE ?");
        }
        for key in ["field-not-like", "field-not like", "field-NOT-LIKE"] {
            assert_eq!(fragment_of(key, Value::from("v")).1, "NOT LIKE ?");
        }
    }

    #[test]
    fn in_suffixes_keep_the_list() {
        let list = Value::from(vec!["many", "values"]);
        let (field, frag, value) = fragment_of("field-in", list.clone());
        assert_eq!(field, "field");
        assert_eq!(frag, "IN(??)");
        assert_eq!(value, list);

        let (_, frag, value) = fragment_of("field-not in", list.clone());
        assert_eq!(frag, "NOT IN(??)");
        assert_eq!(value, list);

        assert_eq!(fragment_of("field-not-in", list.clone()).1, "NOT IN(??)");
    }

    #[test]
    fn raw_suffix_is_verbatim_uppercased() {
        let (field, frag, value) =
            fragment_of("field-raw-between ? and ?", Value::from("value"));
        assert_eq!(field, "field");
        assert_eq!(frag, "BETWEEN ? AND ?");
        assert_eq!(value, Value::Text("value".into()));

        let (_, frag, _) = fragment_of(
            "field-raw-> DATE_SUB(?, INTERVAL 1 DAY)",
            Value::from("value"),
        );
        assert_eq!(frag, "> DATE_SUB(?, INTERVAL 1 DAY)");
    }

    #[test]
    fn unknown_suffix_names_the_uppercased_operator() {
        let err = parse("fieldname-bogus", Value::from("value")).unwrap_err();
        assert!(err.is_unknown_operator());
        assert_eq!(err.to_string(), "Operator not defined: BOGUS");
    }
}
