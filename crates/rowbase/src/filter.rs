//! Query filters: directives plus ordered WHERE predicates.
//!
//! A [`Filter`] carries the non-WHERE directives as named fields
//! (`select_fields`, `joins`, `group_by`, `having`, `order_by`, `limit`,
//! `offset`, result hooks) and everything else as an ordered list of
//! predicate entries written in the operator-key grammar (see
//! [`condition`](crate::condition)). Compilation consumes the filter; clone
//! it first if you need to compile the same description twice.

use crate::dialect::Dialect;
use crate::error::{ModelError, ModelResult};
use crate::value::Value;

/// Filter-mapping keys that are directives rather than WHERE predicates.
const KEY_SELECT_FIELDS: &str = "select_fields";
const KEY_JOINS: &str = "joins";
const KEY_GROUP_BY: &str = "group_by";
const KEY_HAVING: &str = "having";
const KEY_ORDER_BY: &str = "order_by";
const KEY_LIMIT: &str = "limit";
const KEY_OFFSET: &str = "offset";
const KEY_PROCESS_RESULTS: &str = "process_results";

/// A declarative query description: directives + predicates.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    pub(crate) select_cols: Vec<String>,
    pub(crate) select_raw: Option<String>,
    pub(crate) join_clauses: Vec<String>,
    pub(crate) joins_raw: Option<String>,
    pub(crate) group_by: Option<String>,
    pub(crate) having: Option<String>,
    pub(crate) order_by: Option<String>,
    pub(crate) limit: Option<i64>,
    pub(crate) offset: Option<i64>,
    pub(crate) result_hooks: Vec<(String, Value)>,
    pub(crate) predicates: Vec<(String, Value)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    // ==================== Predicates ====================

    /// Add a WHERE predicate entry in the operator-key grammar:
    /// `"status"`, `"age->="`, `"name-like"`, `"id-in"`, ...
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.predicates.push((key.into(), value.into()));
        self
    }

    // ==================== Directives ====================

    /// Select specific columns, rendered table-qualified and quoted.
    pub fn select_cols(mut self, cols: &[&str]) -> Self {
        self.select_cols = cols.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Select a caller-trusted raw fragment, used verbatim.
    pub fn select_raw(mut self, fragment: impl Into<String>) -> Self {
        self.select_raw = Some(fragment.into());
        self
    }

    /// Append one JOIN clause. Clauses are newline-joined in the statement.
    pub fn join(mut self, clause: impl Into<String>) -> Self {
        self.join_clauses.push(clause.into());
        self
    }

    /// Set a caller-trusted raw JOIN fragment, overriding appended clauses.
    pub fn joins_raw(mut self, fragment: impl Into<String>) -> Self {
        self.joins_raw = Some(fragment.into());
        self
    }

    pub fn group_by(mut self, clause: impl Into<String>) -> Self {
        self.group_by = Some(clause.into());
        self
    }

    pub fn having(mut self, clause: impl Into<String>) -> Self {
        self.having = Some(clause.into());
        self
    }

    pub fn order_by(mut self, clause: impl Into<String>) -> Self {
        self.order_by = Some(clause.into());
        self
    }

    pub fn limit(mut self, n: i64) -> Self {
        self.limit = Some(n);
        self
    }

    pub fn offset(mut self, n: i64) -> Self {
        self.offset = Some(n);
        self
    }

    /// Attach a result-hook entry, threaded untouched to the post-fetch
    /// `process_result` hook.
    pub fn hook(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.result_hooks.push((key.into(), value.into()));
        self
    }

    // ==================== String-keyed entry point ====================

    /// Route one mapping-style entry: directive keys update the matching
    /// directive field (`limit`/`offset` coerce to integers), any other key
    /// becomes a predicate entry.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> ModelResult<()> {
        let key = key.into();
        let value = value.into();
        match key.as_str() {
            KEY_SELECT_FIELDS => match value {
                Value::List(items) => {
                    self.select_cols = items.iter().map(Value::to_fragment_string).collect();
                }
                scalar => self.select_raw = Some(scalar.to_fragment_string()),
            },
            KEY_JOINS => match value {
                Value::List(items) => {
                    self.join_clauses
                        .extend(items.iter().map(Value::to_fragment_string));
                }
                scalar => self.joins_raw = Some(scalar.to_fragment_string()),
            },
            KEY_GROUP_BY => self.group_by = Some(value.to_fragment_string()),
            KEY_HAVING => self.having = Some(value.to_fragment_string()),
            KEY_ORDER_BY => self.order_by = Some(value.to_fragment_string()),
            KEY_LIMIT => self.limit = Some(value.coerce_int()),
            KEY_OFFSET => self.offset = Some(value.coerce_int()),
            KEY_PROCESS_RESULTS => match value {
                Value::Map(entries) => self.result_hooks.extend(entries),
                other => {
                    return Err(ModelError::validation(format!(
                        "{KEY_PROCESS_RESULTS} must be a mapping, got {other:?}"
                    )));
                }
            },
            _ => self.predicates.push((key, value)),
        }
        Ok(())
    }

    /// Build a filter from mapping-style pairs.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> ModelResult<Self>
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let mut filter = Filter::new();
        for (key, value) in pairs {
            filter.insert(key, value)?;
        }
        Ok(filter)
    }

    /// Build a filter from a JSON object (e.g. deserialized query params).
    pub fn from_json(json: serde_json::Value) -> ModelResult<Self> {
        match json {
            serde_json::Value::Object(entries) => {
                Self::from_pairs(entries.into_iter().map(|(k, v)| (k, Value::from(v))))
            }
            other => Err(ModelError::validation(format!(
                "filter must be a JSON object, got {other}"
            ))),
        }
    }

    // ==================== Fragment rendering ====================

    /// `SELECT ...` fragment. Defaults to all columns of the table.
    pub(crate) fn select_fragment(&self, table: &str, dialect: Dialect) -> String {
        if let Some(raw) = &self.select_raw {
            return format!("SELECT {raw}");
        }
        if self.select_cols.is_empty() {
            return format!("SELECT {}.*", dialect.quote(table));
        }
        let cols: Vec<String> = self
            .select_cols
            .iter()
            .map(|col| dialect.qualify(table, col))
            .collect();
        format!("SELECT {}", cols.join(", "))
    }

    /// JOIN fragment, empty when absent.
    pub(crate) fn joins_fragment(&self) -> String {
        match &self.joins_raw {
            Some(raw) => raw.clone(),
            None => self.join_clauses.join("\n"),
        }
    }

    /// `<KEYWORD> <value>` fragments, empty when absent.
    pub(crate) fn clause_fragments(&self) -> [String; 5] {
        fn keyword(kw: &str, value: Option<&String>) -> String {
            value.map(|v| format!("{kw} {v}")).unwrap_or_default()
        }
        [
            keyword("GROUP BY", self.group_by.as_ref()),
            keyword("HAVING", self.having.as_ref()),
            keyword("ORDER BY", self.order_by.as_ref()),
            self.limit.map(|n| format!("LIMIT {n}")).unwrap_or_default(),
            self.offset
                .map(|n| format!("OFFSET {n}"))
                .unwrap_or_default(),
        ]
    }

    /// The attached result-hook entries.
    pub fn result_hooks(&self) -> &[(String, Value)] {
        &self.result_hooks
    }

    /// The raw predicate entries, in insertion order.
    pub fn predicates(&self) -> &[(String, Value)] {
        &self.predicates
    }
}
