//! Statement assembly: filters and records in, parameterized SQL out.
//!
//! Everything here is pure string/value transformation. Nothing touches a
//! connection; compile-time failures therefore never leave a half-executed
//! statement behind.

use crate::condition::{self, Predicate, SqlOp};
use crate::dialect::Dialect;
use crate::error::{ModelError, ModelResult};
use crate::filter::Filter;
use crate::record::Record;
use crate::value::Value;

/// A fully compiled statement: SQL text, positional parameters, and the
/// result-hook bag carried through from the filter.
///
/// Invariant: `params` matches the statement's placeholders in left-to-right
/// order. `Null` values never appear (NULL checks compile to `IS [NOT] NULL`
/// instead of binding), and list values are already flattened.
#[derive(Debug, Clone)]
pub struct CompiledQuery {
    pub sql: String,
    pub params: Vec<Value>,
    pub hooks: Vec<(String, Value)>,
}

fn table_checked(table: &str) -> ModelResult<&str> {
    if table.is_empty() {
        return Err(ModelError::config("table not defined on model"));
    }
    Ok(table)
}

/// Render one predicate, expanding the `IN(??)` sentinel to one placeholder
/// per list element. Empty lists short-circuit to a constant truth value
/// since `IN ()` is not valid SQL.
fn predicate_sql(pred: &Predicate, table: &str, dialect: Dialect) -> String {
    let column = dialect.qualify(table, &pred.field);
    match &pred.op {
        SqlOp::In { negated } => {
            let count = pred.value.as_list().map_or(1, <[Value]>::len);
            if count == 0 {
                return if *negated { "1=1" } else { "1=0" }.to_string();
            }
            let placeholders = vec!["?"; count].join(", ");
            let keyword = if *negated { "NOT IN" } else { "IN" };
            format!("{column} {keyword}({placeholders})")
        }
        _ => format!("{column} {}", pred.fragment()),
    }
}

/// Compile a SELECT statement from a filter.
///
/// Clause fragments are assembled in fixed order (joins, WHERE, GROUP BY,
/// HAVING, ORDER BY, LIMIT, OFFSET) with empty fragments skipped. An empty
/// WHERE clause is an error unless `allow_wide_open` is set.
pub fn build_select(
    table: &str,
    filter: Filter,
    dialect: Dialect,
    allow_wide_open: bool,
) -> ModelResult<CompiledQuery> {
    let table = table_checked(table)?;

    let predicates: Vec<Predicate> = filter
        .predicates()
        .iter()
        .map(|(key, value)| condition::parse(key, value.clone()))
        .collect::<ModelResult<_>>()?;

    let where_body = predicates
        .iter()
        .map(|pred| predicate_sql(pred, table, dialect))
        .collect::<Vec<_>>()
        .join(" AND ");
    if where_body.is_empty() && !allow_wide_open {
        return Err(ModelError::WideOpenQuery(table.to_string()));
    }
    let where_clause = if where_body.is_empty() {
        String::new()
    } else {
        format!("WHERE {where_body}")
    };

    let params = extract_params(&predicates);

    let select = filter.select_fragment(table, dialect);
    let joins = filter.joins_fragment();
    let [group_by, having, order_by, limit, offset] = filter.clause_fragments();

    let mut sql = format!("{select} FROM {}", dialect.quote(table));
    for fragment in [
        joins, where_clause, group_by, having, order_by, limit, offset,
    ] {
        if !fragment.is_empty() {
            sql.push(' ');
            sql.push_str(&fragment);
        }
    }

    Ok(CompiledQuery {
        sql: dialect.finish(sql),
        params,
        hooks: filter.result_hooks,
    })
}

/// Surviving parameters in predicate order: `Null` values are skipped
/// (already rendered as NULL checks), lists are flattened.
fn extract_params(predicates: &[Predicate]) -> Vec<Value> {
    let mut params = Vec::with_capacity(predicates.len());
    for pred in predicates {
        match &pred.value {
            Value::Null => {}
            Value::List(items) => params.extend(items.iter().cloned()),
            single => params.push(single.clone()),
        }
    }
    params
}

/// Compile an INSERT statement for one or more rows.
///
/// The column tuple comes from the first row; every row must carry exactly
/// the same columns. Parameters are flattened row-major.
pub fn build_insert(
    table: &str,
    rows: &[Record],
    dialect: Dialect,
) -> ModelResult<CompiledQuery> {
    let table = table_checked(table)?;

    let Some(first) = rows.first() else {
        return Err(ModelError::validation("create called with no rows"));
    };
    if first.is_empty() {
        return Err(ModelError::validation("create called with an empty row"));
    }
    let columns: Vec<&str> = first.columns().collect();

    let mut params = Vec::with_capacity(rows.len() * columns.len());
    for row in rows {
        if row.len() != columns.len() {
            return Err(ModelError::validation(
                "bulk insert rows must share the same columns",
            ));
        }
        for column in &columns {
            let value = row.get(column).ok_or_else(|| {
                ModelError::validation(format!("bulk insert row missing column '{column}'"))
            })?;
            params.push(value.clone());
        }
    }

    let fields = columns
        .iter()
        .map(|col| dialect.quote(col))
        .collect::<Vec<_>>()
        .join(", ");
    let tuple = format!("({})", vec!["?"; columns.len()].join(", "));
    let tuples = vec![tuple; rows.len()].join(", ");

    let sql = format!("INSERT INTO {} ({fields}) VALUES {tuples}", dialect.quote(table));

    Ok(CompiledQuery {
        sql: dialect.finish(sql),
        params,
        hooks: Vec::new(),
    })
}

/// Compile an UPDATE statement.
///
/// The update-key field becomes the WHERE target and is removed from the SET
/// list; parameters are the SET values in column order with the key value
/// appended last.
pub fn build_update(
    table: &str,
    mut data: Record,
    update_key: &str,
    dialect: Dialect,
) -> ModelResult<CompiledQuery> {
    let table = table_checked(table)?;

    let key_value = data
        .remove(update_key)
        .ok_or_else(|| ModelError::MissingUpdateKey(update_key.to_string()))?;
    if data.is_empty() {
        return Err(ModelError::EmptyUpdate);
    }

    let mut params = Vec::with_capacity(data.len() + 1);
    let set = data
        .iter()
        .map(|(column, value)| {
            params.push(value.clone());
            format!("{} = ?", dialect.quote(column))
        })
        .collect::<Vec<_>>()
        .join(", ");
    params.push(key_value);

    let sql = format!(
        "UPDATE {} SET {set} WHERE {update_key} = ?",
        dialect.quote(table)
    );

    Ok(CompiledQuery {
        sql: dialect.finish(sql),
        params,
        hooks: Vec::new(),
    })
}
