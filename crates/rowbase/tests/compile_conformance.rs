//! Compiled-SQL conformance tests against the public API, asserted in the
//! backtick/`?` dialect.

use rowbase::{Dialect, Filter, ModelError, Value, build_insert, build_select, build_update};
use rowbase::{Record, condition};

fn compile(filter: Filter) -> (String, Vec<Value>) {
    let q = build_select("example_model", filter, Dialect::MySql, false).unwrap();
    (q.sql, q.params)
}

#[test]
fn every_comparison_suffix_compiles_with_the_value_bound() {
    for op in ["=", "!=", "<>", ">=", ">", "<", "<="] {
        for key in [format!("field-{op}"), format!("field-{}", op.to_lowercase())] {
            let (sql, params) = compile(Filter::new().with(key.as_str(), "value"));
            assert_eq!(
                sql,
                format!(
                    "SELECT `example_model`.* FROM `example_model` \
                     WHERE `example_model`.`field` {op} ?"
                ),
                "key {key:?}"
            );
            assert_eq!(params, vec![Value::Text("value".into())]);
        }
    }
}

#[test]
fn like_and_not_like() {
    let (sql, _) = compile(Filter::new().with("field-like", "%v%"));
    assert!(sql.ends_with("WHERE `example_model`.`field` LIKE ?"));

    let (sql, _) = compile(Filter::new().with("field-not-like", "%v%"));
    assert!(sql.ends_with("WHERE `example_model`.`field` NOT LIKE ?"));
}

#[test]
fn null_forms_compile_to_null_checks_and_bind_nothing() {
    for null_form in [Value::Null, Value::from("is null"), Value::from("NULL")] {
        let (sql, params) = compile(Filter::new().with("field", null_form));
        assert!(sql.ends_with("`example_model`.`field` IS NULL"), "{sql}");
        assert!(params.is_empty());
    }
    for null_form in ["is not null", "not null", "NOT NULL"] {
        let (sql, params) = compile(Filter::new().with("field", null_form));
        assert!(sql.ends_with("`example_model`.`field` IS NOT NULL"), "{sql}");
        assert!(params.is_empty());
    }
}

#[test]
fn in_predicates_preserve_the_sequence() {
    let pred = condition::parse("field-in", Value::from(vec!["many", "values"])).unwrap();
    assert_eq!(pred.fragment(), "IN(??)");
    assert_eq!(pred.value, Value::from(vec!["many", "values"]));

    let (sql, params) = compile(Filter::new().with("field-in", vec!["many", "values"]));
    assert!(sql.ends_with("`example_model`.`field` IN(?, ?)"), "{sql}");
    assert_eq!(
        params,
        vec![Value::Text("many".into()), Value::Text("values".into())]
    );

    let (sql, _) = compile(Filter::new().with("field-not-in", vec![1i64, 2]));
    assert!(sql.ends_with("`example_model`.`field` NOT IN(?, ?)"), "{sql}");
}

#[test]
fn raw_operator_is_verbatim() {
    let (sql, params) = compile(Filter::new().with("field-raw-between ? and ?", vec![1i64, 9]));
    assert!(
        sql.ends_with("WHERE `example_model`.`field` BETWEEN ? AND ?"),
        "{sql}"
    );
    assert_eq!(params, vec![Value::Int(1), Value::Int(9)]);
}

#[test]
fn unknown_operator_fails_naming_the_suffix() {
    let err = build_select(
        "t",
        Filter::new().with("field-bogus", "value"),
        Dialect::MySql,
        false,
    )
    .unwrap_err();
    assert_eq!(err.to_string(), "Operator not defined: BOGUS");
}

#[test]
fn wide_open_queries_are_guarded_by_default() {
    let err = build_select("t", Filter::new(), Dialect::MySql, false).unwrap_err();
    assert!(matches!(err, ModelError::WideOpenQuery(_)));

    let q = build_select("t", Filter::new(), Dialect::MySql, true).unwrap();
    assert_eq!(q.sql, "SELECT `t`.* FROM `t`");
    assert!(q.params.is_empty());
}

#[test]
fn kitchen_sink_statement_assembles_in_fixed_order() {
    let filter = Filter::new()
        .select_cols(&["a", "b"])
        .join("LEFT JOIN x ON x.id = t.x_id")
        .join("LEFT JOIN y ON y.id = t.y_id")
        .with("status", "active")
        .with("age->=", 21i64)
        .group_by("a")
        .having("COUNT(*) > 1")
        .order_by("a DESC")
        .limit(10)
        .offset(5);
    let q = build_select("t", filter, Dialect::MySql, false).unwrap();
    assert_eq!(
        q.sql,
        "SELECT `t`.`a`, `t`.`b` FROM `t` \
         LEFT JOIN x ON x.id = t.x_id\nLEFT JOIN y ON y.id = t.y_id \
         WHERE `t`.`status` = ? AND `t`.`age` >= ? \
         GROUP BY a HAVING COUNT(*) > 1 ORDER BY a DESC LIMIT 10 OFFSET 5"
    );
    assert_eq!(
        q.params,
        vec![Value::Text("active".into()), Value::Int(21)]
    );
}

#[test]
fn mapping_pairs_route_directives_and_predicates() {
    let filter = Filter::from_pairs([
        ("select_fields", Value::from(vec!["field", "another_one"])),
        ("some_field-!=", Value::from("bananas")),
        ("group_by", Value::from("some bailing wire")),
        ("limit", Value::from("5.5")),
    ])
    .unwrap();
    let q = build_select("example_model", filter, Dialect::MySql, false).unwrap();
    assert_eq!(
        q.sql,
        "SELECT `example_model`.`field`, `example_model`.`another_one` FROM `example_model` \
         WHERE `example_model`.`some_field` != ? GROUP BY some bailing wire LIMIT 5"
    );
    assert_eq!(q.params, vec![Value::Text("bananas".into())]);
}

#[test]
fn json_objects_become_filters() {
    let filter = Filter::from_json(serde_json::json!({
        "status": "active",
        "age->=": 21,
        "limit": 10,
    }))
    .unwrap();
    let q = build_select("users", filter, Dialect::MySql, false).unwrap();
    // serde_json object iteration is key-sorted, so the predicate order is
    // deterministic here.
    assert_eq!(
        q.sql,
        "SELECT `users`.* FROM `users` \
         WHERE `users`.`age` >= ? AND `users`.`status` = ? LIMIT 10"
    );
    assert_eq!(q.params, vec![Value::Int(21), Value::Text("active".into())]);
}

#[test]
fn compiling_two_clones_yields_identical_output() {
    let filter = Filter::new()
        .with("a", 1i64)
        .with("b-in", vec![2i64, 3])
        .with("c", Value::Null)
        .order_by("a");
    let first = build_select("t", filter.clone(), Dialect::MySql, false).unwrap();
    let second = build_select("t", filter, Dialect::MySql, false).unwrap();
    assert_eq!(first.sql, second.sql);
    assert_eq!(first.params, second.params);
}

#[test]
fn insert_and_update_round_out_the_crud_surface() {
    let q = build_insert(
        "t",
        &[Record::from([("key1", "a"), ("key2", "b")])],
        Dialect::MySql,
    )
    .unwrap();
    assert_eq!(q.sql, "INSERT INTO `t` (`key1`, `key2`) VALUES (?, ?)");
    assert_eq!(
        q.params,
        vec![Value::Text("a".into()), Value::Text("b".into())]
    );

    let q = build_update(
        "t",
        Record::from([("id", Value::Int(1)), ("key1", Value::Text("x".into()))]),
        "id",
        Dialect::MySql,
    )
    .unwrap();
    assert_eq!(q.sql, "UPDATE `t` SET `key1` = ? WHERE id = ?");
    assert_eq!(q.params, vec![Value::Text("x".into()), Value::Int(1)]);
}

#[test]
fn postgres_dialect_produces_numbered_placeholders() {
    let filter = Filter::new().with("status", "active").with("age->=", 21i64);
    let q = build_select("users", filter, Dialect::Postgres, false).unwrap();
    assert_eq!(
        q.sql,
        "SELECT \"users\".* FROM \"users\" \
         WHERE \"users\".\"status\" = $1 AND \"users\".\"age\" >= $2"
    );
}
