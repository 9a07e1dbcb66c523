//! # rowbase
//!
//! A filter-to-SQL table gateway for Rust.
//!
//! ## Features
//!
//! - **Declarative filters**: directive fields plus an ordered predicate list
//!   with an embedded-operator key grammar (`"age->="`, `"name-like"`,
//!   `"id-in"`, `"ts-raw-BETWEEN ? AND ?"`)
//! - **Deterministic compilation**: one parameterized statement plus a
//!   positional parameter list, compiled before anything touches the wire
//! - **Per-table models**: implement [`Model`] once and get
//!   `get_all`/`get_one`, `find*_by` sugar, bulk `create`, and `update`
//! - **Safe defaults**: wide-open SELECTs (no WHERE) fail unless explicitly
//!   allowed; UPDATE requires its key field and a non-empty SET list
//! - **Transaction-friendly**: pass a transaction anywhere a
//!   [`GenericClient`] is expected
//! - **Pluggable dialect**: backtick/`?` (MySQL-style) or double-quote/`$n`
//!   (Postgres) identifier quoting and placeholders
//!
//! ## Example
//!
//! ```ignore
//! use rowbase::{Filter, Model, Record};
//!
//! struct User {
//!     row: Record,
//! }
//!
//! impl Model for User {
//!     const TABLE: &'static str = "users";
//!
//!     fn record(&self) -> &Record {
//!         &self.row
//!     }
//!     fn record_mut(&mut self) -> &mut Record {
//!         &mut self.row
//!     }
//! }
//!
//! // SELECT "users".* FROM "users" WHERE "users"."status" = $1
//! //   AND "users"."age" >= $2 ORDER BY created_at DESC LIMIT 10
//! let users = User::get_all(
//!     &client,
//!     Filter::new()
//!         .with("status", "active")
//!         .with("age->=", 21)
//!         .order_by("created_at DESC")
//!         .limit(10),
//! )
//! .await?;
//! ```

pub mod client;
pub mod condition;
pub mod dialect;
pub mod error;
pub mod filter;
pub mod model;
pub mod record;
pub mod stmt;
pub mod value;

pub use client::{GenericClient, record_from_row};
pub use condition::{Predicate, SqlOp};
pub use dialect::Dialect;
pub use error::{ModelError, ModelResult};
pub use filter::Filter;
pub use model::{FinderKind, FinderResult, Model, parse_finder};
pub use record::Record;
pub use stmt::{CompiledQuery, build_insert, build_select, build_update};
pub use value::Value;

pub mod prelude;

#[cfg(feature = "pool")]
pub mod pool;

#[cfg(feature = "pool")]
pub use pool::{create_pool, create_pool_with_config};
