//! The model trait: per-table CRUD over the filter compiler.
//!
//! Implement [`Model`] for a struct per table and the default methods supply
//! the whole call surface: `get_all`/`get_one`, `find_all_by`/`find_one_by`,
//! the string-routed [`find_dynamic`](Model::find_dynamic) finder,
//! `create`/`create_many` and `update`/`update_by`. A model instance owns a
//! [`Record`] that the single-row fetch path maps results onto.
//!
//! ```ignore
//! struct User {
//!     row: rowbase::Record,
//! }
//!
//! impl rowbase::Model for User {
//!     const TABLE: &'static str = "users";
//!
//!     fn record(&self) -> &rowbase::Record {
//!         &self.row
//!     }
//!     fn record_mut(&mut self) -> &mut rowbase::Record {
//!         &mut self.row
//!     }
//! }
//!
//! let active = User::get_all(&client, Filter::new().with("status", "active")).await?;
//! let id = User::create(&client, Record::from([("name", "alice")])).await?;
//! ```

use crate::client::GenericClient;
use crate::dialect::Dialect;
use crate::error::{ModelError, ModelResult};
use crate::filter::Filter;
use crate::record::Record;
use crate::stmt;
use crate::value::Value;

/// Which fixed finder a dynamic call routes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinderKind {
    /// `getBy<Field>`: single row, mapped onto the instance.
    One,
    /// `getAllBy<Field>`: all matching rows.
    All,
}

/// Result of a dynamic finder call.
#[derive(Debug, Clone, PartialEq)]
pub enum FinderResult {
    One(Record),
    Many(Vec<Record>),
}

/// Parse a dynamic finder name: a case-insensitive `getAllBy` / `getBy`
/// prefix followed by a field name (lowercased for the query).
pub fn parse_finder(method: &str) -> ModelResult<(FinderKind, String)> {
    fn strip_ci<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
        s.get(..prefix.len())
            .filter(|head| head.eq_ignore_ascii_case(prefix))
            .map(|_| &s[prefix.len()..])
    }

    let (kind, field) = if let Some(rest) = strip_ci(method, "getAllBy") {
        (FinderKind::All, rest)
    } else if let Some(rest) = strip_ci(method, "getBy") {
        (FinderKind::One, rest)
    } else {
        return Err(ModelError::MalformedCall(format!(
            "unrecognized finder '{method}'"
        )));
    };
    if field.is_empty() {
        return Err(ModelError::MalformedCall(format!(
            "unable to parse a field name from '{method}'"
        )));
    }
    Ok((kind, field.to_lowercase()))
}

/// A per-table data gateway.
///
/// `TABLE` is the only required constant; an empty value is a configuration
/// error surfaced before any SQL is built. `DIALECT` defaults to Postgres to
/// match the bundled executor; set `Dialect::MySql` for backtick/`?` output.
pub trait Model: Send + Sync {
    const TABLE: &'static str;
    const DIALECT: Dialect = Dialect::Postgres;
    /// Safety rail: a SELECT with no WHERE predicates fails unless this is
    /// overridden to `true`.
    const ALLOW_WIDE_OPEN: bool = false;
    const UPDATE_KEY: &'static str = "id";

    /// The instance's mapped-row storage.
    fn record(&self) -> &Record;
    fn record_mut(&mut self) -> &mut Record;

    /// Post-fetch hook applied to every fetched row, receiving the filter's
    /// result-hook bag untouched. The default is the identity.
    fn process_result(hooks: &[(String, Value)], record: Record) -> ModelResult<Record> {
        let _ = hooks;
        Ok(record)
    }

    /// Compile the filter, execute it, and run every row through
    /// [`process_result`](Model::process_result).
    fn get_all<C: GenericClient>(
        client: &C,
        filter: Filter,
    ) -> impl std::future::Future<Output = ModelResult<Vec<Record>>> + Send {
        async move {
            let compiled =
                stmt::build_select(Self::TABLE, filter, Self::DIALECT, Self::ALLOW_WIDE_OPEN)?;
            #[cfg(feature = "tracing")]
            tracing::debug!(sql = %compiled.sql, params = compiled.params.len(), "select");
            let rows = client.fetch_all(&compiled.sql, &compiled.params).await?;
            rows.into_iter()
                .map(|row| Self::process_result(&compiled.hooks, row))
                .collect()
        }
    }

    /// Fetch a single row and map it onto this instance's record storage.
    ///
    /// Errors with [`ModelError::NotFound`] when nothing matches; extra rows
    /// beyond the first are ignored, matching the first-row contract.
    fn get_one<C: GenericClient>(
        &mut self,
        client: &C,
        filter: Filter,
    ) -> impl std::future::Future<Output = ModelResult<Record>> + Send {
        async move {
            let rows = Self::get_all(client, filter).await?;
            if rows.is_empty() {
                return Err(ModelError::not_found(format!(
                    "no row in `{}` matched the filter",
                    Self::TABLE
                )));
            }
            self.record_mut().map_rows(&rows[..1])?;
            Ok(rows.into_iter().next().expect("checked non-empty"))
        }
    }

    /// `get_all` sugar for a single field/value equality.
    fn find_all_by<C: GenericClient>(
        client: &C,
        field: &str,
        value: impl Into<Value>,
    ) -> impl std::future::Future<Output = ModelResult<Vec<Record>>> + Send {
        Self::get_all(client, Filter::new().with(field, value))
    }

    /// `get_one` sugar for a single field/value equality.
    fn find_one_by<C: GenericClient>(
        &mut self,
        client: &C,
        field: &str,
        value: impl Into<Value>,
    ) -> impl std::future::Future<Output = ModelResult<Record>> + Send {
        self.get_one(client, Filter::new().with(field, value))
    }

    /// Route a dynamic finder name (`getBy<Field>` / `getAllBy<Field>`,
    /// case-insensitive) to the matching fixed finder.
    fn find_dynamic<C: GenericClient>(
        &mut self,
        client: &C,
        method: &str,
        value: impl Into<Value>,
    ) -> impl std::future::Future<Output = ModelResult<FinderResult>> + Send {
        let parsed = parse_finder(method);
        let value: Value = value.into();
        async move {
            let (kind, field) = parsed?;
            match kind {
                FinderKind::All => Ok(FinderResult::Many(
                    Self::find_all_by(client, &field, value).await?,
                )),
                FinderKind::One => Ok(FinderResult::One(
                    self.find_one_by(client, &field, value).await?,
                )),
            }
        }
    }

    /// Insert one row; returns the connection's last insert id.
    fn create<C: GenericClient>(
        client: &C,
        row: Record,
    ) -> impl std::future::Future<Output = ModelResult<i64>> + Send {
        Self::create_many(client, vec![row])
    }

    /// Insert a batch of uniform rows in one statement; returns the
    /// connection's last insert id.
    fn create_many<C: GenericClient>(
        client: &C,
        rows: Vec<Record>,
    ) -> impl std::future::Future<Output = ModelResult<i64>> + Send {
        async move {
            let compiled = stmt::build_insert(Self::TABLE, &rows, Self::DIALECT)?;
            #[cfg(feature = "tracing")]
            tracing::debug!(sql = %compiled.sql, params = compiled.params.len(), "insert");
            client.execute(&compiled.sql, &compiled.params).await?;
            client.last_insert_id().await
        }
    }

    /// Update the row identified by [`UPDATE_KEY`](Model::UPDATE_KEY);
    /// returns the number of affected rows.
    fn update<C: GenericClient>(
        client: &C,
        data: Record,
    ) -> impl std::future::Future<Output = ModelResult<u64>> + Send {
        Self::update_by(client, data, Self::UPDATE_KEY)
    }

    /// Update with an explicit key field.
    fn update_by<C: GenericClient>(
        client: &C,
        data: Record,
        update_key: &str,
    ) -> impl std::future::Future<Output = ModelResult<u64>> + Send {
        let compiled = stmt::build_update(Self::TABLE, data, update_key, Self::DIALECT);
        async move {
            let compiled = compiled?;
            #[cfg(feature = "tracing")]
            tracing::debug!(sql = %compiled.sql, params = compiled.params.len(), "update");
            client.execute(&compiled.sql, &compiled.params).await
        }
    }
}
