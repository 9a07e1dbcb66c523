//! Generic client trait for unified database access.
//!
//! [`GenericClient`] is the execution-engine contract the model layer talks
//! to: fetch rows, execute a mutation, report the last insert id. It is
//! implemented for `tokio_postgres::Client`, `tokio_postgres::Transaction`
//! (so repository code can run inside a transaction unchanged), plain
//! references, and the deadpool-postgres pooled clients behind the `pool`
//! feature. Test code can substitute its own implementation; the trait only
//! deals in SQL text, [`Value`] parameters, and [`Record`] rows.

use crate::error::{ModelError, ModelResult};
use crate::record::Record;
use crate::value::Value;
use tokio_postgres::Row;
use tokio_postgres::types::{ToSql, Type};

/// A trait that unifies database clients and transactions.
pub trait GenericClient: Send + Sync {
    /// Execute a query and return all rows as records.
    fn fetch_all(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl std::future::Future<Output = ModelResult<Vec<Record>>> + Send;

    /// Execute a statement and return the number of affected rows.
    fn execute(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl std::future::Future<Output = ModelResult<u64>> + Send;

    /// The most recently generated insert id on this connection.
    ///
    /// For Postgres this is `SELECT LASTVAL()`; it errors if nothing has
    /// been inserted through a sequence on this session yet.
    fn last_insert_id(&self) -> impl std::future::Future<Output = ModelResult<i64>> + Send;
}

fn param_refs(params: &[Value]) -> Vec<&(dyn ToSql + Sync)> {
    params.iter().map(|p| p as &(dyn ToSql + Sync)).collect()
}

/// Decode one driver row into a [`Record`], column by column.
pub fn record_from_row(row: &Row) -> ModelResult<Record> {
    let mut record = Record::new();
    for (idx, column) in row.columns().iter().enumerate() {
        record.set(column.name(), decode_column(row, idx, column.name(), column.type_())?);
    }
    Ok(record)
}

fn decode_column(row: &Row, idx: usize, name: &str, ty: &Type) -> ModelResult<Value> {
    fn get<'r, T>(row: &'r Row, idx: usize, name: &str) -> ModelResult<Option<T>>
    where
        T: tokio_postgres::types::FromSql<'r>,
    {
        row.try_get::<_, Option<T>>(idx)
            .map_err(|e| ModelError::decode(name, e.to_string()))
    }

    let value = match *ty {
        Type::BOOL => get::<bool>(row, idx, name)?.map(Value::Bool),
        Type::INT2 => get::<i16>(row, idx, name)?.map(|v| Value::Int(v.into())),
        Type::INT4 => get::<i32>(row, idx, name)?.map(|v| Value::Int(v.into())),
        Type::INT8 => get::<i64>(row, idx, name)?.map(Value::Int),
        Type::FLOAT4 => get::<f32>(row, idx, name)?.map(|v| Value::Float(v.into())),
        Type::FLOAT8 => get::<f64>(row, idx, name)?.map(Value::Float),
        Type::UUID => get::<uuid::Uuid>(row, idx, name)?.map(|v| Value::Text(v.to_string())),
        Type::TIMESTAMP => {
            get::<chrono::NaiveDateTime>(row, idx, name)?.map(|v| Value::Text(v.to_string()))
        }
        Type::TIMESTAMPTZ => get::<chrono::DateTime<chrono::Utc>>(row, idx, name)?
            .map(|v| Value::Text(v.to_rfc3339())),
        Type::DATE => {
            get::<chrono::NaiveDate>(row, idx, name)?.map(|v| Value::Text(v.to_string()))
        }
        Type::TIME => {
            get::<chrono::NaiveTime>(row, idx, name)?.map(|v| Value::Text(v.to_string()))
        }
        Type::JSON | Type::JSONB => get::<serde_json::Value>(row, idx, name)?.map(Value::from),
        // Everything else is read as text, matching the lowest-common-
        // denominator contract of the record model.
        _ => get::<String>(row, idx, name)?.map(Value::Text),
    };
    Ok(value.unwrap_or(Value::Null))
}

impl GenericClient for tokio_postgres::Client {
    async fn fetch_all(&self, sql: &str, params: &[Value]) -> ModelResult<Vec<Record>> {
        let refs = param_refs(params);
        let rows = tokio_postgres::Client::query(self, sql, &refs).await?;
        rows.iter().map(record_from_row).collect()
    }

    async fn execute(&self, sql: &str, params: &[Value]) -> ModelResult<u64> {
        let refs = param_refs(params);
        Ok(tokio_postgres::Client::execute(self, sql, &refs).await?)
    }

    async fn last_insert_id(&self) -> ModelResult<i64> {
        let row = tokio_postgres::Client::query_one(self, "SELECT LASTVAL()", &[]).await?;
        Ok(row.try_get(0)?)
    }
}

impl GenericClient for tokio_postgres::Transaction<'_> {
    async fn fetch_all(&self, sql: &str, params: &[Value]) -> ModelResult<Vec<Record>> {
        let refs = param_refs(params);
        let rows = tokio_postgres::Transaction::query(self, sql, &refs).await?;
        rows.iter().map(record_from_row).collect()
    }

    async fn execute(&self, sql: &str, params: &[Value]) -> ModelResult<u64> {
        let refs = param_refs(params);
        Ok(tokio_postgres::Transaction::execute(self, sql, &refs).await?)
    }

    async fn last_insert_id(&self) -> ModelResult<i64> {
        let row = tokio_postgres::Transaction::query_one(self, "SELECT LASTVAL()", &[]).await?;
        Ok(row.try_get(0)?)
    }
}

impl<C: GenericClient> GenericClient for &C {
    fn fetch_all(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl std::future::Future<Output = ModelResult<Vec<Record>>> + Send {
        (*self).fetch_all(sql, params)
    }

    fn execute(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl std::future::Future<Output = ModelResult<u64>> + Send {
        (*self).execute(sql, params)
    }

    fn last_insert_id(&self) -> impl std::future::Future<Output = ModelResult<i64>> + Send {
        (*self).last_insert_id()
    }
}

// ===== deadpool-postgres support =====

#[cfg(feature = "pool")]
impl GenericClient for deadpool_postgres::ClientWrapper {
    async fn fetch_all(&self, sql: &str, params: &[Value]) -> ModelResult<Vec<Record>> {
        GenericClient::fetch_all(&**self, sql, params).await
    }

    async fn execute(&self, sql: &str, params: &[Value]) -> ModelResult<u64> {
        GenericClient::execute(&**self, sql, params).await
    }

    async fn last_insert_id(&self) -> ModelResult<i64> {
        GenericClient::last_insert_id(&**self).await
    }
}

#[cfg(feature = "pool")]
impl GenericClient for deadpool_postgres::Client {
    async fn fetch_all(&self, sql: &str, params: &[Value]) -> ModelResult<Vec<Record>> {
        GenericClient::fetch_all(&**self, sql, params).await
    }

    async fn execute(&self, sql: &str, params: &[Value]) -> ModelResult<u64> {
        GenericClient::execute(&**self, sql, params).await
    }

    async fn last_insert_id(&self) -> ModelResult<i64> {
        GenericClient::last_insert_id(&**self).await
    }
}

#[cfg(feature = "pool")]
impl GenericClient for deadpool_postgres::Transaction<'_> {
    async fn fetch_all(&self, sql: &str, params: &[Value]) -> ModelResult<Vec<Record>> {
        GenericClient::fetch_all(&**self, sql, params).await
    }

    async fn execute(&self, sql: &str, params: &[Value]) -> ModelResult<u64> {
        GenericClient::execute(&**self, sql, params).await
    }

    async fn last_insert_id(&self) -> ModelResult<i64> {
        GenericClient::last_insert_id(&**self).await
    }
}
