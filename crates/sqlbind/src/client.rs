//! Generic client trait for unified database access.

use tokio_postgres::types::ToSql;
use tokio_postgres::Row;

use crate::error::{BindError, BindResult};

/// A connection-like handle queries can run against.
///
/// Implemented for both a root client and an open transaction, so repository
/// code can accept either and compose inside transactions. Cancellation and
/// timeouts belong to the caller's runtime; no retries happen here, and
/// driver errors propagate unchanged apart from SQLSTATE constraint mapping.
pub trait Queryable: Send + Sync {
    /// Execute a query and return all rows.
    fn query(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl std::future::Future<Output = BindResult<Vec<Row>>> + Send;

    /// Execute a query and return the first row, if any.
    fn query_opt(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl std::future::Future<Output = BindResult<Option<Row>>> + Send;

    /// Execute a query and return the **first** row.
    ///
    /// Semantics:
    /// - 0 rows: returns [`BindError::NotFound`]
    /// - 1 row: returns that row
    /// - multiple rows: returns the first row (does **not** error)
    fn query_one(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl std::future::Future<Output = BindResult<Row>> + Send {
        async move {
            let row = self.query_opt(sql, params).await?;
            row.ok_or_else(|| BindError::not_found("Expected one row, got none"))
        }
    }

    /// Execute a query and require that it returns **exactly one** row.
    ///
    /// Semantics:
    /// - 0 rows: returns [`BindError::NotFound`]
    /// - 1 row: returns that row
    /// - multiple rows: returns [`BindError::TooManyRows`]
    fn query_one_strict(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl std::future::Future<Output = BindResult<Row>> + Send {
        async move {
            let rows = self.query(sql, params).await?;
            match rows.len() {
                0 => Err(BindError::not_found("Expected 1 row, got 0")),
                1 => Ok(rows.into_iter().next().expect("len == 1")),
                got => Err(BindError::too_many_rows(1, got)),
            }
        }
    }

    /// Execute a statement and return the number of affected rows.
    fn execute(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl std::future::Future<Output = BindResult<u64>> + Send;
}

impl Queryable for tokio_postgres::Client {
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> BindResult<Vec<Row>> {
        tokio_postgres::Client::query(self, sql, params)
            .await
            .map_err(BindError::from_db_error)
    }

    async fn query_opt(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> BindResult<Option<Row>> {
        let rows = Queryable::query(self, sql, params).await?;
        Ok(rows.into_iter().next())
    }

    async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> BindResult<u64> {
        tokio_postgres::Client::execute(self, sql, params)
            .await
            .map_err(BindError::from_db_error)
    }
}

impl Queryable for tokio_postgres::Transaction<'_> {
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> BindResult<Vec<Row>> {
        tokio_postgres::Transaction::query(self, sql, params)
            .await
            .map_err(BindError::from_db_error)
    }

    async fn query_opt(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> BindResult<Option<Row>> {
        let rows = Queryable::query(self, sql, params).await?;
        Ok(rows.into_iter().next())
    }

    async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> BindResult<u64> {
        tokio_postgres::Transaction::execute(self, sql, params)
            .await
            .map_err(BindError::from_db_error)
    }
}

// ===== deadpool-postgres support =====

#[cfg(feature = "pool")]
impl Queryable for deadpool_postgres::Client {
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> BindResult<Vec<Row>> {
        // Delegate to the deref target (ClientWrapper).
        Queryable::query(&**self, sql, params).await
    }

    async fn query_opt(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> BindResult<Option<Row>> {
        Queryable::query_opt(&**self, sql, params).await
    }

    async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> BindResult<u64> {
        Queryable::execute(&**self, sql, params).await
    }
}

#[cfg(feature = "pool")]
impl Queryable for deadpool_postgres::ClientWrapper {
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> BindResult<Vec<Row>> {
        Queryable::query(&**self, sql, params).await
    }

    async fn query_opt(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> BindResult<Option<Row>> {
        Queryable::query_opt(&**self, sql, params).await
    }

    async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> BindResult<u64> {
        Queryable::execute(&**self, sql, params).await
    }
}

#[cfg(feature = "pool")]
impl Queryable for deadpool_postgres::Transaction<'_> {
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> BindResult<Vec<Row>> {
        Queryable::query(&**self, sql, params).await
    }

    async fn query_opt(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> BindResult<Option<Row>> {
        Queryable::query_opt(&**self, sql, params).await
    }

    async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> BindResult<u64> {
        Queryable::execute(&**self, sql, params).await
    }
}

// Reference implementation so wrappers can hold &C instead of owned clients.

impl<C: Queryable> Queryable for &C {
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> BindResult<Vec<Row>> {
        (*self).query(sql, params).await
    }

    async fn query_opt(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> BindResult<Option<Row>> {
        (*self).query_opt(sql, params).await
    }

    async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> BindResult<u64> {
        (*self).execute(sql, params).await
    }
}
