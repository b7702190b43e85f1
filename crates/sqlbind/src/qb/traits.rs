//! Trait definitions for query builders.

use tokio_postgres::Row;

use crate::client::Queryable;
use crate::error::{BindError, BindResult};
use crate::param::ParamList;
use crate::row::FromRow;

/// Base trait for all query builders.
///
/// A builder renders to SQL text plus an ordered parameter list; a deferred
/// construction error (from an attached clause or set map) surfaces here
/// instead of at the call that attached it.
pub trait SqlQb: Sync {
    /// Build the SQL string and parameters, or the deferred error.
    fn build(&self) -> BindResult<(String, ParamList)>;

    /// Build just the SQL string. Useful for logging and tests.
    fn to_sql(&self) -> BindResult<String> {
        Ok(self.build()?.0)
    }

    /// Log the rendered SQL at debug level and pass the builder through.
    fn debug(self) -> Self
    where
        Self: Sized,
    {
        match self.build() {
            Ok((sql, params)) => tracing::debug!(sql = %sql, params = params.len(), "sqlbind"),
            Err(error) => tracing::debug!(error = %error, "sqlbind: deferred build error"),
        }
        self
    }

    /// Execute and return all rows.
    fn query(
        &self,
        conn: &impl Queryable,
    ) -> impl std::future::Future<Output = BindResult<Vec<Row>>> + Send {
        async move {
            let (sql, params) = self.build()?;
            conn.query(&sql, &params.as_refs()).await
        }
    }

    /// Execute and return the first row, if any.
    fn query_opt(
        &self,
        conn: &impl Queryable,
    ) -> impl std::future::Future<Output = BindResult<Option<Row>>> + Send {
        async move {
            let (sql, params) = self.build()?;
            conn.query_opt(&sql, &params.as_refs()).await
        }
    }

    /// Execute and map all rows to `T`.
    fn fetch_all<T: FromRow>(
        &self,
        conn: &impl Queryable,
    ) -> impl std::future::Future<Output = BindResult<Vec<T>>> + Send {
        async move {
            let rows = self.query(conn).await?;
            rows.iter().map(T::from_row).collect()
        }
    }

    /// Execute and map the first row to `T`, if any.
    fn fetch_opt<T: FromRow>(
        &self,
        conn: &impl Queryable,
    ) -> impl std::future::Future<Output = BindResult<Option<T>>> + Send {
        async move {
            let row = self.query_opt(conn).await?;
            row.as_ref().map(T::from_row).transpose()
        }
    }

    /// Execute and map a single row to `T`, non-strict.
    ///
    /// Zero rows is [`BindError::NotFound`]. More than one row logs a
    /// warning and returns the first; use [`SqlQb::fetch_one_strict`] to
    /// turn that into an error instead.
    fn fetch_one<T: FromRow>(
        &self,
        conn: &impl Queryable,
    ) -> impl std::future::Future<Output = BindResult<T>> + Send {
        async move {
            let rows = self.query(conn).await?;
            if rows.is_empty() {
                return Err(BindError::not_found("Expected one row, got none"));
            }
            if rows.len() > 1 {
                tracing::warn!(
                    rows = rows.len(),
                    "fetch_one matched multiple rows, returning the first"
                );
            }
            T::from_row(&rows[0])
        }
    }

    /// Execute and map exactly one row to `T`.
    ///
    /// Zero rows is [`BindError::NotFound`]; more than one row is
    /// [`BindError::TooManyRows`].
    fn fetch_one_strict<T: FromRow>(
        &self,
        conn: &impl Queryable,
    ) -> impl std::future::Future<Output = BindResult<T>> + Send {
        async move {
            let rows = self.query(conn).await?;
            match rows.len() {
                0 => Err(BindError::not_found("Expected 1 row, got 0")),
                1 => T::from_row(&rows[0]),
                got => Err(BindError::too_many_rows(1, got)),
            }
        }
    }
}

/// Trait for mutation builders (INSERT/UPDATE/DELETE).
pub trait MutationQb: SqlQb {
    /// Execute and return the affected row count.
    fn execute(
        &self,
        conn: &impl Queryable,
    ) -> impl std::future::Future<Output = BindResult<u64>> + Send {
        async move {
            let (sql, params) = self.build()?;
            conn.execute(&sql, &params.as_refs()).await
        }
    }
}
