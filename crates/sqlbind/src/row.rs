//! Row mapping traits and utilities

use tokio_postgres::Row;

use crate::error::BindResult;

/// Map a database row into a struct.
///
/// Usually derived with `#[derive(FromRow)]`; fields map to the column of
/// the same name unless renamed with `#[bind(column = "...")]`.
pub trait FromRow: Sized {
    fn from_row(row: &Row) -> BindResult<Self>;
}

/// Row access helpers.
pub trait RowExt {
    /// Try to get a column value, returning [`crate::BindError::Decode`] on
    /// failure.
    fn try_get_column<T>(&self, column: &str) -> BindResult<T>
    where
        T: for<'a> tokio_postgres::types::FromSql<'a>;
}

impl RowExt for Row {
    fn try_get_column<T>(&self, column: &str) -> BindResult<T>
    where
        T: for<'a> tokio_postgres::types::FromSql<'a>,
    {
        self.try_get(column)
            .map_err(|e| crate::error::BindError::decode(column, e.to_string()))
    }
}
