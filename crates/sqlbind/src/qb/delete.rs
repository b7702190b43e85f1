//! DELETE query builder.

use tokio_postgres::types::ToSql;

use crate::clause::Clause;
use crate::error::{BindError, BindResult};
use crate::param::ParamList;
use crate::placeholder::Placeholder;
use crate::qb::expr::{Expr, ExprGroup};
use crate::qb::traits::{MutationQb, SqlQb};

/// DELETE query builder with expression-based WHERE.
#[derive(Clone, Debug)]
pub struct DeleteQb {
    table: String,
    where_group: ExprGroup,
    returning_cols: Vec<String>,
    /// Whether to allow DELETE without WHERE
    allow_delete_all: bool,
    placeholder: Placeholder,
    err: Option<BindError>,
}

impl DeleteQb {
    /// Create a new DELETE query builder.
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            where_group: ExprGroup::new(),
            returning_cols: Vec::new(),
            allow_delete_all: false,
            placeholder: Placeholder::Dollar,
            err: None,
        }
    }

    /// Override the placeholder style (default `$n`).
    pub fn placeholder(mut self, placeholder: Placeholder) -> Self {
        self.placeholder = placeholder;
        self
    }

    /// Allow DELETE without WHERE conditions.
    ///
    /// By default, DELETE without WHERE renders `WHERE 1=0` (no-op).
    pub fn allow_delete_all(mut self, allow: bool) -> Self {
        self.allow_delete_all = allow;
        self
    }

    /// Add WHERE: column = value
    pub fn eq<T: ToSql + Send + Sync + 'static>(mut self, column: &str, value: T) -> Self {
        self.where_group.eq(column, value);
        self
    }

    /// Add WHERE: column != value
    pub fn ne<T: ToSql + Send + Sync + 'static>(mut self, column: &str, value: T) -> Self {
        self.where_group.ne(column, value);
        self
    }

    /// Add WHERE: column > value
    pub fn gt<T: ToSql + Send + Sync + 'static>(mut self, column: &str, value: T) -> Self {
        self.where_group.gt(column, value);
        self
    }

    /// Add WHERE: column >= value
    pub fn gte<T: ToSql + Send + Sync + 'static>(mut self, column: &str, value: T) -> Self {
        self.where_group.gte(column, value);
        self
    }

    /// Add WHERE: column < value
    pub fn lt<T: ToSql + Send + Sync + 'static>(mut self, column: &str, value: T) -> Self {
        self.where_group.lt(column, value);
        self
    }

    /// Add WHERE: column <= value
    pub fn lte<T: ToSql + Send + Sync + 'static>(mut self, column: &str, value: T) -> Self {
        self.where_group.lte(column, value);
        self
    }

    /// Add WHERE: column IN (values...)
    pub fn in_list<T: ToSql + Send + Sync + 'static>(mut self, column: &str, values: Vec<T>) -> Self {
        self.where_group.in_list(column, values);
        self
    }

    /// Add WHERE: column IS NULL
    pub fn is_null(mut self, column: &str) -> Self {
        self.where_group.is_null(column);
        self
    }

    /// Add WHERE: column IS NOT NULL
    pub fn is_not_null(mut self, column: &str) -> Self {
        self.where_group.is_not_null(column);
        self
    }

    /// Add a raw WHERE condition.
    pub fn raw(mut self, sql: &str) -> Self {
        self.where_group.raw(sql);
        self
    }

    /// Add a custom expression.
    pub fn and_expr(mut self, expr: Expr) -> Self {
        self.where_group.and_expr(expr);
        self
    }

    /// Attach a struct-derived filter clause.
    pub fn filter(mut self, clause: Clause) -> Self {
        match clause.into_exprs() {
            Ok(exprs) => {
                for expr in exprs {
                    self.where_group.and_expr(expr);
                }
                self
            }
            Err(e) => self.with_err(e),
        }
    }

    /// Set RETURNING columns (string form).
    pub fn returning(mut self, cols: &str) -> Self {
        self.returning_cols = vec![cols.to_string()];
        self
    }

    fn with_err(mut self, err: BindError) -> Self {
        if self.err.is_none() {
            self.err = Some(err);
        }
        self
    }
}

impl SqlQb for DeleteQb {
    fn build(&self) -> BindResult<(String, ParamList)> {
        if let Some(err) = &self.err {
            return Err(err.clone());
        }

        let mut params = ParamList::new();

        // Safety check: no WHERE and not allowed to delete all
        if self.where_group.is_empty() && !self.allow_delete_all {
            return Ok((format!("DELETE FROM {} WHERE 1=0", self.table), params));
        }

        let mut sql = format!("DELETE FROM {}", self.table);

        let where_sql = self.where_group.build_into(&mut params, self.placeholder);
        if !where_sql.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&where_sql);
        }

        if !self.returning_cols.is_empty() {
            sql.push_str(" RETURNING ");
            sql.push_str(&self.returning_cols.join(", "));
        }

        Ok((sql, params))
    }
}

impl MutationQb for DeleteQb {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delete_basic() {
        let qb = DeleteQb::new("widgets").eq("widget_id", "w-1");
        assert_eq!(
            qb.to_sql().unwrap(),
            "DELETE FROM widgets WHERE widget_id = $1"
        );
    }

    #[test]
    fn delete_without_where_is_noop() {
        let qb = DeleteQb::new("widgets");
        assert_eq!(qb.to_sql().unwrap(), "DELETE FROM widgets WHERE 1=0");
    }

    #[test]
    fn delete_all_when_allowed() {
        let qb = DeleteQb::new("widgets").allow_delete_all(true);
        assert_eq!(qb.to_sql().unwrap(), "DELETE FROM widgets");
    }
}
