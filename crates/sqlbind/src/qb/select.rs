//! SELECT query builder.

use tokio_postgres::types::ToSql;

use crate::clause::Clause;
use crate::error::{BindError, BindResult};
use crate::param::ParamList;
use crate::placeholder::Placeholder;
use crate::qb::expr::{Expr, ExprGroup};
use crate::qb::traits::SqlQb;

/// SELECT query builder with expression-based WHERE.
#[derive(Clone, Debug)]
pub struct SelectQb {
    /// FROM expression (a table name, alias, or subquery text)
    from: String,
    /// Result columns; `*` when empty
    columns: Vec<String>,
    /// JOIN clauses, pre-rendered
    joins: Vec<String>,
    /// WHERE conditions
    where_group: ExprGroup,
    /// GROUP BY expressions
    group_by: Vec<String>,
    /// ORDER BY expressions
    order_by: Vec<String>,
    limit: Option<u64>,
    offset: Option<u64>,
    placeholder: Placeholder,
    /// Deferred construction error from an attached clause
    err: Option<BindError>,
}

impl SelectQb {
    /// Create a new SELECT query builder for the given table.
    pub fn new(table: &str) -> Self {
        Self::from(table)
    }

    /// Create a SELECT query builder with a custom FROM expression.
    pub fn from(from_expr: &str) -> Self {
        Self {
            from: from_expr.to_string(),
            columns: Vec::new(),
            joins: Vec::new(),
            where_group: ExprGroup::new(),
            group_by: Vec::new(),
            order_by: Vec::new(),
            limit: None,
            offset: None,
            placeholder: Placeholder::Dollar,
            err: None,
        }
    }

    /// Override the placeholder style (default `$n`).
    pub fn placeholder(mut self, placeholder: Placeholder) -> Self {
        self.placeholder = placeholder;
        self
    }

    /// Add result columns (replaces the default `*`).
    pub fn columns(mut self, columns: &[&str]) -> Self {
        self.columns.extend(columns.iter().map(|c| c.to_string()));
        self
    }

    /// Add a single result column expression.
    pub fn column(mut self, column: &str) -> Self {
        self.columns.push(column.to_string());
        self
    }

    /// Add an INNER JOIN clause.
    pub fn inner_join(mut self, table: &str, on: &str) -> Self {
        self.joins.push(format!("INNER JOIN {} ON {}", table, on));
        self
    }

    /// Add a LEFT JOIN clause.
    pub fn left_join(mut self, table: &str, on: &str) -> Self {
        self.joins.push(format!("LEFT JOIN {} ON {}", table, on));
        self
    }

    // ==================== WHERE conditions ====================

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

    /// Add WHERE: column LIKE pattern
    pub fn like<T: ToSql + Send + Sync + 'static>(mut self, column: &str, pattern: T) -> Self {
        self.where_group.like(column, pattern);
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
    ///
    /// A clause carrying a deferred error poisons the builder; the error
    /// surfaces on build or execution.
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

    // ==================== Ordering and paging ====================

    /// Add GROUP BY expressions.
    pub fn group_by(mut self, expr: &str) -> Self {
        self.group_by.push(expr.to_string());
        self
    }

    /// Add an ORDER BY expression (e.g. `"created_at DESC"`).
    pub fn order_by(mut self, expr: &str) -> Self {
        self.order_by.push(expr.to_string());
        self
    }

    /// Set a LIMIT clause.
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set an OFFSET clause.
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    fn with_err(mut self, err: BindError) -> Self {
        if self.err.is_none() {
            self.err = Some(err);
        }
        self
    }
}

impl SqlQb for SelectQb {
    fn build(&self) -> BindResult<(String, ParamList)> {
        if let Some(err) = &self.err {
            return Err(err.clone());
        }

        let mut params = ParamList::new();

        let columns = if self.columns.is_empty() {
            "*".to_string()
        } else {
            self.columns.join(", ")
        };
        let mut sql = format!("SELECT {} FROM {}", columns, self.from);

        for join in &self.joins {
            sql.push(' ');
            sql.push_str(join);
        }

        let where_sql = self.where_group.build_into(&mut params, self.placeholder);
        if !where_sql.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&where_sql);
        }

        if !self.group_by.is_empty() {
            sql.push_str(" GROUP BY ");
            sql.push_str(&self.group_by.join(", "));
        }

        if !self.order_by.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&self.order_by.join(", "));
        }

        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }

        if let Some(offset) = self.offset {
            sql.push_str(&format!(" OFFSET {}", offset));
        }

        Ok((sql, params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_star_default() {
        let qb = SelectQb::new("widgets");
        assert_eq!(qb.to_sql().unwrap(), "SELECT * FROM widgets");
    }

    #[test]
    fn select_with_columns_and_conditions() {
        let qb = SelectQb::new("widgets")
            .columns(&["widget_id", "status"])
            .eq("status", "great")
            .gt("size", 3i32)
            .order_by("widget_id")
            .limit(10);
        assert_eq!(
            qb.to_sql().unwrap(),
            "SELECT widget_id, status FROM widgets WHERE status = $1 AND size > $2 \
             ORDER BY widget_id LIMIT 10"
        );
    }

    #[test]
    fn select_question_placeholder() {
        let qb = SelectQb::new("widgets")
            .placeholder(Placeholder::Question)
            .eq("status", "great");
        assert_eq!(
            qb.to_sql().unwrap(),
            "SELECT * FROM widgets WHERE status = ?"
        );
    }

    #[test]
    fn select_with_join() {
        let qb = SelectQb::from("widgets w")
            .inner_join("owners o", "w.owner_id = o.owner_id")
            .eq("o.name", "alice");
        assert_eq!(
            qb.to_sql().unwrap(),
            "SELECT * FROM widgets w INNER JOIN owners o ON w.owner_id = o.owner_id \
             WHERE o.name = $1"
        );
    }
}
