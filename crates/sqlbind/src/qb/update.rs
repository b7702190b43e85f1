//! UPDATE query builder.

use tokio_postgres::types::ToSql;

use crate::bind::FieldValue;
use crate::clause::Clause;
use crate::client::Queryable;
use crate::error::{BindError, BindResult};
use crate::param::{Param, ParamList};
use crate::placeholder::Placeholder;
use crate::qb::expr::{Expr, ExprGroup};
use crate::qb::traits::{MutationQb, SqlQb};
use crate::set_map::SetMap;

/// SET field value type.
#[derive(Clone, Debug)]
enum SetField {
    /// Parameterized value
    Value(Param),
    /// Raw SQL expression
    Raw(String),
}

/// UPDATE query builder with expression-based WHERE.
#[derive(Clone, Debug)]
pub struct UpdateQb {
    table: String,
    set_fields: Vec<(String, SetField)>,
    where_group: ExprGroup,
    returning_cols: Vec<String>,
    placeholder: Placeholder,
    err: Option<BindError>,
}

impl UpdateQb {
    /// Create a new UPDATE query builder.
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            set_fields: Vec::new(),
            where_group: ExprGroup::new(),
            returning_cols: Vec::new(),
            placeholder: Placeholder::Dollar,
            err: None,
        }
    }

    /// Override the placeholder style (default `$n`).
    pub fn placeholder(mut self, placeholder: Placeholder) -> Self {
        self.placeholder = placeholder;
        self
    }

    /// Set a column value.
    pub fn set<T: ToSql + Send + Sync + 'static>(mut self, column: &str, value: T) -> Self {
        self.set_fields
            .push((column.to_string(), SetField::Value(Param::new(value))));
        self
    }

    /// Set an optional column value (None => skip).
    pub fn set_opt<T: ToSql + Send + Sync + 'static>(self, column: &str, value: Option<T>) -> Self {
        if let Some(v) = value {
            self.set(column, v)
        } else {
            self
        }
    }

    /// Set a JSON column.
    pub fn set_json<T: serde::Serialize>(self, column: &str, value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(json) => self.set(column, json),
            Err(e) => self.with_err(BindError::validation(format!(
                "set_json({column}): {e}"
            ))),
        }
    }

    /// Set a raw SQL expression.
    pub fn set_raw(mut self, column: &str, expr: &str) -> Self {
        self.set_fields
            .push((column.to_string(), SetField::Raw(expr.to_string())));
        self
    }

    /// Merge an update payload built with [`crate::to_set_map`].
    ///
    /// Accepts the conversion result directly so call sites chain without
    /// matching; an `Err` poisons the builder and surfaces on execution.
    /// Explicit-null entries bind a NULL parameter; list entries bind one
    /// array parameter.
    pub fn set_map(mut self, map: BindResult<SetMap>) -> Self {
        match map {
            Ok(map) => {
                for (column, value) in map {
                    match value {
                        FieldValue::One(param) | FieldValue::Null(param) => {
                            self.set_fields.push((column, SetField::Value(param)));
                        }
                        FieldValue::Many { array, .. } => {
                            self.set_fields.push((column, SetField::Value(array)));
                        }
                        FieldValue::Unset => {}
                    }
                }
                self
            }
            Err(e) => self.with_err(e),
        }
    }

    /// Whether any SET fields are pending.
    pub fn has_changes(&self) -> bool {
        !self.set_fields.is_empty()
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

    // ==================== RETURNING ====================

    /// Set RETURNING columns (string form).
    pub fn returning(mut self, cols: &str) -> Self {
        self.returning_cols = vec![cols.to_string()];
        self
    }

    // ==================== Execution ====================

    /// Execute, skipping the round-trip entirely when no SET fields are
    /// pending.
    ///
    /// An update whose payload came from an all-unset filter is a legitimate
    /// no-op: this returns `Ok(0)` without touching the connection, instead
    /// of the validation error a bare [`MutationQb::execute`] raises.
    pub async fn execute_if_changed(&self, conn: &impl Queryable) -> BindResult<u64> {
        if let Some(err) = &self.err {
            return Err(err.clone());
        }
        if !self.has_changes() {
            tracing::debug!(table = %self.table, "skipping update, no changes set");
            return Ok(0);
        }
        self.execute(conn).await
    }

    fn with_err(mut self, err: BindError) -> Self {
        if self.err.is_none() {
            self.err = Some(err);
        }
        self
    }
}

impl SqlQb for UpdateQb {
    fn build(&self) -> BindResult<(String, ParamList)> {
        if let Some(err) = &self.err {
            return Err(err.clone());
        }
        if self.set_fields.is_empty() {
            return Err(BindError::validation("UpdateQb: SET clause cannot be empty"));
        }

        let mut params = ParamList::new();
        let mut set_parts = Vec::new();
        for (col, field) in &self.set_fields {
            match field {
                SetField::Value(param) => {
                    let idx = params.push_param(param.clone());
                    set_parts.push(format!("{} = {}", col, self.placeholder.format(idx)));
                }
                SetField::Raw(expr) => {
                    set_parts.push(format!("{} = {}", col, expr));
                }
            }
        }

        let mut sql = format!("UPDATE {} SET {}", self.table, set_parts.join(", "));

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

impl MutationQb for UpdateQb {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_basic() {
        let qb = UpdateQb::new("widgets").set("status", "fine").eq("widget_id", "w-1");
        assert_eq!(
            qb.to_sql().unwrap(),
            "UPDATE widgets SET status = $1 WHERE widget_id = $2"
        );
    }

    #[test]
    fn update_multiple_set_numbering_continues_into_where() {
        let qb = UpdateQb::new("widgets")
            .set("status", "fine")
            .set("enabled", false)
            .eq("widget_id", "w-1");
        assert_eq!(
            qb.to_sql().unwrap(),
            "UPDATE widgets SET status = $1, enabled = $2 WHERE widget_id = $3"
        );
    }

    #[test]
    fn update_with_raw() {
        let qb = UpdateQb::new("widgets")
            .set_raw("updated_at", "NOW()")
            .eq("widget_id", "w-1");
        assert_eq!(
            qb.to_sql().unwrap(),
            "UPDATE widgets SET updated_at = NOW() WHERE widget_id = $1"
        );
    }

    #[test]
    fn update_with_returning() {
        let qb = UpdateQb::new("widgets")
            .set("status", "fine")
            .eq("widget_id", "w-1")
            .returning("*");
        assert_eq!(
            qb.to_sql().unwrap(),
            "UPDATE widgets SET status = $1 WHERE widget_id = $2 RETURNING *"
        );
    }

    #[test]
    fn update_empty_set_is_an_error() {
        let err = UpdateQb::new("widgets").eq("widget_id", "w-1").to_sql().unwrap_err();
        assert!(matches!(err, BindError::Validation(_)));
    }
}
