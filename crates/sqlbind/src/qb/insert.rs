//! INSERT query builder.

use tokio_postgres::types::ToSql;

use crate::bind::{candidates, Bindings, FieldValue};
use crate::error::{BindError, BindResult};
use crate::param::{Param, ParamList};
use crate::placeholder::Placeholder;
use crate::qb::traits::{MutationQb, SqlQb};
use crate::set_map::SetMap;

/// Value expression for one INSERT cell.
#[derive(Clone, Debug)]
enum ValueExpr {
    /// Parameterized value
    Param(Param),
    /// Raw SQL expression without parameter
    Raw(String),
    /// The column's DEFAULT (used for unset fields in multi-row inserts)
    Default,
}

impl ValueExpr {
    fn render(&self, params: &mut ParamList, placeholder: Placeholder) -> String {
        match self {
            ValueExpr::Param(param) => {
                let idx = params.push_param(param.clone());
                placeholder.format(idx)
            }
            ValueExpr::Raw(expr) => expr.clone(),
            ValueExpr::Default => "DEFAULT".to_string(),
        }
    }
}

fn set_value_expr(value: FieldValue) -> ValueExpr {
    match value {
        FieldValue::One(param) | FieldValue::Null(param) => ValueExpr::Param(param),
        FieldValue::Many { array, .. } => ValueExpr::Param(array),
        FieldValue::Unset => ValueExpr::Default,
    }
}

/// INSERT query builder.
///
/// Supports a single-row form fed by `set*` calls or a [`SetMap`], and a
/// multi-row form fed by [`InsertQb::rows`].
#[derive(Clone, Debug)]
pub struct InsertQb {
    table: String,
    columns: Vec<String>,
    /// One inner vec per VALUES row, aligned with `columns`
    value_rows: Vec<Vec<ValueExpr>>,
    returning_cols: Vec<String>,
    placeholder: Placeholder,
    err: Option<BindError>,
}

impl InsertQb {
    /// Create a new INSERT query builder.
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            columns: Vec::new(),
            value_rows: Vec::new(),
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

    /// Set a column value on the single implicit row.
    pub fn set<T: ToSql + Send + Sync + 'static>(self, column: &str, value: T) -> Self {
        self.push_cell(column, ValueExpr::Param(Param::new(value)))
    }

    /// Set an optional column value (None => skip the column).
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

    /// Set a raw SQL expression (no params).
    pub fn set_raw(self, column: &str, expr: &str) -> Self {
        self.push_cell(column, ValueExpr::Raw(expr.to_string()))
    }

    /// Merge an insert payload built with [`crate::to_insert_map`].
    ///
    /// Accepts the conversion result directly so call sites chain without
    /// matching; an `Err` poisons the builder and surfaces on execution.
    pub fn set_map(mut self, map: BindResult<SetMap>) -> Self {
        match map {
            Ok(map) => {
                for (column, value) in map {
                    self = self.push_cell(&column, set_value_expr(value));
                }
                self
            }
            Err(e) => self.with_err(e),
        }
    }

    /// Add one VALUES row per item.
    ///
    /// Columns come from the item type's bindings minus `excluded` and any
    /// `exclude_on_insert` fields. Unset fields emit `DEFAULT` so the
    /// column's default (or NULL) applies. An empty slice leaves the builder
    /// unchanged.
    pub fn rows<T: Bindings>(mut self, items: &[T], excluded: &[&str]) -> Self {
        let Some(first) = items.first() else {
            return self;
        };

        let columns = match candidates(first.bindings(), excluded, true) {
            Ok(cols) => cols,
            Err(e) => return self.with_err(e),
        };
        if !self.columns.is_empty() {
            return self.with_err(BindError::validation(
                "InsertQb: rows cannot be combined with set calls",
            ));
        }
        self.columns = columns.iter().map(|b| b.column.to_string()).collect();

        for item in items {
            let row = match candidates(item.bindings(), excluded, true) {
                Ok(bindings) => bindings
                    .into_iter()
                    .map(|b| set_value_expr(b.value))
                    .collect(),
                Err(e) => return self.with_err(e),
            };
            self.value_rows.push(row);
        }
        self
    }

    /// Set RETURNING columns (string form).
    pub fn returning(mut self, cols: &str) -> Self {
        self.returning_cols = vec![cols.to_string()];
        self
    }

    fn push_cell(mut self, column: &str, value: ValueExpr) -> Self {
        if self.value_rows.len() > 1 {
            return self.with_err(BindError::validation(
                "InsertQb: set cannot be combined with rows",
            ));
        }
        if self.value_rows.is_empty() {
            self.value_rows.push(Vec::new());
        }
        self.columns.push(column.to_string());
        self.value_rows[0].push(value);
        self
    }

    fn with_err(mut self, err: BindError) -> Self {
        if self.err.is_none() {
            self.err = Some(err);
        }
        self
    }
}

impl SqlQb for InsertQb {
    fn build(&self) -> BindResult<(String, ParamList)> {
        if let Some(err) = &self.err {
            return Err(err.clone());
        }
        if self.columns.is_empty() || self.value_rows.is_empty() {
            return Err(BindError::validation("InsertQb: no values to insert"));
        }

        let mut params = ParamList::new();
        let rendered_rows: Vec<String> = self
            .value_rows
            .iter()
            .map(|row| {
                let cells: Vec<String> = row
                    .iter()
                    .map(|cell| cell.render(&mut params, self.placeholder))
                    .collect();
                format!("({})", cells.join(", "))
            })
            .collect();

        let mut sql = format!(
            "INSERT INTO {} ({}) VALUES {}",
            self.table,
            self.columns.join(", "),
            rendered_rows.join(", ")
        );

        if !self.returning_cols.is_empty() {
            sql.push_str(" RETURNING ");
            sql.push_str(&self.returning_cols.join(", "));
        }

        Ok((sql, params))
    }
}

impl MutationQb for InsertQb {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bind::FieldBinding;

    #[test]
    fn insert_basic() {
        let qb = InsertQb::new("widgets")
            .set("widget_id", "w-1")
            .set("status", "great");
        assert_eq!(
            qb.to_sql().unwrap(),
            "INSERT INTO widgets (widget_id, status) VALUES ($1, $2)"
        );
    }

    #[test]
    fn insert_with_raw_and_returning() {
        let qb = InsertQb::new("widgets")
            .set("widget_id", "w-1")
            .set_raw("created_at", "NOW()")
            .returning("widget_id");
        assert_eq!(
            qb.to_sql().unwrap(),
            "INSERT INTO widgets (widget_id, created_at) VALUES ($1, NOW()) RETURNING widget_id"
        );
    }

    #[test]
    fn insert_empty_is_an_error() {
        let err = InsertQb::new("widgets").to_sql().unwrap_err();
        assert!(matches!(err, BindError::Validation(_)));
    }

    struct NewWidget {
        id: String,
        status: Option<String>,
    }

    impl Bindings for NewWidget {
        fn bindings(&self) -> Vec<FieldBinding> {
            vec![
                FieldBinding::new("widget_id", FieldValue::one(self.id.clone())),
                FieldBinding::new("status", FieldValue::from_option(&self.status)),
            ]
        }
    }

    #[test]
    fn insert_rows_uses_default_for_unset() {
        let items = vec![
            NewWidget {
                id: "w-1".to_string(),
                status: Some("great".to_string()),
            },
            NewWidget {
                id: "w-2".to_string(),
                status: None,
            },
        ];
        let qb = InsertQb::new("widgets").rows(&items, &[]);
        assert_eq!(
            qb.to_sql().unwrap(),
            "INSERT INTO widgets (widget_id, status) VALUES ($1, $2), ($3, DEFAULT)"
        );
    }

    #[test]
    fn insert_rows_empty_slice_leaves_builder_empty() {
        let qb = InsertQb::new("widgets").rows(&Vec::<NewWidget>::new(), &[]);
        assert!(matches!(qb.to_sql().unwrap_err(), BindError::Validation(_)));
    }
}
