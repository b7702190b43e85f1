//! Equality clauses built from filter structs.
//!
//! [`to_clause`] turns a filter struct into a WHERE predicate: each set field
//! becomes `column = <ph>` (or `IN (...)` for lists, `IS NULL` for explicit
//! nulls), ANDed in declaration order. Construction never fails eagerly; a
//! failed conversion is stored inside the [`Clause`] and surfaces when the
//! clause is rendered or attached to a builder, so call chains stay free of
//! error plumbing until the point of execution.

use crate::bind::{candidates, BindingSource, FieldValue};
use crate::error::{BindError, BindResult};
use crate::param::ParamList;
use crate::placeholder::Placeholder;
use crate::qb::Expr;

/// A renderable WHERE predicate, possibly carrying a deferred construction
/// error.
#[derive(Clone, Debug)]
pub struct Clause {
    entries: BindResult<Vec<(String, FieldValue)>>,
}

/// Convert a filter struct into an equality clause over its set fields.
///
/// - a `None` source yields an empty, valid clause (no constraint)
/// - a struct with zero bindable columns (after exclusion) yields a deferred
///   [`BindError::NoColumns`]: filtering on such a struct is a programming
///   error worth surfacing, unlike an empty update payload
/// - a struct whose columns are all unset yields an empty, valid clause
pub fn to_clause<S: BindingSource>(source: S, excluded: &[&str]) -> Clause {
    let Some(bindings) = source.collect_bindings() else {
        return Clause::empty();
    };

    let entries = candidates(bindings, excluded, false).and_then(|candidates| {
        if candidates.is_empty() {
            return Err(BindError::NoColumns);
        }
        Ok(candidates
            .into_iter()
            .filter(|b| b.value.is_set())
            .map(|b| (b.column.to_string(), b.value))
            .collect())
    });

    Clause { entries }
}

/// Like [`to_clause`], with every column prefixed by `table.`.
pub fn to_clause_aliased<S: BindingSource>(table: &str, source: S, excluded: &[&str]) -> Clause {
    to_clause(source, excluded).aliased(table)
}

impl Clause {
    /// An empty, valid clause that contributes no constraint.
    pub fn empty() -> Self {
        Clause {
            entries: Ok(Vec::new()),
        }
    }

    /// The deferred construction error, if any.
    pub fn error(&self) -> Option<&BindError> {
        self.entries.as_ref().err()
    }

    /// Whether the clause is valid and contributes no constraint.
    pub fn is_empty(&self) -> bool {
        matches!(&self.entries, Ok(entries) if entries.is_empty())
    }

    /// Prefix every column with `table.`, short-circuiting if construction
    /// already failed.
    pub fn aliased(self, table: &str) -> Clause {
        Clause {
            entries: self.entries.map(|entries| {
                entries
                    .into_iter()
                    .map(|(col, value)| (format!("{table}.{col}"), value))
                    .collect()
            }),
        }
    }

    /// Convert into expression nodes for a builder's WHERE group, or the
    /// deferred error.
    pub(crate) fn into_exprs(self) -> BindResult<Vec<Expr>> {
        let entries = self.entries?;
        Ok(entries
            .into_iter()
            .map(|(column, value)| match value {
                FieldValue::One(param) => Expr::Compare {
                    column,
                    op: "=",
                    value: param,
                },
                FieldValue::Null(_) => Expr::NullCheck {
                    column,
                    is_null: true,
                },
                FieldValue::Many { items, .. } => Expr::in_params(column, items),
                // Unset fields were filtered out during construction.
                FieldValue::Unset => Expr::True,
            })
            .collect())
    }

    /// Render the predicate into an existing parameter list, continuing its
    /// numbering, or return the deferred error.
    ///
    /// An empty clause renders to an empty string.
    pub fn render(&self, params: &mut ParamList, placeholder: Placeholder) -> BindResult<String> {
        let exprs = self.clone().into_exprs()?;
        Ok(Expr::And(exprs).build(params, placeholder))
    }

    /// Render with `?` placeholders and a fresh parameter list.
    pub fn to_sql(&self) -> BindResult<(String, ParamList)> {
        self.to_sql_with(Placeholder::Question)
    }

    /// Render with the given placeholder style and a fresh parameter list.
    pub fn to_sql_with(&self, placeholder: Placeholder) -> BindResult<(String, ParamList)> {
        let mut params = ParamList::new();
        let sql = self.render(&mut params, placeholder)?;
        Ok((sql, params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bind::{Bindings, FieldBinding, FieldValue};

    struct WidgetGetFilter {
        str_col: Option<String>,
        int_col: Option<Vec<i32>>,
    }

    impl Bindings for WidgetGetFilter {
        fn bindings(&self) -> Vec<FieldBinding> {
            vec![
                FieldBinding::new("str_col", FieldValue::from_option(&self.str_col)),
                FieldBinding::new("int_col", FieldValue::from_option_list(&self.int_col)),
            ]
        }
    }

    struct NoColumnsFilter;

    impl Bindings for NoColumnsFilter {
        fn bindings(&self) -> Vec<FieldBinding> {
            Vec::new()
        }
    }

    struct DuplicateFilter;

    impl Bindings for DuplicateFilter {
        fn bindings(&self) -> Vec<FieldBinding> {
            vec![
                FieldBinding::new("same_col", FieldValue::one("value1")),
                FieldBinding::new("same_col", FieldValue::one("value2")),
            ]
        }
    }

    #[test]
    fn renders_eq_and_in() {
        let filter = WidgetGetFilter {
            str_col: Some("example".to_string()),
            int_col: Some(vec![1, 2]),
        };
        let (sql, params) = to_clause(&filter, &[]).to_sql().unwrap();
        assert_eq!(sql, "str_col = ? AND int_col IN (?,?)");
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn renders_dollar_style() {
        let filter = WidgetGetFilter {
            str_col: Some("example".to_string()),
            int_col: Some(vec![1, 2]),
        };
        let (sql, _) = to_clause(&filter, &[])
            .to_sql_with(Placeholder::Dollar)
            .unwrap();
        assert_eq!(sql, "str_col = $1 AND int_col IN ($2,$3)");
    }

    #[test]
    fn skips_unset_fields() {
        let filter = WidgetGetFilter {
            str_col: Some("still a str".to_string()),
            int_col: None,
        };
        let (sql, params) = to_clause(&filter, &[]).to_sql().unwrap();
        assert_eq!(sql, "str_col = ?");
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn none_source_is_empty_and_valid() {
        let clause = to_clause(None::<&WidgetGetFilter>, &[]);
        assert!(clause.is_empty());
        let (sql, params) = clause.to_sql().unwrap();
        assert_eq!(sql, "");
        assert!(params.is_empty());
    }

    #[test]
    fn all_unset_is_empty_and_valid() {
        let filter = WidgetGetFilter {
            str_col: None,
            int_col: None,
        };
        let clause = to_clause(&filter, &[]);
        assert!(clause.is_empty());
        assert!(clause.error().is_none());
    }

    #[test]
    fn zero_columns_defers_no_columns_error() {
        let clause = to_clause(&NoColumnsFilter, &[]);
        assert!(clause.error().is_some_and(BindError::is_no_columns));
        assert!(clause.to_sql().unwrap_err().is_no_columns());
    }

    #[test]
    fn excluding_every_column_defers_no_columns_error() {
        let filter = WidgetGetFilter {
            str_col: Some("s".to_string()),
            int_col: None,
        };
        let clause = to_clause(&filter, &["str_col", "int_col"]);
        assert!(clause.to_sql().unwrap_err().is_no_columns());
    }

    #[test]
    fn duplicate_columns_defer_error() {
        let clause = to_clause(&DuplicateFilter, &[]);
        assert!(clause.to_sql().unwrap_err().is_duplicate_column());
    }

    #[test]
    fn null_value_renders_is_null() {
        struct OwnerFilter {
            owner_id: crate::Nullable<String>,
        }
        impl Bindings for OwnerFilter {
            fn bindings(&self) -> Vec<FieldBinding> {
                vec![FieldBinding::new(
                    "owner_id",
                    FieldValue::from_nullable(&self.owner_id),
                )]
            }
        }

        let filter = OwnerFilter {
            owner_id: crate::Nullable::null(),
        };
        let (sql, params) = to_clause(&filter, &[]).to_sql().unwrap();
        assert_eq!(sql, "owner_id IS NULL");
        assert!(params.is_empty());
    }

    #[test]
    fn aliased_prefixes_columns() {
        let filter = WidgetGetFilter {
            str_col: Some("s".to_string()),
            int_col: Some(vec![100]),
        };
        let (sql, _) = to_clause_aliased("widgets", &filter, &[]).to_sql().unwrap();
        assert_eq!(sql, "widgets.str_col = ? AND widgets.int_col IN (?)");
    }

    #[test]
    fn empty_list_renders_always_false() {
        let filter = WidgetGetFilter {
            str_col: None,
            int_col: Some(vec![]),
        };
        let (sql, params) = to_clause(&filter, &[]).to_sql().unwrap();
        assert_eq!(sql, "1=0");
        assert!(params.is_empty());
    }
}
