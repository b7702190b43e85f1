//! Column binding model.
//!
//! A filter or payload struct describes itself as an ordered list of
//! [`FieldBinding`]s, one per participating field, via the [`Bindings`]
//! trait. `#[derive(Bindings)]` generates the implementation from field
//! attributes; the trait is public so row shapes can also implement it by
//! hand.
//!
//! Each binding carries a [`FieldValue`], which makes the set/unset/null
//! distinction structural:
//!
//! - `Option<T>` fields bind `Unset` or `One`
//! - `Nullable<T>` and `Option<Option<T>>` fields additionally bind `Null`,
//!   so "explicitly set to SQL NULL" is a set state, not an absent one
//! - list fields bind `Many`, which expands to `IN (...)` in clauses and to
//!   a single array parameter in set maps

use std::collections::HashSet;

use tokio_postgres::types::ToSql;

use crate::error::{BindError, BindResult};
use crate::nullable::Nullable;
use crate::param::Param;

/// One column binding extracted from a struct field.
#[derive(Clone, Debug)]
pub struct FieldBinding {
    /// Column name the field maps to.
    pub column: &'static str,
    /// Extracted value state.
    pub value: FieldValue,
    /// Whether the field is dropped from insert payloads.
    pub exclude_on_insert: bool,
}

impl FieldBinding {
    /// Create a binding that participates in every payload kind.
    pub fn new(column: &'static str, value: FieldValue) -> Self {
        Self {
            column,
            value,
            exclude_on_insert: false,
        }
    }

    /// Mark the binding as excluded from insert payloads.
    pub fn exclude_on_insert(mut self) -> Self {
        self.exclude_on_insert = true;
        self
    }
}

/// The value state of one field binding.
#[derive(Clone, Debug)]
pub enum FieldValue {
    /// The field does not participate.
    Unset,
    /// The field participates and binds SQL NULL. Carries a typed NULL
    /// parameter so set maps can still bind the column.
    Null(Param),
    /// The field participates with a single value.
    One(Param),
    /// The field participates with a list of values. `items` drive `IN`
    /// expansion in clauses; `array` binds the whole list as one array
    /// parameter in set maps.
    Many { items: Vec<Param>, array: Param },
}

impl FieldValue {
    /// Bind a single value.
    pub fn one<T: ToSql + Send + Sync + 'static>(value: T) -> Self {
        FieldValue::One(Param::new(value))
    }

    /// Bind an explicit SQL NULL typed as `T`.
    pub fn null<T: ToSql + Send + Sync + 'static>() -> Self {
        FieldValue::Null(Param::new(None::<T>))
    }

    /// Bind a list of values.
    pub fn many<T: ToSql + Send + Sync + Clone + 'static>(values: Vec<T>) -> Self {
        let items = values.iter().cloned().map(Param::new).collect();
        FieldValue::Many {
            items,
            array: Param::new(values),
        }
    }

    /// Extract from an optional scalar field: `None` is unset.
    pub fn from_option<T: ToSql + Send + Sync + Clone + 'static>(value: &Option<T>) -> Self {
        match value {
            Some(v) => FieldValue::one(v.clone()),
            None => FieldValue::Unset,
        }
    }

    /// Extract from an optional list field: `None` is unset.
    pub fn from_option_list<T: ToSql + Send + Sync + Clone + 'static>(
        value: &Option<Vec<T>>,
    ) -> Self {
        match value {
            Some(v) => FieldValue::many(v.clone()),
            None => FieldValue::Unset,
        }
    }

    /// Extract from a nested-option field. The outer level decides
    /// participation, the inner level decides nullness: `Some(None)` binds
    /// SQL NULL and counts as set.
    pub fn from_nested_option<T: ToSql + Send + Sync + Clone + 'static>(
        value: &Option<Option<T>>,
    ) -> Self {
        match value {
            None => FieldValue::Unset,
            Some(None) => FieldValue::null::<T>(),
            Some(Some(v)) => FieldValue::one(v.clone()),
        }
    }

    /// Extract from a [`Nullable`] tri-state field.
    pub fn from_nullable<T: ToSql + Send + Sync + Clone + 'static>(value: &Nullable<T>) -> Self {
        match value {
            Nullable::Absent => FieldValue::Unset,
            Nullable::Null => FieldValue::null::<T>(),
            Nullable::Value(v) => FieldValue::one(v.clone()),
        }
    }

    /// Whether the field participates in the payload. Explicit NULL counts
    /// as set.
    pub fn is_set(&self) -> bool {
        !matches!(self, FieldValue::Unset)
    }
}

/// A struct that can describe its column bindings.
///
/// Bindings are returned in field declaration order; column names must be
/// unique within one struct. Derive with `#[derive(Bindings)]`, or implement
/// by hand for shapes the derive cannot express.
pub trait Bindings {
    /// The ordered column bindings of this value.
    fn bindings(&self) -> Vec<FieldBinding>;
}

/// Adapter over the two input shapes the builder entry points accept: a
/// struct reference, or an optional struct reference where `None` means
/// "no filter at all".
pub trait BindingSource {
    /// Collect the bindings, or `None` when no struct was supplied.
    fn collect_bindings(&self) -> Option<Vec<FieldBinding>>;
}

impl<T: Bindings + ?Sized> BindingSource for &T {
    fn collect_bindings(&self) -> Option<Vec<FieldBinding>> {
        Some((*self).bindings())
    }
}

impl<T: Bindings> BindingSource for Option<&T> {
    fn collect_bindings(&self) -> Option<Vec<FieldBinding>> {
        self.map(Bindings::bindings)
    }
}

/// Validate a binding list and drop excluded columns.
///
/// Fails on duplicate column names (checked before exclusion, so a
/// misdeclared struct errors even when the offending column is excluded).
/// When `for_insert` is true, fields flagged `exclude_on_insert` are dropped
/// along with the caller-supplied exclusions.
pub(crate) fn candidates(
    bindings: Vec<FieldBinding>,
    excluded: &[&str],
    for_insert: bool,
) -> BindResult<Vec<FieldBinding>> {
    let mut seen = HashSet::new();
    for binding in &bindings {
        if !seen.insert(binding.column) {
            return Err(BindError::DuplicateColumn(binding.column.to_string()));
        }
    }

    Ok(bindings
        .into_iter()
        .filter(|b| !excluded.contains(&b.column))
        .filter(|b| !(for_insert && b.exclude_on_insert))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_states() {
        assert!(!FieldValue::from_option(&None::<i32>).is_set());
        assert!(FieldValue::from_option(&Some(7i32)).is_set());
    }

    #[test]
    fn nested_option_null_is_set() {
        let v = FieldValue::from_nested_option(&Some(None::<String>));
        assert!(v.is_set());
        assert!(matches!(v, FieldValue::Null(_)));
    }

    #[test]
    fn nullable_states() {
        assert!(!FieldValue::from_nullable(&Nullable::<i64>::Absent).is_set());
        assert!(matches!(
            FieldValue::from_nullable(&Nullable::<i64>::Null),
            FieldValue::Null(_)
        ));
        assert!(matches!(
            FieldValue::from_nullable(&Nullable::Value(5i64)),
            FieldValue::One(_)
        ));
    }

    #[test]
    fn candidates_rejects_duplicates_even_when_excluded() {
        let bindings = vec![
            FieldBinding::new("same_col", FieldValue::one("a")),
            FieldBinding::new("same_col", FieldValue::one("b")),
        ];
        let err = candidates(bindings, &["same_col"], false).unwrap_err();
        assert!(err.is_duplicate_column());
    }

    #[test]
    fn candidates_applies_insert_exclusions_only_for_insert() {
        let bindings = || {
            vec![
                FieldBinding::new("id", FieldValue::one("w-1")).exclude_on_insert(),
                FieldBinding::new("status", FieldValue::one("great")),
            ]
        };

        let update = candidates(bindings(), &[], false).unwrap();
        assert_eq!(update.len(), 2);

        let insert = candidates(bindings(), &[], true).unwrap();
        assert_eq!(insert.len(), 1);
        assert_eq!(insert[0].column, "status");
    }
}
