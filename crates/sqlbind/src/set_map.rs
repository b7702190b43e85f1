//! Set maps: column → value payloads for INSERT and UPDATE.

use crate::bind::{candidates, BindingSource, FieldValue};
use crate::error::BindResult;

/// An insertion-ordered mapping from column name to bound value, containing
/// only the fields that are actually set.
///
/// Keys are unique; duplicates are rejected while the map is built.
#[derive(Clone, Debug, Default)]
pub struct SetMap {
    entries: Vec<(String, FieldValue)>,
}

impl SetMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a bound value by column name.
    pub fn get(&self, column: &str) -> Option<&FieldValue> {
        self.entries
            .iter()
            .find(|(col, _)| col == column)
            .map(|(_, value)| value)
    }

    /// Column names in field declaration order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(col, _)| col.as_str())
    }

    /// Iterate entries in field declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries
            .iter()
            .map(|(col, value)| (col.as_str(), value))
    }

    /// Append an entry. Intended for hand-built payloads; the conversion
    /// entry points below already deduplicate.
    pub fn insert(&mut self, column: impl Into<String>, value: FieldValue) {
        self.entries.push((column.into(), value));
    }

    /// Prefix every key with `table.`.
    pub fn aliased(self, table: &str) -> SetMap {
        SetMap {
            entries: self
                .entries
                .into_iter()
                .map(|(col, value)| (format!("{table}.{col}"), value))
                .collect(),
        }
    }
}

impl IntoIterator for SetMap {
    type Item = (String, FieldValue);
    type IntoIter = std::vec::IntoIter<(String, FieldValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Convert a struct into an update payload.
///
/// Unset fields are skipped. `excluded` columns are dropped from the result.
/// `exclude_on_insert` flags are ignored here: update payloads keep those
/// fields (use [`to_insert_map`] for insert payloads).
///
/// A `None` source and a struct with no bindable columns both yield an empty
/// map, not an error: an empty update payload is a legitimate no-op.
pub fn to_set_map<S: BindingSource>(source: S, excluded: &[&str]) -> BindResult<SetMap> {
    build_map(source, excluded, false)
}

/// Convert a struct into an insert payload.
///
/// Like [`to_set_map`], but fields flagged `exclude_on_insert` are dropped in
/// addition to the caller-supplied exclusions.
pub fn to_insert_map<S: BindingSource>(source: S, excluded: &[&str]) -> BindResult<SetMap> {
    build_map(source, excluded, true)
}

/// Like [`to_set_map`], with every key prefixed by `table.`.
pub fn to_set_map_aliased<S: BindingSource>(
    table: &str,
    source: S,
    excluded: &[&str],
) -> BindResult<SetMap> {
    Ok(to_set_map(source, excluded)?.aliased(table))
}

/// Like [`to_insert_map`], with every key prefixed by `table.`.
pub fn to_insert_map_aliased<S: BindingSource>(
    table: &str,
    source: S,
    excluded: &[&str],
) -> BindResult<SetMap> {
    Ok(to_insert_map(source, excluded)?.aliased(table))
}

fn build_map<S: BindingSource>(
    source: S,
    excluded: &[&str],
    for_insert: bool,
) -> BindResult<SetMap> {
    let Some(bindings) = source.collect_bindings() else {
        return Ok(SetMap::new());
    };

    let mut map = SetMap::new();
    for binding in candidates(bindings, excluded, for_insert)? {
        if binding.value.is_set() {
            map.entries.push((binding.column.to_string(), binding.value));
        }
    }
    Ok(map)
}

/// Whether an update filter carries at least one set, non-excluded field.
///
/// Used to skip the database round-trip entirely for no-op updates.
/// A `None` source carries no updates.
pub fn contains_updates<S: BindingSource>(source: S, excluded: &[&str]) -> bool {
    source.collect_bindings().is_some_and(|bindings| {
        bindings
            .iter()
            .any(|b| !excluded.contains(&b.column) && b.value.is_set())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bind::{Bindings, FieldBinding, FieldValue};

    struct WidgetPatch {
        status: Option<String>,
        enabled: Option<bool>,
    }

    impl Bindings for WidgetPatch {
        fn bindings(&self) -> Vec<FieldBinding> {
            vec![
                FieldBinding::new("status", FieldValue::from_option(&self.status)),
                FieldBinding::new("enabled", FieldValue::from_option(&self.enabled)),
            ]
        }
    }

    struct Doubled {
        a: Option<i32>,
        b: Option<i32>,
    }

    impl Bindings for Doubled {
        fn bindings(&self) -> Vec<FieldBinding> {
            vec![
                FieldBinding::new("same_col", FieldValue::from_option(&self.a)),
                FieldBinding::new("same_col", FieldValue::from_option(&self.b)),
            ]
        }
    }

    #[test]
    fn maps_set_fields_only() {
        let patch = WidgetPatch {
            status: Some("great".to_string()),
            enabled: None,
        };
        let map = to_set_map(&patch, &[]).unwrap();
        assert_eq!(map.columns().collect::<Vec<_>>(), vec!["status"]);
        assert!(map.get("status").is_some());
        assert!(map.get("enabled").is_none());
    }

    #[test]
    fn respects_exclusions() {
        let patch = WidgetPatch {
            status: Some("great".to_string()),
            enabled: Some(true),
        };
        let map = to_set_map(&patch, &["status"]).unwrap();
        assert_eq!(map.columns().collect::<Vec<_>>(), vec!["enabled"]);
    }

    #[test]
    fn none_source_is_empty() {
        let map = to_set_map(None::<&WidgetPatch>, &[]).unwrap();
        assert!(map.is_empty());
    }

    #[test]
    fn all_unset_is_empty_not_an_error() {
        let patch = WidgetPatch {
            status: None,
            enabled: None,
        };
        let map = to_set_map(&patch, &[]).unwrap();
        assert!(map.is_empty());
    }

    #[test]
    fn duplicate_columns_fail() {
        let doubled = Doubled {
            a: Some(1),
            b: Some(2),
        };
        let err = to_set_map(&doubled, &[]).unwrap_err();
        assert!(err.is_duplicate_column());
    }

    #[test]
    fn aliased_prefixes_keys() {
        let patch = WidgetPatch {
            status: Some("great".to_string()),
            enabled: Some(true),
        };
        let map = to_set_map_aliased("widgets", &patch, &[]).unwrap();
        assert_eq!(
            map.columns().collect::<Vec<_>>(),
            vec!["widgets.status", "widgets.enabled"]
        );
    }

    #[test]
    fn contains_updates_matches_set_map_emptiness() {
        let empty = WidgetPatch {
            status: None,
            enabled: None,
        };
        let set = WidgetPatch {
            status: Some("ok".to_string()),
            enabled: None,
        };

        assert!(!contains_updates(&empty, &[]));
        assert!(contains_updates(&set, &[]));
        assert!(!contains_updates(None::<&WidgetPatch>, &[]));
        assert!(!contains_updates(&set, &["status"]));

        assert_eq!(
            contains_updates(&set, &[]),
            !to_set_map(&set, &[]).unwrap().is_empty()
        );
    }
}
