//! Integration tests for the qb module.

use crate::bind::{Bindings, FieldBinding, FieldValue};
use crate::clause::to_clause;
use crate::nullable::Nullable;
use crate::placeholder::Placeholder;
use crate::qb::{delete, insert, select, update};
use crate::qb::traits::SqlQb;
use crate::set_map::{to_insert_map, to_set_map};

struct WidgetFilter {
    widget_id: Option<Vec<String>>,
    status: Option<String>,
}

impl Bindings for WidgetFilter {
    fn bindings(&self) -> Vec<FieldBinding> {
        vec![
            FieldBinding::new("widget_id", FieldValue::from_option_list(&self.widget_id)),
            FieldBinding::new("status", FieldValue::from_option(&self.status)),
        ]
    }
}

struct WidgetPatch {
    status: Option<String>,
    owner_id: Nullable<String>,
}

impl Bindings for WidgetPatch {
    fn bindings(&self) -> Vec<FieldBinding> {
        vec![
            FieldBinding::new("status", FieldValue::from_option(&self.status)),
            FieldBinding::new("owner_id", FieldValue::from_nullable(&self.owner_id)),
        ]
    }
}

struct NoColumns;

impl Bindings for NoColumns {
    fn bindings(&self) -> Vec<FieldBinding> {
        Vec::new()
    }
}

#[test]
fn select_with_filter_clause() {
    let filter = WidgetFilter {
        widget_id: Some(vec!["w-1".to_string(), "w-2".to_string()]),
        status: Some("great".to_string()),
    };
    let qb = select("widgets").filter(to_clause(&filter, &[]));
    assert_eq!(
        qb.to_sql().unwrap(),
        "SELECT * FROM widgets WHERE widget_id IN ($1,$2) AND status = $3"
    );
}

#[test]
fn select_with_empty_filter_has_no_where() {
    let filter = WidgetFilter {
        widget_id: None,
        status: None,
    };
    let qb = select("widgets").filter(to_clause(&filter, &[]));
    assert_eq!(qb.to_sql().unwrap(), "SELECT * FROM widgets");
}

#[test]
fn select_with_optional_filter_absent() {
    let qb = select("widgets").filter(to_clause(None::<&WidgetFilter>, &[]));
    assert_eq!(qb.to_sql().unwrap(), "SELECT * FROM widgets");
}

#[test]
fn clause_error_surfaces_at_build() {
    let qb = select("widgets").filter(to_clause(&NoColumns, &[]));
    assert!(qb.to_sql().unwrap_err().is_no_columns());
}

#[test]
fn update_from_set_map() {
    let patch = WidgetPatch {
        status: Some("fine".to_string()),
        owner_id: Nullable::Absent,
    };
    let qb = update("widgets")
        .set_map(to_set_map(&patch, &[]))
        .eq("widget_id", "w-1");
    assert_eq!(
        qb.to_sql().unwrap(),
        "UPDATE widgets SET status = $1 WHERE widget_id = $2"
    );
}

#[test]
fn update_set_map_binds_explicit_null() {
    let patch = WidgetPatch {
        status: None,
        owner_id: Nullable::null(),
    };
    let qb = update("widgets")
        .set_map(to_set_map(&patch, &[]))
        .eq("widget_id", "w-1");
    // The NULL is a bound parameter, not literal SQL.
    assert_eq!(
        qb.to_sql().unwrap(),
        "UPDATE widgets SET owner_id = $1 WHERE widget_id = $2"
    );
}

#[test]
fn update_without_changes_fails_validation_but_has_changes_reports_it() {
    let patch = WidgetPatch {
        status: None,
        owner_id: Nullable::Absent,
    };
    let qb = update("widgets")
        .set_map(to_set_map(&patch, &[]))
        .eq("widget_id", "w-1");
    assert!(!qb.has_changes());
    assert!(qb.to_sql().is_err());
}

#[test]
fn insert_from_insert_map_honors_exclusions() {
    struct NewWidget {
        widget_id: String,
        secret: Option<String>,
    }
    impl Bindings for NewWidget {
        fn bindings(&self) -> Vec<FieldBinding> {
            vec![
                FieldBinding::new("widget_id", FieldValue::one(self.widget_id.clone())),
                FieldBinding::new("secret", FieldValue::from_option(&self.secret))
                    .exclude_on_insert(),
            ]
        }
    }

    let w = NewWidget {
        widget_id: "w-1".to_string(),
        secret: Some("hidden".to_string()),
    };
    let qb = insert("widgets").set_map(to_insert_map(&w, &[]));
    assert_eq!(
        qb.to_sql().unwrap(),
        "INSERT INTO widgets (widget_id) VALUES ($1)"
    );

    // The update path keeps the flagged field.
    let qb = update("widgets")
        .set_map(to_set_map(&w, &[]))
        .eq("widget_id", "w-1");
    assert_eq!(
        qb.to_sql().unwrap(),
        "UPDATE widgets SET widget_id = $1, secret = $2 WHERE widget_id = $3"
    );
}

#[test]
fn delete_with_filter() {
    let filter = WidgetFilter {
        widget_id: Some(vec!["w-1".to_string()]),
        status: None,
    };
    let qb = delete("widgets").filter(to_clause(&filter, &[]));
    assert_eq!(
        qb.to_sql().unwrap(),
        "DELETE FROM widgets WHERE widget_id IN ($1)"
    );
}

#[test]
fn question_placeholder_round_trip() {
    let filter = WidgetFilter {
        widget_id: Some(vec!["a".to_string(), "b".to_string()]),
        status: Some("example".to_string()),
    };
    let qb = select("widgets")
        .placeholder(Placeholder::Question)
        .filter(to_clause(&filter, &[]));
    assert_eq!(
        qb.to_sql().unwrap(),
        "SELECT * FROM widgets WHERE widget_id IN (?,?) AND status = ?"
    );
}
