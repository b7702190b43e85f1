//! # sqlbind
//!
//! Struct-driven column bindings and SQL fragment builders for
//! `tokio-postgres`.
//!
//! ## Features
//!
//! - **Bindings**: filter and payload structs describe their columns once
//!   via `#[derive(Bindings)]`; optional fields decide participation
//! - **Set maps**: `to_set_map` / `to_insert_map` turn a struct into an
//!   INSERT/UPDATE payload, skipping unset fields
//! - **Clauses**: `to_clause` turns a filter struct into a WHERE predicate
//!   (`=`, `IN`, `IS NULL`), with construction errors deferred to render time
//! - **Tri-state updates**: [`Nullable`] distinguishes "leave alone" from
//!   "set to NULL" from "set to value"
//! - **Builders**: Select/Insert/Update/Delete with computed placeholder
//!   indices (`?`, `$n`, `:n`, `@pn`)
//! - **Transaction-friendly**: pass a transaction anywhere a [`Queryable`]
//!   is expected
//!
//! ## Example
//!
//! ```ignore
//! use sqlbind::{qb, to_clause, to_set_map, Bindings, FromRow, Nullable};
//! use sqlbind::{MutationQb, SqlQb};
//!
//! #[derive(Bindings)]
//! struct WidgetFilter {
//!     #[bind(column = "widget_id")]
//!     id: Option<Vec<String>>,
//!     status: Option<String>,
//! }
//!
//! #[derive(Bindings, Default)]
//! struct WidgetPatch {
//!     status: Option<String>,
//!     owner_id: Nullable<String>,
//! }
//!
//! // SELECT ... WHERE widget_id IN ($1,$2) AND status = $3
//! let widgets = qb::select("widgets")
//!     .filter(to_clause(&filter, &[]))
//!     .fetch_all::<Widget>(&client)
//!     .await?;
//!
//! // UPDATE ... SET owner_id = NULL where the patch says so; no-op when
//! // the patch is empty
//! qb::update("widgets")
//!     .set_map(to_set_map(&patch, &[]))
//!     .eq("widget_id", "w-1")
//!     .execute_if_changed(&client)
//!     .await?;
//! ```

pub mod bind;
pub mod clause;
pub mod client;
pub mod error;
pub mod nullable;
pub mod param;
pub mod placeholder;
pub mod qb;
pub mod row;
pub mod set_map;

pub use bind::{BindingSource, Bindings, FieldBinding, FieldValue};
pub use clause::{to_clause, to_clause_aliased, Clause};
pub use client::Queryable;
pub use error::{BindError, BindResult};
pub use nullable::Nullable;
pub use param::{Param, ParamList};
pub use placeholder::Placeholder;
pub use row::{FromRow, RowExt};
pub use set_map::{
    contains_updates, to_insert_map, to_insert_map_aliased, to_set_map, to_set_map_aliased, SetMap,
};

// Re-export qb entry points for easy access
pub use qb::{
    delete, insert, select, select_from, update, DeleteQb, Expr, ExprGroup, InsertQb, MutationQb,
    SelectQb, SqlQb, UpdateQb,
};

#[cfg(feature = "derive")]
pub use sqlbind_derive::{Bindings, FromRow};

// Re-export the driver so derive-generated code and downstream crates agree
// on the tokio-postgres version.
pub use tokio_postgres;
