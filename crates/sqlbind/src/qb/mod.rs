//! Query builders.
//!
//! Select/Insert/Update/Delete builders over a shared expression layer.
//! Parameter indices are computed at build time through the builder's
//! [`crate::Placeholder`] style, and struct-derived [`crate::Clause`]s and
//! [`crate::SetMap`]s plug in via `filter` and `set_map`.
//!
//! ```ignore
//! use sqlbind::{qb, to_clause, to_set_map, SqlQb, MutationQb};
//!
//! // SELECT driven by a filter struct
//! let widgets = qb::select("widgets")
//!     .filter(to_clause(&filter, &[]))
//!     .order_by("widget_id")
//!     .fetch_all::<Widget>(&client)
//!     .await?;
//!
//! // UPDATE driven by a patch struct; skipped entirely when empty
//! qb::update("widgets")
//!     .set_map(to_set_map(&patch, &[]))
//!     .eq("widget_id", id)
//!     .execute_if_changed(&client)
//!     .await?;
//! ```

mod delete;
mod expr;
mod insert;
mod select;
mod traits;
mod update;

pub use delete::DeleteQb;
pub use expr::{Expr, ExprGroup};
pub use insert::InsertQb;
pub use select::SelectQb;
pub use traits::{MutationQb, SqlQb};
pub use update::UpdateQb;

/// Create a SELECT query builder for the given table.
pub fn select(table: &str) -> SelectQb {
    SelectQb::new(table)
}

/// Create a SELECT query builder with a custom FROM expression.
///
/// Use this for aliases or subqueries, e.g. `select_from("widgets w")`.
pub fn select_from(from_expr: &str) -> SelectQb {
    SelectQb::from(from_expr)
}

/// Create an INSERT query builder for the given table.
pub fn insert(table: &str) -> InsertQb {
    InsertQb::new(table)
}

/// Create an UPDATE query builder for the given table.
pub fn update(table: &str) -> UpdateQb {
    UpdateQb::new(table)
}

/// Create a DELETE query builder for the given table.
///
/// Without WHERE conditions the rendered statement is a no-op (`WHERE 1=0`);
/// use `allow_delete_all(true)` to delete every row on purpose.
pub fn delete(table: &str) -> DeleteQb {
    DeleteQb::new(table)
}

#[cfg(test)]
mod tests;
