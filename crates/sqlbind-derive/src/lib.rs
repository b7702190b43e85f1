//! Derive macros for sqlbind
//!
//! Provides `#[derive(Bindings)]` and `#[derive(FromRow)]` macros.

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod bindings;
mod from_row;
mod sql_ident;
mod syn_types;

/// Derive the `Bindings` trait for a filter or payload struct.
///
/// Every named field participates under its own name unless renamed or
/// skipped. The field type decides how values participate:
///
/// - `Option<T>`: `None` leaves the column out
/// - `Option<Vec<T>>` / `Vec<T>`: binds a list (`IN` expansion in clauses,
///   one array parameter in set maps)
/// - `Nullable<T>` / `Option<Option<T>>`: tri-state; the inner level binds
///   an explicit SQL NULL
/// - any other `T`: always bound
///
/// # Example
///
/// ```ignore
/// use sqlbind::{Bindings, Nullable};
///
/// #[derive(Bindings, Default)]
/// struct WidgetPatch {
///     #[bind(column = "widget_status")]
///     status: Option<String>,
///     owner_id: Nullable<String>,
///     #[bind(skip)]
///     loaded_at: std::time::Instant,
/// }
/// ```
///
/// # Attributes
///
/// - `#[bind(column = "name")]` - Map the field to a different column name
/// - `#[bind(skip)]` - The field never participates
/// - `#[bind(exclude_on_insert)]` - Drop the field from insert payloads
#[proc_macro_derive(Bindings, attributes(bind))]
pub fn derive_bindings(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    bindings::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

/// Derive `FromRow` for a struct.
///
/// # Example
///
/// ```ignore
/// use sqlbind::FromRow;
///
/// #[derive(FromRow)]
/// struct Widget {
///     widget_id: String,
///     status: String,
///     #[bind(column = "owner_id")]
///     owner: Option<String>,
/// }
/// ```
///
/// # Attributes
///
/// - `#[bind(column = "name")]` - Map the field to a different column name
#[proc_macro_derive(FromRow, attributes(bind))]
pub fn derive_from_row(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    from_row::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
