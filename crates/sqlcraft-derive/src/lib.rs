//! Derive macros for sqlcraft
//!
//! Provides `#[derive(Entity)]`.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod attrs;
mod entity;
mod types;

/// Derive `sqlcraft::Entity` (table/column metadata) for a struct.
///
/// # Example
///
/// ```ignore
/// use sqlcraft::Entity;
///
/// #[derive(Entity)]
/// #[entity(table = "users")]
/// struct User {
///     #[entity(id)]
///     id: i64,
///     user_name: String,
///     #[entity(column = "mail")]
///     email: Option<String>,
///     #[entity(version)]
///     version: i32,
///     #[entity(skip)]
///     cached: bool,
/// }
/// ```
///
/// # Attributes
///
/// - `#[entity(table = "name")]` - Explicit table name (default: derived from the struct name)
/// - `#[entity(naming = "upper_underscore")]` - Naming convention of derived table/column names
/// - `#[entity(id)]` - Mark field as primary key
/// - `#[entity(version)]` - Mark field as the optimistic-lock version column
/// - `#[entity(column = "name")]` - Map field to a different column name
/// - `#[entity(skip)]` - Leave the field unmapped
///
/// `Option<T>` fields are recorded as nullable.
#[proc_macro_derive(Entity, attributes(entity))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    entity::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
