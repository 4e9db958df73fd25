// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(
    missing_docs,
    rustdoc::missing_crate_level_docs,
    rustdoc::broken_intra_doc_links,
    rust_2018_idioms
)]
#![deny(unsafe_code)]

//! Derive macros for twoway-sql. Use the `twoway-sql` crate instead of
//! depending on this one directly.
//!
//! # Attribute Quick Reference
//!
//! ## Entity-Level `#[entity(...)]`
//!
//! ```rust,ignore
//! #[derive(Entity)]
//! #[entity(
//!     table = "EMP",                       // Optional: defaults to the struct name
//!     schema = "dbo",                      // Optional: no schema by default
//!     rename_all = "SCREAMING_SNAKE_CASE"  // Optional: column and default table naming
//! )]
//! pub struct Emp { /* ... */ }
//! ```
//!
//! ## Field-Level `#[column(...)]`
//!
//! ```rust,ignore
//! pub struct Emp {
//!     #[column(key, identity)]                    // Primary key generated by the database
//!     pub id: i64,
//!
//!     #[column(name = "EMP_NAME", max_length = 40)]
//!     pub name: Option<String>,
//!
//!     #[column(sequence(name = "EMP_NO_SEQ", prefix = "E", padding = 6))]
//!     pub emp_no: String,
//!
//!     #[column(version)]                          // Optimistic lock counter
//!     pub version: i32,
//!
//!     #[column(soft_delete)]                      // Flag written by soft delete
//!     pub deleted: bool,
//!
//!     #[column(current_timestamp(strategy = "insert"))]
//!     pub created_at: Option<NaiveDateTime>,
//!
//!     #[column(db_type = "AnsiString", converter = "crate::YES_NO")]
//!     pub active: bool,
//!
//!     #[column(not_mapped)]                       // Not a column
//!     pub cached: Vec<String>,
//! }
//! ```
//!
//! # Generated Code Overview
//!
//! | Derive | Generates |
//! |--------|-----------|
//! | `Entity` | `impl Entity` with a column accessor table |
//! | `SqlParameter` | `impl ToValue` producing an object for template evaluation |

mod entity;
mod parameter;
mod utils;

use proc_macro::TokenStream;

/// Derive entity metadata for the query builder.
///
/// Every named field becomes a column unless marked `#[column(not_mapped)]`.
/// Field types must implement `ToValue`, `FromValue` and `HasValueKind`;
/// `Option<T>` columns are nullable.
///
/// # Entity Attributes
///
/// | Attribute | Default | Description |
/// |-----------|---------|-------------|
/// | `table` | struct name after `rename_all` | Table name |
/// | `schema` | none | Schema qualifying the table |
/// | `rename_all` | none | `snake_case`, `SCREAMING_SNAKE_CASE`, `camelCase`, `PascalCase`, `lowercase`, `UPPERCASE` |
///
/// # Column Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `name = "COL"` | Column name, overriding `rename_all` |
/// | `key` | Part of the primary key |
/// | `identity` | Generated by the database, read back after INSERT |
/// | `version` | Optimistic lock counter |
/// | `soft_delete` | Flag written by soft delete |
/// | `not_mapped` | Skipped entirely |
/// | `nullable` | Nullable even when the type is not `Option` |
/// | `max_length = N` | Maximum length |
/// | `db_type = "Name"` | Driver parameter type, e.g. `AnsiString` |
/// | `converter = "path"` | `ValueConverter` constant applied both ways |
/// | `sequence(name, schema, prefix, padding)` | Filled from a sequence before INSERT |
/// | `current_timestamp(strategy, sql)` | Filled by the database clock |
///
/// # Example
///
/// ```rust,ignore
/// use twoway_sql::Entity;
///
/// #[derive(Entity)]
/// #[entity(table = "EMP", schema = "dbo", rename_all = "SCREAMING_SNAKE_CASE")]
/// pub struct Emp {
///     #[column(key)]
///     pub id: i32,
///     pub name: Option<String>,
///     #[column(version)]
///     pub version_no: i32,
/// }
/// ```
#[proc_macro_derive(Entity, attributes(entity, column))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    entity::derive(input)
}

/// Derive `ToValue` for a template parameter object.
///
/// Fields become properties named after the field, or after
/// `#[parameter(rename = "...")]`. `#[parameter(skip)]` leaves a field out.
/// `#[parameter(rename_all = "camelCase")]` on the struct renames every
/// property.
///
/// # Example
///
/// ```rust,ignore
/// use twoway_sql::SqlParameter;
///
/// #[derive(SqlParameter)]
/// pub struct EmpSearch {
///     pub name: Option<String>,
///     #[parameter(rename = "deptIds")]
///     pub dept_ids: Vec<i32>,
/// }
/// ```
#[proc_macro_derive(SqlParameter, attributes(parameter))]
pub fn derive_sql_parameter(input: TokenStream) -> TokenStream {
    parameter::derive(input)
}
