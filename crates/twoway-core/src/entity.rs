// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Entity metadata.
//!
//! An entity is a struct mapped to one table. Its metadata is an
//! [`EntityTypeInfo`]: column descriptions plus an accessor table of plain
//! `fn` pointers, built once per type and cached by
//! [`crate::EntityInfoCache`].
//!
//! # Structure
//!
//! ```text
//! EntityTypeInfo<E>
//! ├── table_name / schema_name
//! ├── columns: Vec<EntityColumnInfo>          declaration order
//! ├── key_columns / sequence_columns          cloned subsets
//! ├── identity_column / version_column
//! ├── column_name_key_dictionary              lowercase name -> ordinal
//! └── accessors: Vec<ColumnAccessor<E>>       get / set per column
//! ```
//!
//! # Example
//!
//! ```rust
//! use twoway_core::{
//!     Entity, EntityColumnInfo, EntityTypeInfo, EntityTypeInfoBuilder, FromValue, ToValue,
//!     ValueKind
//! };
//!
//! struct Emp {
//!     id:     i32,
//!     salary: i32
//! }
//!
//! impl Entity for Emp {
//!     fn build_type_info() -> EntityTypeInfo<Self> {
//!         EntityTypeInfoBuilder::<Self>::new("EMP")
//!             .schema("dbo")
//!             .column(
//!                 EntityColumnInfo::new("id", "ID", ValueKind::Int).primary_key(),
//!                 |e| e.id.to_value(),
//!                 |e, v| {
//!                     e.id = i32::from_value(v)?;
//!                     Ok(())
//!                 }
//!             )
//!             .column(
//!                 EntityColumnInfo::new("salary", "SALARY", ValueKind::Int),
//!                 |e| e.salary.to_value(),
//!                 |e, v| {
//!                     e.salary = i32::from_value(v)?;
//!                     Ok(())
//!                 }
//!             )
//!             .build()
//!     }
//! }
//!
//! let info = Emp::build_type_info();
//! assert_eq!(info.key_columns.len(), 1);
//! assert_eq!(info.column_by_name("salary").map(|c| c.ordinal), Some(1));
//! ```

mod column;
mod type_info;


pub use column::{
    CurrentTimestampAttribute, CurrentTimestampStrategy, EntityColumnInfo, SequenceAttribute,
    ValueConverter
};
pub use type_info::{ColumnAccessor, EntityTypeInfo, EntityTypeInfoBuilder};

/// Struct mapped to a table.
///
/// Usually derived with `#[derive(Entity)]`.
pub trait Entity: Sized + 'static {
    /// Build the metadata. Called once per type and cache.
    fn build_type_info() -> EntityTypeInfo<Self>;
}
