// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Entity derive macro implementation.
//!
//! # Architecture
//!
//! ```text
//! entity.rs (orchestrator)
//! │
//! ├── parse/       → EntityDef, ColumnDef, validation
//! └── generate.rs  → impl Entity with the column accessor table
//! ```
//!
//! # Generated Code
//!
//! For an entity like:
//!
//! ```rust,ignore
//! #[derive(Entity)]
//! #[entity(table = "EMP")]
//! pub struct Emp {
//!     #[column(key, name = "ID")]
//!     pub id: i32,
//! }
//! ```
//!
//! the macro generates:
//!
//! ```rust,ignore
//! impl ::twoway_sql::Entity for Emp {
//!     fn build_type_info() -> ::twoway_sql::EntityTypeInfo<Self> {
//!         ::twoway_sql::EntityTypeInfoBuilder::<Self>::new("EMP")
//!             .column(
//!                 ::twoway_sql::EntityColumnInfo::new("id", "ID", <i32 as HasValueKind>::KIND)
//!                     .nullable(<i32 as HasValueKind>::NULLABLE || false)
//!                     .primary_key(),
//!                 |e| ToValue::to_value(&e.id),
//!                 |e, v| { e.id = <i32 as FromValue>::from_value(v)?; Ok(()) }
//!             )
//!             .build()
//!     }
//! }
//! ```

mod generate;
pub mod parse;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

use self::parse::EntityDef;

/// Main entry point for the `#[derive(Entity)]` macro.
pub fn derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match EntityDef::from_derive_input(&input) {
        Ok(entity) => generate::generate(&entity).into(),
        Err(err) => err.write_errors().into()
    }
}
