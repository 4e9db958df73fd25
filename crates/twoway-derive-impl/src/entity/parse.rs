// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Entity definition parsing.
//!
//! # Architecture
//!
//! ```text
//! parse.rs (EntityDef, #[entity] via darling)
//! └── column.rs  - #[column] via parse_nested_meta
//! ```
//!
//! # Supported Attributes
//!
//! | Attribute | Required | Default | Description |
//! |-----------|----------|---------|-------------|
//! | `table` | No | struct name after `rename_all` | Table name |
//! | `schema` | No | none | Schema |
//! | `rename_all` | No | none | Column naming rule |

mod column;


pub use column::{ColumnDef, SequenceDef, TimestampDef};
use darling::FromDeriveInput;
use syn::{DeriveInput, Generics, Ident};

use crate::utils::naming::RenameRule;

/// Attributes parsed from `#[entity(...)]`.
#[derive(Debug, FromDeriveInput)]
#[darling(attributes(entity), supports(struct_named))]
struct EntityAttrs {
    ident:      Ident,
    generics:   Generics,
    #[darling(default)]
    table:      Option<String>,
    #[darling(default)]
    schema:     Option<String>,
    #[darling(default)]
    rename_all: RenameRule
}

/// Complete entity definition.
#[derive(Debug)]
pub struct EntityDef {
    pub ident:      Ident,
    pub generics:   Generics,
    pub table:      String,
    pub schema:     Option<String>,
    pub rename_all: RenameRule,
    /// Every named field, mapped or not, in declaration order.
    pub fields:     Vec<ColumnDef>
}

impl EntityDef {
    /// Parse entity definition from syn's `DeriveInput`.
    ///
    /// # Errors
    ///
    /// - Applied to an enum, union, tuple struct or unit struct
    /// - Malformed `#[entity]` or `#[column]` arguments
    /// - More than one identity, version or soft delete column
    /// - A column that is both identity and sequence
    /// - Flags on a `not_mapped` field
    pub fn from_derive_input(input: &DeriveInput) -> darling::Result<Self> {
        let attrs = EntityAttrs::from_derive_input(input)?;

        let fields = match &input.data {
            syn::Data::Struct(data) => match &data.fields {
                syn::Fields::Named(named) => {
                    let mut errors = darling::Error::accumulator();
                    let fields: Vec<ColumnDef> = named
                        .named
                        .iter()
                        .filter_map(|field| errors.handle(ColumnDef::from_field(field)))
                        .collect();
                    errors.finish_with(fields)?
                }
                _ => {
                    return Err(darling::Error::custom("Entity requires named fields")
                        .with_span(&input.ident));
                }
            },
            _ => {
                return Err(
                    darling::Error::custom("Entity can only be derived for structs")
                        .with_span(&input.ident)
                );
            }
        };

        let table = attrs
            .table
            .unwrap_or_else(|| attrs.rename_all.apply(&attrs.ident.to_string()));

        let entity = Self {
            ident: attrs.ident,
            generics: attrs.generics,
            table,
            schema: attrs.schema,
            rename_all: attrs.rename_all,
            fields
        };
        entity.validate()?;
        Ok(entity)
    }

    /// Mapped fields in declaration order.
    pub fn columns(&self) -> impl Iterator<Item = &ColumnDef> {
        self.fields.iter().filter(|f| !f.not_mapped)
    }

    /// Column name of `column` after `rename_all`.
    #[must_use]
    pub fn column_name(&self, column: &ColumnDef) -> String {
        column.column_name(|name| self.rename_all.apply(name))
    }

    fn validate(&self) -> darling::Result<()> {
        let mut errors = darling::Error::accumulator();

        for (flag, what) in [
            (is_identity as fn(&ColumnDef) -> bool, "identity"),
            (is_version, "version"),
            (is_soft_delete, "soft_delete")
        ] {
            for extra in self.columns().filter(|c| flag(c)).skip(1) {
                errors.push(
                    darling::Error::custom(format!("only one {what} column is allowed"))
                        .with_span(&extra.ident)
                );
            }
        }

        for field in &self.fields {
            if field.not_mapped && has_column_flags(field) {
                errors.push(
                    darling::Error::custom("not_mapped cannot be combined with column options")
                        .with_span(&field.ident)
                );
            }
            if field.identity && field.sequence.is_some() {
                errors.push(
                    darling::Error::custom("identity column cannot also use a sequence")
                        .with_span(&field.ident)
                );
            }
        }

        errors.finish()
    }
}

fn is_identity(column: &ColumnDef) -> bool {
    column.identity
}

fn is_version(column: &ColumnDef) -> bool {
    column.version
}

fn is_soft_delete(column: &ColumnDef) -> bool {
    column.soft_delete
}

fn has_column_flags(field: &ColumnDef) -> bool {
    field.key
        || field.identity
        || field.version
        || field.soft_delete
        || field.sequence.is_some()
        || field.timestamp.is_some()
}
