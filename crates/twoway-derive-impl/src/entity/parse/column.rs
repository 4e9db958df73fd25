// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Field-level `#[column(...)]` parsing.
//!
//! # Syntax
//!
//! ```rust,ignore
//! #[column(
//!     name = "EMP_NO",                 // Column name
//!     key,                             // Primary key member
//!     identity,                        // Database-generated
//!     version,                         // Optimistic lock counter
//!     soft_delete,                     // Soft delete flag
//!     not_mapped,                      // Not a column
//!     nullable,                        // Nullable regardless of type
//!     max_length = 40,
//!     db_type = "AnsiString",
//!     converter = "crate::YES_NO",
//!     sequence(name = "EMP_NO_SEQ", schema = "app", prefix = "E", padding = 6),
//!     current_timestamp(strategy = "update", sql = "SYSUTCDATETIME()")
//! )]
//! ```
//!
//! A bare `current_timestamp` uses the `always` strategy.

use proc_macro2::Span;
use syn::{Attribute, Field, Ident, LitInt, LitStr, Path, Type, meta::ParseNestedMeta};

use crate::utils::is_option;

/// Driver types accepted by `db_type`, matched case-insensitively.
const DB_TYPES: &[&str] = &[
    "AnsiString",
    "String",
    "Boolean",
    "Byte",
    "Int16",
    "Int32",
    "Int64",
    "UInt32",
    "UInt64",
    "Single",
    "Double",
    "Decimal",
    "Date",
    "Time",
    "DateTime",
    "DateTimeOffset",
    "Guid",
    "Binary",
    "Object"
];

const STRATEGIES: &[&str] = &["insert", "update", "soft_delete", "always"];

/// `sequence(...)` arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SequenceDef {
    pub name:    String,
    pub schema:  Option<String>,
    pub prefix:  String,
    pub padding: usize
}

/// `current_timestamp(...)` arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct TimestampDef {
    /// Variant name of `CurrentTimestampStrategy`.
    pub strategy: Ident,
    pub sql:      Option<String>
}

/// One struct field with its column options.
#[derive(Debug)]
pub struct ColumnDef {
    pub ident:       Ident,
    pub ty:          Type,
    pub name:        Option<String>,
    pub key:         bool,
    pub identity:    bool,
    pub version:     bool,
    pub soft_delete: bool,
    pub not_mapped:  bool,
    pub nullable:    bool,
    pub max_length:  Option<usize>,
    /// Variant name of `DbType`.
    pub db_type:     Option<Ident>,
    pub converter:   Option<Path>,
    pub sequence:    Option<SequenceDef>,
    pub timestamp:   Option<TimestampDef>
}

impl ColumnDef {
    /// Parse a named field and its `#[column]` attributes.
    ///
    /// # Errors
    ///
    /// Returns every malformed argument found, plus an error for unnamed
    /// fields.
    pub fn from_field(field: &Field) -> darling::Result<Self> {
        let ident = field.ident.clone().ok_or_else(|| {
            darling::Error::custom("Entity fields must be named").with_span(field)
        })?;
        let mut column = Self {
            ident,
            ty: field.ty.clone(),
            name: None,
            key: false,
            identity: false,
            version: false,
            soft_delete: false,
            not_mapped: false,
            nullable: false,
            max_length: None,
            db_type: None,
            converter: None,
            sequence: None,
            timestamp: None
        };

        let mut errors = darling::Error::accumulator();
        for attr in column_attrs(&field.attrs) {
            errors.handle(
                attr.parse_nested_meta(|meta| column.apply(&meta))
                    .map_err(darling::Error::from)
            );
        }
        errors.finish_with(column)
    }

    fn apply(&mut self, meta: &ParseNestedMeta<'_>) -> syn::Result<()> {
        if meta.path.is_ident("name") {
            let value: LitStr = meta.value()?.parse()?;
            self.name = Some(value.value());
        } else if meta.path.is_ident("key") {
            self.key = true;
        } else if meta.path.is_ident("identity") {
            self.identity = true;
        } else if meta.path.is_ident("version") {
            self.version = true;
        } else if meta.path.is_ident("soft_delete") {
            self.soft_delete = true;
        } else if meta.path.is_ident("not_mapped") {
            self.not_mapped = true;
        } else if meta.path.is_ident("nullable") {
            self.nullable = true;
        } else if meta.path.is_ident("max_length") {
            let value: LitInt = meta.value()?.parse()?;
            self.max_length = Some(value.base10_parse()?);
        } else if meta.path.is_ident("db_type") {
            let value: LitStr = meta.value()?.parse()?;
            self.db_type = Some(db_type_ident(&value)?);
        } else if meta.path.is_ident("converter") {
            let value: LitStr = meta.value()?.parse()?;
            self.converter = Some(value.parse()?);
        } else if meta.path.is_ident("sequence") {
            self.sequence = Some(parse_sequence(meta)?);
        } else if meta.path.is_ident("current_timestamp") {
            self.timestamp = Some(parse_timestamp(meta)?);
        } else {
            return Err(meta.error("unknown column option"));
        }
        Ok(())
    }

    /// Column name after the entity's rename rule.
    #[must_use]
    pub fn column_name(&self, rename: impl Fn(&str) -> String) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| rename(&self.ident.to_string()))
    }

    /// Nullable by type or by attribute.
    #[must_use]
    pub fn is_nullable(&self) -> bool {
        self.nullable || is_option(&self.ty)
    }
}

fn column_attrs(attrs: &[Attribute]) -> impl Iterator<Item = &Attribute> {
    attrs.iter().filter(|attr| attr.path().is_ident("column"))
}

fn db_type_ident(value: &LitStr) -> syn::Result<Ident> {
    let requested = value.value();
    DB_TYPES
        .iter()
        .find(|name| name.eq_ignore_ascii_case(&requested))
        .map(|name| Ident::new(name, value.span()))
        .ok_or_else(|| {
            syn::Error::new(
                value.span(),
                format!(
                    "unknown db_type `{requested}`, expected one of: {}",
                    DB_TYPES.join(", ")
                )
            )
        })
}

fn parse_sequence(meta: &ParseNestedMeta<'_>) -> syn::Result<SequenceDef> {
    let mut sequence = SequenceDef::default();
    let mut named = false;
    meta.parse_nested_meta(|nested| {
        if nested.path.is_ident("name") {
            let value: LitStr = nested.value()?.parse()?;
            sequence.name = value.value();
            named = true;
        } else if nested.path.is_ident("schema") {
            let value: LitStr = nested.value()?.parse()?;
            sequence.schema = Some(value.value());
        } else if nested.path.is_ident("prefix") {
            let value: LitStr = nested.value()?.parse()?;
            sequence.prefix = value.value();
        } else if nested.path.is_ident("padding") {
            let value: LitInt = nested.value()?.parse()?;
            sequence.padding = value.base10_parse()?;
        } else {
            return Err(nested.error("unknown sequence option"));
        }
        Ok(())
    })?;
    if !named || sequence.name.is_empty() {
        return Err(meta.error("sequence requires `name = \"...\"`"));
    }
    Ok(sequence)
}

fn parse_timestamp(meta: &ParseNestedMeta<'_>) -> syn::Result<TimestampDef> {
    let mut timestamp = TimestampDef {
        strategy: Ident::new("Always", Span::call_site()),
        sql:      None
    };
    if !meta.input.peek(syn::token::Paren) {
        return Ok(timestamp);
    }
    meta.parse_nested_meta(|nested| {
        if nested.path.is_ident("strategy") {
            let value: LitStr = nested.value()?.parse()?;
            timestamp.strategy = strategy_ident(&value)?;
        } else if nested.path.is_ident("sql") {
            let value: LitStr = nested.value()?.parse()?;
            timestamp.sql = Some(value.value());
        } else {
            return Err(nested.error("unknown current_timestamp option"));
        }
        Ok(())
    })?;
    Ok(timestamp)
}

fn strategy_ident(value: &LitStr) -> syn::Result<Ident> {
    let variant = match value.value().to_ascii_lowercase().replace('-', "_").as_str() {
        "insert" => "Insert",
        "update" => "Update",
        "soft_delete" | "softdelete" => "SoftDelete",
        "always" => "Always",
        other => {
            return Err(syn::Error::new(
                value.span(),
                format!(
                    "unknown strategy `{other}`, expected one of: {}",
                    STRATEGIES.join(", ")
                )
            ));
        }
    };
    Ok(Ident::new(variant, value.span()))
}
