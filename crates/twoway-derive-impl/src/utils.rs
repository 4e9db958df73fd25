// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Shared utilities for code generation.
//!
//! # Submodules
//!
//! - [`naming`] — `rename_all` rules

pub mod naming;

use proc_macro2::TokenStream;
use quote::quote;
use syn::Type;

/// Path of the facade crate in generated code.
pub fn crate_path() -> TokenStream {
    quote!(::twoway_sql)
}

/// Whether `ty` is written as `Option<...>`.
#[must_use]
pub fn is_option(ty: &Type) -> bool {
    if let Type::Path(type_path) = ty
        && let Some(segment) = type_path.path.segments.last()
    {
        return segment.ident == "Option";
    }
    false
}
