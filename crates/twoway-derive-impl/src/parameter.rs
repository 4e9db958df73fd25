// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! `#[derive(SqlParameter)]` implementation.
//!
//! Generates `ToValue` returning `Value::Object` keyed by property name, so a
//! parameter struct can feed `EvaluationContext::from_object`.

use darling::{FromDeriveInput, FromField, ast::Data, util::Ignored};
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{DeriveInput, Generics, Ident, parse_macro_input};

use crate::utils::{crate_path, naming::RenameRule};

#[derive(Debug, FromField)]
#[darling(attributes(parameter))]
struct ParameterField {
    ident:  Option<Ident>,
    #[darling(default)]
    rename: Option<String>,
    #[darling(default)]
    skip:   bool
}

#[derive(Debug, FromDeriveInput)]
#[darling(attributes(parameter), supports(struct_named))]
struct ParameterDef {
    ident:      Ident,
    generics:   Generics,
    data:       Data<Ignored, ParameterField>,
    #[darling(default)]
    rename_all: RenameRule
}

impl ParameterDef {
    /// Property names and field identifiers of the included fields.
    fn properties(&self) -> Vec<(String, &Ident)> {
        let Data::Struct(fields) = &self.data else {
            return Vec::new();
        };
        fields
            .iter()
            .filter(|field| !field.skip)
            .filter_map(|field| {
                let ident = field.ident.as_ref()?;
                let name = field
                    .rename
                    .clone()
                    .unwrap_or_else(|| self.rename_all.apply(&ident.to_string()));
                Some((name, ident))
            })
            .collect()
    }
}

/// Main entry point for the `#[derive(SqlParameter)]` macro.
pub fn derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match ParameterDef::from_derive_input(&input) {
        Ok(def) => generate(&def).into(),
        Err(err) => err.write_errors().into()
    }
}

fn generate(def: &ParameterDef) -> TokenStream2 {
    let krate = crate_path();
    let ident = &def.ident;
    let (impl_generics, ty_generics, where_clause) = def.generics.split_for_impl();
    let inserts = def.properties().into_iter().map(|(name, field)| {
        quote! {
            properties.insert(
                ::std::string::String::from(#name),
                #krate::ToValue::to_value(&self.#field)
            );
        }
    });

    quote! {
        #[automatically_derived]
        impl #impl_generics #krate::ToValue for #ident #ty_generics #where_clause {
            fn to_value(&self) -> #krate::Value {
                let mut properties = ::std::collections::BTreeMap::new();
                #(#inserts)*
                #krate::Value::Object(properties)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use syn::parse_quote;

    use super::*;

    fn parse(input: DeriveInput) -> ParameterDef {
        ParameterDef::from_derive_input(&input).unwrap()
    }

    #[test]
    fn field_names_and_renames() {
        let def = parse(parse_quote! {
            pub struct EmpSearch {
                pub name: Option<String>,
                #[parameter(rename = "deptIds")]
                pub dept_ids: Vec<i32>,
                #[parameter(skip)]
                pub internal: u8
            }
        });
        let names: Vec<String> = def.properties().into_iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["name", "deptIds"]);
    }

    #[test]
    fn rename_all_applies_to_unrenamed_fields() {
        let def = parse(parse_quote! {
            #[parameter(rename_all = "camelCase")]
            pub struct Range {
                pub min_salary: i32,
                #[parameter(rename = "MAX")]
                pub max_salary: i32
            }
        });
        let names: Vec<String> = def.properties().into_iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["minSalary", "MAX"]);
    }

    #[test]
    fn generates_object_value() {
        let code = generate(&parse(parse_quote! {
            pub struct ById {
                pub id: i32
            }
        }))
        .to_string();
        assert!(code.contains("impl :: twoway_sql :: ToValue for ById"));
        assert!(code.contains("\"id\""));
        assert!(code.contains("Value :: Object (properties)"));
    }

    #[test]
    fn rejects_enum() {
        let input: DeriveInput = parse_quote! {
            pub enum Choice { A, B }
        };
        assert!(ParameterDef::from_derive_input(&input).is_err());
    }
}
