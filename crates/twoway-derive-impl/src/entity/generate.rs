// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! `impl Entity` generation.
//!
//! Each mapped field becomes one `EntityTypeInfoBuilder::column` call with a
//! getter and a setter closure. Closures capture nothing, so they coerce to
//! the `fn` pointers the accessor table stores.

use proc_macro2::TokenStream;
use quote::quote;

use super::parse::{ColumnDef, EntityDef};
use crate::utils::crate_path;

/// Generate the `Entity` implementation.
pub fn generate(entity: &EntityDef) -> TokenStream {
    let krate = crate_path();
    let ident = &entity.ident;
    let (impl_generics, ty_generics, where_clause) = entity.generics.split_for_impl();
    let table = &entity.table;
    let schema = entity.schema.as_ref().map(|schema| quote!(.schema(#schema)));
    let columns = entity.columns().map(|column| generate_column(entity, column));

    quote! {
        #[automatically_derived]
        impl #impl_generics #krate::Entity for #ident #ty_generics #where_clause {
            fn build_type_info() -> #krate::EntityTypeInfo<Self> {
                #krate::EntityTypeInfoBuilder::<Self>::new(#table)
                    #schema
                    #(#columns)*
                    .build()
            }
        }
    }
}

fn generate_column(entity: &EntityDef, column: &ColumnDef) -> TokenStream {
    let krate = crate_path();
    let field = &column.ident;
    let ty = &column.ty;
    let property = field.to_string();
    let column_name = entity.column_name(column);
    let explicit_nullable = column.nullable;
    let info = column_info(column);

    quote! {
        .column(
            #krate::EntityColumnInfo::new(
                #property,
                #column_name,
                <#ty as #krate::HasValueKind>::KIND
            )
            .nullable(<#ty as #krate::HasValueKind>::NULLABLE || #explicit_nullable)
            #info,
            |e| #krate::ToValue::to_value(&e.#field),
            |e, v| {
                e.#field = <#ty as #krate::FromValue>::from_value(v)?;
                ::core::result::Result::Ok(())
            }
        )
    }
}

/// Builder calls for the column's flags and options.
fn column_info(column: &ColumnDef) -> TokenStream {
    let krate = crate_path();
    let mut calls = TokenStream::new();

    if column.key {
        calls.extend(quote!(.primary_key()));
    }
    if column.identity {
        calls.extend(quote!(.identity()));
    }
    if column.version {
        calls.extend(quote!(.version()));
    }
    if column.soft_delete {
        calls.extend(quote!(.soft_delete_key()));
    }
    if let Some(max_length) = column.max_length {
        calls.extend(quote!(.max_length(#max_length)));
    }
    if let Some(db_type) = &column.db_type {
        calls.extend(quote!(.db_type(#krate::DbType::#db_type)));
    }
    if let Some(converter) = &column.converter {
        calls.extend(quote!(.converter(#converter)));
    }
    if let Some(sequence) = &column.sequence {
        let name = &sequence.name;
        let prefix = &sequence.prefix;
        let padding = sequence.padding;
        let schema = match &sequence.schema {
            Some(schema) => quote!(::core::option::Option::Some(::std::string::String::from(#schema))),
            None => quote!(::core::option::Option::None)
        };
        calls.extend(quote! {
            .sequence(#krate::SequenceAttribute {
                name:    ::std::string::String::from(#name),
                schema:  #schema,
                prefix:  ::std::string::String::from(#prefix),
                padding: #padding
            })
        });
    }
    if let Some(timestamp) = &column.timestamp {
        let strategy = &timestamp.strategy;
        let sql = match &timestamp.sql {
            Some(sql) => quote!(::core::option::Option::Some(::std::string::String::from(#sql))),
            None => quote!(::core::option::Option::None)
        };
        calls.extend(quote! {
            .current_timestamp(#krate::CurrentTimestampAttribute {
                strategy: #krate::CurrentTimestampStrategy::#strategy,
                sql:      #sql
            })
        });
    }

    calls
}

#[cfg(test)]
mod tests {
    use syn::parse_quote;

    use super::*;

    fn generated(input: syn::DeriveInput) -> String {
        let entity = EntityDef::from_derive_input(&input).unwrap();
        generate(&entity).to_string()
    }

    #[test]
    fn builder_chain_follows_field_order() {
        let code = generated(parse_quote! {
            #[entity(table = "EMP", schema = "dbo", rename_all = "SCREAMING_SNAKE_CASE")]
            pub struct Emp {
                #[column(key)]
                pub id: i32,
                pub name: Option<String>,
                #[column(not_mapped)]
                pub cache: Vec<i32>,
                #[column(version, name = "VER")]
                pub version_no: i32
            }
        });

        assert!(code.contains("impl :: twoway_sql :: Entity for Emp"));
        assert!(code.contains(". schema (\"dbo\")"));
        let id = code.find("\"ID\"").unwrap();
        let name = code.find("\"NAME\"").unwrap();
        let version = code.find("\"VER\"").unwrap();
        assert!(id < name && name < version);
        assert!(!code.contains("\"CACHE\""));
        assert!(code.contains(". primary_key ()"));
        assert!(code.contains(". version ()"));
    }

    #[test]
    fn no_schema_call_without_schema() {
        let code = generated(parse_quote! {
            pub struct Tag {
                #[column(key)]
                pub id: i32
            }
        });
        assert!(!code.contains(". schema"));
        assert!(code.contains("new (\"Tag\")"));
    }

    #[test]
    fn options_become_builder_calls() {
        let code = generated(parse_quote! {
            pub struct Ticket {
                #[column(key, identity)]
                pub id: i64,
                #[column(sequence(name = "CODE_SEQ", prefix = "T", padding = 4), db_type = "AnsiString")]
                pub code: String,
                #[column(current_timestamp(strategy = "update"), nullable)]
                pub touched_at: String,
                #[column(soft_delete, converter = "crate::YES_NO")]
                pub deleted: bool
            }
        });
        assert!(code.contains(". identity ()"));
        assert!(code.contains("DbType :: AnsiString"));
        assert!(code.contains("SequenceAttribute"));
        assert!(code.contains("\"CODE_SEQ\""));
        assert!(code.contains("CurrentTimestampStrategy :: Update"));
        assert!(code.contains("|| true"));
        assert!(code.contains(". soft_delete_key ()"));
        assert!(code.contains(". converter (crate :: YES_NO)"));
    }

    #[test]
    fn generics_are_forwarded() {
        let code = generated(parse_quote! {
            pub struct Wrapper<T: Clone + 'static> {
                #[column(key)]
                pub id: T
            }
        });
        assert!(code.contains("impl < T : Clone + 'static >"));
        assert!(code.contains("for Wrapper < T >"));
    }
}
