// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]

//! # twoway-sql
//!
//! One crate, all features. Re-exports:
//! - [`Entity`] and [`SqlParameter`] derive macros from `twoway-derive-impl`
//! - All types from `twoway-core` ([`SqlParser`], [`QueryBuilder`],
//!   [`Dialect`], [`dao`])
//!
//! # Quick Start
//!
//! ```rust
//! use twoway_sql::{
//!     Dialect, Entity, EvaluationContext, QueryBuilder, QueryBuilderParameter, SqlKind,
//!     SqlParameter, SqlParser, SqlParserConfig
//! };
//!
//! #[derive(Entity)]
//! #[entity(table = "EMP", rename_all = "SCREAMING_SNAKE_CASE")]
//! pub struct Emp {
//!     #[column(key)]
//!     pub id:      i32,
//!     pub name:    Option<String>,
//!     #[column(version)]
//!     pub version: i32
//! }
//!
//! #[derive(SqlParameter)]
//! pub struct ByName {
//!     pub name: Option<String>
//! }
//!
//! let config = SqlParserConfig::for_dialect(Dialect::PostgreSql);
//!
//! // 2-way SQL template
//! let template = SqlParser::new(&config)
//!     .parse_text("select * from emp where /*%if name != null*/name = /*name*/'x'/*%end*/")
//!     .unwrap();
//! let ctx = EvaluationContext::from_object(&ByName {
//!     name: Some("SMITH".to_string())
//! });
//! let result = template.build(&ctx).unwrap();
//! assert_eq!(result.parsed_sql, "select * from emp where name = $1");
//!
//! // Entity statement
//! let mut emp = Emp {
//!     id:      7,
//!     name:    None,
//!     version: 1
//! };
//! let param = QueryBuilderParameter::new(&mut emp, SqlKind::Delete, &config);
//! let result = QueryBuilder::build(&param).unwrap();
//! assert_eq!(
//!     result.parsed_sql,
//!     r#"DELETE FROM "EMP" WHERE "ID" = $1 AND "VERSION" = $2"#
//! );
//! ```
//!
//! # Rejected Definitions
//!
//! Tuple structs have no column names:
//!
//! ```rust,compile_fail
//! use twoway_sql::Entity;
//!
//! #[derive(Entity)]
//! pub struct Pair(i32, i32);
//! ```
//!
//! Enums are not entities:
//!
//! ```rust,compile_fail
//! use twoway_sql::Entity;
//!
//! #[derive(Entity)]
//! pub enum Status {
//!     Active
//! }
//! ```
//!
//! At most one identity column:
//!
//! ```rust,compile_fail
//! use twoway_sql::Entity;
//!
//! #[derive(Entity)]
//! pub struct Twice {
//!     #[column(key, identity)]
//!     pub a: i64,
//!     #[column(identity)]
//!     pub b: i64
//! }
//! ```
//!
//! Timestamp strategies are checked at compile time:
//!
//! ```rust,compile_fail
//! use twoway_sql::Entity;
//!
//! #[derive(Entity)]
//! pub struct Audit {
//!     #[column(key)]
//!     pub id: i32,
//!     #[column(current_timestamp(strategy = "sometimes"))]
//!     pub at: Option<chrono::NaiveDateTime>
//! }
//! ```
//!
//! So are driver types:
//!
//! ```rust,compile_fail
//! use twoway_sql::Entity;
//!
//! #[derive(Entity)]
//! pub struct Odd {
//!     #[column(key, db_type = "Varchar2")]
//!     pub id: String
//! }
//! ```
//!
//! Field types need a value mapping:
//!
//! ```rust,compile_fail
//! use twoway_sql::Entity;
//!
//! pub struct Unmapped;
//!
//! #[derive(Entity)]
//! pub struct Holder {
//!     #[column(key)]
//!     pub id:    i32,
//!     pub other: Unmapped
//! }
//! ```

pub use twoway_core::*;
pub use twoway_derive_impl::{Entity, SqlParameter};
