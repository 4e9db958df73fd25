// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Core engine of twoway-sql.
//!
//! 2-way SQL files are plain SQL that runs as-is in any SQL tool. Directives
//! live in block comments and are honoured only by this engine:
//!
//! ```sql
//! select * from emp
//! where
//!   /*%if name != null*/ name = /*name*/'SMITH' /*%end*/
//!   and dept_id in /*dept_ids*/(1, 2)
//! order by /*#order*/id
//! ```
//!
//! # Overview
//!
//! - [`tokenizer`] and [`parser`] — SQL text into a [`SqlNode`] tree
//! - [`ExpressionEvaluator`] — directive conditions against an [`EvaluationContext`]
//! - [`SqlBuilder`] — tree plus values into a [`SqlParserResult`]
//! - [`transform`] — per-dialect paging and count rewrites
//! - [`QueryBuilder`] — INSERT / UPDATE / DELETE / soft delete / SELECT / MERGE from entity metadata
//! - [`sequence`] and [`dao`] — sequence fetch, read-back and optimistic lock around an executor
//! - [`prelude`] — convenient re-exports
//!
//! # Usage
//!
//! ```rust
//! use twoway_core::{Dialect, EvaluationContext, SqlParser, SqlParserConfig, Value};
//!
//! let config = SqlParserConfig::for_dialect(Dialect::PostgreSql);
//! let template = SqlParser::new(&config)
//!     .parse_text("select * from emp where id = /*id*/1")
//!     .unwrap();
//! let ctx = EvaluationContext::new().with("id", Value::Int(7));
//! let result = template.build(&ctx).unwrap();
//! assert_eq!(result.parsed_sql, "select * from emp where id = $1");
//! assert_eq!(result.debug_sql, "select * from emp where id = 7");
//! ```

#![warn(clippy::all)]

mod builder;
mod cache;
mod config;
mod context;
pub mod dao;
mod dialect;
mod entity;
mod error;
mod executor;
mod expression;
pub mod node;
pub mod parser;
pub mod prelude;
mod query_builder;
mod result;
pub mod sequence;
mod sql_parser;
pub mod tokenizer;
pub mod transform;
mod value;

/// Re-export async_trait for executor implementations.
pub use async_trait::async_trait;
pub use builder::{Mark, SqlBuilder, SqlContext};
pub use cache::{EntityInfoCache, SqlFileCache, SqlFileInfo};
pub use config::{
    ConfigEntry, ConfigRegistry, DefaultParameterFactory, ParameterFactory, SqlParserConfig,
    SqlParserConfigBuilder
};
pub use context::{EvaluationContext, Scope, VariableSource};
pub use dialect::{
    CountStrategy, DbConnectionKind, Dialect, MergeStyle, ParameterStyle, ReturningStyle
};
pub use entity::{
    ColumnAccessor, CurrentTimestampAttribute, CurrentTimestampStrategy, Entity,
    EntityColumnInfo, EntityTypeInfo, EntityTypeInfoBuilder, SequenceAttribute, ValueConverter
};
pub use error::{Error, MessageCode, Result};
pub use executor::{AsyncSqlExecutor, Row, SqlExecutor};
pub use expression::ExpressionEvaluator;
pub use node::SqlNode;
pub use parser::parse;
pub use query_builder::{
    FetchMode, LAST_INSERT_ID_SQL, QueryBehavior, QueryBuilder, QueryBuilderParameter, QueryPlan,
    SqlKind
};
pub use result::{DbParameter, ParameterDirection, SqlParserResult};
pub use sql_parser::{PagedQuery, SqlParser, SqlTemplate};
pub use transform::{PagingOptions, PagingTransformer};
pub use value::{DbType, FromValue, HasValueKind, ToValue, Value, ValueKind};
