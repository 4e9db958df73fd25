// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Convenient re-exports for common usage.
//!
//! # Usage
//!
//! ```rust,ignore
//! use twoway_core::prelude::*;
//! ```

pub use crate::{
    AsyncSqlExecutor, Dialect, Entity, EntityColumnInfo, EntityTypeInfo, EntityTypeInfoBuilder,
    Error, EvaluationContext, FromValue, PagingOptions, QueryBehavior, QueryBuilder,
    QueryBuilderParameter, Result, Row, SqlExecutor, SqlKind, SqlParser, SqlParserConfig,
    SqlParserResult, SqlTemplate, ToValue, Value, ValueKind, async_trait, dao
};
