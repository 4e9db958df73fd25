// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Entity-driven statements.
//!
//! [`QueryBuilder`] writes INSERT, UPDATE, DELETE, soft-delete, select-by-key
//! and upsert statements from an entity's [`EntityTypeInfo`](crate::EntityTypeInfo).
//! Output goes through the same [`SqlContext`](crate::SqlContext) as template
//! builds, so placeholders, parameter names and debug literals look the same.
//!
//! # Module Structure
//!
//! ```text
//! query_builder/
//! ├── parameter.rs   — per-call request and version snapshot
//! ├── statement.rs   — shared output state and column helpers
//! ├── insert.rs      — INSERT with identity read-back
//! ├── update.rs      — UPDATE and soft delete
//! ├── delete.rs      — DELETE
//! ├── select.rs      — SELECT by key
//! ├── merge.rs       — MERGE, ON CONFLICT, ON DUPLICATE KEY
//! └── returning.rs   — RETURNING / OUTPUT / FINAL TABLE / LAST_INSERT_ID
//! ```
//!
//! # Statements
//!
//! | Kind | SQL Server rendering |
//! |------|----------------------|
//! | Insert | `INSERT INTO [T] ([A], [B]) VALUES (@a, @b)` |
//! | Update | `UPDATE [T] SET [B] = @b, [V] = [V] + 1 WHERE [ID] = @id AND [V] = @v` |
//! | Delete | `DELETE FROM [T] WHERE [ID] = @id AND [V] = @v` |
//! | SoftDelete | `UPDATE [T] SET [DELETED] = @deleted WHERE [ID] = @id AND [V] = @v` |
//! | Select | `SELECT [ID], [B] FROM [T] WHERE [ID] = @id` |
//! | Merge | `MERGE INTO [T] AS t USING (SELECT ...) AS s ON (...) ...;` |
//!
//! The version filter and the `[V] = [V] + 1` assignment disappear when
//! `ignore_version` is set; the version column is then bound like any other.

mod delete;
mod insert;
mod merge;
mod parameter;
mod returning;
mod select;
mod statement;
mod update;

#[cfg(test)]
mod tests;

pub use parameter::QueryBuilderParameter;
pub use returning::LAST_INSERT_ID_SQL;
use statement::Statement;

use crate::{entity::Entity, error::Result, result::SqlParserResult};

/// Statement kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlKind {
    Insert,
    Update,
    Delete,
    /// UPDATE of the soft-delete key and soft-delete timestamps only.
    SoftDelete,
    /// SELECT of one row by key.
    Select,
    /// Insert or update by key.
    Merge
}

impl SqlKind {
    /// Whether a version filter can guard the statement.
    #[must_use]
    pub const fn is_version_checked(&self) -> bool {
        matches!(self, Self::Update | Self::Delete | Self::SoftDelete)
    }
}

/// Which columns a write reads back from the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum QueryBehavior {
    /// Nothing.
    #[default]
    None,
    /// The identity column.
    IdentityOnly,
    /// Every mapped column.
    AllColumns,
    /// The identity column when the entity has one, else every column.
    IdentityOrAllColumns
}

/// How the caller obtains read-back values after running the statement.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchMode {
    /// Execute and read the affected row count.
    None,
    /// Query one row whose columns map back onto the entity.
    Row,
    /// Execute, then run `sql` and assign its scalar to `column`.
    Scalar {
        sql:    SqlParserResult,
        column: String
    }
}

/// Statement plus the read-back it needs.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPlan {
    pub result: SqlParserResult,
    pub fetch:  FetchMode
}

/// Builds statements from entity metadata.
///
/// # Example
///
/// ```rust
/// use twoway_core::{
///     Dialect, Entity, EntityColumnInfo, EntityTypeInfo, EntityTypeInfoBuilder, FromValue,
///     QueryBuilder, QueryBuilderParameter, SqlKind, SqlParserConfig, ToValue, ValueKind
/// };
///
/// struct Dept {
///     id:   i32,
///     name: String
/// }
///
/// impl Entity for Dept {
///     fn build_type_info() -> EntityTypeInfo<Self> {
///         EntityTypeInfoBuilder::<Self>::new("DEPT")
///             .column(
///                 EntityColumnInfo::new("id", "ID", ValueKind::Int).primary_key(),
///                 |e| e.id.to_value(),
///                 |e, v| {
///                     e.id = i32::from_value(v)?;
///                     Ok(())
///                 }
///             )
///             .column(
///                 EntityColumnInfo::new("name", "NAME", ValueKind::String),
///                 |e| e.name.to_value(),
///                 |e, v| {
///                     e.name = String::from_value(v)?;
///                     Ok(())
///                 }
///             )
///             .build()
///     }
/// }
///
/// let config = SqlParserConfig::for_dialect(Dialect::PostgreSql);
/// let mut dept = Dept {
///     id:   1,
///     name: "Sales".to_string()
/// };
/// let param = QueryBuilderParameter::new(&mut dept, SqlKind::Update, &config);
/// let result = QueryBuilder::build(&param).unwrap();
/// assert_eq!(result.parsed_sql, r#"UPDATE "DEPT" SET "NAME" = $1 WHERE "ID" = $2"#);
/// assert_eq!(result.debug_sql, r#"UPDATE "DEPT" SET "NAME" = 'Sales' WHERE "ID" = 1"#);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryBuilder;

impl QueryBuilder {
    /// Build the statement and its read-back plan.
    ///
    /// Sequence columns must already hold their values; see
    /// [`crate::sequence`].
    ///
    /// # Errors
    ///
    /// - [`crate::Error::EntityKeyMissing`] when a keyed statement targets
    ///   an entity without key columns
    /// - [`crate::Error::NoWritableColumns`] when nothing would be assigned
    pub fn plan<E: Entity>(param: &QueryBuilderParameter<'_, E>) -> Result<QueryPlan> {
        let statement = Statement::new(param);
        match param.kind {
            SqlKind::Insert => statement.insert(),
            SqlKind::Update => statement.update(),
            SqlKind::SoftDelete => statement.soft_delete(),
            SqlKind::Delete => statement.delete(),
            SqlKind::Select => statement.select(),
            SqlKind::Merge => statement.merge()
        }
    }

    /// Build the statement only.
    ///
    /// # Errors
    ///
    /// Same as [`QueryBuilder::plan`].
    pub fn build<E: Entity>(param: &QueryBuilderParameter<'_, E>) -> Result<SqlParserResult> {
        Self::plan(param).map(|plan| plan.result)
    }
}
