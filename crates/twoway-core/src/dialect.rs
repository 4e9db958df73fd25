// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Database dialects.
//!
//! A [`Dialect`] decides every database-specific piece of generated SQL:
//! placeholders, identifier quoting, literal formatting, sequence queries,
//! identity read-back and paging.
//!
//! # Supported Dialects
//!
//! | Dialect | Placeholder | Quoting | Bool literal | Sequences | Read-back |
//! |---------|-------------|---------|--------------|-----------|-----------|
//! | `Standard` | `?` | `"x"` | `true` | no | none |
//! | `SqlServer` | `@name` | `[x]` | `1` | yes | `OUTPUT` |
//! | `SqlServer2008` | `@name` | `[x]` | `1` | no | `OUTPUT` |
//! | `Oracle`, `Oracle11` | `:name` | `"x"` | `1` | yes | `RETURNING INTO` |
//! | `PostgreSql` | `$n` | `"x"` | `true` | yes | `RETURNING` |
//! | `MySql` | `?` | `` `x` `` | `true` | no | `LAST_INSERT_ID()` |
//! | `Sqlite` | `@name` | `"x"` | `1` | no | `RETURNING` |
//! | `Db2` | `?` | `"x"` | `1` | yes | `FINAL TABLE` |

use serde::Deserialize;

use crate::{
    transform::{
        PagingOptions, PagingTransformer, db2::Db2Paging, mysql::MySqlPaging,
        oracle::OraclePaging, postgres::PostgresPaging, sqlite::SqlitePaging,
        sqlserver::{SqlServer2008Paging, SqlServerPaging},
        standard::StandardPaging
    },
    value::{Value, ValueKind}
};

/// SQL dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// ANSI SQL with ROW_NUMBER paging.
    #[default]
    Standard,
    /// SQL Server 2012 and later.
    #[serde(alias = "mssql")]
    SqlServer,
    /// SQL Server 2008 and earlier.
    SqlServer2008,
    /// Oracle 12c and later.
    Oracle,
    /// Oracle 11g and earlier.
    Oracle11,
    /// PostgreSQL.
    #[serde(alias = "postgres")]
    PostgreSql,
    /// MySQL and MariaDB.
    MySql,
    /// SQLite.
    Sqlite,
    /// IBM DB2.
    Db2
}

/// Placeholder syntax of a dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterStyle {
    /// `@name` or `:name`.
    Named(char),
    /// `?`.
    Positional,
    /// `$1`, `$2`, ...
    Numbered
}

impl ParameterStyle {
    /// Placeholder text for a parameter named `name` at 1-based `index`.
    #[must_use]
    pub fn placeholder(&self, name: &str, index: usize) -> String {
        match self {
            Self::Named(prefix) => format!("{prefix}{name}"),
            Self::Positional => "?".to_string(),
            Self::Numbered => format!("${index}")
        }
    }

    /// Name recorded on the parameter object.
    #[must_use]
    pub fn parameter_name(&self, name: &str) -> String {
        match self {
            Self::Named(prefix) => format!("{prefix}{name}"),
            Self::Positional | Self::Numbered => name.to_string()
        }
    }
}

/// How generated values come back from an INSERT.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturningStyle {
    /// `OUTPUT INSERTED.col` before `VALUES`.
    Output,
    /// `RETURNING col` after the statement.
    Returning,
    /// `RETURNING col INTO :out` with output parameters.
    ReturningInto,
    /// `SELECT col FROM FINAL TABLE (INSERT ...)`.
    FinalTable,
    /// Follow-up `SELECT LAST_INSERT_ID()`.
    LastInsertId,
    /// No read-back mechanism.
    Unsupported
}

/// Upsert syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeStyle {
    /// `MERGE INTO ... USING ... WHEN MATCHED ...`.
    Merge,
    /// `INSERT ... ON CONFLICT (keys) DO UPDATE SET ...`.
    OnConflict,
    /// `INSERT ... ON DUPLICATE KEY UPDATE ...`.
    OnDuplicateKey
}

/// How a total row count accompanies a paged query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountStrategy {
    /// Separate `select count(*) from ( ... ) t_`.
    Subquery,
    /// `sql_calc_found_rows` on the paged query and `select found_rows()`.
    FoundRows
}

/// Kind of the database connection a configuration targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DbConnectionKind {
    SqlServer,
    Oracle,
    PostgreSql,
    MySql,
    Sqlite,
    Db2,
    Odbc,
    #[default]
    Other
}

impl DbConnectionKind {
    /// Dialect normally used with this connection kind.
    #[must_use]
    pub const fn default_dialect(&self) -> Dialect {
        match self {
            Self::SqlServer => Dialect::SqlServer,
            Self::Oracle => Dialect::Oracle,
            Self::PostgreSql => Dialect::PostgreSql,
            Self::MySql => Dialect::MySql,
            Self::Sqlite => Dialect::Sqlite,
            Self::Db2 => Dialect::Db2,
            Self::Odbc | Self::Other => Dialect::Standard
        }
    }
}

impl Dialect {
    /// Default placeholder syntax.
    #[must_use]
    pub const fn parameter_style(&self) -> ParameterStyle {
        match self {
            Self::SqlServer | Self::SqlServer2008 | Self::Sqlite => ParameterStyle::Named('@'),
            Self::Oracle | Self::Oracle11 => ParameterStyle::Named(':'),
            Self::PostgreSql => ParameterStyle::Numbered,
            Self::Standard | Self::MySql | Self::Db2 => ParameterStyle::Positional
        }
    }

    /// Quote an identifier.
    #[must_use]
    pub fn quote(&self, identifier: &str) -> String {
        match self {
            Self::SqlServer | Self::SqlServer2008 => format!("[{identifier}]"),
            Self::MySql => format!("`{identifier}`"),
            _ => format!("\"{identifier}\"")
        }
    }

    /// Whether booleans render as `1`/`0`.
    #[must_use]
    pub const fn uses_numeric_bool(&self) -> bool {
        !matches!(self, Self::Standard | Self::PostgreSql | Self::MySql)
    }

    /// SQL function for the current timestamp.
    #[must_use]
    pub const fn current_timestamp_sql(&self) -> &'static str {
        match self {
            Self::SqlServer | Self::SqlServer2008 => "GETDATE()",
            Self::Db2 => "CURRENT TIMESTAMP",
            _ => "CURRENT_TIMESTAMP"
        }
    }

    /// Format `value` as an inline SQL literal.
    ///
    /// # Example
    ///
    /// ```rust
    /// use twoway_core::{Dialect, Value};
    ///
    /// assert_eq!(Dialect::Standard.format_literal(&Value::String("O'Neil".into())), "'O''Neil'");
    /// assert_eq!(Dialect::SqlServer.format_literal(&Value::Bool(true)), "1");
    /// ```
    #[must_use]
    pub fn format_literal(&self, value: &Value) -> String {
        let quoted = |text: &str| format!("'{}'", text.replace('\'', "''"));
        let oracle = matches!(self, Self::Oracle | Self::Oracle11);
        match value {
            Value::Null => "null".to_string(),
            Value::Bool(b) if self.uses_numeric_bool() => String::from(if *b { "1" } else { "0" }),
            Value::Bool(b) => b.to_string(),
            Value::String(s) => quoted(s),
            Value::Date(_) if oracle => format!("date {}", quoted(&value.display_text())),
            Value::DateTime(_) | Value::DateTimeOffset(_) if oracle => {
                format!("timestamp {}", quoted(&value.display_text()))
            }
            Value::Date(_)
            | Value::Time(_)
            | Value::DateTime(_)
            | Value::DateTimeOffset(_)
            | Value::Uuid(_)
            | Value::Object(_) => quoted(&value.display_text()),
            Value::Bytes(_) => match self {
                Self::SqlServer | Self::SqlServer2008 => format!("0x{}", value.display_text()),
                Self::PostgreSql => format!("'\\x{}'", value.display_text()),
                _ => format!("X'{}'", value.display_text())
            },
            Value::List(items) => items
                .iter()
                .map(|item| self.format_literal(item))
                .collect::<Vec<_>>()
                .join(", "),
            Value::Byte(_)
            | Value::Short(_)
            | Value::Int(_)
            | Value::Long(_)
            | Value::UInt(_)
            | Value::ULong(_)
            | Value::Float(_)
            | Value::Double(_)
            | Value::Decimal(_) => value.display_text()
        }
    }

    /// Query returning the next value of a sequence.
    ///
    /// Returns `None` when the dialect has no sequences.
    #[must_use]
    pub fn sequence_sql(&self, name: &str, schema: Option<&str>) -> Option<String> {
        let qualified = match schema {
            Some(schema) if !schema.is_empty() => format!("{schema}.{name}"),
            _ => name.to_string()
        };
        match self {
            Self::SqlServer => Some(format!("SELECT NEXT VALUE FOR {qualified}")),
            Self::Oracle | Self::Oracle11 => Some(format!("SELECT {qualified}.NEXTVAL FROM DUAL")),
            Self::PostgreSql => Some(format!("SELECT nextval('{qualified}')")),
            Self::Db2 => Some(format!(
                "SELECT NEXT VALUE FOR {qualified} FROM SYSIBM.SYSDUMMY1"
            )),
            Self::Standard | Self::SqlServer2008 | Self::MySql | Self::Sqlite => None
        }
    }

    /// Whether sequence queries are available.
    #[must_use]
    pub const fn supports_sequence(&self) -> bool {
        matches!(
            self,
            Self::SqlServer | Self::Oracle | Self::Oracle11 | Self::PostgreSql | Self::Db2
        )
    }

    /// Scalar kind a sequence query returns through the driver, when it
    /// differs from the column's declared kind.
    #[must_use]
    pub const fn native_sequence_kind(&self) -> Option<ValueKind> {
        match self {
            Self::Oracle | Self::Oracle11 => Some(ValueKind::Decimal),
            Self::PostgreSql => Some(ValueKind::Long),
            _ => None
        }
    }

    /// Identity and generated-column read-back mechanism.
    #[must_use]
    pub const fn returning_style(&self) -> ReturningStyle {
        match self {
            Self::SqlServer | Self::SqlServer2008 => ReturningStyle::Output,
            Self::PostgreSql | Self::Sqlite => ReturningStyle::Returning,
            Self::Oracle | Self::Oracle11 => ReturningStyle::ReturningInto,
            Self::Db2 => ReturningStyle::FinalTable,
            Self::MySql => ReturningStyle::LastInsertId,
            Self::Standard => ReturningStyle::Unsupported
        }
    }

    /// Upsert syntax.
    #[must_use]
    pub const fn merge_style(&self) -> MergeStyle {
        match self {
            Self::PostgreSql | Self::Sqlite => MergeStyle::OnConflict,
            Self::MySql => MergeStyle::OnDuplicateKey,
            _ => MergeStyle::Merge
        }
    }

    /// Total-count mechanism for paged queries.
    #[must_use]
    pub const fn count_strategy(&self) -> CountStrategy {
        match self {
            Self::MySql => CountStrategy::FoundRows,
            _ => CountStrategy::Subquery
        }
    }

    /// Escape character used by the LIKE helper functions.
    #[must_use]
    pub const fn like_escape_char(&self) -> char {
        '$'
    }

    /// Characters with wildcard meaning inside LIKE patterns.
    #[must_use]
    pub const fn like_wildcards(&self) -> &'static [char] {
        match self {
            Self::SqlServer | Self::SqlServer2008 => &['%', '_', '['],
            _ => &['%', '_']
        }
    }

    /// Paging transformer for `options`.
    #[must_use]
    pub fn paging_transformer(&self, options: &PagingOptions) -> Box<dyn PagingTransformer> {
        let options = options.clone();
        match self {
            Self::Standard => Box::new(StandardPaging::new(options)),
            Self::SqlServer => Box::new(SqlServerPaging::new(options)),
            Self::SqlServer2008 => Box::new(SqlServer2008Paging::new(options)),
            Self::Oracle | Self::Oracle11 => Box::new(OraclePaging::new(options)),
            Self::PostgreSql => Box::new(PostgresPaging::new(options)),
            Self::MySql => Box::new(MySqlPaging::new(options)),
            Self::Sqlite => Box::new(SqlitePaging::new(options)),
            Self::Db2 => Box::new(Db2Paging::new(options))
        }
    }
}
