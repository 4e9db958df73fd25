// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Error types for twoway-core.
//!
//! Every fallible operation returns [`Result`], whose error is a single
//! [`Error`] enum. Variants carry the structured diagnostics needed to
//! reproduce a failure (SQL text, expression text, file path, 1-based
//! line/column) so callers can match on the kind instead of parsing messages.
//!
//! # Taxonomy
//!
//! | Variant | Raised by | Codes |
//! |---------|-----------|-------|
//! | [`Error::SqlParse`] | Tokenizer, parser | `ESP21xx` |
//! | [`Error::SqlBuild`] | SQL builder | `ESP21xx`, `ESP2224` |
//! | [`Error::ExpressionEvaluate`] | Expression evaluator | `ESPA0xx` |
//! | [`Error::SqlTransform`] | Paging transformers | `ESP2201` |
//! | [`Error::InvalidSqlFile`] | [`SqlParser`](crate::SqlParser) | — |
//! | [`Error::InvalidSqlParserConfig`] | Config builder, registry | — |
//! | [`Error::OptimisticLock`] | Write wrappers | — |
//! | [`Error::UnsupportedSqlComment`] | SQL builder | — |
//! | [`Error::SequenceTypeMismatch`] | Sequence generation | — |

use std::{fmt, path::PathBuf};

use thiserror::Error;

use crate::value::ValueKind;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Diagnostic message codes.
///
/// The `Display` form is the upper-case code (`ESP2101`), which is also the
/// prefix of every message carrying it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageCode {
    /// Unterminated quoted literal.
    Esp2101,
    /// Unterminated block comment.
    Esp2102,
    /// `/*%if*/` without a matching `/*%end*/`.
    Esp2104,
    /// `/*%if*/` or `/*%elseif*/` without a condition.
    Esp2105,
    /// Unclosed parenthesis at end of input.
    Esp2109,
    /// Bind or literal variable not followed by a test literal or `(`.
    Esp2110,
    /// `/*%for*/` target is not iterable.
    Esp2112,
    /// `/*%if*/` condition did not evaluate to a boolean.
    Esp2113,
    /// Null element inside a `/*%for*/` target.
    Esp2115,
    /// Embedded variable contains a single quote.
    Esp2116,
    /// Embedded variable contains a semicolon.
    Esp2117,
    /// Unknown `/*%` directive keyword.
    Esp2119,
    /// Bind variable without an expression.
    Esp2120,
    /// Embedded variable without an expression.
    Esp2121,
    /// Embedded variable contains a line comment.
    Esp2122,
    /// Embedded variable contains a block comment.
    Esp2123,
    /// Malformed `/*%for item : expr*/` directive.
    Esp2124,
    /// `/*%for*/` without a matching `/*%end*/`.
    Esp2133,
    /// `/*%end*/` without an open block.
    Esp2134,
    /// Parenthesis crosses a directive block boundary.
    Esp2135,
    /// `/*%elseif*/` without a matching `/*%if*/`.
    Esp2138,
    /// `/*%elseif*/` after `/*%else*/`.
    Esp2139,
    /// `/*%else*/` without a matching `/*%if*/`.
    Esp2140,
    /// Duplicate `/*%else*/`.
    Esp2141,
    /// `/*%expand*/` not followed by `*`.
    Esp2143,
    /// Paging requires an ORDER BY clause.
    Esp2201,
    /// Literal variable contains a single quote.
    Esp2224,
    /// Literal variable without an expression.
    Esp2228,
    /// Unsupported character in an expression.
    EspA001,
    /// Missing closing parenthesis.
    EspA002,
    /// Constant on the left-hand side of a comparison.
    EspA003,
    /// Unterminated string literal.
    EspA004,
    /// Unresolved identifier.
    EspA011,
    /// Unknown property.
    EspA012,
    /// Property access on null.
    EspA013,
    /// Unknown function.
    EspA014,
    /// Invalid function arguments.
    EspA015,
    /// Unknown operator.
    EspA021,
    /// Operands cannot be compared.
    EspA022,
    /// Logical operand is not a boolean.
    EspA023,
    /// Unexpected trailing tokens.
    EspA024,
    /// Malformed int literal.
    EspA031,
    /// Malformed uint literal.
    EspA032,
    /// Malformed long literal.
    EspA033,
    /// Malformed ulong literal.
    EspA034,
    /// Malformed float literal.
    EspA035,
    /// Malformed double literal.
    EspA036,
    /// Malformed decimal literal.
    EspA037,
    /// Integer literal out of range for every integral type.
    EspA038
}

impl MessageCode {
    /// Upper-case code text.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Esp2101 => "ESP2101",
            Self::Esp2102 => "ESP2102",
            Self::Esp2104 => "ESP2104",
            Self::Esp2105 => "ESP2105",
            Self::Esp2109 => "ESP2109",
            Self::Esp2110 => "ESP2110",
            Self::Esp2112 => "ESP2112",
            Self::Esp2113 => "ESP2113",
            Self::Esp2115 => "ESP2115",
            Self::Esp2116 => "ESP2116",
            Self::Esp2117 => "ESP2117",
            Self::Esp2119 => "ESP2119",
            Self::Esp2120 => "ESP2120",
            Self::Esp2121 => "ESP2121",
            Self::Esp2122 => "ESP2122",
            Self::Esp2123 => "ESP2123",
            Self::Esp2124 => "ESP2124",
            Self::Esp2133 => "ESP2133",
            Self::Esp2134 => "ESP2134",
            Self::Esp2135 => "ESP2135",
            Self::Esp2138 => "ESP2138",
            Self::Esp2139 => "ESP2139",
            Self::Esp2140 => "ESP2140",
            Self::Esp2141 => "ESP2141",
            Self::Esp2143 => "ESP2143",
            Self::Esp2201 => "ESP2201",
            Self::Esp2224 => "ESP2224",
            Self::Esp2228 => "ESP2228",
            Self::EspA001 => "ESPA001",
            Self::EspA002 => "ESPA002",
            Self::EspA003 => "ESPA003",
            Self::EspA004 => "ESPA004",
            Self::EspA011 => "ESPA011",
            Self::EspA012 => "ESPA012",
            Self::EspA013 => "ESPA013",
            Self::EspA014 => "ESPA014",
            Self::EspA015 => "ESPA015",
            Self::EspA021 => "ESPA021",
            Self::EspA022 => "ESPA022",
            Self::EspA023 => "ESPA023",
            Self::EspA024 => "ESPA024",
            Self::EspA031 => "ESPA031",
            Self::EspA032 => "ESPA032",
            Self::EspA033 => "ESPA033",
            Self::EspA034 => "ESPA034",
            Self::EspA035 => "ESPA035",
            Self::EspA036 => "ESPA036",
            Self::EspA037 => "ESPA037",
            Self::EspA038 => "ESPA038"
        }
    }
}

impl fmt::Display for MessageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised while parsing, building, transforming or executing SQL.
#[derive(Debug, Error)]
pub enum Error {
    /// Template syntax error.
    #[error("[{code}] {message} (line {line}, column {column}) sql: {sql}")]
    SqlParse {
        code:    MessageCode,
        message: String,
        sql:     String,
        line:    usize,
        column:  usize
    },

    /// Evaluation-time error while rendering a template.
    #[error("[{code}] {message} (line {line}, column {column}) sql: {sql}")]
    SqlBuild {
        code:    MessageCode,
        message: String,
        sql:     String,
        line:    usize,
        column:  usize
    },

    /// Directive expression error.
    #[error("[{code}] {message} (expression: {expression}, position {position})")]
    ExpressionEvaluate {
        code:       MessageCode,
        message:    String,
        expression: String,
        position:   usize
    },

    /// SQL file is missing, unreadable or empty.
    #[error("invalid sql file {}: {reason}", .path.display())]
    InvalidSqlFile { path: PathBuf, reason: String },

    /// Configuration is incomplete or could not be resolved.
    #[error("invalid sql parser config: {reason}")]
    InvalidSqlParserConfig { reason: String },

    /// Paging or count transformation failed.
    #[error("[{code}] {message} sql: {sql}")]
    SqlTransform {
        code:    MessageCode,
        message: String,
        sql:     String
    },

    /// A version-guarded write affected zero rows.
    #[error("optimistic lock failure{}: {debug_sql}", .file_path.as_ref().map(|p| format!(" in {}", p.display())).unwrap_or_default())]
    OptimisticLock {
        parsed_sql: String,
        debug_sql:  String,
        file_path:  Option<PathBuf>
    },

    /// Directive that cannot be rendered in the current context.
    #[error("unsupported sql comment {directive}: {reason}")]
    UnsupportedSqlComment { directive: String, reason: String },

    /// Sequence value could not be coerced to the target property type.
    #[error("sequence value for column {column} has type {actual}, expected {expected}")]
    SequenceTypeMismatch {
        column:   String,
        expected: ValueKind,
        actual:   ValueKind
    },

    /// Value could not be converted into the requested Rust type.
    #[error("cannot convert {actual} value into {expected}")]
    ValueConversion {
        expected: &'static str,
        actual:   ValueKind
    },

    /// Entity has no key columns but the statement needs them.
    #[error("entity mapped to {table} has no key columns")]
    EntityKeyMissing { table: String },

    /// Statement would assign no columns.
    #[error("no writable columns on {table}")]
    NoWritableColumns { table: String },

    /// Error reported by a database executor.
    #[error("database error: {0}")]
    Database(#[source] Box<dyn std::error::Error + Send + Sync>)
}

impl Error {
    /// Create a template syntax error.
    pub fn parse(
        code: MessageCode,
        message: impl Into<String>,
        sql: &str,
        line: usize,
        column: usize
    ) -> Self {
        Self::SqlParse {
            code,
            message: message.into(),
            sql: sql.to_string(),
            line,
            column
        }
    }

    /// Create a build-time error.
    pub fn build(
        code: MessageCode,
        message: impl Into<String>,
        sql: &str,
        line: usize,
        column: usize
    ) -> Self {
        Self::SqlBuild {
            code,
            message: message.into(),
            sql: sql.to_string(),
            line,
            column
        }
    }

    /// Create an expression error.
    pub fn expression(
        code: MessageCode,
        message: impl Into<String>,
        expression: &str,
        position: usize
    ) -> Self {
        Self::ExpressionEvaluate {
            code,
            message: message.into(),
            expression: expression.to_string(),
            position
        }
    }

    /// Create a configuration error.
    pub fn config(reason: impl Into<String>) -> Self {
        Self::InvalidSqlParserConfig {
            reason: reason.into()
        }
    }

    /// Wrap an executor error.
    pub fn database(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Database(Box::new(err))
    }

    /// Message code carried by the error, if any.
    #[must_use]
    pub fn code(&self) -> Option<MessageCode> {
        match self {
            Self::SqlParse {
                code, ..
            }
            | Self::SqlBuild {
                code, ..
            }
            | Self::ExpressionEvaluate {
                code, ..
            }
            | Self::SqlTransform {
                code, ..
            } => Some(*code),
            _ => None
        }
    }

    /// Whether this is a write conflict on a version-guarded statement.
    #[must_use]
    pub const fn is_optimistic_lock(&self) -> bool {
        matches!(self, Self::OptimisticLock { .. })
    }
}
