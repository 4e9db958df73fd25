// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Database boundary.
//!
//! The engine never talks to a database itself. The write wrappers in
//! [`crate::dao`] and the sequence fetch in [`crate::sequence`] go through
//! these traits, which callers implement on top of their driver.
//!
//! # Example
//!
//! ```rust
//! use twoway_core::{Result, Row, SqlExecutor, SqlParserResult, Value};
//!
//! struct Recorder {
//!     statements: Vec<String>
//! }
//!
//! impl SqlExecutor for Recorder {
//!     fn execute(&mut self, sql: &SqlParserResult) -> Result<u64> {
//!         self.statements.push(sql.parsed_sql.clone());
//!         Ok(1)
//!     }
//!
//!     fn query_scalar(&mut self, _sql: &SqlParserResult) -> Result<Value> {
//!         Ok(Value::Long(1))
//!     }
//!
//!     fn query_row(&mut self, _sql: &SqlParserResult) -> Result<Option<Row>> {
//!         Ok(None)
//!     }
//! }
//! ```

use async_trait::async_trait;

use crate::{
    error::Result,
    result::SqlParserResult,
    value::{ToValue, Value}
};

/// One result row as `(column name, value)` pairs in select order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    columns: Vec<(String, Value)>
}

impl Row {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            columns: Vec::new()
        }
    }

    /// Append a column.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl ToValue) -> Self {
        self.columns.push((name.into(), value.to_value()));
        self
    }

    /// Value of `name`, compared case-insensitively.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.columns
            .iter()
            .find(|(column, _)| column.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl<N: Into<String>> FromIterator<(N, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (N, Value)>>(iter: I) -> Self {
        Self {
            columns: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect()
        }
    }
}

impl IntoIterator for Row {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.into_iter()
    }
}

/// Blocking statement execution.
///
/// Driver failures should be wrapped with [`crate::Error::database`].
pub trait SqlExecutor {
    /// Run a statement and return the affected row count.
    fn execute(&mut self, sql: &SqlParserResult) -> Result<u64>;

    /// Run a query returning a single value.
    fn query_scalar(&mut self, sql: &SqlParserResult) -> Result<Value>;

    /// Run a query and return its first row.
    ///
    /// Statements with output parameters report them as a row keyed by
    /// parameter name without prefix.
    fn query_row(&mut self, sql: &SqlParserResult) -> Result<Option<Row>>;
}

/// Non-blocking counterpart of [`SqlExecutor`].
///
/// Dropping a pending future abandons the call; the request it was built
/// from is left as it was before the call.
#[async_trait]
pub trait AsyncSqlExecutor: Send {
    /// Run a statement and return the affected row count.
    async fn execute(&mut self, sql: &SqlParserResult) -> Result<u64>;

    /// Run a query returning a single value.
    async fn query_scalar(&mut self, sql: &SqlParserResult) -> Result<Value>;

    /// Run a query and return its first row.
    async fn query_row(&mut self, sql: &SqlParserResult) -> Result<Option<Row>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_lookup_ignores_case() {
        let row = Row::new().with("ID", 7_i64).with("Name", "x");
        assert_eq!(row.get("id"), Some(&Value::Long(7)));
        assert_eq!(row.get("NAME"), Some(&Value::String("x".to_string())));
        assert_eq!(row.get("missing"), None);
        assert_eq!(row.len(), 2);
    }

    #[test]
    fn row_from_pairs_keeps_order() {
        let row: Row = [("B", Value::Int(2)), ("A", Value::Int(1))]
            .into_iter()
            .collect();
        let names: Vec<&str> = row.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["B", "A"]);
        assert!(Row::default().is_empty());
    }
}
