// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Read-back of generated columns.
//!
//! | Style | Placement |
//! |-------|-----------|
//! | `Output` | `OUTPUT INSERTED.[c]` before `VALUES` or `WHERE` |
//! | `Returning` | `RETURNING c` at the end |
//! | `ReturningInto` | `RETURNING c INTO :out_c` with output parameters |
//! | `FinalTable` | `SELECT c FROM FINAL TABLE (...)` around the statement |
//! | `LastInsertId` | separate `SELECT LAST_INSERT_ID()` after an insert |

use super::{FetchMode, QueryBehavior, SqlKind, statement::Statement};
use crate::{
    dialect::ReturningStyle,
    entity::EntityColumnInfo,
    result::{ParameterDirection, SqlParserResult},
    value::Value
};

/// Query reading the identity generated by the last MySQL insert.
pub const LAST_INSERT_ID_SQL: &str = "SELECT LAST_INSERT_ID()";

impl<'p, E> Statement<'p, E> {
    /// Columns an insert reads back.
    pub(super) fn insert_returning(&self) -> Vec<&'p EntityColumnInfo> {
        let info = self.info;
        let identity = info.identity_column.as_ref();
        match self.param.behavior {
            QueryBehavior::None => Vec::new(),
            QueryBehavior::IdentityOnly => identity.into_iter().collect(),
            QueryBehavior::AllColumns => info.columns.iter().collect(),
            QueryBehavior::IdentityOrAllColumns => match identity {
                Some(column) => vec![column],
                None => info.columns.iter().collect()
            }
        }
    }

    /// Columns an update reads back. Identity columns never change, so only
    /// full-row behaviors apply.
    pub(super) fn update_returning(&self) -> Vec<&'p EntityColumnInfo> {
        let info = self.info;
        match self.param.behavior {
            QueryBehavior::AllColumns => info.columns.iter().collect(),
            QueryBehavior::IdentityOrAllColumns if info.identity_column.is_none() => {
                info.columns.iter().collect()
            }
            _ => Vec::new()
        }
    }

    fn style(&self, columns: &[&EntityColumnInfo]) -> Option<ReturningStyle> {
        (!columns.is_empty()).then(|| self.dialect.returning_style())
    }

    /// Text preceding the statement.
    pub(super) fn returning_prefix(&mut self, columns: &[&EntityColumnInfo]) {
        if self.style(columns) == Some(ReturningStyle::FinalTable) {
            let list = self.column_list(columns);
            self.out
                .append_sql(&format!("SELECT {list} FROM FINAL TABLE ("));
        }
    }

    /// `OUTPUT INSERTED.[c]` clause.
    pub(super) fn returning_output(&mut self, columns: &[&EntityColumnInfo]) {
        if self.style(columns) == Some(ReturningStyle::Output) {
            let list = columns
                .iter()
                .map(|column| format!("INSERTED.{}", self.quote(column)))
                .collect::<Vec<_>>()
                .join(", ");
            self.out.append_sql(&format!(" OUTPUT {list}"));
        }
    }

    /// Text following the statement.
    pub(super) fn returning_suffix(&mut self, columns: &[&EntityColumnInfo]) {
        match self.style(columns) {
            Some(ReturningStyle::Returning) => {
                let list = self.column_list(columns);
                self.out.append_sql(&format!(" RETURNING {list}"));
            }
            Some(ReturningStyle::ReturningInto) => {
                let list = self.column_list(columns);
                self.out.append_sql(&format!(" RETURNING {list} INTO "));
                for (index, column) in columns.iter().enumerate() {
                    if index > 0 {
                        self.out.append_sql(", ");
                    }
                    self.out.append_parameter_with(
                        &format!("out_{}", column.property_name),
                        Value::Null,
                        Some(column.db_type),
                        ParameterDirection::Output
                    );
                }
            }
            Some(ReturningStyle::FinalTable) => self.out.append_sql(")"),
            _ => {}
        }
    }

    /// How the caller collects the read-back columns.
    pub(super) fn returning_fetch(&self, columns: &[&EntityColumnInfo]) -> FetchMode {
        match self.style(columns) {
            None | Some(ReturningStyle::Unsupported) => FetchMode::None,
            Some(ReturningStyle::LastInsertId) => match &self.info.identity_column {
                Some(identity) if self.param.kind == SqlKind::Insert => FetchMode::Scalar {
                    sql:    SqlParserResult {
                        parsed_sql: LAST_INSERT_ID_SQL.to_string(),
                        debug_sql:  LAST_INSERT_ID_SQL.to_string(),
                        parameters: Vec::new()
                    },
                    column: identity.column_name.clone()
                },
                _ => FetchMode::None
            },
            Some(_) => FetchMode::Row
        }
    }
}
