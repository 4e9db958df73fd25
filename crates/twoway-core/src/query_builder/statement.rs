// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Output state shared by the statement writers.
//!
//! A [`Statement`] precomputes the quoted table name and wraps the
//! [`SqlContext`] every writer appends to.

use super::{FetchMode, QueryBuilderParameter, QueryPlan};
use crate::{
    builder::SqlContext,
    dialect::Dialect,
    entity::{CurrentTimestampStrategy, EntityColumnInfo, EntityTypeInfo},
    error::{Error, Result},
    result::ParameterDirection,
    value::Value
};

/// Right-hand side of a `col = ...` assignment.
#[derive(Debug, Clone, PartialEq)]
pub(super) enum Assignment {
    /// Parameter holding the entity's value.
    Bind,
    /// Parameter holding a fixed database value.
    Value(Value),
    /// `col + 1`.
    Increment,
    /// Raw SQL text, e.g. a timestamp function or `s.col`.
    Sql(String)
}

/// Statement being written for one request.
pub(super) struct Statement<'p, E> {
    pub(super) param:   &'p QueryBuilderParameter<'p, E>,
    pub(super) info:    &'p EntityTypeInfo<E>,
    pub(super) dialect: Dialect,
    /// Quoted `schema.table`.
    pub(super) table:   String,
    pub(super) out:     SqlContext<'p>
}

impl<'p, E> Statement<'p, E> {
    pub(super) fn new(param: &'p QueryBuilderParameter<'p, E>) -> Self {
        let info = param.info();
        let dialect = param.config().dialect();
        Self {
            param,
            info,
            dialect,
            table: info.qualified_table_name(&dialect),
            out: SqlContext::new(param.config())
        }
    }

    pub(super) fn quote(&self, column: &EntityColumnInfo) -> String {
        self.dialect.quote(&column.column_name)
    }

    /// Comma-joined quoted column names.
    pub(super) fn column_list(&self, columns: &[&EntityColumnInfo]) -> String {
        columns
            .iter()
            .map(|column| self.quote(column))
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub(super) fn value(&self, column: &EntityColumnInfo) -> Value {
        self.info.value_of(self.param.entity(), column)
    }

    /// Whether `column` survives `exclude_null`.
    pub(super) fn is_written(&self, column: &EntityColumnInfo) -> bool {
        !(self.param.exclude_null && self.value(column).is_null())
    }

    /// Timestamp SQL when `column` is generated under `applies`.
    pub(super) fn timestamp_sql(
        &self,
        column: &EntityColumnInfo,
        applies: fn(&CurrentTimestampStrategy) -> bool
    ) -> Option<String> {
        let strategy = column.timestamp_strategy()?;
        let attribute = column.current_timestamp.as_ref()?;
        applies(&strategy).then(|| attribute.sql(&self.dialect).to_string())
    }

    /// Bind the entity's value of `column` under its property name.
    pub(super) fn bind(&mut self, column: &EntityColumnInfo) {
        let value = self.value(column);
        self.bind_value(column, value);
    }

    pub(super) fn bind_value(&mut self, column: &EntityColumnInfo, value: Value) {
        self.out.append_parameter_with(
            &column.property_name,
            value,
            Some(column.db_type),
            ParameterDirection::Input
        );
    }

    /// Write `a = ..., b = ...`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoWritableColumns`] when `items` is empty.
    pub(super) fn assignments(&mut self, items: &[(&EntityColumnInfo, Assignment)]) -> Result<()> {
        if items.is_empty() {
            return Err(self.nothing_to_write());
        }
        for (index, (column, assignment)) in items.iter().enumerate() {
            if index > 0 {
                self.out.append_sql(", ");
            }
            let quoted = self.quote(column);
            match assignment {
                Assignment::Bind => {
                    self.out.append_sql(&format!("{quoted} = "));
                    self.bind(column);
                }
                Assignment::Value(value) => {
                    self.out.append_sql(&format!("{quoted} = "));
                    self.bind_value(column, value.clone());
                }
                Assignment::Increment => self.out.append_sql(&format!("{quoted} = {quoted} + 1")),
                Assignment::Sql(sql) => self.out.append_sql(&format!("{quoted} = {sql}"))
            }
        }
        Ok(())
    }

    /// Key columns, or an error when the entity has none.
    pub(super) fn keys(&self) -> Result<&'p [EntityColumnInfo]> {
        let info = self.info;
        if info.key_columns.is_empty() {
            return Err(Error::EntityKeyMissing {
                table: info.table_name.clone()
            });
        }
        Ok(&info.key_columns)
    }

    /// `[K1] = @k1 AND [K2] = @k2`.
    pub(super) fn key_filter(&mut self) -> Result<()> {
        for (index, column) in self.keys()?.iter().enumerate() {
            if index > 0 {
                self.out.append_sql(" AND ");
            }
            let quoted = self.quote(column);
            self.out.append_sql(&format!("{quoted} = "));
            self.bind(column);
        }
        Ok(())
    }

    /// ` AND [V] = @v` with the expected version, when guarded.
    pub(super) fn version_filter(&mut self) {
        if !self.param.is_version_guarded() {
            return;
        }
        let info = self.info;
        let Some(column) = info.version_column.as_ref() else {
            return;
        };
        let expected = self
            .param
            .expected_version()
            .cloned()
            .unwrap_or_else(|| self.value(column));
        let quoted = self.quote(column);
        self.out.append_sql(&format!(" AND {quoted} = "));
        self.bind_value(column, expected);
    }

    pub(super) fn nothing_to_write(&self) -> Error {
        Error::NoWritableColumns {
            table: self.info.table_name.clone()
        }
    }

    pub(super) fn finish(self, fetch: FetchMode) -> QueryPlan {
        QueryPlan {
            result: self.out.finish(),
            fetch
        }
    }
}
