// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! UPDATE and soft-delete writers.

use super::{
    FetchMode, QueryPlan,
    statement::{Assignment, Statement}
};
use crate::{
    entity::{CurrentTimestampStrategy, EntityColumnInfo},
    error::Result,
    value::Value
};

impl<E> Statement<'_, E> {
    /// `UPDATE t SET ... WHERE keys [AND version]`.
    ///
    /// Keys and identity are never assigned. Timestamp columns generated
    /// on update take the dialect's function; other timestamp columns keep
    /// their stored value.
    pub(super) fn update(mut self) -> Result<QueryPlan> {
        let info = self.info;
        let mut items: Vec<(&EntityColumnInfo, Assignment)> = Vec::new();
        for column in info.columns.iter().filter(|c| c.is_updatable()) {
            if column.is_version && !self.param.ignore_version {
                items.push((column, Assignment::Increment));
            } else if column.timestamp_strategy().is_some() {
                if let Some(sql) = self.timestamp_sql(column, CurrentTimestampStrategy::applies_to_update) {
                    items.push((column, Assignment::Sql(sql)));
                }
            } else if self.is_written(column) {
                items.push((column, Assignment::Bind));
            }
        }

        let returning = self.update_returning();
        self.returning_prefix(&returning);
        self.out.append_sql(&format!("UPDATE {} SET ", self.table));
        self.assignments(&items)?;
        self.returning_output(&returning);
        self.out.append_sql(" WHERE ");
        self.key_filter()?;
        self.version_filter();
        self.returning_suffix(&returning);

        let fetch = self.returning_fetch(&returning);
        Ok(self.finish(fetch))
    }

    /// `UPDATE t SET <soft-delete key>, <soft-delete timestamps> WHERE ...`.
    ///
    /// The soft-delete key is bound as `true`, through its converter when it
    /// has one. The entity itself is left untouched.
    pub(super) fn soft_delete(mut self) -> Result<QueryPlan> {
        let info = self.info;
        let mut items: Vec<(&EntityColumnInfo, Assignment)> = Vec::new();
        for column in &info.columns {
            if column.is_soft_delete_key {
                let deleted = Value::Bool(true);
                let deleted = match column.converter {
                    Some(converter) => (converter.to_db)(&deleted),
                    None => deleted
                };
                items.push((column, Assignment::Value(deleted)));
            } else if let Some(sql) =
                self.timestamp_sql(column, CurrentTimestampStrategy::applies_to_soft_delete)
            {
                items.push((column, Assignment::Sql(sql)));
            }
        }

        self.out.append_sql(&format!("UPDATE {} SET ", self.table));
        self.assignments(&items)?;
        self.out.append_sql(" WHERE ");
        self.key_filter()?;
        self.version_filter();
        Ok(self.finish(FetchMode::None))
    }
}
