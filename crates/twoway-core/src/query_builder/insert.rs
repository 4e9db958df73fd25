// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! INSERT writer.
//!
//! Identity columns are left to the database. Timestamp columns generated on
//! insert take the dialect's function instead of a parameter; the other
//! timestamp columns are left out, as UPDATE leaves them. Sequence
//! columns are bound like any other: their values were fetched beforehand.

use super::{QueryPlan, statement::Statement};
use crate::{
    entity::{CurrentTimestampStrategy, EntityColumnInfo},
    error::Result
};

impl<E> Statement<'_, E> {
    pub(super) fn insert(mut self) -> Result<QueryPlan> {
        let info = self.info;
        let columns: Vec<&EntityColumnInfo> = info
            .columns
            .iter()
            .filter(|column| !column.is_identity)
            .filter(|column| match column.timestamp_strategy() {
                Some(strategy) => strategy.applies_to_insert(),
                None => self.is_written(column)
            })
            .collect();
        if columns.is_empty() {
            return Err(self.nothing_to_write());
        }

        let returning = self.insert_returning();
        self.returning_prefix(&returning);
        let list = self.column_list(&columns);
        self.out
            .append_sql(&format!("INSERT INTO {} ({list})", self.table));
        self.returning_output(&returning);
        self.out.append_sql(" VALUES (");
        for (index, column) in columns.iter().enumerate() {
            if index > 0 {
                self.out.append_sql(", ");
            }
            match self.timestamp_sql(column, CurrentTimestampStrategy::applies_to_insert) {
                Some(sql) => self.out.append_sql(&sql),
                None => self.bind(column)
            }
        }
        self.out.append_sql(")");
        self.returning_suffix(&returning);

        let fetch = self.returning_fetch(&returning);
        Ok(self.finish(fetch))
    }
}
