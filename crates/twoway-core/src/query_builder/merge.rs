// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Upsert writer.
//!
//! # Syntax
//!
//! ```text
//! MERGE INTO t AS t USING (SELECT @a AS [A], ...) AS s    SQL Server
//! MERGE INTO t t USING (SELECT :a AS "A" ... FROM DUAL) s  Oracle
//! MERGE INTO t AS t USING (VALUES (?, ...)) AS s ("A")    DB2, Standard
//!     ON (t.k = s.k)
//!     WHEN MATCHED THEN UPDATE SET ...
//!     WHEN NOT MATCHED THEN INSERT (...) VALUES (...)
//!
//! INSERT ... ON CONFLICT (k) DO UPDATE SET a = EXCLUDED.a  PostgreSQL, SQLite
//! INSERT ... ON DUPLICATE KEY UPDATE a = VALUES(a)        MySQL
//! ```
//!
//! The version column is incremented on the update branch when
//! `use_version` is set and copied from the entity otherwise.

use super::{FetchMode, QueryPlan, statement::Statement};
use crate::{
    dialect::{Dialect, MergeStyle},
    entity::{CurrentTimestampStrategy, EntityColumnInfo},
    error::Result
};

impl<'p, E> Statement<'p, E> {
    pub(super) fn merge(self) -> Result<QueryPlan> {
        match self.dialect.merge_style() {
            MergeStyle::Merge => self.merge_statement(),
            MergeStyle::OnConflict | MergeStyle::OnDuplicateKey => self.insert_or_update()
        }
    }

    /// Columns carried as values: keys always, identity only as a key,
    /// generated timestamps never.
    fn source_columns(&self) -> Vec<&'p EntityColumnInfo> {
        let info = self.info;
        info.columns
            .iter()
            .filter(|c| !c.is_identity || c.is_primary_key)
            .filter(|c| c.timestamp_strategy().is_none())
            .filter(|c| c.is_primary_key || self.is_written(c))
            .collect()
    }

    /// Timestamp columns generated under `applies`, with their SQL.
    fn generated(
        &self,
        applies: fn(&CurrentTimestampStrategy) -> bool
    ) -> Vec<(&'p EntityColumnInfo, String)> {
        let info = self.info;
        info.columns
            .iter()
            .filter_map(|c| self.timestamp_sql(c, applies).map(|sql| (c, sql)))
            .collect()
    }

    /// Update-branch assignments; `incoming` renders the new value of a
    /// quoted column and `stored` its current value.
    fn update_items(
        &self,
        source: &[&'p EntityColumnInfo],
        incoming: impl Fn(&str) -> String,
        stored: impl Fn(&str) -> String
    ) -> Vec<String> {
        let mut items = Vec::new();
        for column in source.iter().filter(|c| c.is_updatable()) {
            let quoted = self.quote(column);
            if column.is_version && self.param.use_version {
                continue;
            }
            items.push(format!("{quoted} = {}", incoming(&quoted)));
        }
        if self.param.use_version
            && let Some(version) = self.info.version_column.as_ref()
        {
            let quoted = self.quote(version);
            items.push(format!("{quoted} = {} + 1", stored(&quoted)));
        }
        for (column, sql) in self.generated(CurrentTimestampStrategy::applies_to_update) {
            if column.is_updatable() {
                items.push(format!("{} = {sql}", self.quote(column)));
            }
        }
        items
    }

    fn merge_statement(mut self) -> Result<QueryPlan> {
        let source = self.source_columns();
        let keys = self.keys()?;
        let alias = match self.dialect {
            Dialect::Oracle | Dialect::Oracle11 => "",
            _ => " AS"
        };

        self.out
            .append_sql(&format!("MERGE INTO {}{alias} t USING (", self.table));
        match self.dialect {
            Dialect::Standard | Dialect::Db2 => {
                self.out.append_sql("VALUES (");
                for (index, column) in source.iter().enumerate() {
                    if index > 0 {
                        self.out.append_sql(", ");
                    }
                    self.bind(column);
                }
                let list = self.column_list(&source);
                self.out.append_sql(&format!(")){alias} s ({list})"));
            }
            _ => {
                self.out.append_sql("SELECT ");
                for (index, column) in source.iter().enumerate() {
                    if index > 0 {
                        self.out.append_sql(", ");
                    }
                    self.bind(column);
                    let quoted = self.quote(column);
                    self.out.append_sql(&format!(" AS {quoted}"));
                }
                if matches!(self.dialect, Dialect::Oracle | Dialect::Oracle11) {
                    self.out.append_sql(" FROM DUAL");
                }
                self.out.append_sql(&format!("){alias} s"));
            }
        }

        let on = keys
            .iter()
            .map(|key| {
                let quoted = self.quote(key);
                format!("t.{quoted} = s.{quoted}")
            })
            .collect::<Vec<_>>()
            .join(" AND ");
        self.out.append_sql(&format!(" ON ({on})"));

        let updates = self.update_items(&source, |q| format!("s.{q}"), |q| format!("t.{q}"));
        if !updates.is_empty() {
            self.out.append_sql(&format!(
                " WHEN MATCHED THEN UPDATE SET {}",
                updates.join(", ")
            ));
        }

        let mut columns = Vec::new();
        let mut values = Vec::new();
        for column in source.iter().filter(|c| !c.is_identity) {
            let quoted = self.quote(column);
            values.push(format!("s.{quoted}"));
            columns.push(quoted);
        }
        for (column, sql) in self.generated(CurrentTimestampStrategy::applies_to_insert) {
            columns.push(self.quote(column));
            values.push(sql);
        }
        self.out.append_sql(&format!(
            " WHEN NOT MATCHED THEN INSERT ({}) VALUES ({})",
            columns.join(", "),
            values.join(", ")
        ));
        if matches!(self.dialect, Dialect::SqlServer | Dialect::SqlServer2008) {
            self.out.append_sql(";");
        }
        Ok(self.finish(FetchMode::None))
    }

    fn insert_or_update(mut self) -> Result<QueryPlan> {
        let source = self.source_columns();
        let keys = self.keys()?;
        let generated = self.generated(CurrentTimestampStrategy::applies_to_insert);

        let mut list = source.clone();
        list.extend(generated.iter().map(|(column, _)| *column));
        let list = self.column_list(&list);
        self.out
            .append_sql(&format!("INSERT INTO {} ({list}) VALUES (", self.table));
        for (index, column) in source.iter().enumerate() {
            if index > 0 {
                self.out.append_sql(", ");
            }
            self.bind(column);
        }
        for (index, (_, sql)) in generated.iter().enumerate() {
            if index > 0 || !source.is_empty() {
                self.out.append_sql(", ");
            }
            self.out.append_sql(sql);
        }
        self.out.append_sql(")");

        let table = self.table.clone();
        if self.dialect.merge_style() == MergeStyle::OnDuplicateKey {
            let mut updates = self.update_items(&source, |q| format!("VALUES({q})"), |q| q.to_string());
            if updates.is_empty()
                && let Some(key) = keys.first()
            {
                let key = self.quote(key);
                updates.push(format!("{key} = {key}"));
            }
            self.out.append_sql(&format!(
                " ON DUPLICATE KEY UPDATE {}",
                updates.join(", ")
            ));
        } else {
            let conflict = keys
                .iter()
                .map(|key| self.quote(key))
                .collect::<Vec<_>>()
                .join(", ");
            let updates = self.update_items(
                &source,
                |q| format!("EXCLUDED.{q}"),
                |q| format!("{table}.{q}")
            );
            let action = if updates.is_empty() {
                "NOTHING".to_string()
            } else {
                format!("UPDATE SET {}", updates.join(", "))
            };
            self.out
                .append_sql(&format!(" ON CONFLICT ({conflict}) DO {action}"));
        }
        Ok(self.finish(FetchMode::None))
    }
}
