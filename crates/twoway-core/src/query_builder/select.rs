// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use super::{FetchMode, QueryPlan, statement::Statement};
use crate::{entity::EntityColumnInfo, error::Result};

impl<E> Statement<'_, E> {
    /// `SELECT <all columns> FROM t WHERE keys`.
    pub(super) fn select(mut self) -> Result<QueryPlan> {
        let info = self.info;
        let columns: Vec<&EntityColumnInfo> = info.columns.iter().collect();
        let list = self.column_list(&columns);
        self.out
            .append_sql(&format!("SELECT {list} FROM {} WHERE ", self.table));
        self.key_filter()?;
        Ok(self.finish(FetchMode::Row))
    }
}
