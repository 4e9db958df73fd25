// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use super::{FetchMode, QueryPlan, statement::Statement};
use crate::error::Result;

impl<E> Statement<'_, E> {
    /// `DELETE FROM t WHERE keys [AND version]`.
    pub(super) fn delete(mut self) -> Result<QueryPlan> {
        self.out
            .append_sql(&format!("DELETE FROM {} WHERE ", self.table));
        self.key_filter()?;
        self.version_filter();
        Ok(self.finish(FetchMode::None))
    }
}
