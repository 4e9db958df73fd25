// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! SQLite paging.

use super::{PagingOptions, PagingTransformer, fragment};
use crate::{
    error::Result,
    node::{ClauseKind, ClauseNode, SelectStatementNode}
};

/// `limit L offset O` attached to the ORDER BY, synthesized when absent.
#[derive(Debug, Clone)]
pub struct SqlitePaging {
    options: PagingOptions
}

impl SqlitePaging {
    #[must_use]
    pub const fn new(options: PagingOptions) -> Self {
        Self {
            options
        }
    }
}

impl PagingTransformer for SqlitePaging {
    fn transform_select(&self, select: &SelectStatementNode, _sql: &str) -> Result<SelectStatementNode> {
        let mut paged = select.clone();
        let limit = if self.options.limit > 0 {
            self.options.limit
        } else {
            i64::MAX
        };
        let order_by = paged
            .order_by
            .get_or_insert_with(|| ClauseNode::new(ClauseKind::OrderBy, ""));
        order_by.push(fragment(format!(" limit {limit}")));
        order_by.push(fragment(format!(" offset {}", self.options.offset_or_zero())));
        paged.transformed = true;
        Ok(paged)
    }
}
