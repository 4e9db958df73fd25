// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! SQL Server paging.

use super::{
    PagingOptions, PagingTransformer, fragment, insert_top, require_order_by,
    standard::StandardPaging
};
use crate::{error::Result, node::SelectStatementNode};

fn top(select: &SelectStatementNode, limit: i64) -> SelectStatementNode {
    let mut paged = select.clone();
    insert_top(&mut paged, limit);
    paged.transformed = true;
    paged
}

/// SQL Server 2008 and earlier: `top (n)` or ROW_NUMBER.
#[derive(Debug, Clone)]
pub struct SqlServer2008Paging {
    options: PagingOptions
}

impl SqlServer2008Paging {
    #[must_use]
    pub const fn new(options: PagingOptions) -> Self {
        Self {
            options
        }
    }
}

impl PagingTransformer for SqlServer2008Paging {
    fn transform_select(&self, select: &SelectStatementNode, sql: &str) -> Result<SelectStatementNode> {
        if self.options.offset <= 0 {
            return Ok(top(select, self.options.limit));
        }
        StandardPaging::new(self.options.clone()).transform_select(select, sql)
    }
}

/// SQL Server 2012 and later: `offset n rows fetch next m rows only`.
#[derive(Debug, Clone)]
pub struct SqlServerPaging {
    options: PagingOptions
}

impl SqlServerPaging {
    #[must_use]
    pub const fn new(options: PagingOptions) -> Self {
        Self {
            options
        }
    }
}

impl PagingTransformer for SqlServerPaging {
    fn transform_select(&self, select: &SelectStatementNode, sql: &str) -> Result<SelectStatementNode> {
        if self.options.offset <= 0 && !self.options.force_offset_fetch {
            return Ok(top(select, self.options.limit));
        }
        require_order_by(select, sql)?;
        let mut paged = select.clone();
        if let Some(order_by) = paged.order_by.as_mut() {
            order_by.push(fragment(format!(
                " offset {} rows",
                self.options.offset_or_zero()
            )));
            if self.options.limit > 0 {
                order_by.push(fragment(format!(
                    " fetch next {} rows only",
                    self.options.limit
                )));
            }
        }
        paged.transformed = true;
        Ok(paged)
    }
}
