// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! DB2 paging.

use super::{PagingOptions, PagingTransformer, append_to_body, fragment, standard::StandardPaging};
use crate::{error::Result, node::SelectStatementNode};

/// `fetch first n rows only`, or ROW_NUMBER for offsets and explicit row
/// number columns.
#[derive(Debug, Clone)]
pub struct Db2Paging {
    options: PagingOptions
}

impl Db2Paging {
    #[must_use]
    pub const fn new(options: PagingOptions) -> Self {
        Self {
            options
        }
    }
}

impl PagingTransformer for Db2Paging {
    fn transform_select(&self, select: &SelectStatementNode, sql: &str) -> Result<SelectStatementNode> {
        if self.options.offset > 0 || self.options.row_number_column.is_some() {
            return StandardPaging::new(self.options.clone()).transform_select(select, sql);
        }
        let mut paged = select.clone();
        append_to_body(
            &mut paged,
            vec![fragment(format!(
                " fetch first {} rows only",
                self.options.limit
            ))]
        );
        paged.transformed = true;
        Ok(paged)
    }
}
