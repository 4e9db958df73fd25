// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! MySQL paging.

use super::{PagingOptions, PagingTransformer, append_to_body, fragment};
use crate::{error::Result, node::SelectStatementNode};

/// Largest row count MySQL accepts in `limit`.
const MAX_ROWS: &str = "18446744073709551615";

/// `limit offset, count`.
#[derive(Debug, Clone)]
pub struct MySqlPaging {
    options: PagingOptions
}

impl MySqlPaging {
    #[must_use]
    pub const fn new(options: PagingOptions) -> Self {
        Self {
            options
        }
    }
}

impl PagingTransformer for MySqlPaging {
    fn transform_select(&self, select: &SelectStatementNode, _sql: &str) -> Result<SelectStatementNode> {
        let count = if self.options.limit > 0 {
            self.options.limit.to_string()
        } else {
            MAX_ROWS.to_string()
        };
        let mut paged = select.clone();
        append_to_body(
            &mut paged,
            vec![fragment(format!(
                " limit {}, {count}",
                self.options.offset_or_zero()
            ))]
        );
        paged.transformed = true;
        Ok(paged)
    }
}
