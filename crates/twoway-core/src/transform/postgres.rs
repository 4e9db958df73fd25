// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! PostgreSQL paging.

use super::{PagingOptions, PagingTransformer, append_to_body, fragment};
use crate::{error::Result, node::SelectStatementNode};

/// `limit n offset m`.
#[derive(Debug, Clone)]
pub struct PostgresPaging {
    options: PagingOptions
}

impl PostgresPaging {
    #[must_use]
    pub const fn new(options: PagingOptions) -> Self {
        Self {
            options
        }
    }
}

impl PagingTransformer for PostgresPaging {
    fn transform_select(&self, select: &SelectStatementNode, _sql: &str) -> Result<SelectStatementNode> {
        let mut tail = Vec::new();
        if self.options.limit > 0 {
            tail.push(fragment(format!(" limit {}", self.options.limit)));
        }
        if self.options.offset > 0 {
            tail.push(fragment(format!(" offset {}", self.options.offset)));
        }
        let mut paged = select.clone();
        append_to_body(&mut paged, tail);
        paged.transformed = true;
        Ok(paged)
    }
}
