// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! ROWNUM paging for Oracle.

use super::{
    PagingOptions, PagingTransformer, fragment, relocate_trailing, row_number_filter,
    select_star, sub_statement
};
use crate::{
    error::Result,
    node::{ClauseKind, ClauseNode, SelectStatementNode, SqlNode}
};

/// Oracle paging through the `rownum` pseudo-column.
///
/// The inner statement keeps its ORDER BY, so no ordering is required.
#[derive(Debug, Clone)]
pub struct OraclePaging {
    options: PagingOptions
}

impl OraclePaging {
    #[must_use]
    pub const fn new(options: PagingOptions) -> Self {
        Self {
            options
        }
    }
}

impl PagingTransformer for OraclePaging {
    fn transform_select(&self, select: &SelectStatementNode, _sql: &str) -> Result<SelectStatementNode> {
        let rn = self.options.row_number_column();

        let mut from = ClauseNode::new(ClauseKind::From, "from");
        from.push(fragment(format!(" ( select temp_.*, rownum {rn} from ( ")));
        from.push(SqlNode::SelectStatement(Box::new(sub_statement(select, true))));
        from.push(fragment(" ) temp_ ) "));

        let mut outer = SelectStatementNode {
            select: Some(select_star()),
            from: Some(from),
            where_: Some(row_number_filter(&self.options)),
            transformed: true,
            ..SelectStatementNode::default()
        };
        relocate_trailing(&mut outer, select);
        Ok(outer)
    }
}
