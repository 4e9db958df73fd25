// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! ROW_NUMBER paging.
//!
//! ```text
//! select * from (
//!     select temp_.*, row_number() over( order by temp_.id ) as rn
//!     from ( <statement without order by> ) as temp_
//! ) as temp2_
//! where rn > offset and rn <= offset + limit
//! ```

use super::{
    PagingOptions, PagingTransformer, fragment, relocate_trailing, require_order_by, requalify,
    row_number_filter, select_star, sub_statement
};
use crate::{
    error::Result,
    node::{ClauseKind, ClauseNode, SelectStatementNode, SqlNode}
};

/// ANSI paging through `row_number()`.
#[derive(Debug, Clone)]
pub struct StandardPaging {
    options: PagingOptions
}

impl StandardPaging {
    #[must_use]
    pub const fn new(options: PagingOptions) -> Self {
        Self {
            options
        }
    }
}

impl PagingTransformer for StandardPaging {
    fn transform_select(&self, select: &SelectStatementNode, sql: &str) -> Result<SelectStatementNode> {
        let order_by = require_order_by(select, sql)?;
        let rn = self.options.row_number_column();

        let mut from = ClauseNode::new(ClauseKind::From, "from");
        from.push(fragment(" ( select temp_.*, row_number() over( "));
        from.push(SqlNode::Clause(requalify(order_by)));
        from.push(fragment(format!(" ) as {rn} from ( ")));
        from.push(SqlNode::SelectStatement(Box::new(sub_statement(select, false))));
        from.push(fragment(") as temp_ ) as temp2_ "));

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
