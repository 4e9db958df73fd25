// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Count rewriting.

use super::{PagingTransformer, fragment, sub_statement, transform};
use crate::{
    error::Result,
    node::{ClauseKind, ClauseNode, SelectStatementNode, SqlNode}
};

/// Query reading the row count computed by `sql_calc_found_rows`.
pub const FOUND_ROWS_SQL: &str = "select found_rows()";

/// `select count(*) from ( <statement> ) t_`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CountTransformer;

impl PagingTransformer for CountTransformer {
    fn transform_select(&self, select: &SelectStatementNode, _sql: &str) -> Result<SelectStatementNode> {
        let mut head = ClauseNode::new(ClauseKind::Select, "select");
        head.push(fragment(" count(*) "));

        let mut from = ClauseNode::new(ClauseKind::From, "from");
        from.push(fragment(" ( "));
        from.push(SqlNode::SelectStatement(Box::new(sub_statement(select, false))));
        from.push(fragment(" ) t_"));

        Ok(SelectStatementNode {
            select: Some(head),
            from: Some(from),
            transformed: true,
            ..SelectStatementNode::default()
        })
    }
}

/// Marks the select list with `sql_calc_found_rows`.
///
/// The statement stays untransformed so paging can still apply to it.
#[derive(Debug, Clone, Copy, Default)]
pub struct FoundRowsTransformer;

impl PagingTransformer for FoundRowsTransformer {
    fn transform_select(&self, select: &SelectStatementNode, _sql: &str) -> Result<SelectStatementNode> {
        let mut marked = select.clone();
        if let Some(clause) = marked.select.as_mut() {
            clause.children.insert(0, fragment(" sql_calc_found_rows"));
        }
        Ok(marked)
    }
}

/// Rewrite the first SELECT of `node` into a count query.
///
/// # Errors
///
/// Never fails for well-formed trees; the signature matches the other
/// transformers.
pub fn count(node: &SqlNode, sql: &str) -> Result<SqlNode> {
    transform(node, &CountTransformer, sql)
}

/// Mark the first SELECT of `node` with `sql_calc_found_rows`.
///
/// # Errors
///
/// Never fails for well-formed trees.
pub fn calc_found_rows(node: &SqlNode, sql: &str) -> Result<SqlNode> {
    transform(node, &FoundRowsTransformer, sql)
}
