// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Paging and count rewriting.
//!
//! Transformers rewrite the first top-level [`SelectStatementNode`] of a
//! parsed template. Rewritten statements carry `transformed = true`, and a
//! per-call `processed` flag stops the walk after the first statement, so
//! applying a transformer twice yields the same tree.
//!
//! # Dialects
//!
//! | Dialect | Rewrite |
//! |---------|---------|
//! | Standard | `row_number() over(order by ...)` in a nested subquery |
//! | SQL Server 2008 | `top (n)` when offset is not positive, else Standard |
//! | SQL Server | `offset n rows fetch next m rows only`, or `top (n)` |
//! | Oracle | `rownum` in a nested subquery |
//! | SQLite | `limit L offset O` |
//! | DB2 | `fetch first n rows only`, or Standard |
//! | PostgreSQL | `limit n offset m` |
//! | MySQL | `limit m, n` |
//!
//! FOR UPDATE and OPTION clauses always end up on the outermost statement.

pub mod count;
pub mod db2;
pub mod mysql;
pub mod oracle;
pub mod postgres;
pub mod sqlite;
pub mod sqlserver;
pub mod standard;

#[cfg(test)]
mod tests;

use crate::{
    dialect::Dialect,
    error::{Error, MessageCode, Result},
    node::{ClauseKind, ClauseNode, SelectStatementNode, SqlNode}
};

/// Row number column used when the caller does not name one.
pub const DEFAULT_ROW_NUMBER_COLUMN: &str = "esp_rownumber_";

/// Paging request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PagingOptions {
    pub offset:             i64,
    pub limit:              i64,
    /// Explicit row number column; also forces ROW_NUMBER paging on DB2.
    pub row_number_column:  Option<String>,
    /// Use OFFSET/FETCH on SQL Server even when the offset is not positive.
    pub force_offset_fetch: bool
}

impl PagingOptions {
    /// Page starting after `offset` rows holding at most `limit` rows.
    #[must_use]
    pub const fn new(offset: i64, limit: i64) -> Self {
        Self {
            offset,
            limit,
            row_number_column: None,
            force_offset_fetch: false
        }
    }

    /// Name the row number column.
    #[must_use]
    pub fn with_row_number_column(mut self, name: impl Into<String>) -> Self {
        self.row_number_column = Some(name.into());
        self
    }

    /// Always use OFFSET/FETCH where the dialect has it.
    #[must_use]
    pub const fn force_offset_fetch(mut self) -> Self {
        self.force_offset_fetch = true;
        self
    }

    /// Whether the request restricts the result at all.
    #[must_use]
    pub const fn is_paged(&self) -> bool {
        self.offset > 0 || self.limit > 0
    }

    /// Row number column in effect.
    #[must_use]
    pub fn row_number_column(&self) -> &str {
        self.row_number_column
            .as_deref()
            .unwrap_or(DEFAULT_ROW_NUMBER_COLUMN)
    }

    pub(crate) fn offset_or_zero(&self) -> i64 {
        self.offset.max(0)
    }
}

/// Rewrites one SELECT statement.
pub trait PagingTransformer: Send + Sync {
    /// Rewrite `select`. `sql` is the raw template, used in errors.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SqlTransform`] when the statement cannot be rewritten.
    fn transform_select(&self, select: &SelectStatementNode, sql: &str) -> Result<SelectStatementNode>;
}

/// Apply `transformer` to the first top-level SELECT of `node`.
///
/// # Errors
///
/// Propagates the transformer's error.
pub fn transform(node: &SqlNode, transformer: &dyn PagingTransformer, sql: &str) -> Result<SqlNode> {
    let mut processed = false;
    rewrite(node, transformer, sql, &mut processed)
}

/// Page `node` for `dialect`.
///
/// Returns the tree unchanged when neither offset nor limit is positive.
///
/// # Errors
///
/// Returns [`Error::SqlTransform`] (`ESP2201`) when the dialect needs an
/// ORDER BY and the statement has none.
pub fn paginate(node: &SqlNode, dialect: Dialect, options: &PagingOptions, sql: &str) -> Result<SqlNode> {
    if !options.is_paged() {
        return Ok(node.clone());
    }
    let transformer = dialect.paging_transformer(options);
    transform(node, transformer.as_ref(), sql)
}

fn rewrite(
    node: &SqlNode,
    transformer: &dyn PagingTransformer,
    sql: &str,
    processed: &mut bool
) -> Result<SqlNode> {
    match node {
        SqlNode::Anonymous(children) => {
            let mut out = Vec::with_capacity(children.len());
            for child in children {
                out.push(rewrite(child, transformer, sql, processed)?);
            }
            Ok(SqlNode::Anonymous(out))
        }
        SqlNode::SelectStatement(select) if !*processed => {
            *processed = true;
            if select.transformed {
                return Ok(node.clone());
            }
            let rewritten = transformer.transform_select(select, sql)?;
            Ok(SqlNode::SelectStatement(Box::new(rewritten)))
        }
        other => Ok(other.clone())
    }
}

pub(crate) fn fragment(text: impl Into<String>) -> SqlNode {
    SqlNode::Fragment(text.into())
}

/// `select * ` clause of a wrapping statement.
pub(crate) fn select_star() -> ClauseNode {
    let mut clause = ClauseNode::new(ClauseKind::Select, "select");
    clause.push(fragment(" * "));
    clause
}

pub(crate) fn require_order_by<'s>(select: &'s SelectStatementNode, sql: &str) -> Result<&'s ClauseNode> {
    select.order_by.as_ref().ok_or_else(|| Error::SqlTransform {
        code:    MessageCode::Esp2201,
        message: "paging requires an ORDER BY clause".to_string(),
        sql:     sql.to_string()
    })
}

/// Copy of `select` without the clauses that move to the outer statement.
pub(crate) fn sub_statement(select: &SelectStatementNode, keep_order_by: bool) -> SelectStatementNode {
    let mut sub = select.clone();
    sub.for_update = None;
    sub.option = None;
    if !keep_order_by {
        sub.order_by = None;
    }
    sub
}

/// Move FOR UPDATE and OPTION of `original` onto `outer`.
pub(crate) fn relocate_trailing(outer: &mut SelectStatementNode, original: &SelectStatementNode) {
    let moved = |clause: &ClauseNode| {
        let mut wrapper = ClauseNode::new(clause.kind, "");
        wrapper.push(fragment(" "));
        wrapper.push(SqlNode::Clause(clause.clone()));
        wrapper
    };
    outer.for_update = original.for_update.as_ref().map(moved);
    outer.option = original.option.as_ref().map(moved);
}

/// ORDER BY copy whose qualified column words point at `temp_`.
pub(crate) fn requalify(order_by: &ClauseNode) -> ClauseNode {
    ClauseNode {
        kind:     order_by.kind,
        word:     order_by.word.clone(),
        children: order_by.children.iter().map(requalify_node).collect()
    }
}

fn requalify_node(node: &SqlNode) -> SqlNode {
    match node {
        SqlNode::Word(word) => match word.rsplit_once('.') {
            Some((_, column)) => SqlNode::Word(format!("temp_.{column}")),
            None => node.clone()
        },
        SqlNode::Parens(parens) => {
            let mut parens = parens.clone();
            parens.children = parens.children.iter().map(requalify_node).collect();
            SqlNode::Parens(parens)
        }
        SqlNode::LogicalOperator(op) => {
            let mut op = op.clone();
            op.children = op.children.iter().map(requalify_node).collect();
            SqlNode::LogicalOperator(op)
        }
        other => other.clone()
    }
}

/// `where rn > offset [and rn <= offset + limit]` of a wrapping statement.
pub(crate) fn row_number_filter(options: &PagingOptions) -> ClauseNode {
    let rn = options.row_number_column();
    let offset = options.offset_or_zero();
    let mut clause = ClauseNode::new(ClauseKind::Where, "where");
    clause.push(fragment(format!(" {rn} > {offset}")));
    if options.limit > 0 {
        clause.push(fragment(format!(" and {rn} <= {}", offset + options.limit)));
    }
    clause
}

/// Append `nodes` to the last clause that precedes FOR UPDATE and OPTION.
pub(crate) fn append_to_body(select: &mut SelectStatementNode, nodes: Vec<SqlNode>) {
    let tail = [
        &mut select.order_by,
        &mut select.having,
        &mut select.group_by,
        &mut select.where_,
        &mut select.from,
        &mut select.select
    ]
    .into_iter()
    .find_map(Option::as_mut);
    if let Some(clause) = tail {
        clause.children.extend(nodes);
    }
}

/// Insert ` top (n)` into the select list, after DISTINCT when present.
pub(crate) fn insert_top(select: &mut SelectStatementNode, limit: i64) {
    let Some(clause) = select.select.as_mut() else {
        return;
    };
    let first_word = clause
        .children
        .iter()
        .position(|n| !matches!(n, SqlNode::Whitespace(_) | SqlNode::Comment(_)));
    let index = match first_word {
        Some(i) if matches!(&clause.children[i], SqlNode::Word(w) if w.eq_ignore_ascii_case("distinct")) => {
            i + 1
        }
        _ => 0
    };
    clause.children.insert(index, fragment(format!(" top ({limit})")));
}
