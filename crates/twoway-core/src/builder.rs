// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! SQL rendering.
//!
//! [`SqlBuilder`] walks a parsed tree against an [`EvaluationContext`] and
//! writes two renderings into a [`SqlContext`]: parameterized SQL for the
//! driver and debug SQL with every value inlined as a dialect literal.
//! The tree is only read, so one cached tree can serve concurrent builds.
//!
//! # Cleanup
//!
//! The context tracks whether anything substantial was written since the
//! start of the current clause, logical operator or parenthesis group:
//!
//! | Node | Dropped when |
//! |------|--------------|
//! | WHERE, HAVING, GROUP BY, ORDER BY | their content renders empty |
//! | AND, OR | nothing precedes them in the group, or their operand is empty |
//! | `( ... )` | the content renders empty |
//!
//! ```text
//! where /*%if id != null*/id = /*id*/1/*%end*/ and name = /*name*/'a'
//!
//! id = null  →  where  name = @name
//! ```


use std::collections::HashMap;

use tracing::trace;

use crate::{
    config::{ParameterFactory, SqlParserConfig},
    context::{EvaluationContext, Scope, VariableSource},
    dialect::{Dialect, ParameterStyle},
    entity::EntityColumnInfo,
    error::{Error, MessageCode, Result},
    expression::ExpressionEvaluator,
    node::{
        ClauseNode, EmbeddedVariableNode, ExpandNode, ForNode, IfBlockNode, Location,
        LogicalOperatorNode, ParensNode, PopulateNode, SqlNode, VariableNode
    },
    result::{DbParameter, ParameterDirection, SqlParserResult},
    value::{DbType, Value}
};

/// Restore point of a [`SqlContext`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mark {
    parsed:     usize,
    debug:      usize,
    parameters: usize,
    available:  bool
}

/// Output of one build: both SQL renderings and the parameter list.
///
/// Shared by the template builder and the entity query builder so both
/// name and number parameters the same way.
#[derive(Debug)]
pub struct SqlContext<'a> {
    parsed:     String,
    debug:      String,
    parameters: Vec<DbParameter>,
    names:      HashMap<String, usize>,
    available:  bool,
    dialect:    Dialect,
    style:      ParameterStyle,
    factory:    &'a dyn ParameterFactory
}

impl<'a> SqlContext<'a> {
    /// Empty output for `config`.
    #[must_use]
    pub fn new(config: &'a SqlParserConfig) -> Self {
        Self {
            parsed:     String::new(),
            debug:      String::new(),
            parameters: Vec::new(),
            names:      HashMap::new(),
            available:  false,
            dialect:    config.dialect(),
            style:      config.parameter_style(),
            factory:    config.parameter_factory()
        }
    }

    #[must_use]
    pub const fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Append the same text to both renderings.
    pub fn append_sql(&mut self, text: &str) {
        self.parsed.push_str(text);
        self.debug.push_str(text);
    }

    /// Append an input parameter derived from `base`.
    pub fn append_parameter(&mut self, base: &str, value: Value) {
        self.append_parameter_with(base, value, None, ParameterDirection::Input);
    }

    /// Append a parameter with an explicit type and direction.
    ///
    /// Output parameters show their placeholder in the debug rendering.
    pub fn append_parameter_with(
        &mut self,
        base: &str,
        value: Value,
        db_type: Option<DbType>,
        direction: ParameterDirection
    ) {
        let name = self.unique_name(base);
        let placeholder = self.style.placeholder(&name, self.parameters.len() + 1);
        let literal = match direction {
            ParameterDirection::Input => self.dialect.format_literal(&value),
            ParameterDirection::Output => placeholder.clone()
        };
        self.parsed.push_str(&placeholder);
        self.debug.push_str(&literal);
        let parameter =
            self.factory
                .create(&self.style.parameter_name(&name), value, db_type, direction);
        self.parameters.push(parameter);
        self.available = true;
    }

    /// Append `value` as an inline literal in both renderings.
    pub fn append_literal(&mut self, value: &Value) {
        let literal = self.dialect.format_literal(value);
        self.append_sql(&literal);
        self.available = true;
    }

    #[must_use]
    pub const fn available(&self) -> bool {
        self.available
    }

    pub const fn set_available(&mut self, available: bool) {
        self.available = available;
    }

    #[must_use]
    pub fn mark(&self) -> Mark {
        Mark {
            parsed:     self.parsed.len(),
            debug:      self.debug.len(),
            parameters: self.parameters.len(),
            available:  self.available
        }
    }

    /// Drop everything written since `mark`.
    pub fn rollback(&mut self, mark: Mark) {
        self.parsed.truncate(mark.parsed);
        self.debug.truncate(mark.debug);
        self.parameters.truncate(mark.parameters);
        self.available = mark.available;
    }

    /// Parameters written so far.
    #[must_use]
    pub fn parameters(&self) -> &[DbParameter] {
        &self.parameters
    }

    #[must_use]
    pub fn finish(self) -> SqlParserResult {
        SqlParserResult {
            parsed_sql: self.parsed,
            debug_sql:  self.debug,
            parameters: self.parameters
        }
    }

    fn unique_name(&mut self, base: &str) -> String {
        let base = sanitize(base);
        let seen = self.names.entry(base.clone()).or_insert(0);
        let name = match *seen {
            0 => base,
            n => format!("{base}_{n}")
        };
        *seen += 1;
        name
    }
}

/// Parameter name derived from an expression: `emp.name` → `emp_name`.
fn sanitize(expression: &str) -> String {
    let mut name = String::with_capacity(expression.len());
    for c in expression.chars() {
        if c.is_alphanumeric() {
            name.push(c);
        } else if !name.ends_with('_') {
            name.push('_');
        }
    }
    let name = name.trim_matches('_');
    if name.is_empty() {
        "p".to_string()
    } else {
        name.to_string()
    }
}

/// Renders parsed templates.
///
/// # Example
///
/// ```rust
/// use twoway_core::{Dialect, EvaluationContext, SqlBuilder, SqlParserConfig, parse};
///
/// let sql = "select * from emp where id = /*id*/1";
/// let node = parse(sql).unwrap();
/// let config = SqlParserConfig::for_dialect(Dialect::SqlServer);
/// let ctx = EvaluationContext::new().with("id", 7);
/// let result = SqlBuilder::new(&config).build(&node, sql, &ctx).unwrap();
/// assert_eq!(result.parsed_sql, "select * from emp where id = @id");
/// assert_eq!(result.debug_sql, "select * from emp where id = 7");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SqlBuilder<'a> {
    config:    &'a SqlParserConfig,
    evaluator: ExpressionEvaluator,
    columns:   Option<&'a [EntityColumnInfo]>
}

impl<'a> SqlBuilder<'a> {
    #[must_use]
    pub const fn new(config: &'a SqlParserConfig) -> Self {
        Self {
            config,
            evaluator: ExpressionEvaluator::new(config.dialect()),
            columns: None
        }
    }

    /// Entity columns used by `/*%expand*/` and `/*%populate*/`.
    #[must_use]
    pub const fn with_columns(mut self, columns: &'a [EntityColumnInfo]) -> Self {
        self.columns = Some(columns);
        self
    }

    /// Render `node`. `sql` is the template text, used in errors.
    ///
    /// # Errors
    ///
    /// - [`Error::SqlBuild`] for non-boolean conditions, non-iterable loop
    ///   targets, null loop elements and unsafe substituted text
    /// - [`Error::ExpressionEvaluate`] for directive expression errors
    /// - [`Error::UnsupportedSqlComment`] for expand or populate without
    ///   entity columns
    pub fn build(&self, node: &SqlNode, sql: &str, ctx: &EvaluationContext) -> Result<SqlParserResult> {
        let mut out = SqlContext::new(self.config);
        self.build_into(node, sql, ctx, &mut out)?;
        let result = out.finish();
        trace!(
            parsed_sql = %result.parsed_sql,
            debug_sql = %result.debug_sql,
            parameters = result.parameters.len(),
            "built sql"
        );
        Ok(result)
    }

    /// Render `node` into an existing output.
    ///
    /// # Errors
    ///
    /// Same as [`SqlBuilder::build`].
    pub fn build_into(
        &self,
        node: &SqlNode,
        sql: &str,
        ctx: &EvaluationContext,
        out: &mut SqlContext<'_>
    ) -> Result<()> {
        let mut scope = Scope::new(ctx);
        self.node(node, sql, &mut scope, out)
    }

    fn node(&self, node: &SqlNode, sql: &str, scope: &mut Scope<'_>, out: &mut SqlContext<'_>) -> Result<()> {
        match node {
            SqlNode::Anonymous(children) => self.nodes(children, sql, scope, out),
            SqlNode::SelectStatement(select) => {
                for clause in select.clauses() {
                    self.clause(clause, sql, scope, out)?;
                }
                Ok(())
            }
            SqlNode::Clause(clause) => self.clause(clause, sql, scope, out),
            SqlNode::IfBlock(block) => self.if_block(block, sql, scope, out),
            SqlNode::ForBlock(block) => self.for_block(&block.for_node, sql, scope, out),
            SqlNode::BindVariable(var) => self.bind(var, scope, out),
            SqlNode::LiteralVariable(var) => self.literal(var, sql, scope, out),
            SqlNode::EmbeddedVariable(var) => self.embedded(var, sql, scope, out),
            SqlNode::Expand(expand) => self.expand(expand, scope, out),
            SqlNode::Populate(populate) => self.populate(populate, scope, out),
            SqlNode::Word(text) | SqlNode::Fragment(text) => {
                out.append_sql(text);
                out.set_available(true);
                Ok(())
            }
            SqlNode::Whitespace(text) | SqlNode::Comment(text) => {
                out.append_sql(text);
                Ok(())
            }
            SqlNode::Parens(parens) => self.parens(parens, sql, scope, out),
            SqlNode::LogicalOperator(op) => self.logical(op, sql, scope, out)
        }
    }

    fn nodes(&self, nodes: &[SqlNode], sql: &str, scope: &mut Scope<'_>, out: &mut SqlContext<'_>) -> Result<()> {
        for node in nodes {
            self.node(node, sql, scope, out)?;
        }
        Ok(())
    }

    fn clause(&self, clause: &ClauseNode, sql: &str, scope: &mut Scope<'_>, out: &mut SqlContext<'_>) -> Result<()> {
        let mark = out.mark();
        out.append_sql(&clause.word);
        out.set_available(false);
        self.nodes(&clause.children, sql, scope, out)?;
        if clause.kind.is_removable() && !out.available() {
            out.rollback(mark);
        } else {
            out.set_available(true);
        }
        Ok(())
    }

    fn logical(
        &self,
        op: &LogicalOperatorNode,
        sql: &str,
        scope: &mut Scope<'_>,
        out: &mut SqlContext<'_>
    ) -> Result<()> {
        let mark = out.mark();
        if out.available() {
            out.append_sql(&op.word);
        }
        out.set_available(false);
        self.nodes(&op.children, sql, scope, out)?;
        // `/*%if more*/ or /*%end*/` carries its operand outside the node.
        let has_operand = op
            .children
            .iter()
            .any(|c| !matches!(c, SqlNode::Whitespace(_) | SqlNode::Comment(_)));
        if !has_operand {
            out.set_available(mark.available);
        } else if !out.available() {
            out.rollback(mark);
        }
        Ok(())
    }

    fn parens(&self, parens: &ParensNode, sql: &str, scope: &mut Scope<'_>, out: &mut SqlContext<'_>) -> Result<()> {
        if parens.is_empty_as_written() {
            out.append_sql("(");
            self.nodes(&parens.children, sql, scope, out)?;
            out.append_sql(")");
            out.set_available(true);
            return Ok(());
        }
        let mark = out.mark();
        out.append_sql("(");
        out.set_available(false);
        self.nodes(&parens.children, sql, scope, out)?;
        if out.available() {
            out.append_sql(")");
        } else {
            out.rollback(mark);
        }
        Ok(())
    }

    fn if_block(&self, block: &IfBlockNode, sql: &str, scope: &mut Scope<'_>, out: &mut SqlContext<'_>) -> Result<()> {
        for branch in std::iter::once(&block.if_node).chain(&block.elseifs) {
            if self.condition(&branch.expression, branch.location, sql, scope)? {
                return self.nodes(&branch.children, sql, scope, out);
            }
        }
        match &block.else_node {
            Some(else_node) => self.nodes(&else_node.children, sql, scope, out),
            None => Ok(())
        }
    }

    fn condition(&self, expression: &str, location: Location, sql: &str, scope: &Scope<'_>) -> Result<bool> {
        match self.evaluator.evaluate(expression, scope)? {
            Value::Bool(b) => Ok(b),
            other => Err(Error::build(
                MessageCode::Esp2113,
                format!(
                    "condition '{expression}' evaluated to {} instead of bool",
                    other.kind()
                ),
                sql,
                location.line,
                location.column
            ))
        }
    }

    fn for_block(&self, for_node: &ForNode, sql: &str, scope: &mut Scope<'_>, out: &mut SqlContext<'_>) -> Result<()> {
        let location = for_node.location;
        let items = match self.evaluator.evaluate(&for_node.expression, scope)? {
            Value::List(items) => items,
            other => {
                return Err(Error::build(
                    MessageCode::Esp2112,
                    format!(
                        "'{}' evaluated to {}, which is not iterable",
                        for_node.expression,
                        other.kind()
                    ),
                    sql,
                    location.line,
                    location.column
                ));
            }
        };
        let ident = &for_node.identifier;
        let count = items.len();
        for (index, item) in items.into_iter().enumerate() {
            if item.is_null() {
                return Err(Error::build(
                    MessageCode::Esp2115,
                    format!(
                        "element {index} of '{}' is null",
                        for_node.expression
                    ),
                    sql,
                    location.line,
                    location.column
                ));
            }
            scope.push(ident.clone(), item);
            scope.push(
                format!("{ident}_index"),
                Value::Int(i32::try_from(index).unwrap_or(i32::MAX))
            );
            scope.push(format!("{ident}_has_next"), Value::Bool(index + 1 < count));
            let rendered = self.nodes(&for_node.children, sql, scope, out);
            scope.pop(3);
            rendered?;
        }
        Ok(())
    }

    fn bind(&self, var: &VariableNode, scope: &Scope<'_>, out: &mut SqlContext<'_>) -> Result<()> {
        let expression = bind_expression(&var.expression);
        let value = self.evaluator.evaluate(expression, scope)?;
        if var.parens.is_none() {
            out.append_parameter(expression, value);
            return Ok(());
        }
        out.append_sql("(");
        match value {
            Value::List(items) if items.is_empty() => out.append_sql("null"),
            Value::List(items) => {
                for (index, item) in items.into_iter().enumerate() {
                    if index > 0 {
                        out.append_sql(", ");
                    }
                    out.append_parameter(expression, item);
                }
            }
            scalar => out.append_parameter(expression, scalar)
        }
        out.append_sql(")");
        out.set_available(true);
        Ok(())
    }

    fn literal(&self, var: &VariableNode, sql: &str, scope: &Scope<'_>, out: &mut SqlContext<'_>) -> Result<()> {
        let value = self.evaluator.evaluate(&var.expression, scope)?;
        let quoted = match &value {
            Value::String(s) => s.contains('\''),
            Value::List(items) => items
                .iter()
                .any(|item| item.as_str().is_some_and(|s| s.contains('\''))),
            _ => false
        };
        if quoted {
            return Err(Error::build(
                MessageCode::Esp2224,
                format!(
                    "literal variable '{}' contains a single quote",
                    var.expression
                ),
                sql,
                var.location.line,
                var.location.column
            ));
        }
        if var.parens.is_some() {
            out.append_sql("(");
            out.append_literal(&value);
            out.append_sql(")");
        } else {
            out.append_literal(&value);
        }
        Ok(())
    }

    fn embedded(
        &self,
        var: &EmbeddedVariableNode,
        sql: &str,
        scope: &Scope<'_>,
        out: &mut SqlContext<'_>
    ) -> Result<()> {
        let text = self.evaluator.evaluate(&var.expression, scope)?.display_text();
        let rejected = [
            ("'", MessageCode::Esp2116, "a single quote"),
            (";", MessageCode::Esp2117, "a semicolon"),
            ("--", MessageCode::Esp2122, "a line comment"),
            ("/*", MessageCode::Esp2123, "a block comment")
        ];
        if let Some((_, code, what)) = rejected.iter().find(|(needle, ..)| text.contains(*needle)) {
            return Err(Error::build(
                *code,
                format!("embedded variable '{}' contains {what}", var.expression),
                sql,
                var.location.line,
                var.location.column
            ));
        }
        out.append_sql(&text);
        if !text.trim().is_empty() {
            out.set_available(true);
        }
        Ok(())
    }

    fn entity_columns(&self, directive: &str) -> Result<&'a [EntityColumnInfo]> {
        self.columns.ok_or_else(|| Error::UnsupportedSqlComment {
            directive: directive.to_string(),
            reason:    "entity columns are not available for this build".to_string()
        })
    }

    fn expand(&self, expand: &ExpandNode, scope: &Scope<'_>, out: &mut SqlContext<'_>) -> Result<()> {
        let columns = self.entity_columns(&expand.text)?;
        let prefix = if expand.alias.is_empty() {
            String::new()
        } else {
            match self.evaluator.evaluate(&expand.alias, scope)? {
                Value::String(alias) if !alias.is_empty() => format!("{alias}."),
                _ => String::new()
            }
        };
        let list = columns
            .iter()
            .map(|c| format!("{prefix}{}", c.column_name))
            .collect::<Vec<_>>()
            .join(", ");
        out.append_sql(&list);
        out.set_available(true);
        Ok(())
    }

    fn populate(&self, populate: &PopulateNode, scope: &Scope<'_>, out: &mut SqlContext<'_>) -> Result<()> {
        let columns = self.entity_columns(&populate.text)?;
        let mut first = true;
        for column in columns.iter().filter(|c| c.is_updatable()) {
            if !first {
                out.append_sql(", ");
            }
            first = false;
            let name = &column.column_name;
            if column.is_version {
                out.append_sql(&format!("{name} = {name} + 1"));
                continue;
            }
            out.append_sql(&format!("{name} = "));
            let value = scope
                .lookup(&column.property_name)
                .cloned()
                .unwrap_or(Value::Null);
            out.append_parameter_with(
                &column.property_name,
                value,
                Some(column.db_type),
                ParameterDirection::Input
            );
        }
        let trailing: String = populate
            .children
            .iter()
            .rev()
            .map_while(|child| match child {
                SqlNode::Whitespace(text) => Some(text.as_str()),
                _ => None
            })
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        out.append_sql(&trailing);
        out.set_available(true);
        Ok(())
    }
}

/// `/*@name*/` binds the same value as `/*name*/`.
fn bind_expression(expression: &str) -> &str {
    match expression.strip_prefix('@') {
        Some(rest) if !rest.contains('(') => rest,
        _ => expression
    }
}
