// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Directive expression language.
//!
//! Expressions appear inside `/*%if*/`, `/*%for*/`, bind, literal and
//! embedded directives. Evaluation is pure: it reads names from a
//! [`VariableSource`] and never mutates it.
//!
//! # Grammar
//!
//! ```text
//! or         = and ( "||" and )*
//! and        = comparison ( "&&" comparison )*
//! comparison = unary ( ( "==" | "!=" | "<" | "<=" | ">" | ">=" ) unary )?
//! unary      = "!" unary | primary
//! primary    = literal | path | "@" ident "(" args? ")" | "(" or ")"
//! path       = ident ( "." ident )*
//! ```
//!
//! # Numeric Literals
//!
//! | Suffix | Kind |
//! |--------|------|
//! | none | `Int`, widening to `Long` then `ULong` |
//! | none, with `.` | `Double` |
//! | `U` | `UInt` |
//! | `L` | `Long` |
//! | `UL` | `ULong` |
//! | `F` | `Float` |
//! | `D` | `Double` |
//! | `M` | `Decimal` |
//!
//! # Functions
//!
//! | Function | Result |
//! |----------|--------|
//! | `@escape(s)` | `s` with LIKE wildcards escaped by `$` |
//! | `@startsWith(s)` | `escape(s) + "%"` |
//! | `@contains(s)` | `"%" + escape(s) + "%"` |
//! | `@endsWith(s)` | `"%" + escape(s)` |
//! | `@isEmpty(v)` / `@isNotEmpty(v)` | null, string or list emptiness |
//! | `@isBlank(s)` / `@isNotBlank(s)` | null or whitespace-only string |

mod ast;
mod evaluator;
mod functions;
mod lexer;
mod parser;

#[cfg(test)]
mod tests;

use crate::{context::VariableSource, dialect::Dialect, error::Result, value::Value};

/// Evaluator bound to one dialect's LIKE escaping rules.
///
/// # Example
///
/// ```rust
/// use twoway_core::{Dialect, EvaluationContext, ExpressionEvaluator, Value};
///
/// let ctx = EvaluationContext::new().with("salary", 1200);
/// let evaluator = ExpressionEvaluator::new(Dialect::Standard);
/// let result = evaluator.evaluate("salary >= 1000", &ctx).unwrap();
/// assert_eq!(result, Value::Bool(true));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ExpressionEvaluator {
    dialect: Dialect
}

impl ExpressionEvaluator {
    /// Evaluator for `dialect`.
    #[must_use]
    pub const fn new(dialect: Dialect) -> Self {
        Self {
            dialect
        }
    }

    /// Parse and evaluate `expression`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::ExpressionEvaluate`] with an `EspA0xx` code
    /// for syntax errors, unresolved names, incomparable operands and
    /// function misuse.
    pub fn evaluate(&self, expression: &str, source: &dyn VariableSource) -> Result<Value> {
        let tokens = lexer::tokenize(expression)?;
        let ast = parser::parse(expression, tokens)?;
        evaluator::Evaluator::new(expression, source, self.dialect).eval(&ast)
    }
}
