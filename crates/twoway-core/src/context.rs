// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Evaluation context for directive expressions.
//!
//! An [`EvaluationContext`] is built once per build call, either from a
//! single object (its properties become resolvable names) or from named
//! scalars. It is never mutated while a template renders; loop variables
//! live in a [`Scope`] layered on top of it, so concurrent builds against the
//! same cached tree stay isolated.
//!
//! # Resolution Order
//!
//! ```text
//! Scope locals (innermost loop first)
//!   └── EvaluationContext named values
//!         └── root object properties
//! ```

use std::collections::BTreeMap;

use crate::value::{ToValue, Value};

/// Source of named values for the expression evaluator.
pub trait VariableSource {
    /// Look up a top-level name.
    fn lookup(&self, name: &str) -> Option<&Value>;
}

/// Read-only values for one build call.
///
/// # Example
///
/// ```rust
/// use twoway_core::{EvaluationContext, Value, VariableSource};
///
/// let ctx = EvaluationContext::new()
///     .with("name", "SMITH")
///     .with("salary", 1000);
/// assert_eq!(ctx.lookup("salary"), Some(&Value::Int(1000)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct EvaluationContext {
    values: BTreeMap<String, Value>,
    root:   Option<Value>
}

impl EvaluationContext {
    /// Empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Context whose top-level names are the properties of `object`.
    ///
    /// A non-object value is kept as root but exposes no names.
    #[must_use]
    pub fn from_object<T: ToValue + ?Sized>(object: &T) -> Self {
        Self {
            values: BTreeMap::new(),
            root:   Some(object.to_value())
        }
    }

    /// Context holding a single named scalar.
    #[must_use]
    pub fn scalar(name: impl Into<String>, value: impl ToValue) -> Self {
        Self::new().with(name, value)
    }

    /// Add a named value.
    ///
    /// Named values shadow root object properties with the same name.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl ToValue) -> Self {
        self.values.insert(name.into(), value.to_value());
        self
    }

    /// Root object, if the context was built from one.
    #[must_use]
    pub fn root(&self) -> Option<&Value> {
        self.root.as_ref()
    }
}

impl VariableSource for EvaluationContext {
    fn lookup(&self, name: &str) -> Option<&Value> {
        self.values
            .get(name)
            .or_else(|| self.root.as_ref().and_then(|root| root.property(name)))
    }
}

/// Per-call variable scope over an [`EvaluationContext`].
///
/// Loop bodies push their variables and pop them when the body ends.
#[derive(Debug)]
pub struct Scope<'a> {
    parent: &'a EvaluationContext,
    locals: Vec<(String, Value)>
}

impl<'a> Scope<'a> {
    /// Scope with no locals.
    #[must_use]
    pub const fn new(parent: &'a EvaluationContext) -> Self {
        Self {
            parent,
            locals: Vec::new()
        }
    }

    /// Bind a local, shadowing outer bindings of the same name.
    pub fn push(&mut self, name: impl Into<String>, value: Value) {
        self.locals.push((name.into(), value));
    }

    /// Drop the `count` most recent locals.
    pub fn pop(&mut self, count: usize) {
        let len = self.locals.len().saturating_sub(count);
        self.locals.truncate(len);
    }

    /// Underlying context.
    #[must_use]
    pub const fn context(&self) -> &'a EvaluationContext {
        self.parent
    }
}

impl VariableSource for Scope<'_> {
    fn lookup(&self, name: &str) -> Option<&Value> {
        self.locals
            .iter()
            .rev()
            .find(|(local, _)| local == name)
            .map(|(_, value)| value)
            .or_else(|| self.parent.lookup(name))
    }
}
