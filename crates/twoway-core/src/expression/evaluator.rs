// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use std::cmp::Ordering;

use super::{
    ast::{BinaryOp, Expr},
    functions
};
use crate::{
    context::VariableSource,
    dialect::Dialect,
    error::{Error, MessageCode, Result},
    value::Value
};

pub(super) struct Evaluator<'a> {
    expression: &'a str,
    source:     &'a dyn VariableSource,
    dialect:    Dialect
}

impl<'a> Evaluator<'a> {
    pub(super) fn new(expression: &'a str, source: &'a dyn VariableSource, dialect: Dialect) -> Self {
        Self {
            expression,
            source,
            dialect
        }
    }

    fn error(&self, code: MessageCode, message: String, position: usize) -> Error {
        Error::expression(code, message, self.expression, position)
    }

    pub(super) fn eval(&self, expr: &Expr) -> Result<Value> {
        match expr {
            Expr::Literal(value) => Ok(value.clone()),
            Expr::Path {
                segments,
                position
            } => self.resolve(segments, *position),
            Expr::Not {
                operand,
                position
            } => {
                let value = self.eval(operand)?;
                let b = self.require_bool(&value, "!", *position)?;
                Ok(Value::Bool(!b))
            }
            Expr::Binary {
                op: op @ (BinaryOp::And | BinaryOp::Or),
                left,
                right,
                position
            } => {
                let symbol = if *op == BinaryOp::And { "&&" } else { "||" };
                let short_circuit = *op == BinaryOp::Or;
                let lhs = self.eval(left)?;
                if self.require_bool(&lhs, symbol, *position)? == short_circuit {
                    return Ok(Value::Bool(short_circuit));
                }
                let rhs = self.eval(right)?;
                Ok(Value::Bool(self.require_bool(&rhs, symbol, *position)?))
            }
            Expr::Binary {
                op,
                left,
                right,
                position
            } => {
                let lhs = self.eval(left)?;
                let rhs = self.eval(right)?;
                self.compare(*op, &lhs, &rhs, *position).map(Value::Bool)
            }
            Expr::Call {
                name,
                args,
                position
            } => {
                let values = args
                    .iter()
                    .map(|arg| self.eval(arg))
                    .collect::<Result<Vec<_>>>()?;
                functions::call(name, &values, self.dialect)
                    .map_err(|(code, message)| self.error(code, message, *position))
            }
        }
    }

    fn resolve(&self, segments: &[String], position: usize) -> Result<Value> {
        let Some((root, rest)) = segments.split_first() else {
            return Ok(Value::Null);
        };
        let mut current = self.source.lookup(root).ok_or_else(|| {
            self.error(
                MessageCode::EspA011,
                format!("'{root}' is not defined"),
                position
            )
        })?;
        let mut path = root.clone();
        for segment in rest {
            if current.is_null() {
                return Err(self.error(
                    MessageCode::EspA013,
                    format!("'{path}' is null; cannot read '{segment}'"),
                    position
                ));
            }
            current = current.property(segment).ok_or_else(|| {
                self.error(
                    MessageCode::EspA012,
                    format!("'{path}' has no property '{segment}'"),
                    position
                )
            })?;
            path.push('.');
            path.push_str(segment);
        }
        Ok(current.clone())
    }

    fn require_bool(&self, value: &Value, operator: &str, position: usize) -> Result<bool> {
        value.as_bool().ok_or_else(|| {
            self.error(
                MessageCode::EspA023,
                format!("operand of '{operator}' must be bool, found {}", value.kind()),
                position
            )
        })
    }

    fn compare(&self, op: BinaryOp, lhs: &Value, rhs: &Value, position: usize) -> Result<bool> {
        let incomparable = || {
            self.error(
                MessageCode::EspA022,
                format!("cannot compare {} with {}", lhs.kind(), rhs.kind()),
                position
            )
        };
        match op {
            BinaryOp::Eq => lhs.loosely_equals(rhs).ok_or_else(incomparable),
            BinaryOp::Ne => lhs.loosely_equals(rhs).map(|eq| !eq).ok_or_else(incomparable),
            _ if lhs.is_null() || rhs.is_null() => Ok(false),
            _ => {
                let ordering = lhs.compare(rhs).ok_or_else(incomparable)?;
                Ok(match op {
                    BinaryOp::Lt => ordering == Ordering::Less,
                    BinaryOp::Le => ordering != Ordering::Greater,
                    BinaryOp::Gt => ordering == Ordering::Greater,
                    _ => ordering != Ordering::Less
                })
            }
        }
    }
}
