// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum BinaryOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or
}

/// Expression tree. Positions are 0-based character offsets.
#[derive(Debug, Clone, PartialEq)]
pub(super) enum Expr {
    Literal(Value),
    Path {
        segments: Vec<String>,
        position: usize
    },
    Not {
        operand:  Box<Expr>,
        position: usize
    },
    Binary {
        op:       BinaryOp,
        left:     Box<Expr>,
        right:    Box<Expr>,
        position: usize
    },
    Call {
        name:     String,
        args:     Vec<Expr>,
        position: usize
    }
}
