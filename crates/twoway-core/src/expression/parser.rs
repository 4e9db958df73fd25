// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use super::{
    ast::{BinaryOp, Expr},
    lexer::{ExprToken, Lexeme}
};
use crate::error::{Error, MessageCode, Result};

pub(super) fn parse(expression: &str, tokens: Vec<ExprToken>) -> Result<Expr> {
    let mut parser = ExprParser {
        expression,
        tokens,
        pos: 0
    };
    let expr = parser.or()?;
    if let Some(token) = parser.tokens.get(parser.pos) {
        return Err(Error::expression(
            MessageCode::EspA024,
            "unexpected token after expression",
            expression,
            token.position
        ));
    }
    Ok(expr)
}

struct ExprParser<'a> {
    expression: &'a str,
    tokens:     Vec<ExprToken>,
    pos:        usize
}

impl ExprParser<'_> {
    fn peek(&self) -> Option<&Lexeme> {
        self.tokens.get(self.pos).map(|t| &t.lexeme)
    }

    fn position(&self) -> usize {
        self.tokens
            .get(self.pos)
            .map_or(self.expression.chars().count(), |t| t.position)
    }

    fn error(&self, code: MessageCode, message: &str) -> Error {
        Error::expression(code, message, self.expression, self.position())
    }

    fn or(&mut self) -> Result<Expr> {
        let mut left = self.and()?;
        while self.peek() == Some(&Lexeme::Or) {
            let position = self.position();
            self.pos += 1;
            let right = self.and()?;
            left = binary(BinaryOp::Or, left, right, position);
        }
        Ok(left)
    }

    fn and(&mut self) -> Result<Expr> {
        let mut left = self.comparison()?;
        while self.peek() == Some(&Lexeme::And) {
            let position = self.position();
            self.pos += 1;
            let right = self.comparison()?;
            left = binary(BinaryOp::And, left, right, position);
        }
        Ok(left)
    }

    fn comparison(&mut self) -> Result<Expr> {
        let left = self.unary()?;
        let op = match self.peek() {
            Some(Lexeme::Eq) => BinaryOp::Eq,
            Some(Lexeme::Ne) => BinaryOp::Ne,
            Some(Lexeme::Lt) => BinaryOp::Lt,
            Some(Lexeme::Le) => BinaryOp::Le,
            Some(Lexeme::Gt) => BinaryOp::Gt,
            Some(Lexeme::Ge) => BinaryOp::Ge,
            _ => return Ok(left)
        };
        if matches!(left, Expr::Literal(_)) {
            return Err(self.error(
                MessageCode::EspA003,
                "literal must not appear on the left of a comparison"
            ));
        }
        let position = self.position();
        self.pos += 1;
        let right = self.unary()?;
        Ok(binary(op, left, right, position))
    }

    fn unary(&mut self) -> Result<Expr> {
        if self.peek() == Some(&Lexeme::Not) {
            let position = self.position();
            self.pos += 1;
            let operand = self.unary()?;
            return Ok(Expr::Not {
                operand: Box::new(operand),
                position
            });
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Expr> {
        let position = self.position();
        let Some(lexeme) = self.peek().cloned() else {
            return Err(self.error(MessageCode::EspA024, "operand expected"));
        };
        self.pos += 1;
        match lexeme {
            Lexeme::Literal(value) => Ok(Expr::Literal(value)),
            Lexeme::LParen => {
                let inner = self.or()?;
                self.expect_close()?;
                Ok(inner)
            }
            Lexeme::Ident(first) => {
                let mut segments = vec![first];
                while self.peek() == Some(&Lexeme::Dot) {
                    self.pos += 1;
                    match self.peek().cloned() {
                        Some(Lexeme::Ident(name)) => {
                            self.pos += 1;
                            segments.push(name);
                        }
                        _ => {
                            return Err(
                                self.error(MessageCode::EspA012, "property name expected after '.'")
                            );
                        }
                    }
                }
                Ok(Expr::Path {
                    segments,
                    position
                })
            }
            Lexeme::Function(name) => {
                if self.peek() != Some(&Lexeme::LParen) {
                    return Err(self.error(
                        MessageCode::EspA015,
                        "function call requires an argument list"
                    ));
                }
                self.pos += 1;
                let mut args = Vec::new();
                if self.peek() != Some(&Lexeme::RParen) {
                    loop {
                        args.push(self.or()?);
                        if self.peek() == Some(&Lexeme::Comma) {
                            self.pos += 1;
                        } else {
                            break;
                        }
                    }
                }
                self.expect_close()?;
                Ok(Expr::Call {
                    name,
                    args,
                    position
                })
            }
            _ => {
                self.pos -= 1;
                Err(self.error(MessageCode::EspA024, "unexpected token"))
            }
        }
    }

    fn expect_close(&mut self) -> Result<()> {
        if self.peek() == Some(&Lexeme::RParen) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error(MessageCode::EspA002, "')' expected"))
        }
    }
}

fn binary(op: BinaryOp, left: Expr, right: Expr, position: usize) -> Expr {
    Expr::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
        position
    }
}
