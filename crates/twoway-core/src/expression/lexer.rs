// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::{
    error::{Error, MessageCode, Result},
    value::Value
};

#[derive(Debug, Clone, PartialEq)]
pub(super) enum Lexeme {
    Ident(String),
    Function(String),
    Literal(Value),
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
    Not,
    LParen,
    RParen,
    Comma,
    Dot
}

#[derive(Debug, Clone, PartialEq)]
pub(super) struct ExprToken {
    pub(super) lexeme:   Lexeme,
    pub(super) position: usize
}

pub(super) fn tokenize(expression: &str) -> Result<Vec<ExprToken>> {
    let chars: Vec<char> = expression.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        let start = i;
        if c.is_whitespace() {
            i += 1;
            continue;
        }
        let next = chars.get(i + 1).copied();
        let lexeme = match c {
            '(' => {
                i += 1;
                Lexeme::LParen
            }
            ')' => {
                i += 1;
                Lexeme::RParen
            }
            ',' => {
                i += 1;
                Lexeme::Comma
            }
            '.' => {
                i += 1;
                Lexeme::Dot
            }
            '=' | '&' | '|' if next == Some(c) => {
                i += 2;
                match c {
                    '=' => Lexeme::Eq,
                    '&' => Lexeme::And,
                    _ => Lexeme::Or
                }
            }
            '=' | '&' | '|' => {
                return Err(Error::expression(
                    MessageCode::EspA021,
                    format!("unknown operator '{c}'"),
                    expression,
                    start
                ));
            }
            '!' | '<' | '>' if next == Some('=') => {
                i += 2;
                match c {
                    '!' => Lexeme::Ne,
                    '<' => Lexeme::Le,
                    _ => Lexeme::Ge
                }
            }
            '!' => {
                i += 1;
                Lexeme::Not
            }
            '<' => {
                i += 1;
                Lexeme::Lt
            }
            '>' => {
                i += 1;
                Lexeme::Gt
            }
            '\'' | '"' => {
                let (text, end) = scan_string(&chars, i, expression)?;
                i = end;
                Lexeme::Literal(Value::String(text))
            }
            '@' => {
                let end = scan_ident(&chars, i + 1);
                if end == i + 1 {
                    return Err(Error::expression(
                        MessageCode::EspA014,
                        "function name expected after '@'",
                        expression,
                        start
                    ));
                }
                let name: String = chars[i + 1..end].iter().collect();
                i = end;
                Lexeme::Function(name)
            }
            c if c.is_ascii_digit()
                || (c == '-' && next.is_some_and(|n| n.is_ascii_digit())) =>
            {
                let (value, end) = scan_number(&chars, i, expression)?;
                i = end;
                Lexeme::Literal(value)
            }
            c if c.is_alphabetic() || c == '_' => {
                let end = scan_ident(&chars, i);
                let word: String = chars[i..end].iter().collect();
                i = end;
                match word.as_str() {
                    "null" => Lexeme::Literal(Value::Null),
                    "true" => Lexeme::Literal(Value::Bool(true)),
                    "false" => Lexeme::Literal(Value::Bool(false)),
                    _ => Lexeme::Ident(word)
                }
            }
            other => {
                return Err(Error::expression(
                    MessageCode::EspA001,
                    format!("unsupported character '{other}'"),
                    expression,
                    start
                ));
            }
        };
        tokens.push(ExprToken {
            lexeme,
            position: start
        });
    }
    Ok(tokens)
}

fn scan_ident(chars: &[char], start: usize) -> usize {
    let mut end = start;
    while end < chars.len() && (chars[end].is_alphanumeric() || chars[end] == '_') {
        end += 1;
    }
    end
}

fn scan_string(chars: &[char], start: usize, expression: &str) -> Result<(String, usize)> {
    let quote = chars[start];
    let mut text = String::new();
    let mut i = start + 1;
    while i < chars.len() {
        let c = chars[i];
        if c == quote {
            if chars.get(i + 1) == Some(&quote) {
                text.push(quote);
                i += 2;
                continue;
            }
            return Ok((text, i + 1));
        }
        text.push(c);
        i += 1;
    }
    Err(Error::expression(
        MessageCode::EspA004,
        "string literal is not terminated",
        expression,
        start
    ))
}

fn scan_number(chars: &[char], start: usize, expression: &str) -> Result<(Value, usize)> {
    let mut end = start + 1;
    let mut has_point = false;
    while end < chars.len() {
        let c = chars[end];
        if c.is_ascii_digit() {
            end += 1;
        } else if c == '.' && !has_point && chars.get(end + 1).is_some_and(char::is_ascii_digit) {
            has_point = true;
            end += 1;
        } else {
            break;
        }
    }
    let digits: String = chars[start..end].iter().collect();
    let suffix_end = scan_ident(chars, end);
    let suffix: String = chars[end..suffix_end].iter().collect::<String>().to_ascii_uppercase();

    let malformed = |code: MessageCode, kind: &str| {
        Error::expression(
            code,
            format!("malformed {kind} literal '{digits}{suffix}'"),
            expression,
            start
        )
    };

    let value = match suffix.as_str() {
        "" if has_point => digits
            .parse::<f64>()
            .map(Value::Double)
            .map_err(|_| malformed(MessageCode::EspA036, "double"))?,
        "" => {
            if let Ok(v) = digits.parse::<i32>() {
                Value::Int(v)
            } else if let Ok(v) = digits.parse::<i64>() {
                Value::Long(v)
            } else if let Ok(v) = digits.parse::<u64>() {
                Value::ULong(v)
            } else {
                return Err(Error::expression(
                    MessageCode::EspA038,
                    format!("integer literal '{digits}' is out of range"),
                    expression,
                    start
                ));
            }
        }
        "U" => digits
            .parse::<u32>()
            .map(Value::UInt)
            .map_err(|_| malformed(MessageCode::EspA032, "uint"))?,
        "L" => digits
            .parse::<i64>()
            .map(Value::Long)
            .map_err(|_| malformed(MessageCode::EspA033, "long"))?,
        "UL" | "LU" => digits
            .parse::<u64>()
            .map(Value::ULong)
            .map_err(|_| malformed(MessageCode::EspA034, "ulong"))?,
        "F" => digits
            .parse::<f32>()
            .map(Value::Float)
            .map_err(|_| malformed(MessageCode::EspA035, "float"))?,
        "D" => digits
            .parse::<f64>()
            .map(Value::Double)
            .map_err(|_| malformed(MessageCode::EspA036, "double"))?,
        "M" => Decimal::from_str(&digits)
            .map(Value::Decimal)
            .map_err(|_| malformed(MessageCode::EspA037, "decimal"))?,
        _ => return Err(malformed(MessageCode::EspA031, "int"))
    };
    Ok((value, suffix_end))
}
