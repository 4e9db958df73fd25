// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use crate::{dialect::Dialect, error::MessageCode, value::Value};

type CallResult = Result<Value, (MessageCode, String)>;

pub(super) fn call(name: &str, args: &[Value], dialect: Dialect) -> CallResult {
    match name {
        "escape" => like(name, args, dialect, "", ""),
        "startsWith" => like(name, args, dialect, "", "%"),
        "contains" => like(name, args, dialect, "%", "%"),
        "endsWith" => like(name, args, dialect, "%", ""),
        "isEmpty" => emptiness(name, args).map(Value::Bool),
        "isNotEmpty" => emptiness(name, args).map(|b| Value::Bool(!b)),
        "isBlank" => blankness(name, args).map(Value::Bool),
        "isNotBlank" => blankness(name, args).map(|b| Value::Bool(!b)),
        _ => Err((MessageCode::EspA014, format!("unknown function '@{name}'")))
    }
}

fn single<'a>(name: &str, args: &'a [Value]) -> Result<&'a Value, (MessageCode, String)> {
    match args {
        [arg] => Ok(arg),
        _ => Err((
            MessageCode::EspA015,
            format!("@{name} takes 1 argument, got {}", args.len())
        ))
    }
}

fn bad_argument(name: &str, value: &Value) -> (MessageCode, String) {
    (
        MessageCode::EspA015,
        format!("@{name} does not accept a {} argument", value.kind())
    )
}

fn like(name: &str, args: &[Value], dialect: Dialect, prefix: &str, suffix: &str) -> CallResult {
    match single(name, args)? {
        Value::Null => Ok(Value::Null),
        Value::String(s) => Ok(Value::String(format!(
            "{prefix}{}{suffix}",
            escape_like(s, dialect)
        ))),
        other => Err(bad_argument(name, other))
    }
}

/// Escape LIKE wildcards and the escape character itself.
fn escape_like(text: &str, dialect: Dialect) -> String {
    let escape = dialect.like_escape_char();
    let wildcards = dialect.like_wildcards();
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c == escape || wildcards.contains(&c) {
            out.push(escape);
        }
        out.push(c);
    }
    out
}

fn emptiness(name: &str, args: &[Value]) -> Result<bool, (MessageCode, String)> {
    match single(name, args)? {
        Value::Null => Ok(true),
        Value::String(s) => Ok(s.is_empty()),
        Value::List(items) => Ok(items.is_empty()),
        other => Err(bad_argument(name, other))
    }
}

fn blankness(name: &str, args: &[Value]) -> Result<bool, (MessageCode, String)> {
    match single(name, args)? {
        Value::Null => Ok(true),
        Value::String(s) => Ok(s.trim().is_empty()),
        other => Err(bad_argument(name, other))
    }
}
