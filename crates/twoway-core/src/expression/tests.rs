// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use super::*;
use crate::{context::EvaluationContext, error::MessageCode};

fn ctx() -> EvaluationContext {
    let mut dept = BTreeMap::new();
    dept.insert("name".to_string(), Value::String("SALES".into()));
    dept.insert("manager".to_string(), Value::Null);
    EvaluationContext::new()
        .with("salary", 1200)
        .with("name", "SMITH")
        .with("empty", "")
        .with("blank", "   ")
        .with("ids", vec![1, 2, 3])
        .with("none", Value::Null)
        .with("flag", true)
        .with("dept", Value::Object(dept))
}

fn eval(expr: &str) -> Value {
    ExpressionEvaluator::new(Dialect::Standard)
        .evaluate(expr, &ctx())
        .unwrap()
}

fn code(expr: &str) -> Option<MessageCode> {
    ExpressionEvaluator::new(Dialect::Standard)
        .evaluate(expr, &ctx())
        .err()
        .and_then(|e| e.code())
}

#[test]
fn literals() {
    assert_eq!(eval("null"), Value::Null);
    assert_eq!(eval("true"), Value::Bool(true));
    assert_eq!(eval("'it''s'"), Value::String("it's".into()));
    assert_eq!(eval("\"dq\""), Value::String("dq".into()));
    assert_eq!(eval("42"), Value::Int(42));
    assert_eq!(eval("3000000000"), Value::Long(3_000_000_000));
    assert_eq!(eval("10000000000000000000"), Value::ULong(10_000_000_000_000_000_000));
    assert_eq!(eval("1.5"), Value::Double(1.5));
    assert_eq!(eval("7U"), Value::UInt(7));
    assert_eq!(eval("7L"), Value::Long(7));
    assert_eq!(eval("7UL"), Value::ULong(7));
    assert_eq!(eval("2.5F"), Value::Float(2.5));
    assert_eq!(eval("2.5D"), Value::Double(2.5));
    assert_eq!(eval("2.5M"), Value::Decimal(Decimal::new(25, 1)));
    assert_eq!(eval("-3"), Value::Int(-3));
}

#[test]
fn comparisons_across_numeric_kinds() {
    assert_eq!(eval("salary >= 1000"), Value::Bool(true));
    assert_eq!(eval("salary < 1000L"), Value::Bool(false));
    assert_eq!(eval("salary == 1200.0"), Value::Bool(true));
    assert_eq!(eval("salary != 1200M"), Value::Bool(false));
    assert_eq!(eval("name == 'SMITH'"), Value::Bool(true));
}

#[test]
fn null_semantics() {
    assert_eq!(eval("none == null"), Value::Bool(true));
    assert_eq!(eval("name != null"), Value::Bool(true));
    assert_eq!(eval("none > 1"), Value::Bool(false));
    assert_eq!(eval("none <= 1"), Value::Bool(false));
}

#[test]
fn logical_operators_short_circuit() {
    assert_eq!(eval("flag && salary > 100"), Value::Bool(true));
    assert_eq!(code("!flag || missing"), Some(MessageCode::EspA011));
    assert_eq!(eval("flag || missing"), Value::Bool(true));
    assert_eq!(eval("!flag && missing"), Value::Bool(false));
    assert_eq!(eval("!(salary > 2000)"), Value::Bool(true));
}

#[test]
fn property_paths() {
    assert_eq!(eval("dept.name"), Value::String("SALES".into()));
    assert_eq!(code("dept.unknown"), Some(MessageCode::EspA012));
    assert_eq!(code("dept.manager.name"), Some(MessageCode::EspA013));
    assert_eq!(code("missing"), Some(MessageCode::EspA011));
}

#[test]
fn like_functions() {
    assert_eq!(eval("@startsWith('a%b')"), Value::String("a$%b%".into()));
    assert_eq!(eval("@contains('x_y')"), Value::String("%x$_y%".into()));
    assert_eq!(eval("@endsWith('$')"), Value::String("%$$".into()));
    assert_eq!(eval("@escape(none)"), Value::Null);
    let sqlserver = ExpressionEvaluator::new(Dialect::SqlServer)
        .evaluate("@escape('[a]')", &ctx())
        .unwrap();
    assert_eq!(sqlserver, Value::String("$[a]".into()));
}

#[test]
fn emptiness_functions() {
    assert_eq!(eval("@isEmpty(empty)"), Value::Bool(true));
    assert_eq!(eval("@isEmpty(none)"), Value::Bool(true));
    assert_eq!(eval("@isNotEmpty(ids)"), Value::Bool(true));
    assert_eq!(eval("@isBlank(blank)"), Value::Bool(true));
    assert_eq!(eval("@isNotBlank(name)"), Value::Bool(true));
}

#[test]
fn error_codes() {
    assert_eq!(code("salary # 1"), Some(MessageCode::EspA001));
    assert_eq!(code("(salary > 1"), Some(MessageCode::EspA002));
    assert_eq!(code("1 == salary"), Some(MessageCode::EspA003));
    assert_eq!(code("'abc"), Some(MessageCode::EspA004));
    assert_eq!(code("@nope(1)"), Some(MessageCode::EspA014));
    assert_eq!(code("@isBlank(1)"), Some(MessageCode::EspA015));
    assert_eq!(code("@contains('a', 'b')"), Some(MessageCode::EspA015));
    assert_eq!(code("salary = 1"), Some(MessageCode::EspA021));
    assert_eq!(code("name > 1"), Some(MessageCode::EspA022));
    assert_eq!(code("salary && flag"), Some(MessageCode::EspA023));
    assert_eq!(code("salary salary"), Some(MessageCode::EspA024));
    assert_eq!(code("1X"), Some(MessageCode::EspA031));
    assert_eq!(code("99999999999U"), Some(MessageCode::EspA032));
    assert_eq!(code("99999999999999999999L"), Some(MessageCode::EspA033));
    assert_eq!(code("99999999999999999999999UL"), Some(MessageCode::EspA034));
    assert_eq!(code("99999999999999999999999999999999999"), Some(MessageCode::EspA038));
}
