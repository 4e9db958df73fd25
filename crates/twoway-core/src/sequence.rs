// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Sequence-backed columns.
//!
//! Before an INSERT is built, every sequence column is filled with the next
//! value of its sequence, in declaration order. Dialects without sequences
//! skip the step and leave the columns as they are.
//!
//! # Coercion
//!
//! | Target kind | Accepted value | Result |
//! |-------------|----------------|--------|
//! | any | value of the target kind | unchanged |
//! | `Byte` … `ULong` | native whole number in range | narrowed integer |
//! | `Decimal` | native whole number | decimal with scale 0 |
//! | `String` | non-negative whole number | prefix + zero-padded number, e.g. `T000001` |
//!
//! Only Oracle (`Decimal`) and PostgreSQL (`Long`) declare a native kind.
//! Anything else fails with [`Error::SequenceTypeMismatch`].

use rust_decimal::Decimal;
use tracing::debug;

use crate::{
    dialect::Dialect,
    entity::{Entity, EntityColumnInfo, SequenceAttribute},
    error::{Error, Result},
    executor::{AsyncSqlExecutor, SqlExecutor},
    query_builder::QueryBuilderParameter,
    result::SqlParserResult,
    value::{Value, ValueKind}
};

/// Next-value query for `attribute`, or `None` when `dialect` has no
/// sequences.
#[must_use]
pub fn sequence_query(dialect: &Dialect, attribute: &SequenceAttribute) -> Option<SqlParserResult> {
    let sql = dialect.sequence_sql(&attribute.name, attribute.schema.as_deref())?;
    Some(SqlParserResult {
        parsed_sql: sql.clone(),
        debug_sql:  sql,
        parameters: Vec::new()
    })
}

/// Convert a raw sequence value to the property kind of `column`.
///
/// A value already of the target kind is used as is. Otherwise `native`,
/// the kind the driver is known to return for the dialect, is narrowed to
/// the target. Dialects without a native kind only accept whole numbers for
/// string targets.
///
/// # Errors
///
/// Returns [`Error::SequenceTypeMismatch`] naming the expected and actual
/// kinds.
pub fn coerce_sequence_value(
    raw: Value,
    native: Option<ValueKind>,
    column: &EntityColumnInfo
) -> Result<Value> {
    let target = column.value_kind;
    let actual = raw.kind();
    let mismatch = |expected| Error::SequenceTypeMismatch {
        column: column.column_name.clone(),
        expected,
        actual
    };
    if actual == target {
        return Ok(raw);
    }
    match native {
        Some(native) if actual != native => return Err(mismatch(native)),
        None if target != ValueKind::String => return Err(mismatch(target)),
        _ => {}
    }
    let number = raw.to_i128().ok_or_else(|| mismatch(target))?;

    let value = match target {
        ValueKind::Byte => u8::try_from(number).ok().map(Value::Byte),
        ValueKind::Short => i16::try_from(number).ok().map(Value::Short),
        ValueKind::Int => i32::try_from(number).ok().map(Value::Int),
        ValueKind::Long => i64::try_from(number).ok().map(Value::Long),
        ValueKind::UInt => u32::try_from(number).ok().map(Value::UInt),
        ValueKind::ULong => u64::try_from(number).ok().map(Value::ULong),
        ValueKind::Decimal => match raw {
            Value::Decimal(decimal) => Some(Value::Decimal(decimal)),
            _ => Decimal::try_from_i128_with_scale(number, 0)
                .ok()
                .map(Value::Decimal)
        },
        ValueKind::String => {
            let (prefix, width) = column
                .sequence
                .as_ref()
                .map_or(("", 0), |attr| (attr.prefix.as_str(), attr.padding));
            (number >= 0).then(|| Value::String(format!("{prefix}{number:0>width$}")))
        }
        _ => None
    };
    value.ok_or_else(|| mismatch(target))
}

fn skip_unsupported<E>(param: &QueryBuilderParameter<'_, E>) -> bool {
    let dialect = param.config().dialect();
    if dialect.supports_sequence() {
        return false;
    }
    let info = param.info();
    if !info.sequence_columns.is_empty() {
        debug!(
            table = %info.table_name,
            columns = info.sequence_columns.len(),
            ?dialect,
            "sequence columns skipped"
        );
    }
    true
}

fn pending<E>(param: &QueryBuilderParameter<'_, E>) -> Vec<(EntityColumnInfo, SqlParserResult)> {
    let dialect = param.config().dialect();
    param
        .info()
        .sequence_columns
        .iter()
        .filter_map(|column| {
            let attribute = column.sequence.as_ref()?;
            sequence_query(&dialect, attribute).map(|query| (column.clone(), query))
        })
        .collect()
}

/// Fill the sequence columns of the request's entity.
///
/// # Errors
///
/// Returns the executor's error or a coercion error.
pub fn fill_sequences<E, X>(param: &mut QueryBuilderParameter<'_, E>, executor: &mut X) -> Result<()>
where
    X: SqlExecutor + ?Sized
{
    if skip_unsupported(param) {
        return Ok(());
    }
    let native = param.config().dialect().native_sequence_kind();
    for (column, query) in pending(param) {
        let raw = executor.query_scalar(&query)?;
        let value = coerce_sequence_value(raw, native, &column)?;
        debug!(column = %column.column_name, "sequence value assigned");
        param.apply_column(&column.column_name, value)?;
    }
    Ok(())
}

/// Non-blocking [`fill_sequences`].
///
/// # Errors
///
/// Returns the executor's error or a coercion error.
pub async fn fill_sequences_async<E, X>(
    param: &mut QueryBuilderParameter<'_, E>,
    executor: &mut X
) -> Result<()>
where
    X: AsyncSqlExecutor + ?Sized
{
    if skip_unsupported(param) {
        return Ok(());
    }
    let native = param.config().dialect().native_sequence_kind();
    for (column, query) in pending(param) {
        let raw = executor.query_scalar(&query).await?;
        let value = coerce_sequence_value(raw, native, &column)?;
        debug!(column = %column.column_name, "sequence value assigned");
        param.apply_column(&column.column_name, value)?;
    }
    Ok(())
}

/// Whether inserts of `E` under `dialect` need a sequence round trip.
#[must_use]
pub fn needs_sequences<E: Entity>(param: &QueryBuilderParameter<'_, E>) -> bool {
    param.config().dialect().supports_sequence() && !param.info().sequence_columns.is_empty()
}
