// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Dynamic value model.
//!
//! Templates are evaluated against [`Value`]s instead of runtime reflection.
//! Rust types enter the model through [`ToValue`], leave it through
//! [`FromValue`], and declare their static shape through [`HasValueKind`].
//!
//! # Type Mapping
//!
//! | Rust | [`Value`] | [`DbType`] |
//! |------|-----------|------------|
//! | `bool` | `Bool` | `Boolean` |
//! | `u8` | `Byte` | `Byte` |
//! | `i16` | `Short` | `Int16` |
//! | `i32` | `Int` | `Int32` |
//! | `i64` | `Long` | `Int64` |
//! | `u32` | `UInt` | `UInt32` |
//! | `u64` | `ULong` | `UInt64` |
//! | `f32` | `Float` | `Single` |
//! | `f64` | `Double` | `Double` |
//! | `Decimal` | `Decimal` | `Decimal` |
//! | `String`, `&str` | `String` | `String` |
//! | `NaiveDate` | `Date` | `Date` |
//! | `NaiveTime` | `Time` | `Time` |
//! | `NaiveDateTime` | `DateTime` | `DateTime` |
//! | `DateTime<Tz>` | `DateTimeOffset` | `DateTimeOffset` |
//! | `Uuid` | `Uuid` | `Guid` |
//! | `Vec<T>` | `List` | `Object` |
//! | `Option<T>` | inner or `Null` | inner |

use std::{
    cmp::Ordering,
    collections::{BTreeMap, HashMap},
    fmt
};

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use rust_decimal::{Decimal, prelude::ToPrimitive};
use uuid::Uuid;

use crate::error::{Error, Result};

/// Runtime value produced by evaluation or read from an entity.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// SQL `NULL`.
    #[default]
    Null,
    /// Boolean.
    Bool(bool),
    /// Unsigned 8-bit integer.
    Byte(u8),
    /// Signed 16-bit integer.
    Short(i16),
    /// Signed 32-bit integer.
    Int(i32),
    /// Signed 64-bit integer.
    Long(i64),
    /// Unsigned 32-bit integer.
    UInt(u32),
    /// Unsigned 64-bit integer.
    ULong(u64),
    /// 32-bit float.
    Float(f32),
    /// 64-bit float.
    Double(f64),
    /// Exact decimal.
    Decimal(Decimal),
    /// Text.
    String(String),
    /// Calendar date.
    Date(NaiveDate),
    /// Time of day.
    Time(NaiveTime),
    /// Date and time without offset.
    DateTime(NaiveDateTime),
    /// Date and time with a UTC offset.
    DateTimeOffset(DateTime<FixedOffset>),
    /// UUID.
    Uuid(Uuid),
    /// Binary data.
    Bytes(Vec<u8>),
    /// Ordered collection, iterable by `/*%for*/` and IN-list expansion.
    List(Vec<Value>),
    /// Property bag, navigable by dotted paths.
    Object(BTreeMap<String, Value>)
}

/// Static kind of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Bool,
    Byte,
    Short,
    Int,
    Long,
    UInt,
    ULong,
    Float,
    Double,
    Decimal,
    String,
    Date,
    Time,
    DateTime,
    DateTimeOffset,
    Uuid,
    Bytes,
    List,
    Object
}

impl ValueKind {
    /// Lower-case type name used in diagnostics.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Byte => "byte",
            Self::Short => "short",
            Self::Int => "int",
            Self::Long => "long",
            Self::UInt => "uint",
            Self::ULong => "ulong",
            Self::Float => "float",
            Self::Double => "double",
            Self::Decimal => "decimal",
            Self::String => "string",
            Self::Date => "date",
            Self::Time => "time",
            Self::DateTime => "datetime",
            Self::DateTimeOffset => "datetimeoffset",
            Self::Uuid => "uuid",
            Self::Bytes => "bytes",
            Self::List => "list",
            Self::Object => "object"
        }
    }

    /// Whether values of this kind are whole numbers.
    #[must_use]
    pub const fn is_integral(&self) -> bool {
        matches!(
            self,
            Self::Byte | Self::Short | Self::Int | Self::Long | Self::UInt | Self::ULong
        )
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Driver-level parameter type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DbType {
    AnsiString,
    String,
    Boolean,
    Byte,
    Int16,
    Int32,
    Int64,
    UInt32,
    UInt64,
    Single,
    Double,
    Decimal,
    Date,
    Time,
    DateTime,
    DateTimeOffset,
    Guid,
    Binary,
    #[default]
    Object
}

impl DbType {
    /// Default parameter type for a value kind.
    #[must_use]
    pub const fn from_kind(kind: ValueKind) -> Self {
        match kind {
            ValueKind::Bool => Self::Boolean,
            ValueKind::Byte => Self::Byte,
            ValueKind::Short => Self::Int16,
            ValueKind::Int => Self::Int32,
            ValueKind::Long => Self::Int64,
            ValueKind::UInt => Self::UInt32,
            ValueKind::ULong => Self::UInt64,
            ValueKind::Float => Self::Single,
            ValueKind::Double => Self::Double,
            ValueKind::Decimal => Self::Decimal,
            ValueKind::String => Self::String,
            ValueKind::Date => Self::Date,
            ValueKind::Time => Self::Time,
            ValueKind::DateTime => Self::DateTime,
            ValueKind::DateTimeOffset => Self::DateTimeOffset,
            ValueKind::Uuid => Self::Guid,
            ValueKind::Bytes => Self::Binary,
            ValueKind::Null | ValueKind::List | ValueKind::Object => Self::Object
        }
    }

    /// Parse a type name such as `"AnsiString"` or `"int64"`.
    ///
    /// Returns `None` for unrecognized names.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let db_type = match name.to_ascii_lowercase().as_str() {
            "ansistring" => Self::AnsiString,
            "string" => Self::String,
            "boolean" | "bool" => Self::Boolean,
            "byte" => Self::Byte,
            "int16" | "short" => Self::Int16,
            "int32" | "int" => Self::Int32,
            "int64" | "long" => Self::Int64,
            "uint32" => Self::UInt32,
            "uint64" => Self::UInt64,
            "single" | "float" => Self::Single,
            "double" => Self::Double,
            "decimal" => Self::Decimal,
            "date" => Self::Date,
            "time" => Self::Time,
            "datetime" => Self::DateTime,
            "datetimeoffset" => Self::DateTimeOffset,
            "guid" | "uuid" => Self::Guid,
            "binary" => Self::Binary,
            "object" => Self::Object,
            _ => return None
        };
        Some(db_type)
    }
}

enum Number {
    Integer(i128),
    Float(f64),
    Decimal(Decimal)
}

impl Number {
    fn to_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(v) => v.to_f64(),
            Self::Float(v) => Some(*v),
            Self::Decimal(v) => v.to_f64()
        }
    }

    fn to_decimal(&self) -> Option<Decimal> {
        match self {
            Self::Integer(v) => Some(Decimal::from_i128_with_scale(*v, 0)),
            Self::Float(v) => Decimal::try_from(*v).ok(),
            Self::Decimal(v) => Some(*v)
        }
    }

    fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => Some(a.cmp(b)),
            (Self::Float(_), _) | (_, Self::Float(_)) => {
                self.to_f64()?.partial_cmp(&other.to_f64()?)
            }
            _ => Some(self.to_decimal()?.cmp(&other.to_decimal()?))
        }
    }
}

impl Value {
    /// Kind of this value.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Null => ValueKind::Null,
            Self::Bool(_) => ValueKind::Bool,
            Self::Byte(_) => ValueKind::Byte,
            Self::Short(_) => ValueKind::Short,
            Self::Int(_) => ValueKind::Int,
            Self::Long(_) => ValueKind::Long,
            Self::UInt(_) => ValueKind::UInt,
            Self::ULong(_) => ValueKind::ULong,
            Self::Float(_) => ValueKind::Float,
            Self::Double(_) => ValueKind::Double,
            Self::Decimal(_) => ValueKind::Decimal,
            Self::String(_) => ValueKind::String,
            Self::Date(_) => ValueKind::Date,
            Self::Time(_) => ValueKind::Time,
            Self::DateTime(_) => ValueKind::DateTime,
            Self::DateTimeOffset(_) => ValueKind::DateTimeOffset,
            Self::Uuid(_) => ValueKind::Uuid,
            Self::Bytes(_) => ValueKind::Bytes,
            Self::List(_) => ValueKind::List,
            Self::Object(_) => ValueKind::Object
        }
    }

    /// Whether this is `Null`.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Borrow as a string slice.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None
        }
    }

    /// Read as a boolean.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None
        }
    }

    /// Read a whole number, including decimals without a fractional part.
    #[must_use]
    pub fn to_i128(&self) -> Option<i128> {
        match self {
            Self::Byte(v) => Some(i128::from(*v)),
            Self::Short(v) => Some(i128::from(*v)),
            Self::Int(v) => Some(i128::from(*v)),
            Self::Long(v) => Some(i128::from(*v)),
            Self::UInt(v) => Some(i128::from(*v)),
            Self::ULong(v) => Some(i128::from(*v)),
            Self::Decimal(v) if v.fract().is_zero() => v.to_i128(),
            _ => None
        }
    }

    /// Look up a property of an `Object`.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&Value> {
        match self {
            Self::Object(map) => map.get(name),
            _ => None
        }
    }

    /// Text used when a value is spliced as raw SQL.
    ///
    /// `Null` renders as an empty string.
    #[must_use]
    pub fn display_text(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Bool(v) => v.to_string(),
            Self::Byte(v) => v.to_string(),
            Self::Short(v) => v.to_string(),
            Self::Int(v) => v.to_string(),
            Self::Long(v) => v.to_string(),
            Self::UInt(v) => v.to_string(),
            Self::ULong(v) => v.to_string(),
            Self::Float(v) => v.to_string(),
            Self::Double(v) => v.to_string(),
            Self::Decimal(v) => v.to_string(),
            Self::String(v) => v.clone(),
            Self::Date(v) => v.format("%Y-%m-%d").to_string(),
            Self::Time(v) => v.format("%H:%M:%S%.3f").to_string(),
            Self::DateTime(v) => v.format("%Y-%m-%d %H:%M:%S%.3f").to_string(),
            Self::DateTimeOffset(v) => v.format("%Y-%m-%d %H:%M:%S%.3f %:z").to_string(),
            Self::Uuid(v) => v.to_string(),
            Self::Bytes(v) => v.iter().map(|b| format!("{b:02X}")).collect(),
            Self::List(items) => items
                .iter()
                .map(Value::display_text)
                .collect::<Vec<_>>()
                .join(", "),
            Self::Object(map) => map
                .iter()
                .map(|(k, v)| format!("{k}={}", v.display_text()))
                .collect::<Vec<_>>()
                .join(", ")
        }
    }

    /// Value incremented by one, keeping its kind.
    ///
    /// Returns `None` for non-numeric values and on overflow.
    #[must_use]
    pub fn increment(&self) -> Option<Value> {
        match self {
            Self::Byte(v) => v.checked_add(1).map(Self::Byte),
            Self::Short(v) => v.checked_add(1).map(Self::Short),
            Self::Int(v) => v.checked_add(1).map(Self::Int),
            Self::Long(v) => v.checked_add(1).map(Self::Long),
            Self::UInt(v) => v.checked_add(1).map(Self::UInt),
            Self::ULong(v) => v.checked_add(1).map(Self::ULong),
            Self::Decimal(v) => v.checked_add(Decimal::ONE).map(Self::Decimal),
            _ => None
        }
    }

    fn number(&self) -> Option<Number> {
        match self {
            Self::Float(v) => Some(Number::Float(f64::from(*v))),
            Self::Double(v) => Some(Number::Float(*v)),
            Self::Decimal(v) => Some(Number::Decimal(*v)),
            other => other.to_i128().map(Number::Integer)
        }
    }

    /// Ordering between two comparable values.
    ///
    /// Numbers compare across kinds. Returns `None` when either side is
    /// `Null` or the kinds cannot be ordered.
    #[must_use]
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        if let (Some(a), Some(b)) = (self.number(), other.number()) {
            return a.compare(&b);
        }
        match (self, other) {
            (Self::String(a), Self::String(b)) => Some(a.cmp(b)),
            (Self::Bool(a), Self::Bool(b)) => Some(a.cmp(b)),
            (Self::Date(a), Self::Date(b)) => Some(a.cmp(b)),
            (Self::Time(a), Self::Time(b)) => Some(a.cmp(b)),
            (Self::DateTime(a), Self::DateTime(b)) => Some(a.cmp(b)),
            (Self::DateTimeOffset(a), Self::DateTimeOffset(b)) => Some(a.cmp(b)),
            (Self::Uuid(a), Self::Uuid(b)) => Some(a.cmp(b)),
            _ => None
        }
    }

    /// Equality as seen by `==` in directive expressions.
    ///
    /// `Null` equals only `Null`. Returns `None` when the kinds cannot be
    /// compared.
    #[must_use]
    pub fn loosely_equals(&self, other: &Value) -> Option<bool> {
        match (self, other) {
            (Self::Null, Self::Null) => Some(true),
            (Self::Null, _) | (_, Self::Null) => Some(false),
            (Self::List(_), Self::List(_))
            | (Self::Object(_), Self::Object(_))
            | (Self::Bytes(_), Self::Bytes(_)) => Some(self == other),
            _ => self.compare(other).map(|o| o == Ordering::Equal)
        }
    }
}

/// Conversion of a Rust value into a [`Value`].
///
/// Implemented for primitives, strings, chrono and uuid types, collections,
/// and generated for entities and parameter structs by the derive macros.
pub trait ToValue {
    /// Convert into the dynamic model.
    fn to_value(&self) -> Value;
}

/// Conversion out of a [`Value`].
pub trait FromValue: Sized {
    /// Convert from the dynamic model.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ValueConversion`] when the value has an incompatible
    /// kind or does not fit the target type.
    fn from_value(value: Value) -> Result<Self>;
}

/// Static value kind of a Rust type.
pub trait HasValueKind {
    /// Kind of the non-null values of this type.
    const KIND: ValueKind;

    /// Whether the type admits `Null`.
    const NULLABLE: bool = false;
}

impl ToValue for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }
}

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self> {
        Ok(value)
    }
}

impl<T: ToValue + ?Sized> ToValue for &T {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}

impl<T: ToValue> ToValue for Option<T> {
    fn to_value(&self) -> Value {
        self.as_ref().map_or(Value::Null, ToValue::to_value)
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some)
        }
    }
}

impl<T: HasValueKind> HasValueKind for Option<T> {
    const KIND: ValueKind = T::KIND;
    const NULLABLE: bool = true;
}

impl<T: ToValue> ToValue for Vec<T> {
    fn to_value(&self) -> Value {
        Value::List(self.iter().map(ToValue::to_value).collect())
    }
}

impl<T: ToValue> ToValue for [T] {
    fn to_value(&self) -> Value {
        Value::List(self.iter().map(ToValue::to_value).collect())
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::List(items) => items.into_iter().map(T::from_value).collect(),
            other => Err(Error::ValueConversion {
                expected: "list",
                actual:   other.kind()
            })
        }
    }
}

impl<T> HasValueKind for Vec<T> {
    const KIND: ValueKind = ValueKind::List;
}

impl<T: ToValue> ToValue for BTreeMap<String, T> {
    fn to_value(&self) -> Value {
        Value::Object(
            self.iter()
                .map(|(k, v)| (k.clone(), v.to_value()))
                .collect()
        )
    }
}

impl<T: ToValue> ToValue for HashMap<String, T> {
    fn to_value(&self) -> Value {
        Value::Object(
            self.iter()
                .map(|(k, v)| (k.clone(), v.to_value()))
                .collect()
        )
    }
}

impl ToValue for str {
    fn to_value(&self) -> Value {
        Value::String(self.to_string())
    }
}

macro_rules! simple_value {
    ($($ty:ty => $variant:ident / $kind:ident),* $(,)?) => {$(
        impl ToValue for $ty {
            fn to_value(&self) -> Value {
                Value::$variant(self.clone())
            }
        }

        impl HasValueKind for $ty {
            const KIND: ValueKind = ValueKind::$kind;
        }
    )*};
}

simple_value! {
    bool => Bool / Bool,
    u8 => Byte / Byte,
    i16 => Short / Short,
    i32 => Int / Int,
    i64 => Long / Long,
    u32 => UInt / UInt,
    u64 => ULong / ULong,
    f32 => Float / Float,
    f64 => Double / Double,
    Decimal => Decimal / Decimal,
    String => String / String,
    NaiveDate => Date / Date,
    NaiveTime => Time / Time,
    NaiveDateTime => DateTime / DateTime,
    DateTime<FixedOffset> => DateTimeOffset / DateTimeOffset,
    Uuid => Uuid / Uuid,
}

impl ToValue for DateTime<Utc> {
    fn to_value(&self) -> Value {
        Value::DateTimeOffset(self.fixed_offset())
    }
}

impl HasValueKind for DateTime<Utc> {
    const KIND: ValueKind = ValueKind::DateTimeOffset;
}

macro_rules! integral_from_value {
    ($($ty:ty => $name:literal),* $(,)?) => {$(
        impl FromValue for $ty {
            fn from_value(value: Value) -> Result<Self> {
                let actual = value.kind();
                value
                    .to_i128()
                    .and_then(|v| <$ty>::try_from(v).ok())
                    .ok_or(Error::ValueConversion {
                        expected: $name,
                        actual
                    })
            }
        }
    )*};
}

integral_from_value! {
    u8 => "byte",
    i16 => "short",
    i32 => "int",
    i64 => "long",
    u32 => "uint",
    u64 => "ulong",
}

fn mismatch<T>(expected: &'static str, value: &Value) -> Result<T> {
    Err(Error::ValueConversion {
        expected,
        actual: value.kind()
    })
}

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Bool(v) => Ok(v),
            other => mismatch("bool", &other)
        }
    }
}

impl FromValue for f64 {
    fn from_value(value: Value) -> Result<Self> {
        match value.number().and_then(|n| n.to_f64()) {
            Some(v) => Ok(v),
            None => mismatch("double", &value)
        }
    }
}

impl FromValue for f32 {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Float(v) => Ok(v),
            other => match other.number().and_then(|n| n.to_f64()) {
                Some(v) => Ok(v as f32),
                None => mismatch("float", &other)
            }
        }
    }
}

impl FromValue for Decimal {
    fn from_value(value: Value) -> Result<Self> {
        match value.number().and_then(|n| n.to_decimal()) {
            Some(v) => Ok(v),
            None => mismatch("decimal", &value)
        }
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::String(v) => Ok(v),
            other => mismatch("string", &other)
        }
    }
}

impl FromValue for NaiveDate {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Date(v) => Ok(v),
            Value::DateTime(v) => Ok(v.date()),
            other => mismatch("date", &other)
        }
    }
}

impl FromValue for NaiveTime {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Time(v) => Ok(v),
            other => mismatch("time", &other)
        }
    }
}

impl FromValue for NaiveDateTime {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::DateTime(v) => Ok(v),
            Value::DateTimeOffset(v) => Ok(v.naive_local()),
            other => mismatch("datetime", &other)
        }
    }
}

impl FromValue for DateTime<FixedOffset> {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::DateTimeOffset(v) => Ok(v),
            Value::DateTime(v) => Ok(Utc.from_utc_datetime(&v).fixed_offset()),
            other => mismatch("datetimeoffset", &other)
        }
    }
}

impl FromValue for DateTime<Utc> {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::DateTimeOffset(v) => Ok(v.with_timezone(&Utc)),
            Value::DateTime(v) => Ok(Utc.from_utc_datetime(&v)),
            other => mismatch("datetime", &other)
        }
    }
}

impl FromValue for Uuid {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Uuid(v) => Ok(v),
            Value::String(ref s) => match Uuid::parse_str(s) {
                Ok(v) => Ok(v),
                Err(_) => mismatch("uuid", &value)
            },
            other => mismatch("uuid", &other)
        }
    }
}
