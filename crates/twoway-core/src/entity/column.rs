// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use crate::{
    dialect::Dialect,
    error::Result,
    value::{DbType, Value, ValueKind}
};

/// When a current-timestamp column is filled by the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CurrentTimestampStrategy {
    Insert,
    Update,
    SoftDelete,
    #[default]
    Always
}

impl CurrentTimestampStrategy {
    /// Parse `insert`, `update`, `soft_delete` or `always`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "insert" => Some(Self::Insert),
            "update" => Some(Self::Update),
            "softdelete" => Some(Self::SoftDelete),
            "always" => Some(Self::Always),
            _ => None
        }
    }

    #[must_use]
    pub const fn applies_to_insert(&self) -> bool {
        matches!(self, Self::Insert | Self::Always)
    }

    #[must_use]
    pub const fn applies_to_update(&self) -> bool {
        matches!(self, Self::Update | Self::Always)
    }

    #[must_use]
    pub const fn applies_to_soft_delete(&self) -> bool {
        matches!(self, Self::SoftDelete | Self::Always)
    }
}

/// Database-generated timestamp column.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CurrentTimestampAttribute {
    pub strategy: CurrentTimestampStrategy,
    /// SQL overriding the dialect's current timestamp function.
    pub sql:      Option<String>
}

impl CurrentTimestampAttribute {
    #[must_use]
    pub const fn new(strategy: CurrentTimestampStrategy) -> Self {
        Self {
            strategy,
            sql: None
        }
    }

    /// SQL text producing the timestamp.
    #[must_use]
    pub fn sql<'a>(&'a self, dialect: &Dialect) -> &'a str {
        self.sql
            .as_deref()
            .unwrap_or(dialect.current_timestamp_sql())
    }
}

/// Column filled from a database sequence before INSERT.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SequenceAttribute {
    pub name:    String,
    pub schema:  Option<String>,
    /// Prefix of string-typed sequence values.
    pub prefix:  String,
    /// Zero-padded width of the numeric part of string-typed values.
    pub padding: usize
}

impl SequenceAttribute {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Conversion applied between the property value and the database value.
#[derive(Debug, Clone, Copy)]
pub struct ValueConverter {
    pub to_db:   fn(&Value) -> Value,
    pub from_db: fn(Value) -> Result<Value>
}

/// Mapped column.
#[derive(Debug, Clone)]
pub struct EntityColumnInfo {
    /// Position in declaration order.
    pub ordinal:              usize,
    pub property_name:        String,
    pub column_name:          String,
    pub db_type:              DbType,
    pub value_kind:           ValueKind,
    pub nullable:             bool,
    pub max_length:           Option<usize>,
    pub is_primary_key:       bool,
    pub is_identity:          bool,
    pub is_version:           bool,
    pub is_sequence:          bool,
    pub is_current_timestamp: bool,
    pub is_soft_delete_key:   bool,
    pub converter:            Option<ValueConverter>,
    pub sequence:             Option<SequenceAttribute>,
    pub current_timestamp:    Option<CurrentTimestampAttribute>
}

impl EntityColumnInfo {
    /// Plain column of `value_kind`.
    #[must_use]
    pub fn new(
        property_name: impl Into<String>,
        column_name: impl Into<String>,
        value_kind: ValueKind
    ) -> Self {
        Self {
            ordinal: 0,
            property_name: property_name.into(),
            column_name: column_name.into(),
            db_type: DbType::from_kind(value_kind),
            value_kind,
            nullable: false,
            max_length: None,
            is_primary_key: false,
            is_identity: false,
            is_version: false,
            is_sequence: false,
            is_current_timestamp: false,
            is_soft_delete_key: false,
            converter: None,
            sequence: None,
            current_timestamp: None
        }
    }

    #[must_use]
    pub const fn primary_key(mut self) -> Self {
        self.is_primary_key = true;
        self
    }

    #[must_use]
    pub const fn identity(mut self) -> Self {
        self.is_identity = true;
        self
    }

    #[must_use]
    pub const fn version(mut self) -> Self {
        self.is_version = true;
        self
    }

    #[must_use]
    pub const fn soft_delete_key(mut self) -> Self {
        self.is_soft_delete_key = true;
        self
    }

    #[must_use]
    pub const fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    #[must_use]
    pub const fn max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    #[must_use]
    pub const fn db_type(mut self, db_type: DbType) -> Self {
        self.db_type = db_type;
        self
    }

    #[must_use]
    pub fn sequence(mut self, sequence: SequenceAttribute) -> Self {
        self.is_sequence = true;
        self.sequence = Some(sequence);
        self
    }

    #[must_use]
    pub fn current_timestamp(mut self, attribute: CurrentTimestampAttribute) -> Self {
        self.is_current_timestamp = true;
        self.current_timestamp = Some(attribute);
        self
    }

    #[must_use]
    pub const fn converter(mut self, converter: ValueConverter) -> Self {
        self.converter = Some(converter);
        self
    }

    /// Whether the column may appear on the left of `SET`.
    #[must_use]
    pub const fn is_updatable(&self) -> bool {
        !self.is_primary_key && !self.is_identity
    }

    /// Timestamp strategy, when the column is database-generated.
    #[must_use]
    pub fn timestamp_strategy(&self) -> Option<CurrentTimestampStrategy> {
        self.current_timestamp
            .as_ref()
            .filter(|_| self.is_current_timestamp)
            .map(|attr| attr.strategy)
    }
}
