// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use std::{collections::HashMap, fmt};

use super::column::EntityColumnInfo;
use crate::{dialect::Dialect, error::Result, value::Value};

/// Reads and writes one column of an entity.
pub struct ColumnAccessor<E> {
    pub get: fn(&E) -> Value,
    pub set: fn(&mut E, Value) -> Result<()>
}

impl<E> Clone for ColumnAccessor<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for ColumnAccessor<E> {}

impl<E> fmt::Debug for ColumnAccessor<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnAccessor").finish_non_exhaustive()
    }
}

/// Metadata of an entity type.
pub struct EntityTypeInfo<E> {
    pub table_name:                 String,
    pub schema_name:                Option<String>,
    pub columns:                    Vec<EntityColumnInfo>,
    pub key_columns:                Vec<EntityColumnInfo>,
    pub sequence_columns:           Vec<EntityColumnInfo>,
    pub identity_column:            Option<EntityColumnInfo>,
    pub version_column:             Option<EntityColumnInfo>,
    pub has_soft_delete_key:        bool,
    /// Lowercase column and property names to column ordinals.
    pub column_name_key_dictionary: HashMap<String, usize>,
    accessors:                      Vec<ColumnAccessor<E>>
}

impl<E> fmt::Debug for EntityTypeInfo<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityTypeInfo")
            .field("table_name", &self.table_name)
            .field("schema_name", &self.schema_name)
            .field("columns", &self.columns)
            .finish_non_exhaustive()
    }
}

impl<E> EntityTypeInfo<E> {
    /// Database value of `column` on `entity`, after conversion.
    #[must_use]
    pub fn value_of(&self, entity: &E, column: &EntityColumnInfo) -> Value {
        let Some(accessor) = self.accessors.get(column.ordinal) else {
            return Value::Null;
        };
        let value = (accessor.get)(entity);
        match column.converter {
            Some(converter) => (converter.to_db)(&value),
            None => value
        }
    }

    /// Assign a database value to `column` on `entity`.
    ///
    /// # Errors
    ///
    /// Returns the converter's or setter's conversion error.
    pub fn set_value(&self, entity: &mut E, column: &EntityColumnInfo, value: Value) -> Result<()> {
        let Some(accessor) = self.accessors.get(column.ordinal) else {
            return Ok(());
        };
        let value = match column.converter {
            Some(converter) => (converter.from_db)(value)?,
            None => value
        };
        (accessor.set)(entity, value)
    }

    /// Column by column or property name, case-insensitively.
    #[must_use]
    pub fn column_by_name(&self, name: &str) -> Option<&EntityColumnInfo> {
        self.column_name_key_dictionary
            .get(&name.to_lowercase())
            .and_then(|&ordinal| self.columns.get(ordinal))
    }

    /// Quoted `schema.table`.
    #[must_use]
    pub fn qualified_table_name(&self, dialect: &Dialect) -> String {
        match self.schema_name.as_deref() {
            Some(schema) if !schema.is_empty() => {
                format!("{}.{}", dialect.quote(schema), dialect.quote(&self.table_name))
            }
            _ => dialect.quote(&self.table_name)
        }
    }
}

/// Builder assembling [`EntityTypeInfo`] column by column.
pub struct EntityTypeInfoBuilder<E> {
    table_name:  String,
    schema_name: Option<String>,
    columns:     Vec<EntityColumnInfo>,
    accessors:   Vec<ColumnAccessor<E>>
}

impl<E> EntityTypeInfoBuilder<E> {
    /// Metadata for table `table_name`.
    #[must_use]
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name:  table_name.into(),
            schema_name: None,
            columns:     Vec::new(),
            accessors:   Vec::new()
        }
    }

    #[must_use]
    pub fn schema(mut self, schema: impl Into<String>) -> Self {
        self.schema_name = Some(schema.into());
        self
    }

    /// Add a column with its accessors. Ordinals follow call order.
    #[must_use]
    pub fn column(
        mut self,
        mut info: EntityColumnInfo,
        get: fn(&E) -> Value,
        set: fn(&mut E, Value) -> Result<()>
    ) -> Self {
        info.ordinal = self.columns.len();
        self.columns.push(info);
        self.accessors.push(ColumnAccessor {
            get,
            set
        });
        self
    }

    /// Derive key, sequence, identity and version views.
    #[must_use]
    pub fn build(self) -> EntityTypeInfo<E> {
        let key_columns = self
            .columns
            .iter()
            .filter(|c| c.is_primary_key)
            .cloned()
            .collect();
        let sequence_columns = self
            .columns
            .iter()
            .filter(|c| c.is_sequence)
            .cloned()
            .collect();
        let identity_column = self.columns.iter().find(|c| c.is_identity).cloned();
        let version_column = self.columns.iter().find(|c| c.is_version).cloned();
        let has_soft_delete_key = self.columns.iter().any(|c| c.is_soft_delete_key);

        let mut column_name_key_dictionary = HashMap::new();
        for column in &self.columns {
            column_name_key_dictionary.insert(column.column_name.to_lowercase(), column.ordinal);
        }
        for column in &self.columns {
            column_name_key_dictionary
                .entry(column.property_name.to_lowercase())
                .or_insert(column.ordinal);
        }

        EntityTypeInfo {
            table_name: self.table_name,
            schema_name: self.schema_name,
            columns: self.columns,
            key_columns,
            sequence_columns,
            identity_column,
            version_column,
            has_soft_delete_key,
            column_name_key_dictionary,
            accessors: self.accessors
        }
    }
}
