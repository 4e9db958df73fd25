// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use super::{QueryBehavior, SqlKind};
use crate::{
    config::SqlParserConfig,
    entity::{Entity, EntityTypeInfo},
    error::{Error, Result},
    value::Value
};

/// Per-call request for [`QueryBuilder`](super::QueryBuilder).
///
/// Holds the entity mutably: sequence values, read-back columns and the
/// version increment are written into it by the execution wrappers.
///
/// # Fields
///
/// | Field | Default | Effect |
/// |-------|---------|--------|
/// | `exclude_null` | `false` | Null-valued columns are left out of INSERT and SET lists |
/// | `ignore_version` | `false` | No version filter, no `V = V + 1`, no lock check |
/// | `suppress_optimistic_lock_exception` | `false` | Zero affected rows is not an error |
/// | `use_version` | `true` | Upserts increment the version on the update branch |
/// | `behavior` | `None` | Columns read back after a write |
pub struct QueryBuilderParameter<'a, E> {
    entity:                                 &'a mut E,
    info:                                   Arc<EntityTypeInfo<E>>,
    config:                                 &'a SqlParserConfig,
    pub kind:                               SqlKind,
    pub exclude_null:                       bool,
    pub ignore_version:                     bool,
    pub suppress_optimistic_lock_exception: bool,
    pub use_version:                        bool,
    pub behavior:                           QueryBehavior,
    expected_version:                       Option<Value>
}

impl<'a, E: Entity> QueryBuilderParameter<'a, E> {
    /// Request of `kind` for `entity`, snapshotting its current version.
    pub fn new(entity: &'a mut E, kind: SqlKind, config: &'a SqlParserConfig) -> Self {
        let info = config.entity_cache().get_or_build::<E>();
        let expected_version = info
            .version_column
            .as_ref()
            .map(|column| info.value_of(&*entity, column));
        Self {
            entity,
            info,
            config,
            kind,
            exclude_null: false,
            ignore_version: false,
            suppress_optimistic_lock_exception: false,
            use_version: true,
            behavior: QueryBehavior::None,
            expected_version
        }
    }

    #[must_use]
    pub fn exclude_null(mut self, exclude_null: bool) -> Self {
        self.exclude_null = exclude_null;
        self
    }

    #[must_use]
    pub fn ignore_version(mut self, ignore_version: bool) -> Self {
        self.ignore_version = ignore_version;
        self
    }

    #[must_use]
    pub fn suppress_optimistic_lock_exception(mut self, suppress: bool) -> Self {
        self.suppress_optimistic_lock_exception = suppress;
        self
    }

    #[must_use]
    pub fn use_version(mut self, use_version: bool) -> Self {
        self.use_version = use_version;
        self
    }

    #[must_use]
    pub fn behavior(mut self, behavior: QueryBehavior) -> Self {
        self.behavior = behavior;
        self
    }
}

impl<E> QueryBuilderParameter<'_, E> {
    #[must_use]
    pub fn entity(&self) -> &E {
        &*self.entity
    }

    pub fn entity_mut(&mut self) -> &mut E {
        &mut *self.entity
    }

    #[must_use]
    pub fn info(&self) -> &EntityTypeInfo<E> {
        &self.info
    }

    #[must_use]
    pub const fn config(&self) -> &SqlParserConfig {
        self.config
    }

    /// Version value captured when the request was created.
    #[must_use]
    pub const fn expected_version(&self) -> Option<&Value> {
        self.expected_version.as_ref()
    }

    /// Capture the entity's current version as the expected one.
    pub fn save_expected_version(&mut self) {
        self.expected_version = self
            .info
            .version_column
            .as_ref()
            .map(|column| self.info.value_of(&*self.entity, column));
    }

    /// Whether the statement carries a version filter.
    #[must_use]
    pub fn is_version_guarded(&self) -> bool {
        self.info.version_column.is_some() && !self.ignore_version && self.kind.is_version_checked()
    }

    /// Whether the entity still holds the expected version.
    #[must_use]
    pub fn is_same_version(&self) -> bool {
        match (&self.info.version_column, &self.expected_version) {
            (Some(column), Some(expected)) => self.info.value_of(&*self.entity, column) == *expected,
            _ => true
        }
    }

    /// Assign a database value to the column named `name`.
    ///
    /// Unknown names are ignored.
    ///
    /// # Errors
    ///
    /// Returns the setter's conversion error.
    pub fn apply_column(&mut self, name: &str, value: Value) -> Result<()> {
        let info = Arc::clone(&self.info);
        match info.column_by_name(name) {
            Some(column) => info.set_value(&mut *self.entity, column, value),
            None => Ok(())
        }
    }

    /// Add one to the in-memory version.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ValueConversion`] when the version is not an
    /// integral or decimal value, or would overflow.
    pub fn increment_version(&mut self) -> Result<()> {
        let info = Arc::clone(&self.info);
        let Some(column) = info.version_column.as_ref() else {
            return Ok(());
        };
        let current = info.value_of(&*self.entity, column);
        let next = current.increment().ok_or(Error::ValueConversion {
            expected: "incrementable version",
            actual:   current.kind()
        })?;
        info.set_value(&mut *self.entity, column, next)
    }
}
