// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Parser configuration.
//!
//! A [`SqlParserConfig`] bundles everything a build needs from the outside:
//! the dialect, the placeholder syntax, the factory creating driver
//! parameters, and the caches. Configurations are cheap to clone; clones
//! share their caches.
//!
//! # Resolution
//!
//! ```text
//! ConfigRegistry
//! ├── "main"    (default) ──► SqlParserConfig { dialect: SqlServer, .. }
//! └── "reports"           ──► SqlParserConfig { dialect: PostgreSql, .. }
//!
//! resolve(None)            → "main"
//! resolve(Some("reports")) → "reports"
//! resolve(Some("missing")) → Error::InvalidSqlParserConfig
//! ```
//!
//! # JSON
//!
//! ```json
//! [
//!   { "name": "main", "connection_kind": "sqlserver", "default": true },
//!   { "name": "reports", "dialect": "postgresql", "enable_cache": false }
//! ]
//! ```

use std::{collections::HashMap, fmt, path::Path, sync::Arc};

use serde::Deserialize;

use crate::{
    cache::{EntityInfoCache, SqlFileCache},
    dialect::{DbConnectionKind, Dialect, ParameterStyle},
    error::{Error, Result},
    result::{DbParameter, ParameterDirection},
    value::{DbType, Value}
};

/// Creates driver parameters from built values.
///
/// Implement this to attach driver-specific type information; the default
/// factory derives the type from the value.
pub trait ParameterFactory: Send + Sync + fmt::Debug {
    /// Parameter named `name` holding `value`.
    fn create(
        &self,
        name: &str,
        value: Value,
        db_type: Option<DbType>,
        direction: ParameterDirection
    ) -> DbParameter;
}

/// Factory producing plain [`DbParameter`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultParameterFactory;

impl ParameterFactory for DefaultParameterFactory {
    fn create(
        &self,
        name: &str,
        value: Value,
        db_type: Option<DbType>,
        direction: ParameterDirection
    ) -> DbParameter {
        let db_type = db_type.unwrap_or_else(|| DbType::from_kind(value.kind()));
        DbParameter {
            name: name.to_string(),
            value,
            db_type,
            direction
        }
    }
}

/// Settings for parsing and building SQL against one database.
#[derive(Debug, Clone)]
pub struct SqlParserConfig {
    connection_kind:   DbConnectionKind,
    dialect:           Dialect,
    parameter_style:   ParameterStyle,
    parameter_factory: Arc<dyn ParameterFactory>,
    enable_cache:      bool,
    file_cache:        Arc<SqlFileCache>,
    entity_cache:      Arc<EntityInfoCache>
}

impl SqlParserConfig {
    /// Start building a configuration.
    #[must_use]
    pub fn builder() -> SqlParserConfigBuilder {
        SqlParserConfigBuilder::default()
    }

    /// Configuration with the defaults of `dialect` and the default factory.
    #[must_use]
    pub fn for_dialect(dialect: Dialect) -> Self {
        Self {
            connection_kind: DbConnectionKind::Other,
            dialect,
            parameter_style: dialect.parameter_style(),
            parameter_factory: Arc::new(DefaultParameterFactory),
            enable_cache: true,
            file_cache: Arc::default(),
            entity_cache: Arc::default()
        }
    }

    #[must_use]
    pub const fn connection_kind(&self) -> DbConnectionKind {
        self.connection_kind
    }

    #[must_use]
    pub const fn dialect(&self) -> Dialect {
        self.dialect
    }

    #[must_use]
    pub const fn parameter_style(&self) -> ParameterStyle {
        self.parameter_style
    }

    #[must_use]
    pub fn parameter_factory(&self) -> &dyn ParameterFactory {
        self.parameter_factory.as_ref()
    }

    /// Whether parsed files are cached.
    #[must_use]
    pub const fn enable_cache(&self) -> bool {
        self.enable_cache
    }

    #[must_use]
    pub fn file_cache(&self) -> &SqlFileCache {
        &self.file_cache
    }

    #[must_use]
    pub fn entity_cache(&self) -> &EntityInfoCache {
        &self.entity_cache
    }

    /// Drop the cached parse tree of `path`.
    pub fn clear_cache(&self, path: impl AsRef<Path>) -> bool {
        self.file_cache.clear(path.as_ref())
    }

    /// Drop every cached parse tree and entity metadata.
    pub fn clear_cache_all(&self) {
        self.file_cache.clear_all();
        self.entity_cache.clear_all();
    }
}

/// Builder for [`SqlParserConfig`].
///
/// # Example
///
/// ```rust
/// use twoway_core::{DbConnectionKind, DefaultParameterFactory, Dialect, SqlParserConfig};
///
/// let config = SqlParserConfig::builder()
///     .connection_kind(DbConnectionKind::SqlServer)
///     .dialect(Dialect::SqlServer)
///     .parameter_factory(DefaultParameterFactory)
///     .build()
///     .unwrap();
/// assert_eq!(config.dialect(), Dialect::SqlServer);
/// ```
#[derive(Debug, Default)]
pub struct SqlParserConfigBuilder {
    connection_kind:   DbConnectionKind,
    dialect:           Option<Dialect>,
    parameter_style:   Option<ParameterStyle>,
    parameter_factory: Option<Arc<dyn ParameterFactory>>,
    enable_cache:      Option<bool>
}

impl SqlParserConfigBuilder {
    #[must_use]
    pub const fn connection_kind(mut self, kind: DbConnectionKind) -> Self {
        self.connection_kind = kind;
        self
    }

    #[must_use]
    pub const fn dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = Some(dialect);
        self
    }

    /// Override the dialect's placeholder syntax.
    #[must_use]
    pub const fn parameter_style(mut self, style: ParameterStyle) -> Self {
        self.parameter_style = Some(style);
        self
    }

    #[must_use]
    pub fn parameter_factory(mut self, factory: impl ParameterFactory + 'static) -> Self {
        self.parameter_factory = Some(Arc::new(factory));
        self
    }

    #[must_use]
    pub const fn enable_cache(mut self, enable: bool) -> Self {
        self.enable_cache = Some(enable);
        self
    }

    /// Finish the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSqlParserConfig`] when no dialect or no
    /// parameter factory was set.
    pub fn build(self) -> Result<SqlParserConfig> {
        let dialect = self
            .dialect
            .ok_or_else(|| Error::config("no dialect registered"))?;
        let parameter_factory = self
            .parameter_factory
            .ok_or_else(|| Error::config("no parameter factory registered"))?;
        Ok(SqlParserConfig {
            connection_kind: self.connection_kind,
            dialect,
            parameter_style: self
                .parameter_style
                .unwrap_or_else(|| dialect.parameter_style()),
            parameter_factory,
            enable_cache: self.enable_cache.unwrap_or(true),
            file_cache: Arc::default(),
            entity_cache: Arc::default()
        })
    }
}

/// Serializable configuration entry.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigEntry {
    pub name:            String,
    #[serde(default)]
    pub connection_kind: DbConnectionKind,
    /// Falls back to the connection kind's usual dialect.
    #[serde(default)]
    pub dialect:         Option<Dialect>,
    #[serde(default)]
    pub parameter_style: Option<ParameterStyle>,
    #[serde(default = "default_enable_cache")]
    pub enable_cache:    bool,
    #[serde(default)]
    pub default:         bool
}

const fn default_enable_cache() -> bool {
    true
}

impl ConfigEntry {
    /// Configuration described by this entry, using the default factory.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSqlParserConfig`] when neither a dialect nor a
    /// connection kind with a known dialect is given.
    pub fn to_config(&self) -> Result<SqlParserConfig> {
        let dialect = match (self.dialect, self.connection_kind) {
            (Some(dialect), _) => dialect,
            (None, DbConnectionKind::Other) => {
                return Err(Error::config(format!(
                    "configuration '{}' has no dialect",
                    self.name
                )));
            }
            (None, kind) => kind.default_dialect()
        };
        let mut builder = SqlParserConfig::builder()
            .connection_kind(self.connection_kind)
            .dialect(dialect)
            .parameter_factory(DefaultParameterFactory)
            .enable_cache(self.enable_cache);
        if let Some(style) = self.parameter_style {
            builder = builder.parameter_style(style);
        }
        builder.build()
    }
}

/// Named configurations with exactly one default.
#[derive(Debug, Clone, Default)]
pub struct ConfigRegistry {
    configs: HashMap<String, SqlParserConfig>,
    default: Option<String>
}

impl ConfigRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `config` under `name`, replacing an existing entry.
    ///
    /// The first registered configuration becomes the default until one is
    /// registered with `is_default`.
    pub fn register(&mut self, name: impl Into<String>, config: SqlParserConfig, is_default: bool) {
        let name = name.into();
        if is_default || self.default.is_none() {
            self.default = Some(name.clone());
        }
        self.configs.insert(name, config);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SqlParserConfig> {
        self.configs.get(name)
    }

    /// Default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSqlParserConfig`] when nothing is registered.
    pub fn default_config(&self) -> Result<&SqlParserConfig> {
        self.default
            .as_deref()
            .and_then(|name| self.configs.get(name))
            .ok_or_else(|| Error::config("no default configuration registered"))
    }

    /// Configuration named `name`, or the default for `None`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSqlParserConfig`] when the name is unknown.
    pub fn resolve(&self, name: Option<&str>) -> Result<&SqlParserConfig> {
        match name {
            None => self.default_config(),
            Some(name) => self
                .configs
                .get(name)
                .ok_or_else(|| Error::config(format!("configuration '{name}' is not registered")))
        }
    }

    /// Registry from a JSON array of [`ConfigEntry`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSqlParserConfig`] for malformed JSON, an
    /// entry without a dialect, or more than one default.
    pub fn from_json(json: &str) -> Result<Self> {
        let entries: Vec<ConfigEntry> = serde_json::from_str(json)
            .map_err(|err| Error::config(format!("malformed configuration: {err}")))?;
        let defaults = entries.iter().filter(|e| e.default).count();
        if defaults > 1 {
            return Err(Error::config("more than one default configuration"));
        }
        let mut registry = Self::new();
        for entry in &entries {
            registry.register(entry.name.clone(), entry.to_config()?, entry.default);
        }
        Ok(registry)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.configs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }
}
