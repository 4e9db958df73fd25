// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Parse-tree and entity-metadata caches.
//!
//! Both caches are owned by a [`crate::SqlParserConfig`] and shared between
//! its clones. Values are computed outside the lock; when two callers race,
//! the first insert wins and the loser's value is discarded. Entries live
//! until cleared explicitly.

use std::{
    any::{Any, TypeId},
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc
};

use parking_lot::RwLock;

use crate::{
    entity::{Entity, EntityTypeInfo},
    error::Result,
    node::SqlNode
};

/// Parsed SQL file.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlFileInfo {
    pub file_path: PathBuf,
    pub raw_sql:   String,
    pub node:      SqlNode
}

/// Parse trees keyed by absolute file path.
#[derive(Debug, Default)]
pub struct SqlFileCache {
    entries: RwLock<HashMap<PathBuf, Arc<SqlFileInfo>>>
}

impl SqlFileCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached entry for `path`.
    #[must_use]
    pub fn get(&self, path: &Path) -> Option<Arc<SqlFileInfo>> {
        self.entries.read().get(path).cloned()
    }

    /// Cached entry for `path`, computing it with `load` on a miss.
    ///
    /// # Errors
    ///
    /// Propagates the error of `load`; nothing is cached then.
    pub fn get_or_try_insert_with(
        &self,
        path: &Path,
        load: impl FnOnce() -> Result<SqlFileInfo>
    ) -> Result<Arc<SqlFileInfo>> {
        if let Some(hit) = self.get(path) {
            return Ok(hit);
        }
        let info = Arc::new(load()?);
        let mut entries = self.entries.write();
        Ok(entries
            .entry(path.to_path_buf())
            .or_insert(info)
            .clone())
    }

    /// Remove the entry for `path`. Returns whether one existed.
    pub fn clear(&self, path: &Path) -> bool {
        self.entries.write().remove(path).is_some()
    }

    pub fn clear_all(&self) {
        self.entries.write().clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

/// Entity metadata keyed by type.
#[derive(Debug, Default)]
pub struct EntityInfoCache {
    entries: RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>
}

impl EntityInfoCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Metadata of `E`, built on first use.
    pub fn get_or_build<E: Entity>(&self) -> Arc<EntityTypeInfo<E>> {
        let key = TypeId::of::<E>();
        if let Some(hit) = self.entries.read().get(&key).cloned()
            && let Ok(info) = hit.downcast::<EntityTypeInfo<E>>()
        {
            return info;
        }
        let built: Arc<dyn Any + Send + Sync> = Arc::new(E::build_type_info());
        let stored = self.entries.write().entry(key).or_insert(built).clone();
        match stored.downcast::<EntityTypeInfo<E>>() {
            Ok(info) => info,
            Err(_) => Arc::new(E::build_type_info())
        }
    }

    /// Remove the metadata of `E`.
    pub fn clear<E: Entity>(&self) -> bool {
        self.entries.write().remove(&TypeId::of::<E>()).is_some()
    }

    pub fn clear_all(&self) {
        self.entries.write().clear();
    }
}
