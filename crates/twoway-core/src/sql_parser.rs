// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Loading and rendering SQL templates.
//!
//! [`SqlParser`] turns a file or a string into a [`SqlTemplate`]: the raw
//! text plus its parse tree. File templates go through the configuration's
//! [`SqlFileCache`](crate::SqlFileCache) when caching is enabled, so a file
//! is read and parsed once per absolute path.
//!
//! # Rendering
//!
//! | Method | Output |
//! |--------|--------|
//! | [`SqlTemplate::build`] | Template as written |
//! | [`SqlTemplate::build_for`] | Same, with entity columns for `/*%expand*/` and `/*%populate*/` |
//! | [`SqlTemplate::build_paginated`] | Paged by the dialect's transformer |
//! | [`SqlTemplate::build_count`] | `select count(*)` over the template |
//! | [`SqlTemplate::build_paginated_with_count`] | Page query plus its total-count query |
//!
//! # Example
//!
//! ```rust
//! use twoway_core::{Dialect, EvaluationContext, SqlParser, SqlParserConfig};
//!
//! let config = SqlParserConfig::for_dialect(Dialect::PostgreSql);
//! let template = SqlParser::new(&config)
//!     .parse_text("select * from emp where id = /*id*/1")
//!     .unwrap();
//! let result = template.build(&EvaluationContext::scalar("id", 3)).unwrap();
//! assert_eq!(result.parsed_sql, "select * from emp where id = $1");
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc
};

use tracing::debug;

use crate::{
    builder::SqlBuilder,
    cache::SqlFileInfo,
    config::SqlParserConfig,
    context::EvaluationContext,
    dialect::CountStrategy,
    entity::{Entity, EntityColumnInfo},
    error::{Error, Result},
    node::SqlNode,
    parser::parse,
    result::SqlParserResult,
    transform::{
        PagingOptions,
        count::{FOUND_ROWS_SQL, calc_found_rows, count},
        paginate
    }
};

/// Entry point for loading templates under one configuration.
#[derive(Debug, Clone, Copy)]
pub struct SqlParser<'a> {
    config: &'a SqlParserConfig
}

impl<'a> SqlParser<'a> {
    #[must_use]
    pub const fn new(config: &'a SqlParserConfig) -> Self {
        Self {
            config
        }
    }

    /// Load the template stored at `path`.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidSqlFile`] when the file is missing, unreadable or
    ///   contains only whitespace
    /// - [`Error::SqlParse`] when the template is malformed
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<SqlTemplate<'a>> {
        let path = absolute(path.as_ref())?;
        let info = if self.config.enable_cache() {
            let cache = self.config.file_cache();
            if let Some(hit) = cache.get(&path) {
                debug!(path = %path.display(), "sql file served from cache");
                hit
            } else {
                cache.get_or_try_insert_with(&path, || load(&path))?
            }
        } else {
            Arc::new(load(&path)?)
        };
        Ok(SqlTemplate {
            config: self.config,
            info
        })
    }

    /// Parse `sql` without touching the file cache.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SqlParse`] when the template is malformed.
    pub fn parse_text(&self, sql: impl Into<String>) -> Result<SqlTemplate<'a>> {
        let raw_sql = sql.into();
        let node = parse(&raw_sql)?;
        Ok(SqlTemplate {
            config: self.config,
            info:   Arc::new(SqlFileInfo {
                file_path: PathBuf::new(),
                raw_sql,
                node
            })
        })
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    fs::canonicalize(path).map_err(|err| Error::InvalidSqlFile {
        path:   path.to_path_buf(),
        reason: err.to_string()
    })
}

fn load(path: &Path) -> Result<SqlFileInfo> {
    let raw_sql = fs::read_to_string(path).map_err(|err| Error::InvalidSqlFile {
        path:   path.to_path_buf(),
        reason: err.to_string()
    })?;
    if raw_sql.trim().is_empty() {
        return Err(Error::InvalidSqlFile {
            path:   path.to_path_buf(),
            reason: "file is empty".to_string()
        });
    }
    let node = parse(&raw_sql)?;
    debug!(path = %path.display(), bytes = raw_sql.len(), "parsed sql file");
    Ok(SqlFileInfo {
        file_path: path.to_path_buf(),
        raw_sql,
        node
    })
}

/// Page query together with the query reading the total row count.
#[derive(Debug, Clone, PartialEq)]
pub struct PagedQuery {
    pub rows:  SqlParserResult,
    pub count: SqlParserResult
}

/// Parsed template bound to a configuration.
#[derive(Debug, Clone)]
pub struct SqlTemplate<'a> {
    config: &'a SqlParserConfig,
    info:   Arc<SqlFileInfo>
}

impl SqlTemplate<'_> {
    /// Absolute path of a file template; `None` for text templates.
    #[must_use]
    pub fn file_path(&self) -> Option<&Path> {
        let path = self.info.file_path.as_path();
        (!path.as_os_str().is_empty()).then_some(path)
    }

    /// Template text as loaded.
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.info.raw_sql
    }

    #[must_use]
    pub fn node(&self) -> &SqlNode {
        &self.info.node
    }

    /// Render the template as written.
    ///
    /// # Errors
    ///
    /// See [`SqlBuilder::build`].
    pub fn build(&self, ctx: &EvaluationContext) -> Result<SqlParserResult> {
        self.render(&self.info.node, ctx, None)
    }

    /// Render with the columns of `E` available to `/*%expand*/` and
    /// `/*%populate*/`.
    ///
    /// # Errors
    ///
    /// See [`SqlBuilder::build`].
    pub fn build_for<E: Entity>(&self, ctx: &EvaluationContext) -> Result<SqlParserResult> {
        let info = self.config.entity_cache().get_or_build::<E>();
        self.render(&self.info.node, ctx, Some(&info.columns))
    }

    /// Render one page.
    ///
    /// # Errors
    ///
    /// - [`Error::SqlTransform`] when the dialect needs an ORDER BY
    /// - see [`SqlBuilder::build`]
    pub fn build_paginated(&self, ctx: &EvaluationContext, options: &PagingOptions) -> Result<SqlParserResult> {
        let paged = paginate(&self.info.node, self.config.dialect(), options, &self.info.raw_sql)?;
        self.render(&paged, ctx, None)
    }

    /// Render `select count(*)` over the template.
    ///
    /// # Errors
    ///
    /// See [`SqlBuilder::build`].
    pub fn build_count(&self, ctx: &EvaluationContext) -> Result<SqlParserResult> {
        let counted = count(&self.info.node, &self.info.raw_sql)?;
        self.render(&counted, ctx, None)
    }

    /// Render one page and the query returning the total row count.
    ///
    /// MySQL marks the page query with `sql_calc_found_rows` and reads the
    /// count with `select found_rows()`, which must run on the same
    /// connection right after the page query. Other dialects count with a
    /// subquery.
    ///
    /// # Errors
    ///
    /// Same as [`SqlTemplate::build_paginated`].
    pub fn build_paginated_with_count(
        &self,
        ctx: &EvaluationContext,
        options: &PagingOptions
    ) -> Result<PagedQuery> {
        let dialect = self.config.dialect();
        let sql = &self.info.raw_sql;
        match dialect.count_strategy() {
            CountStrategy::FoundRows => {
                let marked = calc_found_rows(&self.info.node, sql)?;
                let paged = paginate(&marked, dialect, options, sql)?;
                Ok(PagedQuery {
                    rows:  self.render(&paged, ctx, None)?,
                    count: SqlParserResult {
                        parsed_sql: FOUND_ROWS_SQL.to_string(),
                        debug_sql:  FOUND_ROWS_SQL.to_string(),
                        parameters: Vec::new()
                    }
                })
            }
            CountStrategy::Subquery => Ok(PagedQuery {
                rows:  self.build_paginated(ctx, options)?,
                count: self.build_count(ctx)?
            })
        }
    }

    fn render(
        &self,
        node: &SqlNode,
        ctx: &EvaluationContext,
        columns: Option<&[EntityColumnInfo]>
    ) -> Result<SqlParserResult> {
        let builder = SqlBuilder::new(self.config);
        match columns {
            Some(columns) => builder
                .with_columns(columns)
                .build(node, &self.info.raw_sql, ctx),
            None => builder.build(node, &self.info.raw_sql, ctx)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::{dialect::Dialect, error::MessageCode};

    fn temp_sql(name: &str, content: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("twoway-sql-parser-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn file_template_is_cached() {
        let path = temp_sql("cached.sql", "select * from emp where id = /*id*/1");
        let config = SqlParserConfig::for_dialect(Dialect::SqlServer);
        let parser = SqlParser::new(&config);

        let first = parser.parse_file(&path).unwrap();
        assert_eq!(config.file_cache().len(), 1);
        fs::write(&path, "select 1").unwrap();
        let second = parser.parse_file(&path).unwrap();
        assert_eq!(second.sql(), first.sql());
        assert!(second.file_path().is_some_and(Path::is_absolute));

        assert!(config.clear_cache(second.file_path().unwrap()));
        assert_eq!(parser.parse_file(&path).unwrap().sql(), "select 1");
    }

    #[test]
    fn cache_can_be_disabled() {
        let path = temp_sql("uncached.sql", "select 1");
        let config = SqlParserConfig::builder()
            .dialect(Dialect::Sqlite)
            .parameter_factory(crate::config::DefaultParameterFactory)
            .enable_cache(false)
            .build()
            .unwrap();
        SqlParser::new(&config).parse_file(&path).unwrap();
        assert!(config.file_cache().is_empty());
    }

    #[test]
    fn missing_and_empty_files() {
        let config = SqlParserConfig::for_dialect(Dialect::Standard);
        let parser = SqlParser::new(&config);
        let missing = parser.parse_file("/definitely/not/here.sql").unwrap_err();
        assert!(matches!(missing, Error::InvalidSqlFile { .. }));

        let path = temp_sql("empty.sql", "  \n\t");
        let empty = parser.parse_file(&path).unwrap_err();
        assert!(
            matches!(empty, Error::InvalidSqlFile { ref reason, .. } if reason == "file is empty")
        );
        assert!(config.file_cache().is_empty());
    }

    #[test]
    fn parse_errors_are_not_cached() {
        let path = temp_sql("broken.sql", "select 'oops");
        let config = SqlParserConfig::for_dialect(Dialect::Standard);
        let err = SqlParser::new(&config).parse_file(&path).unwrap_err();
        assert_eq!(err.code(), Some(MessageCode::Esp2101));
        assert!(config.file_cache().is_empty());
    }

    #[test]
    fn text_templates_have_no_path() {
        let config = SqlParserConfig::for_dialect(Dialect::Standard);
        let template = SqlParser::new(&config).parse_text("select 1").unwrap();
        assert!(template.file_path().is_none());
        assert_eq!(template.build(&EvaluationContext::new()).unwrap().parsed_sql, "select 1");
    }

    #[test]
    fn paged_with_subquery_count() {
        let config = SqlParserConfig::for_dialect(Dialect::PostgreSql);
        let template = SqlParser::new(&config)
            .parse_text("select * from emp where dept = /*dept*/'a' order by id")
            .unwrap();
        let ctx = EvaluationContext::scalar("dept", "sales");
        let paged = template
            .build_paginated_with_count(&ctx, &PagingOptions::new(10, 5))
            .unwrap();
        assert_eq!(
            paged.rows.parsed_sql,
            "select * from emp where dept = $1 order by id limit 5 offset 10"
        );
        assert_eq!(
            paged
                .count
                .parsed_sql
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" "),
            "select count(*) from ( select * from emp where dept = $1 ) t_"
        );
        assert_eq!(paged.count.parameters.len(), 1);
    }

    #[test]
    fn mysql_uses_found_rows() {
        let config = SqlParserConfig::for_dialect(Dialect::MySql);
        let template = SqlParser::new(&config)
            .parse_text("select * from emp order by id")
            .unwrap();
        let paged = template
            .build_paginated_with_count(&EvaluationContext::new(), &PagingOptions::new(20, 10))
            .unwrap();
        assert_eq!(
            paged.rows.parsed_sql,
            "select sql_calc_found_rows * from emp order by id limit 20, 10"
        );
        assert_eq!(paged.count.parsed_sql, FOUND_ROWS_SQL);
        assert!(paged.count.parameters.is_empty());
    }

    #[test]
    fn paging_without_order_by_fails() {
        let config = SqlParserConfig::for_dialect(Dialect::Standard);
        let template = SqlParser::new(&config).parse_text("select * from emp").unwrap();
        let err = template
            .build_paginated(&EvaluationContext::new(), &PagingOptions::new(1, 1))
            .unwrap_err();
        assert_eq!(err.code(), Some(MessageCode::Esp2201));
    }
}
