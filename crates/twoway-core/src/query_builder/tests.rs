// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use chrono::NaiveDateTime;

use super::*;
use crate::{
    config::SqlParserConfig,
    dialect::Dialect,
    entity::{
        CurrentTimestampAttribute, CurrentTimestampStrategy, EntityColumnInfo, EntityTypeInfo,
        EntityTypeInfoBuilder
    },
    error::Error,
    result::ParameterDirection,
    value::{FromValue, ToValue, Value, ValueKind}
};

#[derive(Debug, Clone, Default)]
struct Emp {
    id:         i32,
    name:       Option<String>,
    salary:     i32,
    version_no: i32
}

impl Entity for Emp {
    fn build_type_info() -> EntityTypeInfo<Self> {
        EntityTypeInfoBuilder::<Self>::new("EMP")
            .schema("dbo")
            .column(
                EntityColumnInfo::new("id", "ID", ValueKind::Int).primary_key(),
                |e| e.id.to_value(),
                |e, v| {
                    e.id = i32::from_value(v)?;
                    Ok(())
                }
            )
            .column(
                EntityColumnInfo::new("name", "NAME", ValueKind::String).nullable(true),
                |e| e.name.to_value(),
                |e, v| {
                    e.name = Option::<String>::from_value(v)?;
                    Ok(())
                }
            )
            .column(
                EntityColumnInfo::new("salary", "SALARY", ValueKind::Int),
                |e| e.salary.to_value(),
                |e, v| {
                    e.salary = i32::from_value(v)?;
                    Ok(())
                }
            )
            .column(
                EntityColumnInfo::new("version_no", "VERSION", ValueKind::Int).version(),
                |e| e.version_no.to_value(),
                |e, v| {
                    e.version_no = i32::from_value(v)?;
                    Ok(())
                }
            )
            .build()
    }
}

#[derive(Debug, Clone, Default)]
struct Task {
    id:          i64,
    title:       String,
    deleted:     bool,
    deleted_at:  Option<NaiveDateTime>,
    created_at:  Option<NaiveDateTime>,
    modified_at: Option<NaiveDateTime>,
    version:     i32
}

fn timestamp(strategy: CurrentTimestampStrategy) -> CurrentTimestampAttribute {
    CurrentTimestampAttribute::new(strategy)
}

fn set_optional_timestamp(slot: &mut Option<NaiveDateTime>, value: Value) -> crate::error::Result<()> {
    *slot = Option::<NaiveDateTime>::from_value(value)?;
    Ok(())
}

impl Entity for Task {
    fn build_type_info() -> EntityTypeInfo<Self> {
        EntityTypeInfoBuilder::<Self>::new("TASK")
            .column(
                EntityColumnInfo::new("id", "ID", ValueKind::Long)
                    .primary_key()
                    .identity(),
                |e| e.id.to_value(),
                |e, v| {
                    e.id = i64::from_value(v)?;
                    Ok(())
                }
            )
            .column(
                EntityColumnInfo::new("title", "TITLE", ValueKind::String),
                |e| e.title.to_value(),
                |e, v| {
                    e.title = String::from_value(v)?;
                    Ok(())
                }
            )
            .column(
                EntityColumnInfo::new("deleted", "DELETED", ValueKind::Bool).soft_delete_key(),
                |e| e.deleted.to_value(),
                |e, v| {
                    e.deleted = bool::from_value(v)?;
                    Ok(())
                }
            )
            .column(
                EntityColumnInfo::new("deleted_at", "DELETED_AT", ValueKind::DateTime)
                    .nullable(true)
                    .current_timestamp(timestamp(CurrentTimestampStrategy::SoftDelete)),
                |e| e.deleted_at.to_value(),
                |e, v| set_optional_timestamp(&mut e.deleted_at, v)
            )
            .column(
                EntityColumnInfo::new("created_at", "CREATED_AT", ValueKind::DateTime)
                    .nullable(true)
                    .current_timestamp(timestamp(CurrentTimestampStrategy::Insert)),
                |e| e.created_at.to_value(),
                |e, v| set_optional_timestamp(&mut e.created_at, v)
            )
            .column(
                EntityColumnInfo::new("modified_at", "MODIFIED_AT", ValueKind::DateTime)
                    .nullable(true)
                    .current_timestamp(timestamp(CurrentTimestampStrategy::Always)),
                |e| e.modified_at.to_value(),
                |e, v| set_optional_timestamp(&mut e.modified_at, v)
            )
            .column(
                EntityColumnInfo::new("version", "VERSION", ValueKind::Int).version(),
                |e| e.version.to_value(),
                |e, v| {
                    e.version = i32::from_value(v)?;
                    Ok(())
                }
            )
            .build()
    }
}

#[derive(Debug, Default)]
struct Log {
    message: String
}

impl Entity for Log {
    fn build_type_info() -> EntityTypeInfo<Self> {
        EntityTypeInfoBuilder::<Self>::new("LOG")
            .column(
                EntityColumnInfo::new("message", "MESSAGE", ValueKind::String),
                |e| e.message.to_value(),
                |e, v| {
                    e.message = String::from_value(v)?;
                    Ok(())
                }
            )
            .build()
    }
}

#[derive(Debug, Default)]
struct Tag {
    id: i32
}

impl Entity for Tag {
    fn build_type_info() -> EntityTypeInfo<Self> {
        EntityTypeInfoBuilder::<Self>::new("TAG")
            .column(
                EntityColumnInfo::new("id", "ID", ValueKind::Int).primary_key(),
                |e| e.id.to_value(),
                |e, v| {
                    e.id = i32::from_value(v)?;
                    Ok(())
                }
            )
            .build()
    }
}

fn emp() -> Emp {
    Emp {
        id:         1,
        name:       Some("SMITH".to_string()),
        salary:     1000,
        version_no: 3
    }
}

fn task() -> Task {
    Task {
        id: 0,
        title: "write tests".to_string(),
        version: 1,
        ..Task::default()
    }
}

fn names(result: &crate::result::SqlParserResult) -> Vec<&str> {
    result.parameters.iter().map(|p| p.name.as_str()).collect()
}

#[test]
fn insert_excludes_null_columns() {
    let config = SqlParserConfig::for_dialect(Dialect::SqlServer);
    let mut emp = Emp {
        name: None,
        ..emp()
    };
    let param = QueryBuilderParameter::new(&mut emp, SqlKind::Insert, &config).exclude_null(true);
    let result = QueryBuilder::build(&param).unwrap();
    assert_eq!(
        result.parsed_sql,
        "INSERT INTO [dbo].[EMP] ([ID], [SALARY], [VERSION]) VALUES (@id, @salary, @version_no)"
    );
    assert_eq!(
        result.debug_sql,
        "INSERT INTO [dbo].[EMP] ([ID], [SALARY], [VERSION]) VALUES (1, 1000, 3)"
    );
    assert_eq!(names(&result), vec!["@id", "@salary", "@version_no"]);
}

#[test]
fn insert_binds_null_without_exclude_null() {
    let config = SqlParserConfig::for_dialect(Dialect::SqlServer);
    let mut emp = Emp {
        name: None,
        ..emp()
    };
    let param = QueryBuilderParameter::new(&mut emp, SqlKind::Insert, &config);
    let result = QueryBuilder::build(&param).unwrap();
    assert_eq!(
        result.parsed_sql,
        "INSERT INTO [dbo].[EMP] ([ID], [NAME], [SALARY], [VERSION]) VALUES (@id, @name, @salary, @version_no)"
    );
    assert_eq!(result.parameters[1].value, Value::Null);
    assert_eq!(result.parameters[1].db_type, crate::value::DbType::String);
}

#[test]
fn update_increments_and_guards_version() {
    let config = SqlParserConfig::for_dialect(Dialect::SqlServer);
    let mut emp = emp();
    let param = QueryBuilderParameter::new(&mut emp, SqlKind::Update, &config);
    assert!(param.is_version_guarded());
    let result = QueryBuilder::build(&param).unwrap();
    assert_eq!(
        result.parsed_sql,
        "UPDATE [dbo].[EMP] SET [NAME] = @name, [SALARY] = @salary, [VERSION] = [VERSION] + 1 WHERE [ID] = @id AND [VERSION] = @version_no"
    );
    assert_eq!(
        result.debug_sql,
        "UPDATE [dbo].[EMP] SET [NAME] = 'SMITH', [SALARY] = 1000, [VERSION] = [VERSION] + 1 WHERE [ID] = 1 AND [VERSION] = 3"
    );
}

#[test]
fn update_ignoring_version_binds_it() {
    let config = SqlParserConfig::for_dialect(Dialect::SqlServer);
    let mut emp = emp();
    let param =
        QueryBuilderParameter::new(&mut emp, SqlKind::Update, &config).ignore_version(true);
    assert!(!param.is_version_guarded());
    let result = QueryBuilder::build(&param).unwrap();
    assert_eq!(
        result.parsed_sql,
        "UPDATE [dbo].[EMP] SET [NAME] = @name, [SALARY] = @salary, [VERSION] = @version_no WHERE [ID] = @id"
    );
}

#[test]
fn version_filter_uses_snapshot() {
    let config = SqlParserConfig::for_dialect(Dialect::PostgreSql);
    let mut emp = emp();
    let mut param = QueryBuilderParameter::new(&mut emp, SqlKind::Delete, &config);
    param.entity_mut().version_no = 9;
    assert!(!param.is_same_version());
    let result = QueryBuilder::build(&param).unwrap();
    assert_eq!(
        result.parsed_sql,
        r#"DELETE FROM "dbo"."EMP" WHERE "ID" = $1 AND "VERSION" = $2"#
    );
    assert_eq!(result.values(), vec![&Value::Int(1), &Value::Int(3)]);

    param.save_expected_version();
    assert!(param.is_same_version());
    assert_eq!(param.expected_version(), Some(&Value::Int(9)));
}

#[test]
fn select_by_key() {
    let config = SqlParserConfig::for_dialect(Dialect::PostgreSql);
    let mut emp = emp();
    let param = QueryBuilderParameter::new(&mut emp, SqlKind::Select, &config);
    let plan = QueryBuilder::plan(&param).unwrap();
    assert_eq!(
        plan.result.parsed_sql,
        r#"SELECT "ID", "NAME", "SALARY", "VERSION" FROM "dbo"."EMP" WHERE "ID" = $1"#
    );
    assert_eq!(plan.fetch, FetchMode::Row);
}

#[test]
fn soft_delete_touches_flag_and_timestamps() {
    let config = SqlParserConfig::for_dialect(Dialect::SqlServer);
    let mut task = Task {
        id: 7,
        deleted: false,
        ..task()
    };
    let param = QueryBuilderParameter::new(&mut task, SqlKind::SoftDelete, &config);
    let result = QueryBuilder::build(&param).unwrap();
    assert_eq!(
        result.parsed_sql,
        "UPDATE [TASK] SET [DELETED] = @deleted, [DELETED_AT] = GETDATE(), [MODIFIED_AT] = GETDATE() WHERE [ID] = @id AND [VERSION] = @version"
    );
    assert_eq!(result.parameters[0].value, Value::Bool(true));
    drop(param);
    assert!(!task.deleted);
}

#[test]
fn soft_delete_needs_flag_column() {
    let config = SqlParserConfig::for_dialect(Dialect::SqlServer);
    let mut emp = emp();
    let param = QueryBuilderParameter::new(&mut emp, SqlKind::SoftDelete, &config);
    let err = QueryBuilder::build(&param).unwrap_err();
    assert!(matches!(err, Error::NoWritableColumns { ref table } if table == "EMP"));
}

#[test]
fn update_timestamps_follow_strategy() {
    let config = SqlParserConfig::for_dialect(Dialect::PostgreSql);
    let mut task = Task {
        id: 7,
        ..task()
    };
    let param = QueryBuilderParameter::new(&mut task, SqlKind::Update, &config);
    let result = QueryBuilder::build(&param).unwrap();
    assert_eq!(
        result.parsed_sql,
        r#"UPDATE "TASK" SET "TITLE" = $1, "DELETED" = $2, "MODIFIED_AT" = CURRENT_TIMESTAMP, "VERSION" = "VERSION" + 1 WHERE "ID" = $3 AND "VERSION" = $4"#
    );
}

#[test]
fn identity_insert_per_dialect() {
    let ts = |d: Dialect| d.current_timestamp_sql();
    let cases = [
        (
            Dialect::SqlServer,
            format!(
                "INSERT INTO [TASK] ([TITLE], [DELETED], [CREATED_AT], [MODIFIED_AT], [VERSION]) OUTPUT INSERTED.[ID] VALUES (@title, @deleted, {0}, {0}, @version)",
                ts(Dialect::SqlServer)
            ),
            FetchMode::Row
        ),
        (
            Dialect::PostgreSql,
            format!(
                r#"INSERT INTO "TASK" ("TITLE", "DELETED", "CREATED_AT", "MODIFIED_AT", "VERSION") VALUES ($1, $2, {0}, {0}, $3) RETURNING "ID""#,
                ts(Dialect::PostgreSql)
            ),
            FetchMode::Row
        ),
        (
            Dialect::Oracle,
            format!(
                r#"INSERT INTO "TASK" ("TITLE", "DELETED", "CREATED_AT", "MODIFIED_AT", "VERSION") VALUES (:title, :deleted, {0}, {0}, :version) RETURNING "ID" INTO :out_id"#,
                ts(Dialect::Oracle)
            ),
            FetchMode::Row
        ),
        (
            Dialect::Db2,
            format!(
                r#"SELECT "ID" FROM FINAL TABLE (INSERT INTO "TASK" ("TITLE", "DELETED", "CREATED_AT", "MODIFIED_AT", "VERSION") VALUES (?, ?, {0}, {0}, ?))"#,
                ts(Dialect::Db2)
            ),
            FetchMode::Row
        ),
        (
            Dialect::Standard,
            format!(
                r#"INSERT INTO "TASK" ("TITLE", "DELETED", "CREATED_AT", "MODIFIED_AT", "VERSION") VALUES (?, ?, {0}, {0}, ?)"#,
                ts(Dialect::Standard)
            ),
            FetchMode::None
        )
    ];
    for (dialect, expected, fetch) in cases {
        let config = SqlParserConfig::for_dialect(dialect);
        let mut task = task();
        let param = QueryBuilderParameter::new(&mut task, SqlKind::Insert, &config)
            .exclude_null(true)
            .behavior(QueryBehavior::IdentityOnly);
        let plan = QueryBuilder::plan(&param).unwrap();
        assert_eq!(plan.result.parsed_sql, expected, "{dialect:?}");
        assert_eq!(plan.fetch, fetch, "{dialect:?}");
    }
}

#[test]
fn insert_leaves_out_timestamps_not_generated_on_insert() {
    let config = SqlParserConfig::for_dialect(Dialect::Standard);
    let mut task = task();
    let param = QueryBuilderParameter::new(&mut task, SqlKind::Insert, &config);
    let result = QueryBuilder::build(&param).unwrap();
    assert_eq!(
        result.parsed_sql,
        format!(
            r#"INSERT INTO "TASK" ("TITLE", "DELETED", "CREATED_AT", "MODIFIED_AT", "VERSION") VALUES (?, ?, {0}, {0}, ?)"#,
            Dialect::Standard.current_timestamp_sql()
        )
    );
    assert_eq!(names(&result), ["title", "deleted", "version"]);
}

#[test]
fn oracle_output_parameter() {
    let config = SqlParserConfig::for_dialect(Dialect::Oracle);
    let mut task = task();
    let param = QueryBuilderParameter::new(&mut task, SqlKind::Insert, &config)
        .exclude_null(true)
        .behavior(QueryBehavior::IdentityOnly);
    let result = QueryBuilder::build(&param).unwrap();
    let out = result.parameters.last().unwrap();
    assert_eq!(out.name, ":out_id");
    assert_eq!(out.direction, ParameterDirection::Output);
    assert!(result.debug_sql.ends_with("INTO :out_id"));
    assert_eq!(result.values().len(), 3);
}

#[test]
fn mysql_reads_last_insert_id() {
    let config = SqlParserConfig::for_dialect(Dialect::MySql);
    let mut task = task();
    let param = QueryBuilderParameter::new(&mut task, SqlKind::Insert, &config)
        .behavior(QueryBehavior::IdentityOrAllColumns);
    let plan = QueryBuilder::plan(&param).unwrap();
    assert!(plan.result.parsed_sql.starts_with("INSERT INTO `TASK`"));
    match plan.fetch {
        FetchMode::Scalar {
            sql,
            column
        } => {
            assert_eq!(sql.parsed_sql, LAST_INSERT_ID_SQL);
            assert_eq!(column, "ID");
        }
        other => panic!("unexpected fetch {other:?}")
    }
}

#[test]
fn identity_or_all_columns_without_identity() {
    let config = SqlParserConfig::for_dialect(Dialect::PostgreSql);
    let mut emp = emp();
    let param = QueryBuilderParameter::new(&mut emp, SqlKind::Insert, &config)
        .behavior(QueryBehavior::IdentityOrAllColumns);
    let result = QueryBuilder::build(&param).unwrap();
    assert!(
        result
            .parsed_sql
            .ends_with(r#"RETURNING "ID", "NAME", "SALARY", "VERSION""#)
    );
}

#[test]
fn update_output_precedes_where() {
    let config = SqlParserConfig::for_dialect(Dialect::SqlServer);
    let mut emp = emp();
    let param = QueryBuilderParameter::new(&mut emp, SqlKind::Update, &config)
        .behavior(QueryBehavior::AllColumns);
    let plan = QueryBuilder::plan(&param).unwrap();
    assert!(plan.result.parsed_sql.contains(
        "[VERSION] = [VERSION] + 1 OUTPUT INSERTED.[ID], INSERTED.[NAME], INSERTED.[SALARY], INSERTED.[VERSION] WHERE [ID] = @id"
    ));
    assert_eq!(plan.fetch, FetchMode::Row);

    let mut emp = self::emp();
    let identity_only = QueryBuilderParameter::new(&mut emp, SqlKind::Update, &config)
        .behavior(QueryBehavior::IdentityOnly);
    assert_eq!(QueryBuilder::plan(&identity_only).unwrap().fetch, FetchMode::None);
}

#[test]
fn keyless_entity_cannot_be_updated() {
    let config = SqlParserConfig::for_dialect(Dialect::SqlServer);
    let mut log = Log {
        message: "x".to_string()
    };
    let insert = QueryBuilderParameter::new(&mut log, SqlKind::Insert, &config);
    assert_eq!(
        QueryBuilder::build(&insert).unwrap().parsed_sql,
        "INSERT INTO [LOG] ([MESSAGE]) VALUES (@message)"
    );
    for kind in [SqlKind::Update, SqlKind::Delete, SqlKind::Select, SqlKind::Merge] {
        let mut log = Log::default();
        let param = QueryBuilderParameter::new(&mut log, kind, &config);
        let err = QueryBuilder::build(&param).unwrap_err();
        assert!(matches!(err, Error::EntityKeyMissing { ref table } if table == "LOG"), "{kind:?}");
    }
}

#[test]
fn key_only_entity_has_nothing_to_update() {
    let config = SqlParserConfig::for_dialect(Dialect::SqlServer);
    let mut tag = Tag {
        id: 1
    };
    let param = QueryBuilderParameter::new(&mut tag, SqlKind::Update, &config);
    assert!(matches!(
        QueryBuilder::build(&param).unwrap_err(),
        Error::NoWritableColumns { .. }
    ));

    let mut tag = Tag {
        id: 1
    };
    let merge = QueryBuilderParameter::new(&mut tag, SqlKind::Merge, &config);
    assert_eq!(
        QueryBuilder::build(&merge).unwrap().parsed_sql,
        "MERGE INTO [TAG] AS t USING (SELECT @id AS [ID]) AS s ON (t.[ID] = s.[ID]) WHEN NOT MATCHED THEN INSERT ([ID]) VALUES (s.[ID]);"
    );
}

#[test]
fn merge_sqlserver() {
    let config = SqlParserConfig::for_dialect(Dialect::SqlServer);
    let mut emp = emp();
    let param = QueryBuilderParameter::new(&mut emp, SqlKind::Merge, &config);
    assert!(!param.is_version_guarded());
    assert_eq!(
        QueryBuilder::build(&param).unwrap().parsed_sql,
        "MERGE INTO [dbo].[EMP] AS t USING (SELECT @id AS [ID], @name AS [NAME], @salary AS [SALARY], @version_no AS [VERSION]) AS s ON (t.[ID] = s.[ID]) WHEN MATCHED THEN UPDATE SET [NAME] = s.[NAME], [SALARY] = s.[SALARY], [VERSION] = t.[VERSION] + 1 WHEN NOT MATCHED THEN INSERT ([ID], [NAME], [SALARY], [VERSION]) VALUES (s.[ID], s.[NAME], s.[SALARY], s.[VERSION]);"
    );
}

#[test]
fn merge_oracle_and_db2_sources() {
    let config = SqlParserConfig::for_dialect(Dialect::Oracle);
    let mut emp = emp();
    let param = QueryBuilderParameter::new(&mut emp, SqlKind::Merge, &config);
    let sql = QueryBuilder::build(&param).unwrap().parsed_sql;
    assert!(sql.starts_with(
        r#"MERGE INTO "dbo"."EMP" t USING (SELECT :id AS "ID", :name AS "NAME", :salary AS "SALARY", :version_no AS "VERSION" FROM DUAL) s ON (t."ID" = s."ID")"#
    ));
    assert!(!sql.ends_with(';'));

    let config = SqlParserConfig::for_dialect(Dialect::Db2);
    let mut emp = self::emp();
    let param = QueryBuilderParameter::new(&mut emp, SqlKind::Merge, &config);
    let sql = QueryBuilder::build(&param).unwrap().parsed_sql;
    assert!(sql.starts_with(
        r#"MERGE INTO "dbo"."EMP" AS t USING (VALUES (?, ?, ?, ?)) AS s ("ID", "NAME", "SALARY", "VERSION") ON"#
    ));
}

#[test]
fn merge_postgres_without_version_increment() {
    let config = SqlParserConfig::for_dialect(Dialect::PostgreSql);
    let mut emp = emp();
    let param = QueryBuilderParameter::new(&mut emp, SqlKind::Merge, &config).use_version(false);
    assert_eq!(
        QueryBuilder::build(&param).unwrap().parsed_sql,
        r#"INSERT INTO "dbo"."EMP" ("ID", "NAME", "SALARY", "VERSION") VALUES ($1, $2, $3, $4) ON CONFLICT ("ID") DO UPDATE SET "NAME" = EXCLUDED."NAME", "SALARY" = EXCLUDED."SALARY", "VERSION" = EXCLUDED."VERSION""#
    );
}

#[test]
fn merge_sqlite_increments_stored_version() {
    let config = SqlParserConfig::for_dialect(Dialect::Sqlite);
    let mut emp = emp();
    let param = QueryBuilderParameter::new(&mut emp, SqlKind::Merge, &config);
    assert!(
        QueryBuilder::build(&param)
            .unwrap()
            .parsed_sql
            .ends_with(r#""VERSION" = "dbo"."EMP"."VERSION" + 1"#)
    );
}

#[test]
fn merge_mysql() {
    let config = SqlParserConfig::for_dialect(Dialect::MySql);
    let mut emp = emp();
    let param = QueryBuilderParameter::new(&mut emp, SqlKind::Merge, &config);
    assert_eq!(
        QueryBuilder::build(&param).unwrap().parsed_sql,
        "INSERT INTO `dbo`.`EMP` (`ID`, `NAME`, `SALARY`, `VERSION`) VALUES (?, ?, ?, ?) ON DUPLICATE KEY UPDATE `NAME` = VALUES(`NAME`), `SALARY` = VALUES(`SALARY`), `VERSION` = `VERSION` + 1"
    );
}

#[test]
fn merge_writes_generated_timestamps() {
    let config = SqlParserConfig::for_dialect(Dialect::PostgreSql);
    let mut task = Task {
        id: 4,
        ..task()
    };
    let param = QueryBuilderParameter::new(&mut task, SqlKind::Merge, &config).exclude_null(true);
    assert_eq!(
        QueryBuilder::build(&param).unwrap().parsed_sql,
        r#"INSERT INTO "TASK" ("ID", "TITLE", "DELETED", "VERSION", "CREATED_AT", "MODIFIED_AT") VALUES ($1, $2, $3, $4, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP) ON CONFLICT ("ID") DO UPDATE SET "TITLE" = EXCLUDED."TITLE", "DELETED" = EXCLUDED."DELETED", "VERSION" = "TASK"."VERSION" + 1, "MODIFIED_AT" = CURRENT_TIMESTAMP"#
    );
}

#[test]
fn placeholders_align_with_parameters() {
    let config = SqlParserConfig::for_dialect(Dialect::PostgreSql);
    let mut emp = emp();
    let param = QueryBuilderParameter::new(&mut emp, SqlKind::Update, &config);
    let result = QueryBuilder::build(&param).unwrap();
    let positions: Vec<usize> = (1..=result.parameters.len())
        .map(|n| result.parsed_sql.find(&format!("${n}")).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(names(&result), vec!["name", "salary", "id", "version_no"]);
}

#[test]
fn wrapper_helpers_write_back() {
    let config = SqlParserConfig::for_dialect(Dialect::PostgreSql);
    let mut task = task();
    {
        let mut param = QueryBuilderParameter::new(&mut task, SqlKind::Insert, &config);
        param.apply_column("id", Value::Long(42)).unwrap();
        param.apply_column("unknown", Value::Long(1)).unwrap();
        param.increment_version().unwrap();
    }
    assert_eq!(task.id, 42);
    assert_eq!(task.version, 2);
}

/// Identity-only inserts keep the comparison against the version snapshot,
/// but the read-back row only carries the identity, so the comparison can
/// never fail. Kept visible here so a change in that reasoning shows up.
#[test]
fn identity_only_insert_keeps_version() {
    let config = SqlParserConfig::for_dialect(Dialect::PostgreSql);
    let mut task = task();
    let mut param = QueryBuilderParameter::new(&mut task, SqlKind::Insert, &config)
        .behavior(QueryBehavior::IdentityOnly);
    param.apply_column("ID", Value::Long(5)).unwrap();
    assert!(param.is_same_version());
    assert!(!param.is_version_guarded());
}
