// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use super::{count::FOUND_ROWS_SQL, *};
use crate::{
    builder::SqlBuilder, config::SqlParserConfig, context::EvaluationContext, parser::parse
};

fn render(dialect: Dialect, node: &SqlNode, sql: &str, ctx: &EvaluationContext) -> String {
    let config = SqlParserConfig::for_dialect(dialect);
    SqlBuilder::new(&config)
        .build(node, sql, ctx)
        .unwrap()
        .parsed_sql
}

fn page_with(dialect: Dialect, sql: &str, options: &PagingOptions) -> String {
    let node = parse(sql).unwrap();
    let paged = paginate(&node, dialect, options, sql).unwrap();
    render(dialect, &paged, sql, &EvaluationContext::new())
}

fn page(dialect: Dialect, sql: &str, offset: i64, limit: i64) -> String {
    page_with(dialect, sql, &PagingOptions::new(offset, limit))
}

fn squash(sql: &str) -> String {
    sql.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[test]
fn standard_row_number() {
    assert_eq!(
        page(Dialect::Standard, "select emp.id from emp order by emp.id", 5, 10),
        "select * from ( select temp_.*, row_number() over( order by temp_.id ) as esp_rownumber_ from ( select emp.id from emp ) as temp_ ) as temp2_ where esp_rownumber_ > 5 and esp_rownumber_ <= 15"
    );
}

#[test]
fn oracle_rownum() {
    assert_eq!(
        page(Dialect::Oracle, "select * from emp order by emp.id", 5, 10),
        "select * from ( select temp_.*, rownum esp_rownumber_ from ( select * from emp order by emp.id ) temp_ ) where esp_rownumber_ > 5 and esp_rownumber_ <= 15"
    );
    assert_eq!(
        page(Dialect::Oracle11, "select * from emp order by emp.id", 5, 10),
        page(Dialect::Oracle, "select * from emp order by emp.id", 5, 10)
    );
}

#[test]
fn sqlite_limit_offset() {
    assert_eq!(
        page(Dialect::Sqlite, "select * from emp order by emp.id", -1, 10),
        "select * from emp order by emp.id limit 10 offset 0"
    );
}

#[test]
fn sqlite_without_order_by() {
    assert_eq!(
        page(Dialect::Sqlite, "select * from emp", 20, 0),
        format!("select * from emp limit {} offset 20", i64::MAX)
    );
}

#[test]
fn custom_row_number_column() {
    let options = PagingOptions::new(0, 3).with_row_number_column("rn");
    let sql = page_with(Dialect::Standard, "select * from emp order by id", &options);
    assert!(sql.ends_with("where rn > 0 and rn <= 3"));
    assert!(sql.contains("as rn from"));
}

#[test]
fn order_by_is_required() {
    let sql = "select * from emp";
    let node = parse(sql).unwrap();
    for dialect in [Dialect::Standard, Dialect::SqlServer2008] {
        let err = paginate(&node, dialect, &PagingOptions::new(5, 10), sql).unwrap_err();
        assert_eq!(err.code(), Some(MessageCode::Esp2201));
        assert!(matches!(err, Error::SqlTransform { .. }));
    }
    let err = paginate(&node, Dialect::SqlServer, &PagingOptions::new(5, 10), sql).unwrap_err();
    assert_eq!(err.code(), Some(MessageCode::Esp2201));
    assert!(paginate(&node, Dialect::Sqlite, &PagingOptions::new(5, 10), sql).is_ok());
}

#[test]
fn paging_is_idempotent() {
    let sql = "select emp.id from emp order by emp.id";
    let node = parse(sql).unwrap();
    for dialect in [
        Dialect::Standard,
        Dialect::SqlServer,
        Dialect::SqlServer2008,
        Dialect::Oracle,
        Dialect::PostgreSql,
        Dialect::MySql,
        Dialect::Sqlite,
        Dialect::Db2
    ] {
        let options = PagingOptions::new(5, 10);
        let once = paginate(&node, dialect, &options, sql).unwrap();
        let twice = paginate(&once, dialect, &options, sql).unwrap();
        assert_eq!(once, twice, "{dialect:?}");
        let ctx = EvaluationContext::new();
        assert_eq!(
            render(dialect, &once, sql, &ctx),
            render(dialect, &twice, sql, &ctx)
        );
    }
}

#[test]
fn unpaged_request_leaves_tree() {
    let sql = "select * from emp order by id";
    let node = parse(sql).unwrap();
    let same = paginate(&node, Dialect::Standard, &PagingOptions::new(0, 0), sql).unwrap();
    assert_eq!(same, node);
}

#[test]
fn sqlserver_top_and_offset_fetch() {
    assert_eq!(
        page(Dialect::SqlServer, "select * from emp order by id", 0, 10),
        "select top (10) * from emp order by id"
    );
    assert_eq!(
        page(Dialect::SqlServer, "select * from emp order by id", 5, 10),
        "select * from emp order by id offset 5 rows fetch next 10 rows only"
    );
    let forced = PagingOptions::new(0, 10).force_offset_fetch();
    assert_eq!(
        page_with(Dialect::SqlServer, "select * from emp order by id", &forced),
        "select * from emp order by id offset 0 rows fetch next 10 rows only"
    );
}

#[test]
fn top_follows_distinct() {
    assert_eq!(
        page(Dialect::SqlServer2008, "select distinct name from emp", 0, 3),
        "select distinct top (3) name from emp"
    );
}

#[test]
fn sqlserver2008_offset_uses_row_number() {
    let sql = page(Dialect::SqlServer2008, "select * from emp order by id", 5, 10);
    assert!(sql.contains("row_number() over( order by id"));
    assert!(sql.ends_with("esp_rownumber_ > 5 and esp_rownumber_ <= 15"));
}

#[test]
fn db2_fetch_first_or_row_number() {
    assert_eq!(
        page(Dialect::Db2, "select * from emp order by id", 0, 10),
        "select * from emp order by id fetch first 10 rows only"
    );
    assert!(page(Dialect::Db2, "select * from emp order by id", 5, 10).contains("row_number()"));
    let named = PagingOptions::new(0, 10).with_row_number_column("rn");
    assert!(page_with(Dialect::Db2, "select * from emp order by id", &named).contains("as rn from"));
}

#[test]
fn postgres_and_mysql_limits() {
    assert_eq!(
        page(Dialect::PostgreSql, "select * from emp order by id", 5, 10),
        "select * from emp order by id limit 10 offset 5"
    );
    assert_eq!(
        page(Dialect::MySql, "select * from emp order by id", 5, 10),
        "select * from emp order by id limit 5, 10"
    );
    assert_eq!(
        page(Dialect::MySql, "select * from emp", 5, 0),
        "select * from emp limit 5, 18446744073709551615"
    );
}

#[test]
fn for_update_moves_to_outer_statement() {
    let sql = page(
        Dialect::Standard,
        "select * from emp order by id for update",
        5,
        10
    );
    assert_eq!(
        squash(&sql),
        "select * from ( select temp_.*, row_number() over( order by id ) as esp_rownumber_ from ( select * from emp ) as temp_ ) as temp2_ where esp_rownumber_ > 5 and esp_rownumber_ <= 15 for update"
    );
}

#[test]
fn bind_variables_survive_paging() {
    let sql = "select * from emp where id > /*id*/0 order by id";
    let node = parse(sql).unwrap();
    let paged = paginate(&node, Dialect::Oracle, &PagingOptions::new(0, 5), sql).unwrap();
    let rendered = render(
        Dialect::Oracle,
        &paged,
        sql,
        &EvaluationContext::scalar("id", 3)
    );
    assert!(rendered.contains("where id > :id order by id"));
}

#[test]
fn count_wraps_statement() {
    let sql = "select * from emp where id > 1 order by id";
    let node = parse(sql).unwrap();
    let counted = count::count(&node, sql).unwrap();
    assert_eq!(
        squash(&render(Dialect::Standard, &counted, sql, &EvaluationContext::new())),
        "select count(*) from ( select * from emp where id > 1 ) t_"
    );
}

#[test]
fn found_rows_marks_paged_query() {
    let sql = "select * from emp order by id";
    let node = parse(sql).unwrap();
    let marked = count::calc_found_rows(&node, sql).unwrap();
    let paged = paginate(&marked, Dialect::MySql, &PagingOptions::new(0, 10), sql).unwrap();
    assert_eq!(
        render(Dialect::MySql, &paged, sql, &EvaluationContext::new()),
        "select sql_calc_found_rows * from emp order by id limit 0, 10"
    );
    assert_eq!(FOUND_ROWS_SQL, "select found_rows()");
}
