// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Templates evaluated against derived parameter objects.

use twoway_sql::{
    Dialect, EvaluationContext, PagingOptions, SqlParameter, SqlParser, SqlParserConfig, Value
};

#[derive(SqlParameter)]
pub struct EmpSearch {
    pub name:     Option<String>,
    #[parameter(rename = "deptIds")]
    pub dept_ids: Vec<i32>,
    #[parameter(skip)]
    pub trace:    bool,
}

const SEARCH: &str = "select * from emp where /*%if name != null*/name = /*name*/'x' and /*%end*/dept_id in /*deptIds*/(1, 2) order by id";

fn squash(sql: &str) -> String {
    sql.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[test]
fn object_properties_bind() {
    let config = SqlParserConfig::for_dialect(Dialect::SqlServer);
    let template = SqlParser::new(&config).parse_text(SEARCH).unwrap();
    let ctx = EvaluationContext::from_object(&EmpSearch {
        name:     Some("SMITH".to_string()),
        dept_ids: vec![10, 20],
        trace:    true
    });
    let result = template.build(&ctx).unwrap();
    assert_eq!(
        squash(&result.parsed_sql),
        "select * from emp where name = @name and dept_id in (@deptIds, @deptIds_1) order by id"
    );
    assert_eq!(
        squash(&result.debug_sql),
        "select * from emp where name = 'SMITH' and dept_id in (10, 20) order by id"
    );
}

#[test]
fn absent_property_drops_condition() {
    let config = SqlParserConfig::for_dialect(Dialect::PostgreSql);
    let template = SqlParser::new(&config).parse_text(SEARCH).unwrap();
    let ctx = EvaluationContext::from_object(&EmpSearch {
        name:     None,
        dept_ids: vec![10],
        trace:    false
    });
    let result = template.build(&ctx).unwrap();
    assert_eq!(
        squash(&result.parsed_sql),
        "select * from emp where dept_id in ($1) order by id"
    );
    assert_eq!(result.values(), vec![&Value::Int(10)]);
}

#[test]
fn named_values_shadow_object() {
    let config = SqlParserConfig::for_dialect(Dialect::Standard);
    let template = SqlParser::new(&config).parse_text(SEARCH).unwrap();
    let ctx = EvaluationContext::from_object(&EmpSearch {
        name:     Some("SMITH".to_string()),
        dept_ids: vec![1],
        trace:    false
    })
    .with("name", "JONES");
    let result = template.build(&ctx).unwrap();
    assert!(result.debug_sql.contains("name = 'JONES'"));
}

#[test]
fn paging_wraps_derived_search() {
    let config = SqlParserConfig::for_dialect(Dialect::PostgreSql);
    let template = SqlParser::new(&config).parse_text(SEARCH).unwrap();
    let ctx = EvaluationContext::from_object(&EmpSearch {
        name:     None,
        dept_ids: vec![3],
        trace:    false
    });
    let paged = template
        .build_paginated(&ctx, &PagingOptions::new(40, 20))
        .unwrap();
    assert_eq!(
        squash(&paged.parsed_sql),
        "select * from emp where dept_id in ($1) order by id limit 20 offset 40"
    );
}
