// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use super::*;

fn root(sql: &str) -> Vec<SqlNode> {
    match parse(sql).unwrap() {
        SqlNode::Anonymous(children) => children,
        other => panic!("unexpected root {other:?}")
    }
}

fn select(sql: &str) -> SelectStatementNode {
    root(sql)
        .into_iter()
        .find_map(|n| match n {
            SqlNode::SelectStatement(s) => Some(*s),
            _ => None
        })
        .expect("select statement")
}

fn error_code(sql: &str) -> Option<MessageCode> {
    parse(sql).err().and_then(|e| e.code())
}

#[test]
fn select_clauses_fill_slots() {
    let stmt = select("select * from emp where id = 1 order by id");
    assert!(stmt.select.is_some());
    assert!(stmt.from.is_some());
    assert!(stmt.where_.is_some());
    assert!(stmt.order_by.is_some());
    assert!(stmt.group_by.is_none());
    assert!(!stmt.transformed);
    assert_eq!(stmt.order_by.unwrap().word, "order by");
}

#[test]
fn bind_variable_consumes_test_value() {
    let stmt = select("select * from emp where id = /*id*/1");
    let where_ = stmt.where_.unwrap();
    let var = where_
        .children
        .iter()
        .find_map(|n| match n {
            SqlNode::BindVariable(v) => Some(v.clone()),
            _ => None
        })
        .unwrap();
    assert_eq!(var.expression, "id");
    assert_eq!(var.test_value.as_deref(), Some("1"));
    assert!(var.parens.is_none());
}

#[test]
fn bind_variable_with_parens() {
    let stmt = select("select * from emp where id in /*ids*/(1, 2)");
    let var = stmt
        .where_
        .unwrap()
        .children
        .into_iter()
        .find_map(|n| match n {
            SqlNode::BindVariable(v) => Some(v),
            _ => None
        })
        .unwrap();
    assert_eq!(var.expression, "ids");
    assert!(var.parens.is_some());
}

#[test]
fn logical_operators_group_operands() {
    let stmt = select("select * from emp where a = 1 and b = 2 or c = 3");
    let ops: Vec<String> = stmt
        .where_
        .unwrap()
        .children
        .iter()
        .filter_map(|n| match n {
            SqlNode::LogicalOperator(op) => Some(op.word.clone()),
            _ => None
        })
        .collect();
    assert_eq!(ops, vec!["and".to_string(), "or".to_string()]);
}

#[test]
fn standalone_update_clauses() {
    let nodes = root("update emp set a = 1 where id = 2");
    let kinds: Vec<ClauseKind> = nodes
        .iter()
        .filter_map(|n| match n {
            SqlNode::Clause(c) => Some(c.kind),
            _ => None
        })
        .collect();
    assert_eq!(kinds, vec![ClauseKind::Update, ClauseKind::Set, ClauseKind::Where]);
}

#[test]
fn subquery_inside_parens() {
    let stmt = select("select * from (select id from emp) e where e.id = 1");
    let from = stmt.from.unwrap();
    let nested = from.children.iter().any(|n| match n {
        SqlNode::Parens(p) => p
            .children
            .iter()
            .any(|c| matches!(c, SqlNode::SelectStatement(_))),
        _ => false
    });
    assert!(nested);
    assert!(stmt.where_.is_some());
}

#[test]
fn union_closes_statement() {
    let nodes = root("select a from x union select a from y");
    let count = nodes
        .iter()
        .filter(|n| matches!(n, SqlNode::SelectStatement(_)))
        .count();
    assert_eq!(count, 2);
}

#[test]
fn if_block_with_branches() {
    let stmt = select(
        "select * from emp where /*%if a*/x = 1/*%elseif b*/y = 2/*%else*/z = 3/*%end*/"
    );
    let block = stmt
        .where_
        .unwrap()
        .children
        .into_iter()
        .find_map(|n| match n {
            SqlNode::IfBlock(b) => Some(b),
            _ => None
        })
        .unwrap();
    assert_eq!(block.if_node.expression, "a");
    assert_eq!(block.elseifs.len(), 1);
    assert_eq!(block.elseifs[0].expression, "b");
    assert!(block.else_node.is_some());
    assert_eq!(block.end.text, "/*%end*/");
}

#[test]
fn for_block_header() {
    let nodes = root("/*%for name : names*/x/*%end*/");
    let SqlNode::ForBlock(block) = &nodes[0] else {
        panic!("expected for block");
    };
    assert_eq!(block.for_node.identifier, "name");
    assert_eq!(block.for_node.expression, "names");
}

#[test]
fn expand_and_populate() {
    let stmt = select("select /*%expand e*/* from emp e");
    let has_expand = stmt.select.unwrap().children.iter().any(|n| {
        matches!(n, SqlNode::Expand(ExpandNode { alias, .. }) if alias == "e")
    });
    assert!(has_expand);

    let nodes = root("update emp set /*%populate*/ id = id where id = 1");
    let set = nodes
        .iter()
        .find_map(|n| match n {
            SqlNode::Clause(c) if c.kind == ClauseKind::Set => Some(c),
            _ => None
        })
        .unwrap();
    assert!(set.children.iter().any(|n| matches!(n, SqlNode::Populate(_))));
}

#[test]
fn stray_closing_parens_is_text() {
    let nodes = root("a )");
    assert_eq!(nodes.last(), Some(&SqlNode::Fragment(")".into())));
}

#[test]
fn error_codes() {
    assert_eq!(error_code("/*%if */x/*%end*/"), Some(MessageCode::Esp2105));
    assert_eq!(error_code("/*%if a*/x"), Some(MessageCode::Esp2104));
    assert_eq!(error_code("(a"), Some(MessageCode::Esp2109));
    assert_eq!(error_code("id = /*id*/"), Some(MessageCode::Esp2110));
    assert_eq!(error_code("id = /* */1"), None);
    assert_eq!(error_code("id = /*$ */1"), Some(MessageCode::Esp2228));
    assert_eq!(error_code("/*# */"), Some(MessageCode::Esp2121));
    assert_eq!(error_code("/*%for x*/a/*%end*/"), Some(MessageCode::Esp2124));
    assert_eq!(error_code("/*%for x : xs*/a"), Some(MessageCode::Esp2133));
    assert_eq!(error_code("a /*%end*/"), Some(MessageCode::Esp2134));
    assert_eq!(error_code("/*%if a*/(x/*%end*/)"), Some(MessageCode::Esp2135));
    assert_eq!(error_code("(/*%if a*/x)/*%end*/"), Some(MessageCode::Esp2135));
    assert_eq!(error_code("/*%elseif a*/"), Some(MessageCode::Esp2138));
    assert_eq!(
        error_code("/*%if a*/x/*%else*/y/*%elseif b*/z/*%end*/"),
        Some(MessageCode::Esp2139)
    );
    assert_eq!(error_code("/*%else*/"), Some(MessageCode::Esp2140));
    assert_eq!(
        error_code("/*%if a*/x/*%else*/y/*%else*/z/*%end*/"),
        Some(MessageCode::Esp2141)
    );
    assert_eq!(error_code("select /*%expand*/ a"), Some(MessageCode::Esp2143));
}

#[test]
fn error_carries_position() {
    let err = parse("select\n  /*%end*/").unwrap_err();
    match err {
        Error::SqlParse {
            line,
            column,
            ..
        } => assert_eq!((line, column), (2, 3)),
        other => panic!("unexpected {other:?}")
    }
}
