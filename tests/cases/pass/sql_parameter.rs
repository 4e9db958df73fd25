// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use twoway_sql::{SqlParameter, ToValue, Value};

#[derive(SqlParameter)]
#[parameter(rename_all = "camelCase")]
pub struct EmpSearch {
    pub dept_id: i32,

    #[parameter(rename = "names")]
    pub name_list: Vec<String>,

    #[parameter(skip)]
    pub page_hint: u8,
}

fn main() {
    let search = EmpSearch {
        dept_id:   10,
        name_list: vec!["SMITH".to_string()],
        page_hint: 0
    };
    let Value::Object(properties) = search.to_value() else {
        panic!("expected an object");
    };
    assert_eq!(properties.len(), 2);
    assert_eq!(properties.get("deptId"), Some(&Value::Int(10)));
    assert!(properties.contains_key("names"));
}
