// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use twoway_sql::{DbType, Entity, Value, ValueConverter};

fn flag_to_db(value: &Value) -> Value {
    match value {
        Value::Bool(true) => Value::String("Y".to_string()),
        Value::Bool(false) => Value::String("N".to_string()),
        other => other.clone()
    }
}

fn flag_from_db(value: Value) -> twoway_sql::Result<Value> {
    Ok(match value {
        Value::String(s) => Value::Bool(s == "Y"),
        other => other
    })
}

pub const YES_NO: ValueConverter = ValueConverter {
    to_db:   flag_to_db,
    from_db: flag_from_db
};

#[derive(Entity)]
#[entity(table = "FLAGS")]
pub struct Flag {
    #[column(key, name = "FLAG_ID")]
    pub id: i32,

    #[column(name = "ACTIVE", db_type = "AnsiString", converter = "crate::YES_NO")]
    pub active: bool,

    #[column(name = "NOTE", nullable)]
    pub note: String,
}

fn main() {
    let info = Flag::build_type_info();
    let active = &info.columns[1];
    assert_eq!(active.db_type, DbType::AnsiString);
    assert!(info.columns[2].nullable);

    let flag = Flag {
        id:     1,
        active: true,
        note:   String::new()
    };
    assert_eq!(
        info.value_of(&flag, active),
        Value::String("Y".to_string())
    );
}
