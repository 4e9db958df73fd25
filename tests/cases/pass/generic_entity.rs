// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use twoway_sql::{Entity, FromValue, HasValueKind, ToValue, ValueKind};

#[derive(Entity)]
#[entity(table = "LOOKUP")]
pub struct Lookup<K>
where
    K: ToValue + FromValue + HasValueKind + 'static
{
    #[column(key, name = "CODE")]
    pub code: K,

    #[column(name = "LABEL")]
    pub label: String,
}

fn main() {
    let info = Lookup::<i64>::build_type_info();
    assert_eq!(info.columns[0].value_kind, ValueKind::Long);

    let info = Lookup::<String>::build_type_info();
    assert_eq!(info.columns[0].value_kind, ValueKind::String);
}
