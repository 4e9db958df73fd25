// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use chrono::{DateTime, Utc};
use twoway_sql::{Entity, ValueKind};
use uuid::Uuid;

#[derive(Entity)]
#[entity(table = "users", schema = "core", rename_all = "snake_case")]
pub struct User {
    #[column(key)]
    pub id: Uuid,

    #[column(max_length = 100)]
    pub display_name: String,

    pub email: Option<String>,

    #[column(not_mapped)]
    pub password_hash: String,

    pub created_at: DateTime<Utc>,
}

fn main() {
    let info = User::build_type_info();
    assert_eq!(info.table_name, "users");
    assert_eq!(info.schema_name.as_deref(), Some("core"));
    assert_eq!(info.columns.len(), 4);
    assert_eq!(info.key_columns.len(), 1);

    let name = &info.columns[1];
    assert_eq!(name.column_name, "display_name");
    assert_eq!(name.value_kind, ValueKind::String);
    assert_eq!(name.max_length, Some(100));
    assert!(!name.nullable);

    assert!(info.columns[2].nullable);
    assert_eq!(info.columns[3].value_kind, ValueKind::DateTimeOffset);
}
