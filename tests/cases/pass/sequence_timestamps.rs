// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use chrono::NaiveDateTime;
use twoway_sql::{CurrentTimestampStrategy, Entity};

#[derive(Entity)]
#[entity(table = "TICKET", rename_all = "SCREAMING_SNAKE_CASE")]
pub struct Ticket {
    #[column(key, sequence(name = "TICKET_ID_SEQ"))]
    pub id: i64,

    #[column(sequence(name = "TICKET_CODE_SEQ", schema = "app", prefix = "T", padding = 6))]
    pub code: String,

    #[column(current_timestamp(strategy = "insert"))]
    pub created_at: Option<NaiveDateTime>,

    #[column(current_timestamp)]
    pub modified_at: Option<NaiveDateTime>,

    #[column(version)]
    pub version: i32,
}

fn main() {
    let info = Ticket::build_type_info();
    assert_eq!(info.sequence_columns.len(), 2);

    let code = info.columns[1].sequence.as_ref().unwrap();
    assert_eq!(code.name, "TICKET_CODE_SEQ");
    assert_eq!(code.schema.as_deref(), Some("app"));
    assert_eq!(code.prefix, "T");
    assert_eq!(code.padding, 6);

    assert_eq!(
        info.columns[2].timestamp_strategy(),
        Some(CurrentTimestampStrategy::Insert)
    );
    assert_eq!(
        info.columns[3].timestamp_strategy(),
        Some(CurrentTimestampStrategy::Always)
    );
    assert_eq!(info.version_column.as_ref().unwrap().column_name, "VERSION");
}
