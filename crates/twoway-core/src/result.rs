// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Build output.

use crate::value::{DbType, Value};

/// Direction of a driver parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParameterDirection {
    #[default]
    Input,
    /// Filled by the database, e.g. `RETURNING ... INTO :out`.
    Output
}

/// Driver-neutral parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct DbParameter {
    /// Name as the driver expects it, including the prefix of named styles.
    pub name:      String,
    pub value:     Value,
    pub db_type:   DbType,
    pub direction: ParameterDirection
}

impl DbParameter {
    /// Input parameter whose type follows the value.
    #[must_use]
    pub fn input(name: impl Into<String>, value: Value) -> Self {
        let db_type = DbType::from_kind(value.kind());
        Self {
            name: name.into(),
            value,
            db_type,
            direction: ParameterDirection::Input
        }
    }
}

/// Parameterized SQL, its debug rendering and the ordered parameters.
///
/// The Nth placeholder of `parsed_sql` corresponds to `parameters[N]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SqlParserResult {
    pub parsed_sql: String,
    pub debug_sql:  String,
    pub parameters: Vec<DbParameter>
}

impl SqlParserResult {
    /// Values of the input parameters in placeholder order.
    #[must_use]
    pub fn values(&self) -> Vec<&Value> {
        self.parameters
            .iter()
            .filter(|p| p.direction == ParameterDirection::Input)
            .map(|p| &p.value)
            .collect()
    }
}
