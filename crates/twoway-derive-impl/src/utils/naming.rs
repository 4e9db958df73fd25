// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! `rename_all` rules.
//!
//! | Rule | `dept_id` | `EmpDetail` |
//! |------|-----------|-------------|
//! | `snake_case` | `dept_id` | `emp_detail` |
//! | `SCREAMING_SNAKE_CASE` | `DEPT_ID` | `EMP_DETAIL` |
//! | `camelCase` | `deptId` | `empDetail` |
//! | `PascalCase` | `DeptId` | `EmpDetail` |
//! | `lowercase` | `dept_id` | `empdetail` |
//! | `UPPERCASE` | `DEPT_ID` | `EMPDETAIL` |

use convert_case::{Case, Casing};
use darling::FromMeta;

/// Naming rule applied to field and struct names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenameRule {
    /// Names are used as written.
    #[default]
    None,
    Snake,
    ScreamingSnake,
    Camel,
    Pascal,
    Lower,
    Upper
}

impl RenameRule {
    /// Parse a rule name.
    ///
    /// Returns `None` for unrecognized names.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "snake_case" => Some(Self::Snake),
            "SCREAMING_SNAKE_CASE" => Some(Self::ScreamingSnake),
            "camelCase" => Some(Self::Camel),
            "PascalCase" => Some(Self::Pascal),
            "lowercase" => Some(Self::Lower),
            "UPPERCASE" => Some(Self::Upper),
            _ => None
        }
    }

    #[must_use]
    pub fn apply(&self, name: &str) -> String {
        match self {
            Self::None => name.to_string(),
            Self::Snake => name.to_case(Case::Snake),
            Self::ScreamingSnake => name.to_case(Case::Snake).to_uppercase(),
            Self::Camel => name.to_case(Case::Camel),
            Self::Pascal => name.to_case(Case::Pascal),
            Self::Lower => name.to_lowercase(),
            Self::Upper => name.to_uppercase()
        }
    }
}

impl FromMeta for RenameRule {
    fn from_string(value: &str) -> darling::Result<Self> {
        Self::from_name(value).ok_or_else(|| {
            darling::Error::unknown_value(value).add_sibling_alts_for_unknown_field(
                &[
                    "snake_case",
                    "SCREAMING_SNAKE_CASE",
                    "camelCase",
                    "PascalCase",
                    "lowercase",
                    "UPPERCASE"
                ][..]
            )
        })
    }
}
