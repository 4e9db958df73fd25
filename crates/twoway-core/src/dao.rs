// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Caller-facing write wrappers.
//!
//! [`execute`] and [`execute_async`] run one [`QueryBuilderParameter`]
//! against an executor and keep the entity in step with the database.
//!
//! # Order
//!
//! ```text
//! 1. sequence fetch        Insert only, dialects with sequences
//! 2. build                 QueryBuilder::plan
//! 3. run                   execute / query_row / execute + query_scalar
//! 4. read-back             returned columns written into the entity
//! 5. lock check            0 rows + version filter + not suppressed → OptimisticLock;
//!                          identity-only inserts also compare the version snapshot
//! 6. version increment     Update only, unless the read-back already refreshed it
//! ```
//!
//! Both variants follow the same order. A dropped async call leaves the
//! entity as far as the last completed step.


use tracing::{debug, trace};

use crate::{
    entity::Entity,
    error::{Error, Result},
    executor::{AsyncSqlExecutor, Row, SqlExecutor},
    query_builder::{
        FetchMode, QueryBehavior, QueryBuilder, QueryBuilderParameter, QueryPlan, SqlKind
    },
    result::SqlParserResult,
    sequence::{fill_sequences, fill_sequences_async}
};

/// Run the request and return the affected row count.
///
/// For [`SqlKind::Select`] the count is 1 when the row was found and
/// loaded into the entity, 0 otherwise.
///
/// # Errors
///
/// - [`Error::OptimisticLock`] when a version-guarded write affects no rows
/// - build errors from [`QueryBuilder::plan`]
/// - the executor's errors
///
/// # Example
///
/// ```rust,ignore
/// let mut param = QueryBuilderParameter::new(&mut emp, SqlKind::Update, &config);
/// dao::execute(&mut param, &mut connection)?;
/// ```
pub fn execute<E, X>(param: &mut QueryBuilderParameter<'_, E>, executor: &mut X) -> Result<u64>
where
    E: Entity,
    X: SqlExecutor + ?Sized
{
    if param.kind == SqlKind::Insert {
        fill_sequences(param, executor)?;
    }
    let plan = plan(param)?;
    let affected = match &plan.fetch {
        FetchMode::None => executor.execute(&plan.result)?,
        FetchMode::Row => {
            let row = executor.query_row(&plan.result)?;
            apply_row(param, row)?
        }
        FetchMode::Scalar {
            sql,
            column
        } => {
            let affected = executor.execute(&plan.result)?;
            if affected > 0 {
                let value = executor.query_scalar(sql)?;
                param.apply_column(column, value)?;
            }
            affected
        }
    };
    complete(param, &plan.result, affected)
}

/// Non-blocking [`execute`].
///
/// # Errors
///
/// Same as [`execute`].
pub async fn execute_async<E, X>(
    param: &mut QueryBuilderParameter<'_, E>,
    executor: &mut X
) -> Result<u64>
where
    E: Entity,
    X: AsyncSqlExecutor + ?Sized
{
    if param.kind == SqlKind::Insert {
        fill_sequences_async(param, executor).await?;
    }
    let plan = plan(param)?;
    let affected = match &plan.fetch {
        FetchMode::None => executor.execute(&plan.result).await?,
        FetchMode::Row => {
            let row = executor.query_row(&plan.result).await?;
            apply_row(param, row)?
        }
        FetchMode::Scalar {
            sql,
            column
        } => {
            let affected = executor.execute(&plan.result).await?;
            if affected > 0 {
                let value = executor.query_scalar(sql).await?;
                param.apply_column(column, value)?;
            }
            affected
        }
    };
    complete(param, &plan.result, affected)
}

fn plan<E: Entity>(param: &QueryBuilderParameter<'_, E>) -> Result<QueryPlan> {
    let plan = QueryBuilder::plan(param)?;
    trace!(
        kind = ?param.kind,
        parsed_sql = %plan.result.parsed_sql,
        debug_sql = %plan.result.debug_sql,
        "entity statement built"
    );
    Ok(plan)
}

/// Write a returned row into the entity. Output parameters come back as
/// `out_<property>` and are matched on the property name.
fn apply_row<E>(param: &mut QueryBuilderParameter<'_, E>, row: Option<Row>) -> Result<u64> {
    let Some(row) = row else {
        return Ok(0);
    };
    for (name, value) in row {
        let known = param.info().column_by_name(&name).is_some();
        let target = match name.strip_prefix("out_") {
            Some(property) if !known => property,
            _ => name.as_str()
        };
        param.apply_column(target, value)?;
    }
    Ok(1)
}

fn complete<E>(
    param: &mut QueryBuilderParameter<'_, E>,
    result: &SqlParserResult,
    affected: u64
) -> Result<u64> {
    if affected == 0 {
        debug!(kind = ?param.kind, table = %param.info().table_name, "statement affected no rows");
        if param.is_version_guarded() && !param.suppress_optimistic_lock_exception {
            return Err(lock_failure(result));
        }
        return Ok(0);
    }
    // Only the identity comes back, so the version should never differ here.
    if param.kind == SqlKind::Insert
        && param.behavior == QueryBehavior::IdentityOnly
        && !param.suppress_optimistic_lock_exception
        && !param.is_same_version()
    {
        return Err(lock_failure(result));
    }
    if param.kind == SqlKind::Update && !param.ignore_version && param.is_same_version() {
        param.increment_version()?;
    }
    param.save_expected_version();
    Ok(affected)
}

fn lock_failure(result: &SqlParserResult) -> Error {
    Error::OptimisticLock {
        parsed_sql: result.parsed_sql.clone(),
        debug_sql:  result.debug_sql.clone(),
        file_path:  None
    }
}
