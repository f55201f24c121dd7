// crates/admetrics-core/src/join.rs

use polars::prelude::*;

use crate::error::{Result, SchemaError};
use crate::schema::COL_DATE;

/// Inner-joins the daily marketing aggregate with the business table on exact
/// date equality.
///
/// A date present on only one side produces no output row: partial days are
/// excluded rather than null-padded, since ratio metrics over a partial day
/// would be misleading. The two schemas must be disjoint apart from `date`;
/// any other shared column is a schema error rather than a silent suffix
/// rename.
pub fn join_daily(daily: &DataFrame, business: &DataFrame) -> Result<DataFrame> {
    for table in [daily, business] {
        if table.column(COL_DATE).is_err() {
            return Err(SchemaError::MissingColumn {
                column: COL_DATE.to_string(),
            }
            .into());
        }
    }

    let left_columns = daily.get_column_names_str();
    for name in business.get_column_names_str() {
        if name != COL_DATE && left_columns.contains(&name) {
            return Err(SchemaError::JoinCollision {
                column: name.to_string(),
            }
            .into());
        }
    }

    let merged = daily
        .clone()
        .lazy()
        .join(
            business.clone().lazy(),
            [col(COL_DATE)],
            [col(COL_DATE)],
            JoinArgs::new(JoinType::Inner),
        )
        .collect()?;
    Ok(merged)
}
