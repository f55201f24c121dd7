// crates/admetrics-core/src/validation.rs

use polars::prelude::*;

use crate::error::{Result, ValidationError};

/// Rejects negative values in the named numeric columns.
///
/// Opt-in: the pipeline only calls this when the caller enables validation.
/// Columns absent from the table are skipped, since channel tables differ in
/// which optional columns they carry. Nulls pass; they are the missing
/// sentinel, not a measurement.
pub fn ensure_non_negative(table: &DataFrame, columns: &[&str]) -> Result<()> {
    for name in columns {
        let Ok(column) = table.column(name) else {
            continue;
        };
        let casted = column.cast(&DataType::Float64)?;
        let values = casted.f64()?;
        for (row, value) in values.into_iter().enumerate() {
            if let Some(value) = value {
                if value < 0.0 {
                    return Err(ValidationError {
                        column: name.to_string(),
                        row,
                        value,
                    }
                    .into());
                }
            }
        }
    }
    Ok(())
}
