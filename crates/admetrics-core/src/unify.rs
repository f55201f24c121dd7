// crates/admetrics-core/src/unify.rs

use polars::prelude::*;

use crate::error::{Result, SchemaError};
use crate::schema::COL_DATE;

/// Concatenates normalized channel tables into one marketing table.
///
/// Row order within each channel and the channel order as given are both
/// preserved. The result columns are the union of all input columns; a column
/// absent from a given channel's table is null for that channel's rows (the
/// missing sentinel, deliberately not zero). Every input must carry a `date`
/// column after normalization.
pub fn unify_channels(tables: &[DataFrame]) -> Result<DataFrame> {
    if tables.is_empty() {
        return Err(SchemaError::NoChannels.into());
    }

    for table in tables {
        if table.column(COL_DATE).is_err() {
            return Err(SchemaError::MissingColumn {
                column: COL_DATE.to_string(),
            }
            .into());
        }
    }

    let lazyframes: Vec<LazyFrame> = tables.iter().map(|df| df.clone().lazy()).collect();
    let args = UnionArgs {
        diagonal: true,
        ..Default::default()
    };
    let unified = concat(&lazyframes, args)?.collect()?;
    Ok(unified)
}
