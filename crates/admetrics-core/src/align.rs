// crates/admetrics-core/src/align.rs

use chrono::{Duration, NaiveDate, NaiveDateTime};
use polars::prelude::*;
use serde::Serialize;

use crate::error::{DateParseError, Result, SchemaError};
use crate::schema::{COL_DATE, MARKETING_MEASURES};

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%m-%d-%Y"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Inclusive [min, max] span of a table's date column, for diagnostic output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

fn unix_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).unwrap()
}

fn date_to_days(date: NaiveDate) -> i32 {
    (date - unix_epoch()).num_days() as i32
}

fn days_to_date(days: i32) -> NaiveDate {
    unix_epoch() + Duration::days(days as i64)
}

fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return Some(date);
        }
    }
    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(datetime.date());
        }
    }
    None
}

/// A null in an already-typed date column is as much a hard stop as an
/// unparseable string; it would otherwise slide through the join key and the
/// row would vanish from the inner join without a trace.
fn ensure_no_null_dates(column: &Column) -> Result<()> {
    if column.null_count() == 0 {
        return Ok(());
    }
    let mask = column.as_materialized_series().is_null();
    let row = (&mask)
        .into_iter()
        .position(|is_null| is_null == Some(true))
        .unwrap_or(0);
    Err(DateParseError {
        value: "<missing>".to_string(),
        row,
    }
    .into())
}

/// Converts the `date` column to the calendar-date type, discarding any
/// time-of-day component.
///
/// An unparseable (or null) value is a hard stop: the returned
/// [`DateParseError`] names the offending raw value and its row index, because
/// everything downstream joins on this column.
pub fn parse_dates(table: &DataFrame) -> Result<DataFrame> {
    let column = table.column(COL_DATE).map_err(|_| SchemaError::MissingColumn {
        column: COL_DATE.to_string(),
    })?;

    match column.dtype() {
        DataType::Date => {
            ensure_no_null_dates(column)?;
            Ok(table.clone())
        }
        DataType::Datetime(_, _) => {
            let casted = column.cast(&DataType::Date)?;
            ensure_no_null_dates(&casted)?;
            let mut out = table.clone();
            out.with_column(casted)?;
            Ok(out)
        }
        DataType::String => {
            let values = column.as_materialized_series().str()?;
            let mut days: Vec<i32> = Vec::with_capacity(table.height());
            for (row, value) in values.into_iter().enumerate() {
                let raw = value.ok_or_else(|| DateParseError {
                    value: "<missing>".to_string(),
                    row,
                })?;
                let date = parse_calendar_date(raw.trim()).ok_or_else(|| DateParseError {
                    value: raw.to_string(),
                    row,
                })?;
                days.push(date_to_days(date));
            }
            let parsed = Series::new(COL_DATE.into(), days).cast(&DataType::Date)?;
            let mut out = table.clone();
            out.with_column(parsed)?;
            Ok(out)
        }
        other => Err(SchemaError::UnsupportedDateType {
            dtype: other.to_string(),
        }
        .into()),
    }
}

/// Sums the four marketing measures per calendar date, one output row per
/// distinct date, ascending. Nulls (the missing sentinel from unification)
/// count as zero here.
pub fn aggregate_daily(marketing: &DataFrame) -> Result<DataFrame> {
    for name in MARKETING_MEASURES {
        if marketing.column(name).is_err() {
            return Err(SchemaError::MissingColumn {
                column: name.to_string(),
            }
            .into());
        }
    }

    let aggs: Vec<Expr> = MARKETING_MEASURES
        .iter()
        .map(|name| {
            col(*name)
                .cast(DataType::Float64)
                .fill_null(lit(0.0))
                .sum()
                .alias(*name)
        })
        .collect();

    let daily = marketing
        .clone()
        .lazy()
        .group_by([col(COL_DATE)])
        .agg(aggs)
        .sort([COL_DATE], SortMultipleOptions::default())
        .collect()?;
    Ok(daily)
}

/// [min, max] of the date column, or `None` for an empty table. The column
/// must already be parsed to the calendar-date type.
pub fn date_range(table: &DataFrame) -> Result<Option<DateRange>> {
    let column = table.column(COL_DATE).map_err(|_| SchemaError::MissingColumn {
        column: COL_DATE.to_string(),
    })?;
    let series = column.as_materialized_series();
    let dates = series.date()?;

    match (dates.min(), dates.max()) {
        (Some(min), Some(max)) => Ok(Some(DateRange {
            start: days_to_date(min),
            end: days_to_date(max),
        })),
        _ => Ok(None),
    }
}
