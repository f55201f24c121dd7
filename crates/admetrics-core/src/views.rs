// crates/admetrics-core/src/views.rs

use polars::prelude::*;
use serde::Serialize;

use crate::error::{Result, SchemaError};
use crate::metrics::safe_div;
use crate::schema::{
    COL_ATTRIBUTED_REVENUE, COL_CAMPAIGN, COL_CHANNEL, COL_NEW_CUSTOMERS, COL_ORDERS, COL_SPEND,
    COL_STATE, COL_TOTAL_REVENUE, METRIC_ROAS,
};

/// Headline totals over the merged table, for KPI strips and summary reports.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeadlineKpis {
    pub total_spend: f64,
    pub total_revenue: f64,
    pub total_orders: f64,
    pub new_customers: f64,
    pub average_roas: f64,
}

fn ensure_column(table: &DataFrame, name: &str) -> Result<()> {
    if table.column(name).is_err() {
        return Err(SchemaError::MissingColumn {
            column: name.to_string(),
        }
        .into());
    }
    Ok(())
}

fn summarize(marketing: &DataFrame, key: &str, filters: &[(&str, &str)]) -> Result<DataFrame> {
    ensure_column(marketing, key)?;
    ensure_column(marketing, COL_SPEND)?;
    ensure_column(marketing, COL_ATTRIBUTED_REVENUE)?;
    for (column, _) in filters {
        ensure_column(marketing, column)?;
    }

    let mut lf = marketing.clone().lazy();
    for (column, value) in filters {
        lf = lf.filter(col(*column).eq(lit(*value)));
    }

    let grouped = lf
        .group_by([col(key)])
        .agg([
            col(COL_SPEND)
                .cast(DataType::Float64)
                .fill_null(lit(0.0))
                .sum()
                .alias(COL_SPEND),
            col(COL_ATTRIBUTED_REVENUE)
                .cast(DataType::Float64)
                .fill_null(lit(0.0))
                .sum()
                .alias(COL_ATTRIBUTED_REVENUE),
        ])
        .sort([key], SortMultipleOptions::default())
        .collect()?;

    let spend = grouped.column(COL_SPEND)?.f64()?;
    let revenue = grouped.column(COL_ATTRIBUTED_REVENUE)?.f64()?;
    let roas: Vec<f64> = (0..grouped.height())
        .map(|idx| safe_div(revenue.get(idx), spend.get(idx)))
        .collect();

    let mut summary = grouped.clone();
    summary.hstack_mut(&[Series::new(METRIC_ROAS.into(), roas).into()])?;
    Ok(summary)
}

/// Groups the unified marketing table by `key`, summing spend and attributed
/// revenue and deriving per-group ROAS under the safe-division policy
/// (zero-spend groups read as `roas = 0`, not an error). Output is sorted by
/// the group key. Stateless; every call recomputes from scratch.
pub fn summarize_by(marketing: &DataFrame, key: &str) -> Result<DataFrame> {
    summarize(marketing, key, &[])
}

/// Per-channel spend / attributed revenue / ROAS summary.
pub fn channel_summary(marketing: &DataFrame) -> Result<DataFrame> {
    summarize(marketing, COL_CHANNEL, &[])
}

/// Per-campaign summary, optionally restricted to one channel and/or state.
pub fn campaign_summary(
    marketing: &DataFrame,
    channel: Option<&str>,
    state: Option<&str>,
) -> Result<DataFrame> {
    let mut filters: Vec<(&str, &str)> = Vec::new();
    if let Some(value) = channel {
        filters.push((COL_CHANNEL, value));
    }
    if let Some(value) = state {
        filters.push((COL_STATE, value));
    }
    summarize(marketing, COL_CAMPAIGN, &filters)
}

fn column_sum(table: &DataFrame, name: &str) -> Result<f64> {
    ensure_column(table, name)?;
    let casted = table.column(name)?.cast(&DataType::Float64)?;
    Ok(casted.f64()?.sum().unwrap_or(0.0))
}

/// Totals and average ROAS over the merged, metric-annotated table.
pub fn headline_kpis(merged: &DataFrame) -> Result<HeadlineKpis> {
    ensure_column(merged, METRIC_ROAS)?;
    let roas = merged.column(METRIC_ROAS)?.cast(&DataType::Float64)?;
    let average_roas = roas.f64()?.mean().unwrap_or(0.0);

    Ok(HeadlineKpis {
        total_spend: column_sum(merged, COL_SPEND)?,
        total_revenue: column_sum(merged, COL_TOTAL_REVENUE)?,
        total_orders: column_sum(merged, COL_ORDERS)?,
        new_customers: column_sum(merged, COL_NEW_CUSTOMERS)?,
        average_roas,
    })
}
