// crates/admetrics-core/src/metrics.rs

use polars::prelude::*;

use crate::error::{Result, SchemaError};
use crate::schema::{
    COL_ATTRIBUTED_REVENUE, COL_CLICKS, COL_DATE, COL_GROSS_PROFIT, COL_IMPRESSIONS,
    COL_NEW_CUSTOMERS, COL_ORDERS, COL_SPEND, COL_TOTAL_REVENUE, METRIC_CAC, METRIC_CPC,
    METRIC_CTR, METRIC_GROSS_MARGIN_PCT, METRIC_ROAS, METRIC_SPEND_PER_ORDER,
};

/// Division under the pipeline's safe-division policy.
///
/// A zero denominator, a missing operand, or a non-finite quotient all yield
/// the documented substitute value `0.0` instead of infinity or NaN. This
/// conflates "no activity" with "zero performance" on purpose; callers must
/// not read more into a zero than that.
pub fn safe_div(numerator: Option<f64>, denominator: Option<f64>) -> f64 {
    match (numerator, denominator) {
        (Some(n), Some(d)) if d != 0.0 => {
            let quotient = n / d;
            if quotient.is_finite() {
                quotient
            } else {
                0.0
            }
        }
        _ => 0.0,
    }
}

fn measure(table: &DataFrame, name: &str) -> Result<Float64Chunked> {
    let column = table.column(name).map_err(|_| SchemaError::MissingColumn {
        column: name.to_string(),
    })?;
    Ok(column.cast(&DataType::Float64)?.f64()?.clone())
}

/// Appends the six derived ratio metrics to the merged table and returns it
/// sorted ascending by date (stable, so ties keep their join order).
///
/// The zero substitution applies only to the six derived columns; the raw
/// joined columns pass through untouched.
pub fn derive_metrics(merged: &DataFrame) -> Result<DataFrame> {
    let len = merged.height();

    let impressions = measure(merged, COL_IMPRESSIONS)?;
    let clicks = measure(merged, COL_CLICKS)?;
    let spend = measure(merged, COL_SPEND)?;
    let attributed_revenue = measure(merged, COL_ATTRIBUTED_REVENUE)?;
    let total_revenue = measure(merged, COL_TOTAL_REVENUE)?;
    let gross_profit = measure(merged, COL_GROSS_PROFIT)?;
    let orders = measure(merged, COL_ORDERS)?;
    let new_customers = measure(merged, COL_NEW_CUSTOMERS)?;

    let mut ctr: Vec<f64> = Vec::with_capacity(len);
    let mut cpc: Vec<f64> = Vec::with_capacity(len);
    let mut roas: Vec<f64> = Vec::with_capacity(len);
    let mut gross_margin_pct: Vec<f64> = Vec::with_capacity(len);
    let mut spend_per_order: Vec<f64> = Vec::with_capacity(len);
    let mut cac: Vec<f64> = Vec::with_capacity(len);

    for idx in 0..len {
        ctr.push(safe_div(clicks.get(idx), impressions.get(idx)));
        cpc.push(safe_div(spend.get(idx), clicks.get(idx)));
        roas.push(safe_div(attributed_revenue.get(idx), spend.get(idx)));
        gross_margin_pct.push(safe_div(gross_profit.get(idx), total_revenue.get(idx)) * 100.0);
        spend_per_order.push(safe_div(spend.get(idx), orders.get(idx)));
        cac.push(safe_div(spend.get(idx), new_customers.get(idx)));
    }

    let mut output = merged.clone();
    output.hstack_mut(&[
        Series::new(METRIC_CTR.into(), ctr).into(),
        Series::new(METRIC_CPC.into(), cpc).into(),
        Series::new(METRIC_ROAS.into(), roas).into(),
        Series::new(METRIC_GROSS_MARGIN_PCT.into(), gross_margin_pct).into(),
        Series::new(METRIC_SPEND_PER_ORDER.into(), spend_per_order).into(),
        Series::new(METRIC_CAC.into(), cac).into(),
    ])?;

    let sorted = output.sort(
        [COL_DATE],
        SortMultipleOptions::default().with_maintain_order(true),
    )?;
    Ok(sorted)
}
