// crates/admetrics-core/src/schema.rs

use std::collections::HashMap;

use polars::prelude::*;

use crate::error::{Result, SchemaError};

pub const COL_DATE: &str = "date";
pub const COL_CHANNEL: &str = "channel";
pub const COL_CAMPAIGN: &str = "campaign";
pub const COL_STATE: &str = "state";

pub const COL_IMPRESSIONS: &str = "impressions";
pub const COL_CLICKS: &str = "clicks";
pub const COL_SPEND: &str = "spend";
pub const COL_ATTRIBUTED_REVENUE: &str = "attributed_revenue";

pub const COL_TOTAL_REVENUE: &str = "total_revenue";
pub const COL_GROSS_PROFIT: &str = "gross_profit";
pub const COL_ORDERS: &str = "#_of_orders";
pub const COL_NEW_CUSTOMERS: &str = "new_customers";

pub const METRIC_CTR: &str = "ctr";
pub const METRIC_CPC: &str = "cpc";
pub const METRIC_ROAS: &str = "roas";
pub const METRIC_GROSS_MARGIN_PCT: &str = "gross_margin_pct";
pub const METRIC_SPEND_PER_ORDER: &str = "spend_per_order";
pub const METRIC_CAC: &str = "customer_acquisition_cost";

/// Marketing measures summed per day by the temporal aligner.
pub const MARKETING_MEASURES: &[&str] = &[
    COL_IMPRESSIONS,
    COL_CLICKS,
    COL_SPEND,
    COL_ATTRIBUTED_REVENUE,
];

/// Business measures carried through the date join untouched.
pub const BUSINESS_MEASURES: &[&str] = &[
    COL_TOTAL_REVENUE,
    COL_GROSS_PROFIT,
    COL_ORDERS,
    COL_NEW_CUSTOMERS,
];

/// The six derived columns appended by the metrics calculator.
pub const DERIVED_METRICS: &[&str] = &[
    METRIC_CTR,
    METRIC_CPC,
    METRIC_ROAS,
    METRIC_GROSS_MARGIN_PCT,
    METRIC_SPEND_PER_ORDER,
    METRIC_CAC,
];

/// Canonical form of a raw column identifier: trimmed, lower-cased, interior
/// whitespace replaced with underscores.
pub fn canonical_name(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect()
}

/// Canonicalizes every column name of `table` and, for channel tables, injects
/// a uniform `channel` column carrying `channel_label`.
///
/// Fails if the table has zero columns, if two distinct raw columns collapse to
/// the same canonical name, or if a channel table already carries a `channel`
/// column (the label is assigned here, never read from the data). No type
/// coercion happens at this stage.
pub fn normalize_table(table: &DataFrame, channel_label: Option<&str>) -> Result<DataFrame> {
    if table.width() == 0 {
        return Err(SchemaError::EmptyTable.into());
    }

    let mut seen: HashMap<String, String> = HashMap::new();
    let mut names: Vec<String> = Vec::with_capacity(table.width());
    for raw in table.get_column_names_str() {
        let canonical = canonical_name(raw);
        if let Some(first) = seen.get(&canonical) {
            return Err(SchemaError::DuplicateColumn {
                first: first.clone(),
                second: raw.to_string(),
                canonical,
            }
            .into());
        }
        seen.insert(canonical.clone(), raw.to_string());
        names.push(canonical);
    }

    let mut normalized = table.clone();
    normalized.set_column_names(names)?;

    if let Some(label) = channel_label {
        if normalized.column(COL_CHANNEL).is_ok() {
            return Err(SchemaError::ReservedColumn {
                column: COL_CHANNEL.to_string(),
            }
            .into());
        }
        normalized.with_column(Series::new(
            COL_CHANNEL.into(),
            vec![label; normalized.height()],
        ))?;
    }

    Ok(normalized)
}
