// crates/admetrics-core/src/pipeline.rs

use polars::prelude::DataFrame;

use crate::align::{self, DateRange};
use crate::error::Result;
use crate::schema::{self, BUSINESS_MEASURES, MARKETING_MEASURES};
use crate::{join, metrics, unify, validation};

/// One channel's raw table plus the label to stamp on its rows.
#[derive(Debug, Clone)]
pub struct ChannelTable {
    pub label: String,
    pub frame: DataFrame,
}

impl ChannelTable {
    pub fn new(label: impl Into<String>, frame: DataFrame) -> Self {
        Self {
            label: label.into(),
            frame,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    /// Reject negative values in the numeric measure columns.
    pub validate: bool,
}

#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Unified, date-parsed marketing table; input to the aggregation views.
    pub marketing: DataFrame,
    /// One row per date present in both sources, with the six derived metrics.
    pub merged: DataFrame,
    pub marketing_dates: Option<DateRange>,
    pub business_dates: Option<DateRange>,
}

/// Runs the full batch: normalize -> unify -> align -> join -> metrics.
///
/// Pure and synchronous. Inputs are never mutated; a second run over the same
/// snapshot produces an identical output, so callers may re-invoke freely
/// (e.g. per filter change) without incremental-update bookkeeping. Dates
/// present in only one source are dropped by the inner join; that loss is the
/// contract, not an accident.
pub fn run(
    channels: &[ChannelTable],
    business: &DataFrame,
    options: &PipelineOptions,
) -> Result<PipelineOutput> {
    let mut normalized = Vec::with_capacity(channels.len());
    for channel in channels {
        normalized.push(schema::normalize_table(
            &channel.frame,
            Some(channel.label.as_str()),
        )?);
    }
    let business = schema::normalize_table(business, None)?;

    let marketing = unify::unify_channels(&normalized)?;
    let marketing = align::parse_dates(&marketing)?;
    let business = align::parse_dates(&business)?;

    if options.validate {
        validation::ensure_non_negative(&marketing, MARKETING_MEASURES)?;
        validation::ensure_non_negative(&business, BUSINESS_MEASURES)?;
    }

    let marketing_dates = align::date_range(&marketing)?;
    let business_dates = align::date_range(&business)?;

    let daily = align::aggregate_daily(&marketing)?;
    let merged = join::join_daily(&daily, &business)?;
    let merged = metrics::derive_metrics(&merged)?;

    Ok(PipelineOutput {
        marketing,
        merged,
        marketing_dates,
        business_dates,
    })
}
