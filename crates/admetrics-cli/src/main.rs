// crates/admetrics-cli/src/main.rs

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use comfy_table::Table;
use polars::prelude::*;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use admetrics_core::align::DateRange;
use admetrics_core::views::{self, HeadlineKpis};
use admetrics_core::{schema, unify, ChannelTable, PipelineOptions};

#[derive(Parser, Debug)]
#[command(author, version, about = "Marketing performance pipeline", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the full pipeline and report the merged daily table
    Merge(MergeArgs),
    /// Summarize spend / revenue / ROAS per channel
    Channels(ChannelsArgs),
    /// Summarize spend / revenue / ROAS per campaign
    Campaigns(CampaignsArgs),
}

#[derive(Args, Debug)]
struct MergeArgs {
    /// Channel CSV as label=path; repeat once per channel
    #[arg(short, long = "channel", value_name = "LABEL=PATH", value_parser = parse_channel_spec, required = true)]
    channels: Vec<(String, PathBuf)>,

    /// Business outcomes CSV
    #[arg(short, long)]
    business: PathBuf,

    /// Where to write the merged table (.csv or .parquet)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Reject negative values in the numeric measure columns
    #[arg(long)]
    validate: bool,

    /// Emit the run report as JSON instead of tables
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct ChannelsArgs {
    #[arg(short, long = "channel", value_name = "LABEL=PATH", value_parser = parse_channel_spec, required = true)]
    channels: Vec<(String, PathBuf)>,
}

#[derive(Args, Debug)]
struct CampaignsArgs {
    #[arg(short, long = "channel", value_name = "LABEL=PATH", value_parser = parse_channel_spec, required = true)]
    channels: Vec<(String, PathBuf)>,

    /// Only campaigns from this channel label
    #[arg(long = "only-channel")]
    only_channel: Option<String>,

    /// Only campaigns targeting this state
    #[arg(long)]
    state: Option<String>,
}

#[derive(Serialize)]
struct MergeReport {
    marketing_dates: Option<DateRange>,
    business_dates: Option<DateRange>,
    merged_rows: usize,
    kpis: HeadlineKpis,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Merge(args) => handle_merge(args),
        Command::Channels(args) => handle_channels(args),
        Command::Campaigns(args) => handle_campaigns(args),
    }
}

fn handle_merge(args: MergeArgs) -> Result<()> {
    if let Some(path) = &args.output {
        // Catch a bad extension before doing any work.
        output_format(path)?;
    }

    let channels = load_channels(&args.channels)?;
    let business = read_csv(&args.business)?;

    let options = PipelineOptions {
        validate: args.validate,
    };
    let output = admetrics_core::run(&channels, &business, &options)?;

    if let Some(range) = &output.marketing_dates {
        info!(start = %range.start, end = %range.end, "marketing date range");
    }
    if let Some(range) = &output.business_dates {
        info!(start = %range.start, end = %range.end, "business date range");
    }
    info!(rows = output.merged.height(), "merged daily table ready");

    let kpis = views::headline_kpis(&output.merged)?;
    let report = MergeReport {
        marketing_dates: output.marketing_dates,
        business_dates: output.business_dates,
        merged_rows: output.merged.height(),
        kpis,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_kpis(&report.kpis);
    }

    if let Some(path) = &args.output {
        write_output(path, &output.merged)?;
        info!(path = %path.display(), "wrote merged table");
    }

    Ok(())
}

fn handle_channels(args: ChannelsArgs) -> Result<()> {
    let marketing = load_marketing(&args.channels)?;
    let summary = views::channel_summary(&marketing)?;
    print_frame(&summary)?;
    Ok(())
}

fn handle_campaigns(args: CampaignsArgs) -> Result<()> {
    let marketing = load_marketing(&args.channels)?;
    let summary = views::campaign_summary(
        &marketing,
        args.only_channel.as_deref(),
        args.state.as_deref(),
    )?;
    print_frame(&summary)?;
    Ok(())
}

fn parse_channel_spec(spec: &str) -> std::result::Result<(String, PathBuf), String> {
    match spec.split_once('=') {
        Some((label, path)) if !label.trim().is_empty() && !path.trim().is_empty() => {
            Ok((label.trim().to_string(), PathBuf::from(path.trim())))
        }
        _ => Err(format!("expected LABEL=PATH, got '{spec}'")),
    }
}

fn load_channels(specs: &[(String, PathBuf)]) -> Result<Vec<ChannelTable>> {
    let mut channels = Vec::with_capacity(specs.len());
    for (label, path) in specs {
        let frame = read_csv(path)?;
        info!(channel = %label, rows = frame.height(), "loaded channel table");
        channels.push(ChannelTable::new(label.clone(), frame));
    }
    Ok(channels)
}

/// Normalized + unified marketing table, as the aggregation views expect it.
fn load_marketing(specs: &[(String, PathBuf)]) -> Result<DataFrame> {
    let channels = load_channels(specs)?;
    let mut normalized = Vec::with_capacity(channels.len());
    for channel in &channels {
        normalized.push(schema::normalize_table(
            &channel.frame,
            Some(channel.label.as_str()),
        )?);
    }
    Ok(unify::unify_channels(&normalized)?)
}

fn read_csv(path: &Path) -> Result<DataFrame> {
    CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .with_context(|| format!("failed to open {}", path.display()))?
        .finish()
        .with_context(|| format!("failed to read {}", path.display()))
}

#[derive(Debug)]
enum OutputFormat {
    Csv,
    Parquet,
}

fn output_format(path: &Path) -> Result<OutputFormat> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("csv") => Ok(OutputFormat::Csv),
        Some("parquet") => Ok(OutputFormat::Parquet),
        _ => bail!(
            "unsupported output extension for {}; use .csv or .parquet",
            path.display()
        ),
    }
}

fn write_output(path: &Path, merged: &DataFrame) -> Result<()> {
    let format = output_format(path)?;
    let mut file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut frame = merged.clone();
    match format {
        OutputFormat::Csv => {
            CsvWriter::new(&mut file)
                .include_header(true)
                .finish(&mut frame)
                .with_context(|| format!("failed to write {}", path.display()))?;
        }
        OutputFormat::Parquet => {
            ParquetWriter::new(&mut file)
                .finish(&mut frame)
                .with_context(|| format!("failed to write {}", path.display()))?;
        }
    }
    Ok(())
}

fn print_kpis(kpis: &HeadlineKpis) {
    let mut table = Table::new();
    table.set_header(["KPI", "Value"]);
    table.add_row(vec!["Total spend".to_string(), format!("{:.2}", kpis.total_spend)]);
    table.add_row(vec!["Total revenue".to_string(), format!("{:.2}", kpis.total_revenue)]);
    table.add_row(vec!["Total orders".to_string(), format!("{:.0}", kpis.total_orders)]);
    table.add_row(vec!["New customers".to_string(), format!("{:.0}", kpis.new_customers)]);
    table.add_row(vec!["Average ROAS".to_string(), format!("{:.2}", kpis.average_roas)]);
    println!("{table}");
}

fn print_frame(frame: &DataFrame) -> Result<()> {
    let mut table = Table::new();
    table.set_header(frame.get_column_names_str());
    for idx in 0..frame.height() {
        let mut row = Vec::with_capacity(frame.width());
        for column in frame.get_columns() {
            let value = column.as_materialized_series().get(idx)?;
            row.push(value.to_string());
        }
        table.add_row(row);
    }
    println!("{table}");
    Ok(())
}
