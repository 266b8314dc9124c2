//! meterstat - reconcile utility interval CSV exports into gap-free kWh reports

use clap::Parser;
use meterstat::{
    aggregation::{Aggregator, Totals},
    cli::{Cli, Command, ReportArgs, parse_date_filter},
    data_loader::ExportLoader,
    error::Result,
    filters::RangeFilter,
    merge,
    output::get_formatter,
    rolling::rolling_average,
    store::{JsonlRecordStore, RecordStore, TimeSeriesStore},
    timezone::{Calendar, ZoneCalendar},
    types::Granularity,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging. The --quiet flag should override RUST_LOG.
    let filter = if cli.quiet {
        tracing_subscriber::EnvFilter::new("warn")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("meterstat=info"))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let store = JsonlRecordStore::new(
        cli.store
            .clone()
            .unwrap_or_else(JsonlRecordStore::default_path),
    );
    let zone_calendar = ZoneCalendar::default();
    info!("resolving timestamps in {}", zone_calendar.tz());
    let calendar: Arc<dyn Calendar> = Arc::new(zone_calendar);

    match cli.command {
        Some(Command::Ingest { inputs }) => run_ingest(&store, calendar, inputs).await,
        Some(Command::Report(args)) => run_report(&store, calendar, &args, cli.json).await,
        Some(Command::Clear) => {
            store.clear().await?;
            info!("cleared persisted series at {}", store.path().display());
            Ok(())
        }
        None => {
            // Default to a daily report over the full range.
            run_report(&store, calendar, &ReportArgs::default(), cli.json).await
        }
    }
}

/// Parse the given exports and merge them over the persisted series.
///
/// The persisted series is merged first so the new exports, in file-name
/// order, win every collision. Any failure leaves the store untouched.
async fn run_ingest(
    store: &JsonlRecordStore,
    calendar: Arc<dyn Calendar>,
    inputs: Vec<PathBuf>,
) -> Result<()> {
    let loader = if inputs.len() == 1 && inputs[0].is_dir() {
        ExportLoader::from_dir(&inputs[0])?
    } else {
        ExportLoader::from_files(inputs)
    };

    let new_series = loader.load(calendar.as_ref()).await?;
    let existing = store.get_all().await?;

    let mut series_list = Vec::with_capacity(new_series.len() + 1);
    series_list.push(existing);
    series_list.extend(new_series);

    let merged = merge::merge(series_list);
    info!(
        "persisting {} reconciled records to {}",
        merged.len(),
        store.path().display()
    );
    store.put_all(&merged).await
}

async fn run_report(
    store: &JsonlRecordStore,
    calendar: Arc<dyn Calendar>,
    args: &ReportArgs,
    json: bool,
) -> Result<()> {
    let merged = store.get_all().await?;
    let aggregator = Aggregator::new(calendar);
    let series_store = TimeSeriesStore::rebuild(merged, &aggregator);
    if series_store.is_empty() {
        info!("persisted series is empty; run `meterstat ingest` first");
    }

    // Explicit bounds narrow the selected range; either side defaults to the
    // span of civil dates present.
    let since = args.since.as_deref().map(parse_date_filter).transpose()?;
    let until = args.until.as_deref().map(parse_date_filter).transpose()?;
    let selected = match series_store.selected_range {
        Some((first, last)) => Some((since.unwrap_or(first), until.unwrap_or(last))),
        None => since.zip(until),
    };
    let series_store = series_store.with_selected_range(selected);

    let mut range = RangeFilter::new();
    if let Some((start, end)) = series_store.selected_range {
        range = range.with_since(start).with_until(end);
    }

    let formatter = get_formatter(json);
    let calendar = aggregator.calendar();

    match args.granularity {
        Granularity::QuarterHour => {
            let view = range.slice(&series_store.quarter_hour, calendar);
            let totals = Totals::from_records(view);
            println!("{}", formatter.format_records(view, &totals));
            if args.rolling {
                println!("{}", formatter.format_rolling(&rolling_average(view, args.window)));
            }
        }
        Granularity::Hourly => {
            let view = range.slice(&series_store.hourly, calendar);
            let totals = Totals::from_buckets(view);
            println!("{}", formatter.format_buckets(view, &totals));
            if args.rolling {
                println!("{}", formatter.format_rolling(&rolling_average(view, args.window)));
            }
        }
        Granularity::Daily => {
            let view = range.slice(&series_store.daily, calendar);
            let totals = Totals::from_buckets(view);
            println!("{}", formatter.format_buckets(view, &totals));
            if args.rolling {
                println!("{}", formatter.format_rolling(&rolling_average(view, args.window)));
            }
        }
    }

    Ok(())
}
