//! Terminal front end for the ARGO profile and measurement tables
//!
//! Usage:
//!   argo-tables --quality excellent --sort date --page-size 5
//!   argo-tables --table measurements --search argo_003 --sort depth --sort depth
//!   argo-tables --profiles profiles.csv --select 1,4 --export selection.json

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use tracing::{debug, info, warn};

use argo_core::data::DataSource;
use argo_core::events::events::{DataSourceLoaded, SelectionExported};
use argo_core::events::handler_from_fn;
use argo_core::table::{SortField, TableRecord};
use argo_core::{AppState, Quality, QualityFilter, TableSettings, ViewState};
use argo_data::{csv_source, CsvSource, MockSource, SourceConfig};
use argo_views::tables::columns::quality_label;
use argo_views::{
    measurement_columns, profile_columns, render_text_table, ColumnSpec, ExportFormat, TableView,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Table {
    /// Float profiles
    Profiles,
    /// Depth-resolved sensor samples
    Measurements,
}

#[derive(Parser, Debug)]
#[command(name = "argo-tables")]
#[command(about = "Search, filter, sort and page through ARGO float data")]
struct Args {
    /// Profile CSV file; the built-in sample collections are used when omitted
    #[arg(long, value_name = "CSV")]
    profiles: Option<PathBuf>,

    /// Measurement CSV file
    #[arg(long, value_name = "CSV", requires = "profiles")]
    measurements: Option<PathBuf>,

    /// JSON data source configuration (file paths and null patterns)
    #[arg(long, value_name = "JSON", conflicts_with_all = ["profiles", "measurements"])]
    source_config: Option<PathBuf>,

    /// JSON table settings
    #[arg(short, long, value_name = "JSON")]
    config: Option<PathBuf>,

    /// Seed for the generated sample measurements
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Table to show
    #[arg(short, long, value_enum, default_value_t = Table::Profiles)]
    table: Table,

    /// Free-text search
    #[arg(short, long, default_value = "")]
    search: String,

    /// Quality filter: all, excellent, good or fair
    #[arg(long, default_value = "all")]
    quality: QualityFilter,

    /// Sort header click; repeat the same field to flip the direction
    #[arg(long, value_name = "FIELD")]
    sort: Vec<String>,

    /// Page to show (1-based)
    #[arg(short, long, default_value_t = 1)]
    page: usize,

    /// Rows per page; must be one of the configured page sizes
    #[arg(long)]
    page_size: Option<usize>,

    /// Record ids to toggle, in order
    #[arg(long, value_delimiter = ',')]
    select: Vec<u64>,

    /// Toggle every row on the shown page
    #[arg(long)]
    select_page: bool,

    /// Write the selected records to this file
    #[arg(long, value_name = "PATH")]
    export: Option<PathBuf>,

    /// Export format; guessed from the export file extension when omitted
    #[arg(long)]
    format: Option<ExportFormat>,

    /// Hide the row number column
    #[arg(long)]
    no_row_numbers: bool,
}

fn main() -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let settings = match &args.config {
        Some(path) => TableSettings::load(path)
            .with_context(|| format!("reading settings from {}", path.display()))?,
        None => TableSettings::default(),
    };

    let state = AppState::new(settings.clone());
    state
        .event_bus
        .subscribe::<DataSourceLoaded>(handler_from_fn(|event| {
            if let Some(loaded) = event.as_any().downcast_ref::<DataSourceLoaded>() {
                debug!(
                    source = %loaded.source_name,
                    profiles = loaded.profile_count,
                    measurements = loaded.measurement_count,
                    "data source ready"
                );
            }
        }));
    state
        .event_bus
        .subscribe::<SelectionExported>(handler_from_fn(|event| {
            if let Some(exported) = event.as_any().downcast_ref::<SelectionExported>() {
                eprintln!(
                    "Exported {} {} to {}",
                    exported.row_count, exported.table, exported.destination
                );
            }
        }));

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(state.load_data_source(data_source(&args)?))?;
    let collections = state.collections();

    match args.table {
        Table::Profiles => {
            let view = TableView::new("profiles", collections.profiles);
            run_table(view, settings.profile_view(), &profile_columns(), &args, &settings, &state)
        }
        Table::Measurements => {
            let view = TableView::new("measurements", collections.measurements);
            run_table(
                view,
                settings.measurement_view(),
                &measurement_columns(),
                &args,
                &settings,
                &state,
            )
        }
    }
}

fn data_source(args: &Args) -> Result<Arc<dyn DataSource>> {
    if let Some(path) = &args.source_config {
        let config = SourceConfig::load(path)
            .with_context(|| format!("reading source config {}", path.display()))?;
        return Ok(Arc::new(CsvSource::new(config)));
    }
    if let Some(profiles) = &args.profiles {
        return Ok(Arc::new(csv_source(profiles.clone(), args.measurements.clone())));
    }
    info!("No input files given, using the sample collections");
    Ok(Arc::new(MockSource::with_seed(args.seed)))
}

/// Apply the command line to the table's initial view state, print the page
/// and export the selection when asked
fn run_table<R>(
    view: TableView<R>,
    initial: ViewState<R::Field>,
    columns: &[ColumnSpec<R>],
    args: &Args,
    settings: &TableSettings,
    app: &AppState,
) -> Result<()>
where
    R: TableRecord + Serialize,
{
    let mut view = view
        .with_cache_capacity(settings.cache_capacity)
        .with_event_bus(app.event_bus.clone());
    view.config.max_page_buttons = settings.max_page_buttons;
    view.config.show_row_numbers = !args.no_row_numbers;

    let mut state = initial
        .with_query(args.search.as_str())
        .with_quality_filter(args.quality.clone());

    if let Some(page_size) = args.page_size {
        if !settings.allows_page_size(page_size) {
            bail!(
                "page size {} is not one of {:?}",
                page_size,
                settings.page_size_options
            );
        }
        state = state.with_page_size(page_size);
    }

    for name in &args.sort {
        let field: R::Field = name.parse().with_context(|| {
            let known: Vec<&str> = R::Field::ALL.iter().map(|f| f.name()).collect();
            format!("{} table fields: {}", view.name(), known.join(", "))
        })?;
        state = state.with_sort_click(field);
    }

    let requested = state.with_page(args.page);
    state = view.clamp_page(&requested);
    if state.page != requested.page {
        warn!("page {} is out of range, showing page {}", requested.page, state.page);
    }

    for &id in &args.select {
        state = view.toggle_row(&state, id);
    }
    if args.select_page {
        state = view.toggle_page(&state);
    }

    let page = view.render(&state);
    print!("{}", render_text_table(&page, columns, state.sort, &view.config));

    let legend: Vec<String> = Quality::RECOGNIZED.iter().map(quality_label).collect();
    println!("Quality: {}", legend.join("  "));

    if !state.selection.is_empty() {
        let ids: Vec<String> = state.selection.iter().map(|id| id.to_string()).collect();
        println!("Selected ids: {}", ids.join(", "));
    }

    if let Some(path) = &args.export {
        let format = args
            .format
            .or_else(|| ExportFormat::from_path(path))
            .unwrap_or_default();
        view.export_selected(&state, format, path)
            .with_context(|| format!("exporting selection to {}", path.display()))?;
    }

    Ok(())
}
