use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use clap::Parser;
use rankboard_common::{DataError, Dataset, Value};
use rankboard_core::{DashboardConfig, DashboardRequest, DateWindow, FilterSelection, Pipeline};
use rankboard_io::{CsvWriteOptions, SourceCache, write_dataset_csv_to_path};
use tracing_subscriber::EnvFilter;

mod render;
mod source;

use source::{SourceArgs, open_source};

const LOG_ENV: &str = "RANKBOARD_LOG";

#[derive(Parser, Debug)]
#[command(
    name = "rankboard",
    version,
    about = "Filter, aggregate and rank tabular data from the command line"
)]
struct Cli {
    /// `sample`, a .csv/.tsv/.xlsx/.ods/.json path, or an http(s) CSV export URL.
    #[arg(long, default_value = "sample")]
    source: String,

    /// Worksheet to read from a workbook source; defaults to the first one.
    #[arg(long)]
    sheet: Option<String>,

    /// Seed for the sample generator.
    #[arg(long)]
    seed: Option<u64>,

    /// YAML dashboard config (top-N cuts, number and date formats).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Numeric column to sum; defaults to the first numeric column.
    #[arg(long)]
    value: Option<String>,

    /// Column to rank by; defaults to the first categorical column.
    #[arg(long)]
    group: Option<String>,

    /// Second ranking dimension, shown as `group / subgroup`.
    #[arg(long)]
    subgroup: Option<String>,

    /// Keep only records whose COL is one of the listed values. May be repeated.
    #[arg(long = "filter", value_name = "COL=V1,V2", value_parser = parse_filter)]
    filters: Vec<(String, Vec<String>)>,

    /// Keep only records dated within the last N days.
    #[arg(long, value_name = "N", requires = "date_column")]
    last_days: Option<u32>,

    /// Date column the `--last-days` window applies to.
    #[arg(long, value_name = "COL", requires = "last_days")]
    date_column: Option<String>,

    /// Day the date window ends on (YYYY-MM-DD); defaults to today.
    #[arg(long, value_name = "DATE")]
    reference: Option<NaiveDate>,

    /// Number of groups in the ranking and chart.
    #[arg(long, value_name = "N")]
    top: Option<usize>,

    /// Write the filtered records to this CSV file.
    #[arg(long, value_name = "FILE")]
    export: Option<PathBuf>,

    /// Print the dashboard as JSON instead of text tables.
    #[arg(long)]
    json: bool,
}

/// `COL=V1,V2` into the column and its allowed values.
fn parse_filter(raw: &str) -> Result<(String, Vec<String>), String> {
    let (column, values) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected COL=V1,V2, got '{raw}'"))?;
    let column = column.trim();
    if column.is_empty() {
        return Err(format!("missing column name in '{raw}'"));
    }
    let values = values
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect();
    Ok((column.to_string(), values))
}

/// Match command-line tokens against the column's own values so typed
/// cells (numbers, dates) are selected by their printed form.
fn resolve_values(dataset: &Dataset, column: &str, tokens: &[String]) -> Result<Vec<Value>, DataError> {
    let idx = dataset.require_column(column)?;
    Ok(tokens
        .iter()
        .map(|token| {
            dataset
                .column_values(idx)
                .find(|v| v.to_string() == *token)
                .cloned()
                .unwrap_or_else(|| Value::Text(token.clone()))
        })
        .collect())
}

fn load_config(cli: &Cli) -> Result<DashboardConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
            DashboardConfig::from_yaml_reader(file)
                .with_context(|| format!("reading {}", path.display()))?
        }
        None => DashboardConfig::default(),
    };
    if let Some(top) = cli.top {
        config.ranking_top_n = top;
        config.chart_top_n = top;
    }
    config.validate().context("--top")?;
    Ok(config)
}

fn build_request(cli: &Cli, dataset: &Dataset, reference: NaiveDate) -> Result<DashboardRequest> {
    let mut filters = FilterSelection::new();
    for (column, tokens) in &cli.filters {
        let values = resolve_values(dataset, column, tokens)?;
        filters.set(column.clone(), values);
    }
    if let (Some(days), Some(column)) = (cli.last_days, &cli.date_column) {
        filters.set_window(Some(DateWindow::new(column.clone(), days, reference)));
    }
    Ok(DashboardRequest {
        filters,
        value_column: cli.value.clone(),
        group_column: cli.group.clone(),
        subgroup_column: cli.subgroup.clone(),
        ..DashboardRequest::default()
    })
}

fn run(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    let reference = cli.reference.unwrap_or_else(rankboard_io::today);

    let source = open_source(&SourceArgs {
        source: &cli.source,
        sheet: cli.sheet.as_deref(),
        seed: cli.seed,
        reference,
    })?;
    let source_id = source.id();
    let cache = SourceCache::default();
    let dataset = cache
        .get_or_load(&*source)
        .with_context(|| format!("loading {source_id}"))?;
    tracing::info!(source = source_id.as_str(), rows = dataset.row_count(), "loaded");

    let request = build_request(cli, &dataset, reference)?;
    let pipeline = Pipeline::new(config);
    let view = match pipeline.run(&dataset, &request) {
        Ok(view) => view,
        Err(err) if err.is_empty_dataset() => {
            println!("no records match the current selection");
            return Ok(());
        }
        Err(err) => return Err(anyhow!(err)),
    };

    if let Some(path) = &cli.export {
        write_dataset_csv_to_path(&view.filtered, path, &CsvWriteOptions::default())
            .with_context(|| format!("exporting to {}", path.display()))?;
        tracing::info!(path = %path.display(), rows = view.filtered_rows, "exported");
    }

    let mut stdout = io::stdout().lock();
    if cli.json {
        serde_json::to_writer_pretty(&mut stdout, &view)?;
        writeln!(stdout)?;
    } else {
        let text = render::render_text(&view, &source_id, &pipeline.config().number_format);
        stdout.write_all(text.as_bytes())?;
    }
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
