//! CLI entry point for the charger uptime rater.
//!
//! Reads a charger availability log file, computes per-station uptime
//! percentages, and prints one `"<id> <percent>"` line per station to
//! stdout. On any failure the only stdout output is the literal line
//! `ERROR`; diagnostics go to the tracing layers.

use anyhow::Result;
use clap::Parser;
use std::ffi::OsStr;
use std::path::Path;
use tracing::{error, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};
use uptime_rater::output::{append_csv, print_json, write_report};
use uptime_rater::parser::ingest_file;

#[derive(Parser)]
#[command(name = "uptime_rater")]
#[command(about = "Computes per-station uptime from a charger availability log", long_about = None)]
struct Cli {
    /// Path to the availability log file
    #[arg(value_name = "LOG_FILE")]
    input: String,

    /// Optional CSV file to append per-station rows to
    #[arg(short, long)]
    csv: Option<String>,

    /// Also log the report as pretty-printed JSON
    #[arg(short, long, default_value_t = false)]
    json: bool,
}

fn main() {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/uptime_rater.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("uptime_rater.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        error!(error = %e, "Run failed");
        println!("ERROR");
        std::process::exit(1);
    }
}

#[tracing::instrument(skip(cli), fields(input = %cli.input))]
fn run(cli: &Cli) -> Result<()> {
    let agg = ingest_file(&cli.input)?;
    let report = agg.render_report()?;

    info!(stations = report.stations.len(), "Uptime report computed");

    // Buffered so a downstream failure never leaves a partial report.
    let mut out = Vec::new();
    write_report(&mut out, &report.stations)?;

    if let Some(csv_path) = &cli.csv {
        append_csv(csv_path, &report.stations)?;
    }

    if cli.json {
        print_json(&report)?;
    }

    print!("{}", String::from_utf8(out)?);
    Ok(())
}
