//! Perftrack CLI - Rank a roster of instruments by recent performance.
//!
//! Logs go to stderr; stdout carries the table or JSON output.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Datelike;
use clap::{Parser, Subcommand};
use perftrack_core::{
    run_pass, ApiResponse, Config, DisplayState, JsonFileProvider, RankedRow, SortKey,
    TimeoutProvider, COLUMNS,
};
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "perftrack")]
#[command(about = "Instrument performance tracker - returns, CAGR and YTD rankings")]
#[command(version)]
struct Cli {
    /// Config file (defaults to $PERFTRACK_CONFIG or ~/.perftrack/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an evaluation pass and print the ranked table
    Refresh {
        /// JSON file with price histories keyed by ticker
        #[arg(short, long)]
        prices: PathBuf,
        /// Sort key (overrides config)
        #[arg(short, long)]
        sort: Option<SortKey>,
        /// Year used for YTD returns (defaults to the current year)
        #[arg(short, long)]
        year: Option<i32>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Print the configured roster
    Roster,
    /// Print the table column headers
    Columns,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    }
    .context("failed to load config")?;

    match cli.command {
        Commands::Refresh {
            prices,
            sort,
            year,
            json,
        } => handle_refresh(config, prices, sort, year, json),
        Commands::Roster => {
            println!(
                "{}",
                serde_json::to_string_pretty(&ApiResponse::ok(json!({
                    "instruments": config.instruments,
                })))?
            );
            Ok(())
        }
        Commands::Columns => {
            println!(
                "{}",
                serde_json::to_string_pretty(&ApiResponse::ok(json!({ "columns": COLUMNS })))?
            );
            Ok(())
        }
    }
}

fn handle_refresh(
    mut config: Config,
    prices: PathBuf,
    sort: Option<SortKey>,
    year: Option<i32>,
    json: bool,
) -> Result<()> {
    if let Some(sort) = sort {
        config.sort_key = sort;
    }
    let year = year.unwrap_or_else(|| chrono::Local::now().year());

    let provider = TimeoutProvider::new(JsonFileProvider::new(prices), config.fetch_timeout());
    let state = run_pass(&config, &provider, year);

    if json {
        let response = match &state {
            DisplayState::NoData {
                reason: Some(reason),
            } => ApiResponse::err(reason.clone()),
            _ => ApiResponse::ok(&state),
        };
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    match &state {
        DisplayState::Ready { rows } => print!("{}", render_table(rows)),
        DisplayState::NoData { reason } => {
            println!("No data available");
            if let Some(reason) = reason {
                eprintln!("{}", reason);
            }
        }
        DisplayState::NeverEvaluated => println!("Not evaluated"),
    }

    Ok(())
}

/// Render rows as a left-aligned, fixed-column text table.
fn render_table(rows: &[RankedRow]) -> String {
    let cells: Vec<Vec<String>> = rows.iter().map(|r| r.cells()).collect();

    let widths: Vec<usize> = COLUMNS
        .iter()
        .enumerate()
        .map(|(i, header)| {
            cells
                .iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(header.len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    let header: Vec<String> = COLUMNS.iter().map(|h| h.to_string()).collect();
    for row in std::iter::once(&header).chain(cells.iter()) {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect();
        out.push_str(line.join("  ").trim_end());
        out.push('\n');
    }
    out
}
