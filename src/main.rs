//! CLI entry point for the bike sharing dashboard.
//!
//! Provides subcommands for rendering the HTML dashboard, logging summary
//! tables, and exporting the derived daily data.

use anyhow::Result;
use bike_dashboard::analyzers::analyzer::{Analysis, analyze};
use bike_dashboard::charts::render_charts;
use bike_dashboard::config::Config;
use bike_dashboard::loader::{load_daily, load_hourly};
use bike_dashboard::output::{log_summary, write_dashboard, write_export};
use bike_dashboard::records::{DailyRecord, HourlyRecord};
use bike_dashboard::{logging, report};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "bike_dashboard")]
#[command(about = "Analytics dashboard for daily and hourly bike rentals", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Inputs {
    /// Daily records CSV (overrides BIKE_DAY_CSV)
    #[arg(long, value_name = "PATH")]
    day: Option<PathBuf>,

    /// Hourly records CSV (overrides BIKE_HOUR_CSV)
    #[arg(long, value_name = "PATH")]
    hour: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the HTML dashboard and its SVG charts
    Render {
        #[command(flatten)]
        inputs: Inputs,

        /// Output directory (overrides DASHBOARD_OUT_DIR)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Rows of each dataset shown in the preview tables
        #[arg(long)]
        preview_rows: Option<usize>,
    },
    /// Log descriptive statistics, group means and the temperature fit
    Summary {
        #[command(flatten)]
        inputs: Inputs,
    },
    /// Write the derived daily table as CSV and the analysis as JSON
    Export {
        #[command(flatten)]
        inputs: Inputs,

        /// Output directory (overrides DASHBOARD_OUT_DIR)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let env_config = Config::from_env();
    let _log_guard = logging::init(&env_config.log_file);

    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            inputs,
            out,
            preview_rows,
        } => {
            let config = env_config.with_overrides(inputs.day, inputs.hour, out, preview_rows);
            let (daily, hourly, analysis) = load_and_analyze(&config)?;

            let charts = render_charts(&analysis)?;
            let html =
                report::build_dashboard(&analysis, &charts, &daily, &hourly, config.preview_rows)?;
            let path = write_dashboard(&config.out_dir, &html, &charts)?;

            info!(path = %path.display(), "Open the dashboard in a browser");
        }
        Commands::Summary { inputs } => {
            let config = env_config.with_overrides(inputs.day, inputs.hour, None, None);
            let (_, _, analysis) = load_and_analyze(&config)?;

            log_summary(&analysis.daily_summary);
            log_summary(&analysis.hourly_summary);

            for g in &analysis.by_month {
                info!(
                    month = g.key,
                    rows = g.rows,
                    casual = g.casual,
                    registered = g.registered,
                    total = g.total,
                    "Mean by month"
                );
            }
            for g in &analysis.by_hour {
                info!(
                    hour = g.key,
                    rows = g.rows,
                    casual = g.casual,
                    registered = g.registered,
                    total = g.total,
                    "Mean by hour"
                );
            }
            for g in &analysis.by_weather {
                info!(
                    weathersit = g.key,
                    rows = g.rows,
                    casual = g.casual,
                    registered = g.registered,
                    total = g.total,
                    "Mean by weather"
                );
            }
            for g in &analysis.by_season_mean {
                info!(
                    season = g.key,
                    rows = g.rows,
                    casual = g.casual,
                    registered = g.registered,
                    total = g.total,
                    "Mean by season"
                );
            }
            for b in analysis.by_season.iter().chain(&analysis.by_temperature) {
                info!(
                    group = %b.label,
                    count = b.count,
                    q1 = b.q1,
                    median = b.median,
                    q3 = b.q3,
                    outliers = b.outliers.len(),
                    "Distribution"
                );
            }
            for insight in &analysis.insights {
                info!(tab = insight.tab.title(), "{}", insight.text);
            }
        }
        Commands::Export { inputs, out } => {
            let config = env_config.with_overrides(inputs.day, inputs.hour, out, None);
            let (_, _, analysis) = load_and_analyze(&config)?;

            write_export(&config.out_dir, &analysis)?;
        }
    }

    Ok(())
}

/// Loads both datasets and runs the analysis pipeline.
fn load_and_analyze(config: &Config) -> Result<(Vec<DailyRecord>, Vec<HourlyRecord>, Analysis)> {
    let daily = load_daily(&config.day_csv)?;
    let hourly = load_hourly(&config.hour_csv)?;
    info!(days = daily.len(), hours = hourly.len(), "Datasets loaded");

    let analysis = analyze(&daily, &hourly)?;
    Ok((daily, hourly, analysis))
}
