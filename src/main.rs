//! CLI entry point for the health-need scorecard.
//!
//! Provides subcommands for a full scoring run, recomputing trends from the
//! snapshot archive, and grading a single score.

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use health_need_scorecard::{
    config::ScoringConfig,
    fetch::BasicClient,
    pipeline::{RunOptions, SourceLocations, refresh_trends, run},
    trends::EntityTrendSummary,
};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    filter::LevelFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "health_need_scorecard")]
#[command(about = "Scores county and school health need from public data feeds", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load every feed, score counties and schools, write scorecards and archive snapshots
    Score {
        /// JSON config overriding the built-in tables
        #[arg(short, long)]
        config: Option<String>,

        /// EPA annual AQI by county (file or URL)
        #[arg(long)]
        aqi: Option<String>,

        /// HRSA HPSA designations (file or URL)
        #[arg(long)]
        hpsa: Option<String>,

        /// CDC PLACES county measures (file or URL)
        #[arg(long)]
        places: Option<String>,

        /// CDC PLACES tract measures (file or URL)
        #[arg(long)]
        tract_places: Option<String>,

        /// FEMA National Risk Index by county (file or URL)
        #[arg(long)]
        nri: Option<String>,

        /// State respiratory activity table (file or URL)
        #[arg(long)]
        respiratory: Option<String>,

        /// Respiratory activity label, e.g. "Moderate"; overrides --respiratory
        #[arg(long)]
        respiratory_level: Option<String>,

        /// School directory with census tracts (file or URL)
        #[arg(long)]
        schools: Option<String>,

        /// Directory for scorecards, summaries and history
        #[arg(short = 'd', long, default_value = "data")]
        out_dir: PathBuf,

        /// Skip snapshot archiving and trend refresh
        #[arg(long, default_value_t = false)]
        no_archive: bool,

        /// Snapshot date (YYYY-MM-DD), defaults to today in UTC
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Recompute trends.json from the snapshot archive
    Trends {
        #[arg(short, long)]
        config: Option<String>,

        #[arg(short = 'd', long, default_value = "data")]
        out_dir: PathBuf,
    },
    /// Print the letter grade for a score
    Grade {
        #[arg(allow_negative_numbers = true)]
        score: f64,

        #[arg(short, long)]
        config: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/health_need_scorecard.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("health_need_scorecard.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive(LevelFilter::INFO.into()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive(LevelFilter::DEBUG.into()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Score {
            config,
            aqi,
            hpsa,
            places,
            tract_places,
            nri,
            respiratory,
            respiratory_level,
            schools,
            out_dir,
            no_archive,
            date,
        } => {
            let config = ScoringConfig::load_or_default(config.as_deref())?;
            let locations = SourceLocations {
                aqi,
                hpsa,
                places,
                tract_places,
                nri,
                respiratory,
                respiratory_level,
                schools,
            };

            let mut options = RunOptions::new(out_dir);
            options.archive = !no_archive;
            if let Some(date) = date {
                options.run_date = date;
            }

            let output = run(&BasicClient::new(), &config, &locations, &options).await?;

            for county in &output.run.counties {
                info!(
                    fips = %county.fips,
                    county = %county.county,
                    composite = county.composite_score,
                    grade = %county.grade.letter,
                    missing = %county.missing.describe(),
                    "County"
                );
            }

            let insights = &output.run.insights;
            info!(
                schools = insights.total_schools,
                no_nurse = insights.schools_no_nurse,
                high_need_no_nurse = insights.high_need_no_nurse,
                cost_to_fill = insights.cost_to_fill_gaps,
                "Nurse coverage"
            );
            if output.manifest.school_order_changed {
                warn!("School order changed since the previous run");
            }
            if let Some(trends) = &output.trends {
                log_trend("county", &trends.counties);
                log_trend("schools", &trends.schools);
            }
        }
        Commands::Trends { config, out_dir } => {
            let config = ScoringConfig::load_or_default(config.as_deref())?;
            let summary = refresh_trends(&config, &out_dir, Utc::now())?;
            log_trend("county", &summary.counties);
            log_trend("schools", &summary.schools);
        }
        Commands::Grade { score, config } => {
            let config = ScoringConfig::load_or_default(config.as_deref())?;
            let band = config.grade_scale.grade(score);
            println!("{} ({}, {})", band.letter, band.label, band.severity.as_str());
        }
    }

    Ok(())
}

fn log_trend(entity: &str, summary: &EntityTrendSummary) {
    match (&summary.biggest_increase, &summary.biggest_decrease) {
        (Some(up), Some(down)) => info!(
            entity,
            compared = summary.total_compared,
            new = summary.new_entities,
            increase = %up.name,
            increase_change = up.change,
            decrease = %down.name,
            decrease_change = down.change,
            "Trend"
        ),
        _ => match &summary.reason {
            Some(reason) => warn!(entity, reason = %reason, "Trend unavailable"),
            None => info!(entity, status = ?summary.status, "Trend not available yet"),
        },
    }
}
