use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Duration, Utc};
use clap::{Parser, Subcommand};

use crate::db::Database;
use crate::models::Call;
use crate::report::{FileReportExporter, ReportService, TextReportRenderer};

const DEFAULT_FLAVOR: &str = "text.utf-8";

/// Call logging with interval-bucketed plain-text reports
#[derive(Parser)]
#[command(name = "calltrack")]
#[command(about = "Log phone calls and export interval-bucketed reports")]
#[command(version)]
pub struct Cli {
    /// Path to the SQLite database
    #[arg(long, global = true, default_value = "calls.sqlite3")]
    pub db: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log a new call
    Add {
        /// Phone number
        #[arg(long)]
        number: String,
        /// Start time, RFC 3339 (e.g. 2024-03-04T10:00:00+00:00)
        #[arg(long)]
        start: String,
        /// Duration as minutes or H:MM:SS
        #[arg(long)]
        duration: String,
        /// Case reference; repeat for several
        #[arg(long = "case")]
        cases: Vec<String>,
    },
    /// Overwrite a stored call
    Update {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        number: String,
        #[arg(long)]
        start: String,
        #[arg(long)]
        duration: String,
        #[arg(long = "case")]
        cases: Vec<String>,
    },
    /// Delete a call by id
    Delete { id: i64 },
    /// Print a call as JSON
    Show { id: i64 },
    /// Print the calls in a date range as JSON
    List {
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
    },
    /// Export an interval report for a date range
    Export {
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
        /// Bucket size in minutes
        #[arg(long, default_value_t = 30)]
        interval_mins: i64,
        /// Destination file
        #[arg(long)]
        output: String,
        /// Report flavor
        #[arg(long, default_value = DEFAULT_FLAVOR)]
        flavor: String,
    },
    /// List the registered report flavors
    Flavors,
}

pub async fn run() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let db = Database::new(cli.db.clone())?;

    match cli.command {
        Commands::Add {
            number,
            start,
            duration,
            cases,
        } => {
            let call = Call::new(
                None,
                number,
                parse_timestamp(&start)?,
                parse_duration(&duration)?,
                cases,
            );
            let stored = db.insert_call(&call).await?;
            println!("{}", serde_json::to_string_pretty(&stored)?);
        }
        Commands::Update {
            id,
            number,
            start,
            duration,
            cases,
        } => {
            let call = Call::new(
                Some(id),
                number,
                parse_timestamp(&start)?,
                parse_duration(&duration)?,
                cases,
            );
            let stored = db.update_call(&call).await?;
            println!("{}", serde_json::to_string_pretty(&stored)?);
        }
        Commands::Delete { id } => {
            let removed = db.delete_call(id).await?;
            println!("{}", serde_json::to_string_pretty(&removed)?);
        }
        Commands::Show { id } => {
            let call = db.get_call(id).await?;
            println!("{}", serde_json::to_string_pretty(&call)?);
        }
        Commands::List { start, end } => {
            let calls = db
                .get_calls_by_date_range(parse_timestamp(&start)?, parse_timestamp(&end)?)
                .await?;
            println!("{}", serde_json::to_string_pretty(&calls)?);
        }
        Commands::Export {
            start,
            end,
            interval_mins,
            output,
            flavor,
        } => {
            let service = report_service(db);
            let report = service
                .export_report(
                    parse_timestamp(&start)?,
                    parse_timestamp(&end)?,
                    Duration::minutes(interval_mins),
                    &output,
                    &flavor,
                )
                .await?;
            println!(
                "Exported {} calls across {} intervals to {output}",
                report.distinct_calls().len(),
                report.bucket_count()
            );
        }
        Commands::Flavors => {
            let service = report_service(db);
            for flavor in service.flavors() {
                println!("{flavor}");
            }
        }
    }

    Ok(())
}

fn report_service(db: Database) -> ReportService {
    ReportService::new(
        db,
        vec![Box::new(TextReportRenderer::new(DEFAULT_FLAVOR))],
        Box::new(FileReportExporter),
    )
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("invalid timestamp '{value}', expected RFC 3339"))
}

/// Accepts plain minutes ("45") or H:MM:SS ("1:05:30"); returns milliseconds.
fn parse_duration(value: &str) -> Result<u64> {
    let parts: Vec<&str> = value.split(':').collect();
    let bad = || anyhow!("invalid duration '{value}', expected minutes or H:MM:SS");

    match parts.as_slice() {
        [mins] => {
            let mins: u64 = mins.trim().parse().map_err(|_| bad())?;
            Ok(mins * 60 * 1000)
        }
        [hours, mins, secs] => {
            let hours: u64 = hours.trim().parse().map_err(|_| bad())?;
            let mins: u64 = mins.parse().map_err(|_| bad())?;
            let secs: u64 = secs.parse().map_err(|_| bad())?;
            if mins >= 60 || secs >= 60 {
                return Err(bad());
            }
            Ok((hours * 3600 + mins * 60 + secs) * 1000)
        }
        _ => Err(bad()),
    }
}
