use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use conciliar_core::Config;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "conciliar", version, about = "Bank statement reconciliation")]
struct Cli {
    /// Path to the reconciliation database.
    #[arg(long, default_value = "conciliar.db", global = true)]
    db: PathBuf,

    /// TOML file with matching thresholds and column synonyms.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Import a bank statement CSV.
    Ingest { file: PathBuf },
    /// Load or refresh orders from a CSV export.
    LoadOrders { file: PathBuf },
    /// Suggest matches for everything still unmatched.
    Match,
    /// Show reconciliation tallies.
    Status,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            tracing::error!("{err:#}");
            let body = serde_json::json!({ "success": false, "error": format!("{err:#}") });
            println!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<bool> {
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    match cli.command {
        Command::Ingest { file } => {
            let report = commands::ingest(&cli.db, &file, &config).await?;
            print_report(&report)?;
            Ok(report.success)
        }
        Command::LoadOrders { file } => {
            let report = commands::load_orders(&cli.db, &file).await?;
            print_report(&report)?;
            Ok(report.success)
        }
        Command::Match => {
            let report = commands::run_match(&cli.db, &config).await?;
            print_report(&report)?;
            Ok(report.success)
        }
        Command::Status => {
            let report = commands::status(&cli.db).await?;
            print_report(&report)?;
            Ok(true)
        }
    }
}

fn print_report<T: serde::Serialize>(report: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}
