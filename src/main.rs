use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use configuration::{Config, ReportMode};
use database::{DbRepository, JournalStore, Ledger, MemoryStore, connect};
use reporter::{Reporter, UserReport, error::ReporterError};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

/// The main entry point for the trade journal tools.
#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // A missing .env file is fine; DATABASE_URL may come from the environment.
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    let config = configuration::load_config_from(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    let _log_guard = configuration::init_tracing(&config.logging)?;

    // Execute the appropriate command
    match cli.command {
        Commands::Analytics(args) => handle_analytics(args, &config).await,
        Commands::PopulateMistakes(args) => handle_populate_mistakes(args).await,
        Commands::Serve(args) => handle_serve(args, config).await,
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Behavioral analytics for a personal trading journal.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file. Missing files fall back to defaults.
    #[arg(long, global = true, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the P&L, win-rate and mistake-frequency reports.
    Analytics(AnalyticsArgs),
    /// Add the predefined trading mistakes to the catalog.
    PopulateMistakes(PopulateArgs),
    /// Serve the reports as a JSON API.
    Serve(ServeArgs),
}

#[derive(Parser)]
struct AnalyticsArgs {
    /// Username to analyze. Without it, every user with trades is analyzed.
    #[arg(long)]
    user: Option<String>,

    /// How many mistakes to list. Defaults to the configured value for the mode.
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    top: Option<u64>,

    /// Which configured top-N applies. Defaults to ad-hoc with --user, scheduled without.
    #[arg(long, value_enum)]
    mode: Option<ReportMode>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Read trades from a JSON ledger file instead of the database.
    #[arg(long)]
    ledger: Option<PathBuf>,
}

#[derive(Parser)]
struct PopulateArgs {
    /// Seed a JSON ledger file instead of the database. The file is created if missing.
    #[arg(long)]
    ledger: Option<PathBuf>,
}

#[derive(Parser)]
struct ServeArgs {
    /// Address to listen on. Defaults to the configured host and port.
    #[arg(long)]
    addr: Option<SocketAddr>,

    /// Serve a JSON ledger file instead of the database.
    #[arg(long)]
    ledger: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

// ==============================================================================
// Command Logic
// ==============================================================================

/// Opens either the JSON ledger at `ledger` or the journal database.
async fn open_store(ledger: Option<&Path>) -> anyhow::Result<Arc<dyn JournalStore>> {
    match ledger {
        Some(path) => {
            let store = MemoryStore::from_json_file(path)
                .await
                .with_context(|| format!("Failed to load ledger {}", path.display()))?;
            Ok(Arc::new(store))
        }
        None => {
            let pool = connect().await.context("Failed to connect to the database")?;
            Ok(Arc::new(DbRepository::new(pool)))
        }
    }
}

/// Handles the `analytics` command for one user or for every user.
async fn handle_analytics(args: AnalyticsArgs, config: &Config) -> anyhow::Result<ExitCode> {
    let store = open_store(args.ledger.as_deref()).await?;
    let reporter = Reporter::new(&config.reports);

    let mode = args.mode.unwrap_or(if args.user.is_some() {
        ReportMode::AdHoc
    } else {
        ReportMode::Scheduled
    });
    let top_n = args
        .top
        .map(|n| n as usize)
        .unwrap_or_else(|| mode.top_n(&config.reports));
    tracing::debug!(?mode, top_n, user = ?args.user, "Running analytics.");

    match args.user {
        Some(username) => {
            let report = match reporter.run_for_user(store.as_ref(), &username, top_n).await {
                Ok(report) => report,
                Err(ReporterError::UserNotFound(name)) => {
                    eprintln!("User \"{}\" not found", name);
                    return Ok(ExitCode::FAILURE);
                }
                Err(e) => return Err(e.into()),
            };
            match args.format {
                OutputFormat::Text => {
                    println!("Analyzing data for user: {}", report.username);
                    print_report(&report);
                }
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
            }
        }
        None => {
            let reports = reporter.run_all(store.as_ref(), top_n).await?;
            match args.format {
                OutputFormat::Text => {
                    if reports.is_empty() {
                        println!("No users with trades found.");
                    }
                    for report in &reports {
                        println!("\n=== ANALYZING USER: {} ===", report.username);
                        print_report(report);
                    }
                }
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&reports)?),
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn print_report(report: &UserReport) {
    println!("{}", analytics::summary::render(&report.report));
}

/// Handles the `populate-mistakes` command.
async fn handle_populate_mistakes(args: PopulateArgs) -> anyhow::Result<ExitCode> {
    let catalog = core_types::default_mistakes();

    let created = match args.ledger {
        Some(path) => {
            let store = if path.exists() {
                MemoryStore::from_json_file(&path).await?
            } else {
                MemoryStore::new(Ledger::default())?
            };
            let created = store.ensure_mistakes(&catalog).await?;
            store
                .write_json_file(&path)
                .await
                .with_context(|| format!("Failed to write ledger {}", path.display()))?;
            created
        }
        None => {
            let pool = connect().await.context("Failed to connect to the database")?;
            DbRepository::new(pool).ensure_mistakes(&catalog).await?
        }
    };

    println!("Successfully populated {} trading mistakes", created);
    Ok(ExitCode::SUCCESS)
}

/// Handles the `serve` command.
async fn handle_serve(args: ServeArgs, config: Config) -> anyhow::Result<ExitCode> {
    let addr = match args.addr {
        Some(addr) => addr,
        None => config
            .server
            .addr()
            .context("server host must be an IP address")?,
    };
    let store = open_store(args.ledger.as_deref()).await?;

    web_server::run_server(addr, web_server::AppState::new(store, config.reports)).await?;
    Ok(ExitCode::SUCCESS)
}
