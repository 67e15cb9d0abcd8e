use analytics::{AnalyticsService, MovingAverageEngine, MovingAverageOutcome, MovingAverageReport};
use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, Table};
use configuration::{LogFormat, Settings};
use core_types::{Transaction, UserId};
use database::{connect, run_migrations, DbRepository, USER_INDEX_NAME};
use std::net::SocketAddr;
use std::path::PathBuf;

/// The main entry point for the Salesight application.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file, if there is one.
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    let mut settings = configuration::load_settings(cli.config.as_deref())
        .context("Failed to load settings")?;
    if let Some(format) = cli.log_format {
        settings.logging.format = format;
    }
    let _log_guard = configuration::init_tracing(&settings.logging)?;

    // Execute the appropriate command
    match cli.command {
        Commands::Serve(args) => {
            let addr = args.addr.unwrap_or_else(|| settings.server.socket_addr());
            web_server::run_server(&settings, addr).await
        }
        Commands::MovingAverage(args) => handle_moving_average(args, &settings).await,
        Commands::Record(args) => handle_record(args, &settings).await,
        Commands::History(args) => handle_history(args, &settings).await,
        Commands::Index(args) => handle_index(args, &settings).await,
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Per-user moving averages over recorded transaction amounts.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Settings file to load instead of ./config.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Overrides `logging.format` from the settings.
    #[arg(long, global = true, value_enum)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP analytics service.
    Serve(ServeArgs),
    /// Compute a user's moving average once and print it.
    MovingAverage(MovingAverageArgs),
    /// Record a single transaction amount.
    Record(RecordArgs),
    /// List a user's recorded transactions in order.
    History(HistoryArgs),
    /// Inspect or change the user-id index on the sales table.
    Index(IndexArgs),
}

#[derive(Parser)]
struct ServeArgs {
    /// Bind address; defaults to server.host:server.port.
    #[arg(long)]
    addr: Option<SocketAddr>,
}

#[derive(Parser)]
struct MovingAverageArgs {
    #[arg(long)]
    user_id: i64,

    /// Window size; defaults to analytics.default_window.
    #[arg(long, allow_negative_numbers = true)]
    window: Option<i64>,

    /// Print the report as JSON instead of a table.
    #[arg(long)]
    json: bool,
}

#[derive(Parser)]
struct RecordArgs {
    #[arg(long)]
    user_id: i64,

    #[arg(long)]
    amount: f64,
}

#[derive(Parser)]
struct HistoryArgs {
    #[arg(long)]
    user_id: i64,
}

#[derive(Parser)]
struct IndexArgs {
    #[arg(value_enum)]
    action: IndexAction,
}

#[derive(Clone, Copy, ValueEnum)]
enum IndexAction {
    Create,
    Drop,
    Status,
}

// ==============================================================================
// Command Logic
// ==============================================================================

/// Connects and migrates; every database-backed command starts here.
async fn open_repository(settings: &Settings) -> anyhow::Result<DbRepository> {
    let db_pool = connect(&settings.database)
        .await
        .context("Failed to connect to the database")?;
    run_migrations(&db_pool)
        .await
        .context("Failed to run database migrations")?;
    Ok(DbRepository::new(db_pool))
}

async fn handle_moving_average(args: MovingAverageArgs, settings: &Settings) -> anyhow::Result<()> {
    let window = args.window.unwrap_or(settings.analytics.default_window);
    // Checked before connecting so a bad window never surfaces as a database failure.
    if MovingAverageEngine::validate_window(window).is_err() {
        bail!("Invalid window size {window}: the window must be at least 1");
    }

    let repo = open_repository(settings).await?;
    let service = AnalyticsService::new(repo.clone());

    let outcome = service.moving_average(UserId(args.user_id), window).await;
    repo.pool().close().await;

    match outcome {
        MovingAverageOutcome::Success(report) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", report_table(&report));
                match report.latest() {
                    Some(latest) => println!("Latest average: {latest:.2} ({} points)", report.count),
                    None => println!("Fewer than {} amounts recorded; no average yet.", report.window_size),
                }
            }
            Ok(())
        }
        MovingAverageOutcome::InvalidWindow(window) => {
            bail!("Invalid window size {window}: the window must be at least 1")
        }
        MovingAverageOutcome::NotFound(user_id) => bail!("User {user_id} not found in database"),
        MovingAverageOutcome::Failure(e) => Err(e).context("Moving average failed"),
    }
}

async fn handle_record(args: RecordArgs, settings: &Settings) -> anyhow::Result<()> {
    let repo = open_repository(settings).await?;
    let transaction = repo.save_amount(UserId(args.user_id), args.amount).await?;
    println!(
        "Recorded #{} for user {}: {:.2}",
        transaction.id, transaction.user_id, transaction.amount
    );
    repo.pool().close().await;
    Ok(())
}

async fn handle_history(args: HistoryArgs, settings: &Settings) -> anyhow::Result<()> {
    let repo = open_repository(settings).await?;
    let transactions = repo.get_transactions_for_user(UserId(args.user_id)).await?;
    repo.pool().close().await;

    if transactions.is_empty() {
        bail!("User {} not found in database", args.user_id);
    }
    println!("{}", history_table(&transactions));
    Ok(())
}

async fn handle_index(args: IndexArgs, settings: &Settings) -> anyhow::Result<()> {
    let repo = open_repository(settings).await?;
    match args.action {
        IndexAction::Create => repo.ensure_user_index().await?,
        IndexAction::Drop => repo.drop_user_index().await?,
        IndexAction::Status => {}
    }
    let present = repo.has_user_index().await?;
    repo.pool().close().await;

    println!(
        "{USER_INDEX_NAME}: {}",
        if present { "present" } else { "absent" }
    );
    Ok(())
}

// ==============================================================================
// Rendering
// ==============================================================================

fn report_table(report: &MovingAverageReport) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec![
            "Point".to_string(),
            format!("Moving average (window {})", report.window_size),
        ]);

    for (i, value) in report.moving_averages.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(format!("{value:.2}")).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

fn history_table(transactions: &[Transaction]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Id", "Recorded at", "Amount"]);

    for t in transactions {
        table.add_row(vec![
            Cell::new(t.id),
            Cell::new(t.recorded_at.format("%Y-%m-%d %H:%M:%S")),
            Cell::new(format!("{:.2}", t.amount)).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn cli_parses_moving_average_with_negative_window() {
        let cli = Cli::parse_from(["salesight", "moving-average", "--user-id", "100", "--window", "-1"]);
        match cli.command {
            Commands::MovingAverage(args) => {
                assert_eq!(args.user_id, 100);
                assert_eq!(args.window, Some(-1));
                assert!(!args.json);
            }
            _ => panic!("expected moving-average"),
        }
    }

    #[test]
    fn cli_accepts_global_options_after_subcommand() {
        let cli = Cli::parse_from(["salesight", "index", "status", "--log-format", "compact"]);
        assert_eq!(cli.log_format, Some(LogFormat::Compact));
        assert!(matches!(cli.command, Commands::Index(IndexArgs { action: IndexAction::Status })));
    }

    #[tokio::test]
    async fn invalid_window_is_reported_without_a_database() {
        let settings = configuration::settings_from_toml("").unwrap();
        assert!(settings.database.url.is_none());

        for window in [0, -1] {
            let args = MovingAverageArgs { user_id: 1, window: Some(window), json: false };
            let err = handle_moving_average(args, &settings).await.unwrap_err();
            assert_eq!(
                err.to_string(),
                format!("Invalid window size {window}: the window must be at least 1")
            );
        }
    }

    #[test]
    fn report_table_has_one_row_per_point() {
        let report = MovingAverageReport::new(UserId(1), 2, vec![15.0, 25.0, 35.0]);
        let rendered = report_table(&report).to_string();
        assert!(rendered.contains("window 2"));
        assert!(rendered.contains("25.00"));
        assert_eq!(report_table(&report).row_iter().count(), 3);
    }

    #[test]
    fn history_table_formats_amounts() {
        let transactions = vec![Transaction {
            id: 7,
            user_id: UserId(999),
            amount: 1234.56,
            recorded_at: Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap(),
        }];
        let rendered = history_table(&transactions).to_string();
        assert!(rendered.contains("1234.56"));
        assert!(rendered.contains("2026-01-02 03:04:05"));
    }
}
