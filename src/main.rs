use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use fintrack::cli::{
    handle_account_command, handle_budget_command, handle_category_command, handle_goal_command,
    handle_report_command, handle_transaction_command, Context, OutputFormat,
};
use fintrack::config::{paths::FintrackPaths, settings::Settings};
use fintrack::storage::Storage;

#[derive(Parser)]
#[command(
    name = "fintrack",
    author = "Kaylee Beyene",
    version,
    about = "Personal finance analytics from the command line",
    long_about = "fintrack keeps a local ledger of income and expenses and answers \
                  questions about it: where the money went, what this month will \
                  probably cost, which budgets are about to break and whether your \
                  savings goals are on schedule."
)]
struct Cli {
    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Treat this date as today (YYYY-MM-DD)
    #[arg(long, global = true, env = "FINTRACK_TODAY")]
    today: Option<NaiveDate>,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Account management commands
    #[command(subcommand)]
    Account(fintrack::cli::AccountCommands),

    /// Category management commands
    #[command(subcommand)]
    Category(fintrack::cli::CategoryCommands),

    /// Transaction commands
    #[command(subcommand, alias = "txn")]
    Transaction(fintrack::cli::TransactionCommands),

    /// Budget limits, alerts and spending advice
    #[command(subcommand)]
    Budget(fintrack::cli::BudgetCommands),

    /// Savings goals
    #[command(subcommand)]
    Goal(fintrack::cli::GoalCommands),

    /// Aggregations, summaries and forecasts
    #[command(subcommand)]
    Report(fintrack::cli::ReportCommands),

    /// Initialize the data directory and write default settings
    Init,

    /// Show current configuration and paths
    Config,
}

fn init_logging(verbose: bool) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Initialize paths and settings
    let paths = FintrackPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    // Initialize storage
    let storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    let ctx = Context {
        storage: &storage,
        settings: &settings,
        today: cli
            .today
            .unwrap_or_else(|| chrono::Local::now().date_naive()),
        format: cli.format,
    };

    match cli.command {
        Some(Commands::Account(cmd)) => handle_account_command(&ctx, cmd)?,
        Some(Commands::Category(cmd)) => handle_category_command(&ctx, cmd)?,
        Some(Commands::Transaction(cmd)) => handle_transaction_command(&ctx, cmd)?,
        Some(Commands::Budget(cmd)) => handle_budget_command(&ctx, cmd)?,
        Some(Commands::Goal(cmd)) => handle_goal_command(&ctx, cmd)?,
        Some(Commands::Report(cmd)) => handle_report_command(&ctx, cmd)?,
        Some(Commands::Init) => {
            println!("Initializing fintrack at: {}", paths.data_dir().display());
            settings.save(&paths)?;
            storage.save_all()?;
            println!("Initialization complete!");
            println!();
            println!("Next steps:");
            println!("  fintrack account add Checking --balance 1000");
            println!("  fintrack category add Food");
            println!("  fintrack transaction add Checking Food 12.50");
        }
        Some(Commands::Config) => {
            let a = &settings.analytics;
            println!("fintrack Configuration");
            println!("======================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!();
            println!("Analytics:");
            println!("  Smoothing alpha:     {}", a.smoothing_alpha);
            println!("  Warning threshold:   {}%", a.warning_threshold_pct);
            println!("  Exceeded threshold:  {}%", a.exceeded_threshold_pct);
            println!("  Behind tolerance:    {}", a.behind_tolerance);
            println!("  Min active periods:  {}", a.min_active_periods);
            println!("  Lookback periods:    {}", a.lookback_periods);
            println!("  Default granularity: {}", a.default_granularity);
        }
        None => {
            println!("fintrack - personal finance analytics");
            println!();
            println!("Run 'fintrack --help' for usage information.");
        }
    }

    Ok(())
}
