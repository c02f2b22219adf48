use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod collect;
mod report;

#[derive(Debug, Parser)]
#[command(name = "dsense")]
#[command(about = "Demand-signal sensing: daily hashtag and marketplace metrics")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Apply migrations and register the watchlist's dimension rows.
    Init,
    /// Run the collection pipeline for one source or all of them.
    Collect {
        #[arg(long, value_enum, default_value_t = collect::SourceArg::All)]
        source: collect::SourceArg,
        /// Fetch and extract but skip all database writes.
        #[arg(long)]
        dry_run: bool,
    },
    /// Print collected metrics for a date range.
    Report {
        #[command(subcommand)]
        kind: report::ReportKind,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = dsense_core::load_app_config()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    ensure_sqlite_parent_dir(&config.database_url)?;

    let pool_config = dsense_db::PoolConfig::from_app_config(&config);
    let pool = dsense_db::connect_pool(&config.database_url, pool_config).await?;

    let cli = Cli::parse();
    match cli.command {
        Commands::Init => {
            let applied = dsense_db::run_migrations(&pool).await?;
            tracing::info!(applied, "migrations complete");

            let watchlist = dsense_core::load_watchlist(&config.watchlist_path)?;
            let summary = dsense_db::seed_watchlist(&pool, &watchlist).await?;
            println!(
                "initialized: {} migration(s) applied, {} hashtag(s) and {} product(s) registered",
                applied, summary.hashtags, summary.products
            );
        }
        Commands::Collect { source, dry_run } => {
            let watchlist = dsense_core::load_watchlist(&config.watchlist_path)?;
            collect::run(&pool, &config, &watchlist, source, dry_run).await?;
        }
        Commands::Report { kind } => {
            report::run(&pool, kind).await?;
        }
    }

    Ok(())
}

/// Creates the directory that will hold a file-backed SQLite database.
///
/// `create_if_missing` creates the file but not its parent directory.
/// In-memory URLs and bare paths without a parent are left alone.
fn ensure_sqlite_parent_dir(database_url: &str) -> anyhow::Result<()> {
    let Some(raw_path) = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))
    else {
        return Ok(());
    };
    let path = raw_path.split('?').next().unwrap_or(raw_path);
    if path.is_empty() || path == ":memory:" {
        return Ok(());
    }
    if let Some(parent) = std::path::Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
