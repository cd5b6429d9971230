use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use spsi_lib::domain::entities::SubmissionFilter;
use spsi_lib::domain::value_objects::SubmissionStatus;
use spsi_lib::infrastructure::ConnectionPool;
use spsi_lib::presentation::dto::offline_dto::{DrainSummaryResponse, OfflineEntryResponse};
use spsi_lib::presentation::dto::stats_dto::StatsResponse;
use spsi_lib::presentation::dto::submission_dto::SubmissionResponse;
use spsi_lib::{AppConfig, AppState};
use serde::Serialize;
use tracing::info;

#[derive(Parser)]
#[command(name = "spsi-collect")]
#[command(about = "Operator tools for field submissions and the offline queue", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Database URL (overrides SPSI_DATABASE_URL)
    #[arg(long, env = "SPSI_DATABASE_URL")]
    database_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List submissions, newest first
    List {
        /// Only submissions with this status (pending, approved, rejected)
        #[arg(long)]
        status: Option<String>,
        /// Only submissions by this supervisor id
        #[arg(long)]
        supervisor: Option<String>,
    },
    /// Show drafts waiting in the offline queue
    Queue,
    /// Drain the offline queue once and print the summary
    Sync,
    /// Print dashboard statistics
    Stats,
    /// Apply database migrations
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    spsi_lib::init_logging();

    let mut config = AppConfig::from_env();
    if let Some(url) = cli.database_url {
        config.database.url = url;
    }
    // One-shot commands must not leave a background drain running at exit.
    config.sync.auto_sync = false;
    config.sync.sync_on_reconnect = false;

    if let Commands::Migrate = cli.command {
        let pool = ConnectionPool::new(&config.database.url, config.database.max_connections)
            .await
            .context("failed to open database")?;
        pool.migrate().await.context("failed to run migrations")?;
        pool.close().await;
        info!("Migrations applied");
        return Ok(());
    }

    let state = AppState::initialize(config)
        .await
        .context("failed to initialize application state")?;

    let outcome = run(&state, cli.command).await;
    state.shutdown().await;
    outcome
}

async fn run(state: &AppState, command: Commands) -> Result<()> {
    match command {
        Commands::List { status, supervisor } => {
            let mut filter = match supervisor {
                Some(id) => SubmissionFilter::by_supervisor(id),
                None => SubmissionFilter::all(),
            };
            if let Some(status) = status {
                let status = status
                    .parse::<SubmissionStatus>()
                    .map_err(anyhow::Error::msg)?;
                filter = filter.with_status(status);
            }
            let submissions = state.lifecycle.list(filter).await?;
            let rows = submissions
                .into_iter()
                .map(SubmissionResponse::try_from)
                .collect::<Result<Vec<_>, _>>()?;
            print_json(&rows)
        }
        Commands::Queue => {
            let entries = state.offline_queue.list().await?;
            let rows: Vec<OfflineEntryResponse> =
                entries.iter().map(OfflineEntryResponse::from).collect();
            print_json(&rows)
        }
        Commands::Sync => {
            let summary = state.sync_service.drain_all().await?;
            let pending = state.offline_queue.pending_count().await?;
            print_json(&DrainSummaryResponse::new(summary, pending))
        }
        Commands::Stats => {
            let stats = state.stats_service.summary().await?;
            print_json(&StatsResponse::from(stats))
        }
        Commands::Migrate => Ok(()),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
