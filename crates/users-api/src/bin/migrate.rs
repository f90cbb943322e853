use clap::{Parser, Subcommand};

use users_api::config::ApiConfig;
use users_api::db::db_connect;
use users_api::handlers::migrations::{migrate_down, migrate_up, migration_status, MigrationSummary};
use users_api::logging::init_logging;

#[derive(Parser)]
#[command(name = "users-api-migrate")]
#[command(about = "Apply or inspect users-api database migrations")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending migrations
    Up {
        /// Apply at most this many migrations
        #[arg(long)]
        steps: Option<u32>,
    },
    /// Show applied and pending migrations
    Status,
    /// Roll back migrations
    Down {
        /// Number of migrations to roll back
        #[arg(long, default_value_t = 1)]
        steps: u32,
    },
}

fn print_summary(summary: &MigrationSummary) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(summary)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    init_logging();

    let cli = Cli::parse();
    let config = ApiConfig::from_env()?;
    let db = db_connect(&config).await?;

    let summary = match cli.command {
        Commands::Up { steps } => migrate_up(&db, steps).await?,
        Commands::Status => migration_status(&db).await?,
        Commands::Down { steps } => migrate_down(&db, Some(steps)).await?,
    };

    print_summary(&summary)
}
