//! Resource Service - operator commands for the persistence layer.

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use resource_service_lib::{BucketAction, MigrateAction};

#[derive(Parser)]
#[command(name = "resource-service")]
#[command(about = "Schema and object-store provisioning for resource persistence")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Database migration commands
    Migrate {
        #[command(subcommand)]
        action: MigrateCommands,
    },
    /// Upload bucket commands
    Bucket {
        #[command(subcommand)]
        action: BucketCommands,
    },
}

#[derive(Subcommand)]
enum MigrateCommands {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset database and run all migrations
    Fresh,
}

#[derive(Subcommand)]
enum BucketCommands {
    /// Create the upload bucket if missing
    Ensure,
    /// Report whether the upload bucket exists
    Check,
    /// Delete the (empty) upload bucket
    Drop,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Migrate { action } => {
            let migrate_action = match action {
                MigrateCommands::Up => MigrateAction::Up,
                MigrateCommands::Down => MigrateAction::Down,
                MigrateCommands::Status => MigrateAction::Status,
                MigrateCommands::Fresh => MigrateAction::Fresh,
            };
            resource_service_lib::run_migrations(migrate_action).await?;
        }
        Commands::Bucket { action } => {
            let bucket_action = match action {
                BucketCommands::Ensure => BucketAction::Ensure,
                BucketCommands::Check => BucketAction::Check,
                BucketCommands::Drop => BucketAction::Drop,
            };
            resource_service_lib::run_bucket_command(bucket_action).await?;
        }
    }

    Ok(())
}
