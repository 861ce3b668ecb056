use anyhow::Context;
use clap::{Parser, Subcommand};
use rapport_core::Error;
use rapport_service::{
    RestProfileStore, ServiceOptions, SimilarityService, StoreConfig, DEFAULT_TOP_N,
};
use rapport_storage::{SnapshotStore, DEFAULT_SNAPSHOT_FILE};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Profile compatibility scoring over one-hot behavioral encodings
#[derive(Parser, Debug)]
#[command(name = "rapport")]
#[command(about = "Profile compatibility scoring engine", long_about = None)]
struct Args {
    /// Path to the snapshot artifact
    #[arg(long, default_value = DEFAULT_SNAPSHOT_FILE)]
    snapshot: PathBuf,

    /// Error on unknown user ids instead of returning neutral scores
    #[arg(long)]
    strict_ids: bool,

    /// Treat an unusable snapshot as fatal instead of rebuilding
    #[arg(long)]
    strict_snapshot: bool,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the similarity score between two users
    Similarity { user_a: String, user_b: String },

    /// Print the most similar users to a target, as JSON
    SimilarUsers {
        user_id: String,

        /// Maximum number of neighbors to return
        #[arg(long, default_value_t = DEFAULT_TOP_N)]
        top: usize,
    },

    /// Print the overall score plus per-attribute breakdown, as JSON
    Compatibility { user_a: String, user_b: String },

    /// Rebuild the derived state from the profile store and persist it
    Refresh,

    /// Print readiness, generation shape, and snapshot metadata, as JSON
    Status,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Error: {e}");
        return ExitCode::FAILURE;
    }

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            let code = e.downcast_ref::<Error>().map_or(1, exit_code_for);
            ExitCode::from(code)
        }
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    info!("rapport v{}", env!("CARGO_PKG_VERSION"));
    info!("Snapshot path: {:?}", args.snapshot);

    let config = StoreConfig::from_env().context("profile store configuration")?;
    let options = ServiceOptions {
        strict_ids: args.strict_ids,
        lenient_snapshot_load: !args.strict_snapshot,
    };
    let service = SimilarityService::new(
        RestProfileStore::new(config),
        SnapshotStore::new(&args.snapshot),
        options,
    );

    match args.command {
        Command::Similarity { user_a, user_b } => {
            service.initialize().await?;
            let score = service.get_similarity(&user_a, &user_b)?;
            println!("{score}");
        }
        Command::SimilarUsers { user_id, top } => {
            service.initialize().await?;
            let ranked = service.get_similar_users(&user_id, top)?;
            print_json(&ranked)?;
        }
        Command::Compatibility { user_a, user_b } => {
            service.initialize().await?;
            let report = service.get_compatibility_breakdown(&user_a, &user_b)?;
            print_json(&report)?;
        }
        Command::Refresh => {
            service.refresh().await?;
            let status = service.status();
            info!(users = status.users, width = status.vector_width, "refresh complete");
        }
        Command::Status => {
            // Status reports the not-ready state instead of failing on it.
            if let Err(e) = service.initialize().await {
                info!("no generation available: {e}");
            }
            print_json(&service.status())?;
        }
    }

    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Deterministic exit codes, one per failure class.
fn exit_code_for(error: &Error) -> u8 {
    match error {
        Error::UnknownUser(_) => 2,
        Error::SnapshotMissing(_) | Error::SnapshotCorrupt(_) | Error::SnapshotVersion { .. } => 3,
        Error::StoreUnavailable(_) | Error::InvalidConfig(_) => 4,
        _ => 1,
    }
}
