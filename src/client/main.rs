/**
 * FinTrack Sync Entry Point
 *
 * Loads the user's snapshot from the local data directory and the backend,
 * reports divergence and optionally settles it.
 *
 * Usage:
 *   fintrack-sync                 load and print a summary
 *   fintrack-sync resolve local   keep the local copy for every category
 *   fintrack-sync resolve remote  adopt the backend copy for every category
 *   fintrack-sync push            push the current snapshot immediately
 */
use std::sync::Arc;

use fintrack::client::{
    Config, FileBackend, HttpGateway, LoadOutcome, Resolution, Side, SnapshotStore, SyncSession,
};
use fintrack::shared::Category;

enum Command {
    Status,
    Resolve(Side),
    Push,
}

fn parse_args() -> Result<Command, String> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        [] | ["status"] => Ok(Command::Status),
        ["resolve", "local"] => Ok(Command::Resolve(Side::Local)),
        ["resolve", "remote"] => Ok(Command::Resolve(Side::Remote)),
        ["push"] => Ok(Command::Push),
        other => Err(format!("Unknown arguments: {}", other.join(" "))),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&env_filter))
        .init();

    let command = parse_args()?;
    let config = Config::from_env()?;
    let data_dir = config.app().resolved_data_dir();
    tracing::info!("Using data directory {}", data_dir.display());

    let local = Arc::new(SnapshotStore::new(
        FileBackend::open(data_dir)?,
        &config.app().storage_namespace,
    ));
    let gateway = Arc::new(HttpGateway::new(config.clone())?);
    let mut session = SyncSession::new(config.app(), config.identity().clone(), local, gateway);

    let outcome = session.load().await?;
    match &outcome {
        LoadOutcome::FirstRun => println!("No saved data; starting from defaults"),
        LoadOutcome::LocalOnly => println!("Loaded local copy (not signed in)"),
        LoadOutcome::RemoteAdopted => println!("Loaded backend copy"),
        LoadOutcome::ConflictPending(categories) => {
            let names: Vec<&str> = categories.iter().map(Category::as_str).collect();
            println!("Local and backend copies differ in: {}", names.join(", "));
        }
        LoadOutcome::RemoteFallback { reason } => {
            println!("Backend unavailable ({}); using local copy", reason)
        }
    }

    match command {
        Command::Status => {}
        Command::Resolve(side) => {
            let report = session.resolve(Resolution::All(side)).await?;
            if let Some(report) = report {
                println!(
                    "Resolved: {} upserted, {} deleted, {} failed",
                    report.upserted,
                    report.deleted,
                    report.failures.len()
                );
            }
        }
        Command::Push => {
            if let Some(report) = session.sync_now().await? {
                println!(
                    "Pushed: {} upserted, {} deleted, {} failed",
                    report.upserted,
                    report.deleted,
                    report.failures.len()
                );
            } else {
                println!("Push skipped: resolve the pending conflict first");
            }
        }
    }

    let snapshot = session.snapshot();
    println!(
        "{} transactions, {} loans, {} deposits, {} debts, {} budgets, {} goals",
        snapshot.transactions.len(),
        snapshot.financial_products.loans.len(),
        snapshot.financial_products.deposits.len(),
        snapshot.debts.len(),
        snapshot.budgets.len(),
        snapshot.goals.len()
    );
    Ok(())
}
