use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use property_core::db::{DbConfig, RepositoryRegistry};
use property_data::PropertyLoader;
use property_db_sqlite::SqliteRepositoryFactory;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Import saved property scenarios from a CSV file.
///
/// The file needs a header row naming the columns: purchase_price,
/// monthly_rent, average_nightly_rent, occupancy_rate, insurance, loan_rate,
/// ltv, months, taxes_yearly, closing, vacancy_rate, management_rate,
/// capital_expenditures_rate and repair_rate are required; url, notes, mode,
/// total_rehab_cost and post_rehab_value may be left empty.
#[derive(Parser, Debug)]
#[command(name = "property-data-loader")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the CSV file
    #[arg(short, long)]
    file: PathBuf,

    /// Database path, `:memory:` or a `sqlite:` URL; created if missing
    #[arg(short, long, default_value = "properties.db")]
    database: String,

    /// Storage backend
    #[arg(long, default_value = "sqlite")]
    backend: String,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::from("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .without_time()
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let mut registry = RepositoryRegistry::new();
    registry.register(Box::new(SqliteRepositoryFactory));

    let config = DbConfig::new(args.backend, args.database);
    let repo = registry
        .create(&config)
        .await
        .with_context(|| format!("Failed to open database: {}", config.connection_string))?;

    info!(file = %args.file.display(), "Loading properties");

    let file = File::open(&args.file)
        .with_context(|| format!("Failed to open: {}", args.file.display()))?;

    let records = PropertyLoader::parse(file)
        .with_context(|| format!("Failed to parse CSV: {}", args.file.display()))?;

    let created = PropertyLoader::load(&*repo, &records)
        .await
        .context("Failed to load properties into database")?;

    for property in &created {
        println!("{}", property.id);
    }
    println!("Imported {} properties.", created.len());

    Ok(())
}
