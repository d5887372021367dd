use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::debug;

use property_cli::app::{self, PropertyArgs};
use property_cli::logging;
use property_cli::report::{OutputFormat, render_list};
use property_core::PropertyRepository;
use property_core::db::DbConfig;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Rental property calculator.
///
/// Derives cash flow, cap rate, cash-on-cash return and the 1% and 50%
/// rules for long-term or short-term rentals, and keeps saved scenarios
/// in a local database so they can be revisited or shared.
#[derive(Debug, Parser)]
#[command(name = "property-eval", version, about)]
struct Cli {
    /// Database backend to use.
    #[arg(long, global = true, default_value = "sqlite")]
    backend: String,

    /// Database connection string.
    /// For SQLite this is a file path (e.g. `properties.db`) or `:memory:`.
    #[arg(long, global = true, default_value = "properties.db")]
    db: String,

    /// Output format.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Base of the links printed for saved properties.
    #[arg(long, global = true, default_value = "http://localhost:3000")]
    base_url: String,

    /// Also append log records to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `property_core=trace`. Overrides RUST_LOG.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Save a new property from defaults plus any overrides
    New(PropertyArgs),
    /// Show a saved property and its KPIs
    Show { id: String },
    /// List saved properties, most recently updated first
    List,
    /// Change fields of a saved property
    Update {
        id: String,
        #[command(flatten)]
        fields: PropertyArgs,
    },
    /// Delete a saved property
    Delete { id: String },
    /// Print the share link of a saved property
    Share { id: String },
    /// Compute KPIs without saving anything
    Evaluate(PropertyArgs),
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logging::init_default_logging();
    if let Some(level) = &cli.log_level {
        logging::set_log_level(level)?;
    }
    if let Some(path) = &cli.log_file {
        logging::enable_file_logging(path)?;
    }

    let output = run(&cli).await?;
    println!("{output}");
    Ok(())
}

async fn open_repository(cli: &Cli) -> anyhow::Result<Box<dyn PropertyRepository>> {
    let db_config = DbConfig::new(&cli.backend, &cli.db);
    debug!("connecting to {} backend", db_config.backend);
    app::build_registry()
        .create(&db_config)
        .await
        .with_context(|| format!("Failed to open database: {}", db_config.connection_string))
}

/// Runs the chosen subcommand and returns what it prints. Only commands
/// that touch saved properties open the database.
async fn run(cli: &Cli) -> anyhow::Result<String> {
    let output = match &cli.command {
        Command::Evaluate(args) => app::evaluate(args)?.render(cli.format)?,
        Command::New(args) => {
            let repo = open_repository(cli).await?;
            let property = app::create_property(&*repo, args).await?;
            format!(
                "{}\n{}",
                property.id,
                app::share_url(&cli.base_url, &property.id)
            )
        }
        Command::Show { id } => {
            let repo = open_repository(cli).await?;
            let property = app::get_property(&*repo, id).await?;
            app::saved_report(&property, &cli.base_url).render(cli.format)?
        }
        Command::List => {
            let repo = open_repository(cli).await?;
            let properties = app::list_properties(&*repo).await?;
            render_list(&properties, cli.format)?
        }
        Command::Update { id, fields } => {
            let repo = open_repository(cli).await?;
            let property = app::update_property(&*repo, id, fields).await?;
            app::saved_report(&property, &cli.base_url).render(cli.format)?
        }
        Command::Delete { id } => {
            let repo = open_repository(cli).await?;
            app::delete_property(&*repo, id).await?;
            format!("Deleted {id}")
        }
        Command::Share { id } => {
            let repo = open_repository(cli).await?;
            let property = app::get_property(&*repo, id).await?;
            app::share_url(&cli.base_url, &property.id)
        }
    };
    Ok(output)
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_follow_subcommands() {
        let cli = Cli::try_parse_from([
            "property-eval",
            "show",
            "abc",
            "--format",
            "json",
            "--db",
            ":memory:",
        ])
        .expect("parse");

        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.db, ":memory:");
        assert!(matches!(cli.command, Command::Show { ref id } if id == "abc"));
    }

    #[test]
    fn evaluate_accepts_field_overrides() {
        let cli = Cli::try_parse_from([
            "property-eval",
            "evaluate",
            "--mode",
            "STR",
            "--average-nightly-rent",
            "199.50",
            "--months",
            "180",
        ])
        .expect("parse");

        let Command::Evaluate(args) = cli.command else {
            panic!("expected evaluate");
        };
        let details = args.to_details();
        assert_eq!(details.mode, property_core::RentalMode::Str);
        assert_eq!(details.average_nightly_rent.to_string(), "199.50");
        assert_eq!(details.months, 180);
    }

    #[test]
    fn unknown_mode_is_rejected() {
        assert!(Cli::try_parse_from(["property-eval", "new", "--mode", "weekly"]).is_err());
    }

    #[tokio::test]
    async fn evaluate_never_opens_a_database() {
        let cli = Cli::try_parse_from(["property-eval", "--backend", "postgres", "evaluate"])
            .expect("parse");

        let output = run(&cli).await.expect("evaluate");

        assert!(output.contains("Cash-on-cash return"));
    }

    #[tokio::test]
    async fn stored_commands_open_the_configured_backend() {
        let cli = Cli::try_parse_from(["property-eval", "--backend", "postgres", "list"])
            .expect("parse");

        let err = run(&cli).await.unwrap_err();

        assert!(err.to_string().starts_with("Failed to open database"));
    }

    #[tokio::test]
    async fn new_prints_id_and_share_link() {
        let cli = Cli::try_parse_from(["property-eval", "--db", ":memory:", "new"]).expect("parse");

        let output = run(&cli).await.expect("new");

        let (id, link) = output.split_once('\n').expect("two lines");
        assert_eq!(link, format!("http://localhost:3000/property/{id}"));
    }
}
