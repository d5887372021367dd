use std::str::FromStr;

use async_trait::async_trait;
use property_core::db::{DbConfig, RepositoryFactory};
use property_core::{PropertyRepository, RepositoryError};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::debug;

use crate::repository::SqliteRepository;

const IN_MEMORY: &str = ":memory:";

/// How a connection string should be opened.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Target<'a> {
    Memory,
    Url(&'a str),
    Path(&'a str),
}

fn classify(connection_string: &str) -> Target<'_> {
    let trimmed = connection_string.trim();
    if trimmed == IN_MEMORY || trimmed == "sqlite::memory:" {
        Target::Memory
    } else if trimmed.starts_with("sqlite:") {
        Target::Url(trimmed)
    } else {
        Target::Path(trimmed)
    }
}

fn connect_options(target: &Target<'_>) -> Result<SqliteConnectOptions, sqlx::Error> {
    let options = match target {
        Target::Memory => SqliteConnectOptions::from_str("sqlite::memory:")?,
        Target::Url(url) => SqliteConnectOptions::from_str(url)?,
        Target::Path(path) => SqliteConnectOptions::new().filename(path),
    };
    Ok(options.create_if_missing(true))
}

/// [`RepositoryFactory`] for the `"sqlite"` backend.
///
/// ```rust,no_run
/// use property_core::db::RepositoryRegistry;
/// use property_db_sqlite::SqliteRepositoryFactory;
///
/// let mut registry = RepositoryRegistry::new();
/// registry.register(Box::new(SqliteRepositoryFactory));
/// ```
///
/// Connection strings may be `:memory:`, a bare file path (created when
/// missing) or a full `sqlite:` URL. Migrations run before the repository
/// is returned.
pub struct SqliteRepositoryFactory;

#[async_trait]
impl RepositoryFactory for SqliteRepositoryFactory {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    async fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Box<dyn PropertyRepository>, RepositoryError> {
        let target = classify(&config.connection_string);
        let options = connect_options(&target)
            .map_err(|e| RepositoryError::Configuration(e.to_string()))?;

        // An in-memory database lives only as long as its connection.
        let pool_options = match target {
            Target::Memory => SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None),
            _ => SqlitePoolOptions::new(),
        };

        debug!(connection = ?target, "Connecting to SQLite");
        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| RepositoryError::Connection(e.to_string()))?;

        let repo = SqliteRepository::new_with_pool(pool).await;
        repo.run_migrations()
            .await
            .map_err(|e| RepositoryError::Database(format!("{e:#}")))?;

        Ok(Box::new(repo))
    }
}
