use std::collections::HashMap;

use async_trait::async_trait;
use tracing::debug;

use super::repository::{PropertyRepository, RepositoryError};

/// Which storage backend to open and how to reach it.
///
/// `connection_string` is handed to the matching factory untouched.
///
/// | backend  | connection_string examples                          |
/// |----------|-----------------------------------------------------|
/// | `sqlite` | `properties.db`, `:memory:`, `sqlite:///tmp/p.db`   |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub backend: String,
    pub connection_string: String,
}

impl DbConfig {
    pub fn new(
        backend: impl Into<String>,
        connection_string: impl Into<String>,
    ) -> Self {
        Self {
            backend: backend.into(),
            connection_string: connection_string.into(),
        }
    }
}

impl Default for DbConfig {
    fn default() -> Self {
        Self::new("sqlite", ":memory:")
    }
}

/// Opens a [`PropertyRepository`] for one backend. Backend crates export a
/// unit struct implementing this and the binaries register it at startup.
#[async_trait]
pub trait RepositoryFactory: Send + Sync {
    /// Lowercase backend key, e.g. `"sqlite"`.
    fn backend_name(&self) -> &'static str;

    /// Connects and returns a repository whose schema is ready for use.
    async fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Box<dyn PropertyRepository>, RepositoryError>;
}

/// Backend factories keyed by [`RepositoryFactory::backend_name`].
#[derive(Default)]
pub struct RepositoryRegistry {
    factories: HashMap<&'static str, Box<dyn RepositoryFactory>>,
}

impl RepositoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `factory`, replacing any earlier one with the same name.
    pub fn register(
        &mut self,
        factory: Box<dyn RepositoryFactory>,
    ) {
        self.factories.insert(factory.backend_name(), factory);
    }

    pub fn available_backends(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.factories.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Opens a repository through the factory named by `config.backend`.
    ///
    /// # Errors
    /// [`RepositoryError::Configuration`] when the backend is not registered,
    /// otherwise whatever the factory reports.
    pub async fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Box<dyn PropertyRepository>, RepositoryError> {
        let Some(factory) = self.factories.get(config.backend.as_str()) else {
            return Err(RepositoryError::Configuration(format!(
                "unknown backend '{}'; available: {:?}",
                config.backend,
                self.available_backends()
            )));
        };

        debug!(
            backend = %config.backend,
            connection = %config.connection_string,
            "Opening property repository"
        );
        factory.create(config).await
    }
}
