use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Property, PropertyDetails};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Property not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Storage for saved property scenarios.
///
/// Implementations own identifier generation and timestamps; callers only
/// ever supply [`PropertyDetails`].
#[async_trait]
pub trait PropertyRepository: Send + Sync {
    /// Persists a new property and returns it with its generated id.
    async fn create_property(
        &self,
        details: PropertyDetails,
    ) -> Result<Property, RepositoryError>;

    async fn get_property(&self, id: &str) -> Result<Property, RepositoryError>;

    /// Overwrites the stored details of `property.id` and bumps `updated_at`.
    async fn update_property(&self, property: &Property) -> Result<(), RepositoryError>;

    async fn delete_property(&self, id: &str) -> Result<(), RepositoryError>;

    /// All properties, most recently updated first.
    async fn list_properties(&self) -> Result<Vec<Property>, RepositoryError>;
}
