//! ModelRepository trait definition.

use parley_types::error::RepositoryError;
use parley_types::model::ModelEntry;
use uuid::Uuid;

/// Repository trait for the model registry.
pub trait ModelRepository: Send + Sync {
    /// Insert a new model entry.
    fn insert(
        &self,
        entry: &ModelEntry,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Get a model entry by id.
    fn get(
        &self,
        model_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<ModelEntry>, RepositoryError>> + Send;

    /// List all model entries, oldest first.
    fn list(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<ModelEntry>, RepositoryError>> + Send;

    /// Delete a model entry. `NotFound` when it does not exist.
    fn delete(
        &self,
        model_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Get the current default entry, if any.
    fn get_default(
        &self,
    ) -> impl std::future::Future<Output = Result<Option<ModelEntry>, RepositoryError>> + Send;

    /// Insert a new entry as the sole default.
    ///
    /// Implementations must clear existing flags and insert the entry in a
    /// single transaction: a failed insert must leave the old default alone.
    fn insert_default(
        &self,
        entry: &ModelEntry,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Make `model_id` the sole default.
    ///
    /// Implementations must clear all other flags and set the new one in a
    /// single transaction so no moment exposes two defaults.
    fn set_default(
        &self,
        model_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Total number of entries.
    fn count(&self) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;
}
