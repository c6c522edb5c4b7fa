//! Model registry administration.
//!
//! Registry invariant: exactly one entry carries the default flag
//! whenever the registry is non-empty. Adding a default clears the
//! others first; deleting the default promotes a survivor; the last
//! remaining entry cannot be deleted.

use parley_types::error::ModelError;
use parley_types::model::ModelEntry;
use tracing::info;
use uuid::Uuid;

use crate::repository::model::ModelRepository;

/// Manages the list of callable models.
pub struct ModelRegistry<M: ModelRepository> {
    repo: M,
}

impl<M: ModelRepository> ModelRegistry<M> {
    pub fn new(repo: M) -> Self {
        Self { repo }
    }

    /// List all entries.
    pub async fn list(&self) -> Result<Vec<ModelEntry>, ModelError> {
        Ok(self.repo.list().await?)
    }

    /// Add an entry.
    ///
    /// The first entry added to an empty registry becomes default
    /// regardless of the flag, keeping the invariant intact.
    pub async fn add(
        &self,
        name: &str,
        model_ref: &str,
        make_default: bool,
    ) -> Result<ModelEntry, ModelError> {
        if name.trim().is_empty() || model_ref.trim().is_empty() {
            return Err(ModelError::MissingFields);
        }

        let registry_empty = self.repo.count().await? == 0;
        let make_default = make_default || registry_empty;

        let entry = ModelEntry::new(name.trim().to_string(), model_ref.trim().to_string(), make_default);
        // insert_default demotes the old default and inserts in one
        // transaction: a failed insert cannot leave the registry with
        // zero defaults.
        if make_default {
            self.repo.insert_default(&entry).await?;
        } else {
            self.repo.insert(&entry).await?;
        }
        info!(name = %entry.name, model_ref = %entry.model_ref, is_default = entry.is_default, "Model added");
        Ok(entry)
    }

    /// Delete an entry.
    ///
    /// Rejected for the sole remaining entry. When the deleted entry was
    /// the default, an arbitrary survivor is promoted.
    pub async fn delete(&self, model_id: &Uuid) -> Result<(), ModelError> {
        let entry = self
            .repo
            .get(model_id)
            .await?
            .ok_or(ModelError::NotFound)?;

        if self.repo.count().await? <= 1 {
            return Err(ModelError::LastEntry);
        }

        self.repo.delete(model_id).await?;

        if entry.is_default {
            if let Some(survivor) = self.repo.list().await?.into_iter().next() {
                self.repo.set_default(&survivor.id).await?;
                info!(name = %survivor.name, "Default model reassigned");
            }
        }

        info!(name = %entry.name, "Model deleted");
        Ok(())
    }

    /// Make an entry the sole default.
    pub async fn set_default(&self, model_id: &Uuid) -> Result<ModelEntry, ModelError> {
        let entry = self
            .repo
            .get(model_id)
            .await?
            .ok_or(ModelError::NotFound)?;
        self.repo.set_default(model_id).await?;
        info!(name = %entry.name, "Default model set");
        Ok(ModelEntry {
            is_default: true,
            ..entry
        })
    }

    /// Seed one default entry when the registry is empty.
    ///
    /// Returns the created entry, or `None` when entries already exist.
    pub async fn bootstrap_default(
        &self,
        name: &str,
        model_ref: &str,
    ) -> Result<Option<ModelEntry>, ModelError> {
        if self.repo.count().await? > 0 {
            return Ok(None);
        }
        let entry = self.add(name, model_ref, true).await?;
        info!(name = %name, "Bootstrap default model seeded");
        Ok(Some(entry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_types::error::RepositoryError;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemModelRepo {
        entries: Mutex<Vec<ModelEntry>>,
        fail_inserts: AtomicBool,
    }

    impl ModelRepository for MemModelRepo {
        async fn insert(&self, entry: &ModelEntry) -> Result<(), RepositoryError> {
            if self.fail_inserts.load(Ordering::SeqCst) {
                return Err(RepositoryError::Query("disk full".to_string()));
            }
            self.entries.lock().unwrap().push(entry.clone());
            Ok(())
        }

        async fn get(&self, model_id: &Uuid) -> Result<Option<ModelEntry>, RepositoryError> {
            Ok(self
                .entries
                .lock()
                .unwrap()
                .iter()
                .find(|e| e.id == *model_id)
                .cloned())
        }

        async fn list(&self) -> Result<Vec<ModelEntry>, RepositoryError> {
            Ok(self.entries.lock().unwrap().clone())
        }

        async fn delete(&self, model_id: &Uuid) -> Result<(), RepositoryError> {
            let mut entries = self.entries.lock().unwrap();
            let before = entries.len();
            entries.retain(|e| e.id != *model_id);
            if entries.len() == before {
                return Err(RepositoryError::NotFound);
            }
            Ok(())
        }

        async fn get_default(&self) -> Result<Option<ModelEntry>, RepositoryError> {
            Ok(self
                .entries
                .lock()
                .unwrap()
                .iter()
                .find(|e| e.is_default)
                .cloned())
        }

        async fn insert_default(&self, entry: &ModelEntry) -> Result<(), RepositoryError> {
            if self.fail_inserts.load(Ordering::SeqCst) {
                return Err(RepositoryError::Query("disk full".to_string()));
            }
            let mut entries = self.entries.lock().unwrap();
            for existing in entries.iter_mut() {
                existing.is_default = false;
            }
            entries.push(ModelEntry {
                is_default: true,
                ..entry.clone()
            });
            Ok(())
        }

        async fn set_default(&self, model_id: &Uuid) -> Result<(), RepositoryError> {
            let mut entries = self.entries.lock().unwrap();
            if !entries.iter().any(|e| e.id == *model_id) {
                return Err(RepositoryError::NotFound);
            }
            for entry in entries.iter_mut() {
                entry.is_default = entry.id == *model_id;
            }
            Ok(())
        }

        async fn count(&self) -> Result<u64, RepositoryError> {
            Ok(self.entries.lock().unwrap().len() as u64)
        }
    }

    fn registry() -> ModelRegistry<MemModelRepo> {
        ModelRegistry::new(MemModelRepo::default())
    }

    async fn default_count(registry: &ModelRegistry<MemModelRepo>) -> usize {
        registry
            .list()
            .await
            .unwrap()
            .iter()
            .filter(|e| e.is_default)
            .count()
    }

    #[tokio::test]
    async fn test_first_entry_becomes_default() {
        let registry = registry();
        let entry = registry
            .add("Claude", "anthropic.claude-sonnet-4-20250514-v1:0", false)
            .await
            .unwrap();
        assert!(entry.is_default);
        assert_eq!(default_count(&registry).await, 1);
    }

    #[tokio::test]
    async fn test_add_default_unsets_previous() {
        let registry = registry();
        let first = registry.add("A", "anthropic.a-v1:0", true).await.unwrap();
        let second = registry.add("B", "meta.b-v1:0", true).await.unwrap();

        let entries = registry.list().await.unwrap();
        assert_eq!(default_count(&registry).await, 1);
        assert!(!entries.iter().find(|e| e.id == first.id).unwrap().is_default);
        assert!(entries.iter().find(|e| e.id == second.id).unwrap().is_default);
    }

    #[tokio::test]
    async fn test_add_non_default_keeps_existing_default() {
        let registry = registry();
        let first = registry.add("A", "anthropic.a-v1:0", true).await.unwrap();
        let second = registry.add("B", "meta.b-v1:0", false).await.unwrap();

        let entries = registry.list().await.unwrap();
        assert!(entries.iter().find(|e| e.id == first.id).unwrap().is_default);
        assert!(!entries.iter().find(|e| e.id == second.id).unwrap().is_default);
    }

    #[tokio::test]
    async fn test_failed_default_add_keeps_old_default() {
        let registry = registry();
        let first = registry.add("A", "anthropic.a-v1:0", true).await.unwrap();

        registry.repo.fail_inserts.store(true, Ordering::SeqCst);
        registry.add("B", "meta.b-v1:0", true).await.unwrap_err();
        registry.repo.fail_inserts.store(false, Ordering::SeqCst);

        let entries = registry.list().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(default_count(&registry).await, 1);
        assert!(entries.iter().find(|e| e.id == first.id).unwrap().is_default);
    }

    #[tokio::test]
    async fn test_missing_fields_rejected() {
        let registry = registry();
        let err = registry.add("", "ref", false).await.unwrap_err();
        assert!(matches!(err, ModelError::MissingFields));
        let err = registry.add("name", "  ", false).await.unwrap_err();
        assert!(matches!(err, ModelError::MissingFields));
    }

    #[tokio::test]
    async fn test_last_entry_cannot_be_deleted() {
        let registry = registry();
        let only = registry.add("A", "anthropic.a-v1:0", true).await.unwrap();
        let err = registry.delete(&only.id).await.unwrap_err();
        assert!(matches!(err, ModelError::LastEntry));
        assert_eq!(registry.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_deleting_default_promotes_survivor() {
        let registry = registry();
        let first = registry.add("A", "anthropic.a-v1:0", true).await.unwrap();
        let second = registry.add("B", "meta.b-v1:0", false).await.unwrap();

        registry.delete(&first.id).await.unwrap();

        let entries = registry.list().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, second.id);
        assert!(entries[0].is_default);
    }

    #[tokio::test]
    async fn test_deleting_non_default_keeps_default() {
        let registry = registry();
        let first = registry.add("A", "anthropic.a-v1:0", true).await.unwrap();
        let second = registry.add("B", "meta.b-v1:0", false).await.unwrap();

        registry.delete(&second.id).await.unwrap();

        let entries = registry.list().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, first.id);
        assert!(entries[0].is_default);
    }

    #[tokio::test]
    async fn test_set_default_switches_flag() {
        let registry = registry();
        registry.add("A", "anthropic.a-v1:0", true).await.unwrap();
        let second = registry.add("B", "meta.b-v1:0", false).await.unwrap();

        let updated = registry.set_default(&second.id).await.unwrap();
        assert!(updated.is_default);
        assert_eq!(default_count(&registry).await, 1);
    }

    #[tokio::test]
    async fn test_set_default_unknown_entry() {
        let registry = registry();
        registry.add("A", "anthropic.a-v1:0", true).await.unwrap();
        let err = registry.set_default(&Uuid::now_v7()).await.unwrap_err();
        assert!(matches!(err, ModelError::NotFound));
    }

    #[tokio::test]
    async fn test_bootstrap_only_seeds_empty_registry() {
        let registry = registry();
        let first = registry
            .bootstrap_default("Claude", "anthropic.claude-sonnet-4-20250514-v1:0")
            .await
            .unwrap();
        assert!(first.is_some());

        let second = registry
            .bootstrap_default("Other", "meta.llama3-70b-instruct-v1:0")
            .await
            .unwrap();
        assert!(second.is_none());
        assert_eq!(registry.list().await.unwrap().len(), 1);
    }
}
