//! SQLite model registry repository.
//!
//! `set_default` and `insert_default` clear the old default flag and write
//! the new one inside a single writer transaction so no reader ever
//! observes two defaults (or zero, on a non-empty registry).

use parley_core::repository::model::ModelRepository;
use parley_types::error::RepositoryError;
use parley_types::model::ModelEntry;
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `ModelRepository`.
pub struct SqliteModelRepository {
    pool: DatabasePool,
}

impl SqliteModelRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct ModelRow {
    id: String,
    name: String,
    model_ref: String,
    is_default: i64,
}

impl ModelRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            model_ref: row.try_get("model_ref")?,
            is_default: row.try_get("is_default")?,
        })
    }

    fn into_entry(self) -> Result<ModelEntry, RepositoryError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| RepositoryError::Query(format!("invalid model id: {e}")))?;

        Ok(ModelEntry {
            id,
            name: self.name,
            model_ref: self.model_ref,
            is_default: self.is_default != 0,
        })
    }
}

impl ModelRepository for SqliteModelRepository {
    async fn insert(&self, entry: &ModelEntry) -> Result<(), RepositoryError> {
        sqlx::query("INSERT INTO models (id, name, model_ref, is_default) VALUES (?, ?, ?, ?)")
            .bind(entry.id.to_string())
            .bind(&entry.name)
            .bind(&entry.model_ref)
            .bind(entry.is_default as i64)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn get(&self, model_id: &Uuid) -> Result<Option<ModelEntry>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM models WHERE id = ?")
            .bind(model_id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let model_row =
                    ModelRow::from_row(&row).map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(model_row.into_entry()?))
            }
            None => Ok(None),
        }
    }

    async fn list(&self) -> Result<Vec<ModelEntry>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM models ORDER BY id ASC")
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        rows.iter()
            .map(|row| {
                let model_row =
                    ModelRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
                model_row.into_entry()
            })
            .collect()
    }

    async fn delete(&self, model_id: &Uuid) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM models WHERE id = ?")
            .bind(model_id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn get_default(&self) -> Result<Option<ModelEntry>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM models WHERE is_default = 1 LIMIT 1")
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let model_row =
                    ModelRow::from_row(&row).map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(model_row.into_entry()?))
            }
            None => Ok(None),
        }
    }

    async fn insert_default(&self, entry: &ModelEntry) -> Result<(), RepositoryError> {
        let mut tx = self
            .pool
            .writer
            .begin()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        sqlx::query("UPDATE models SET is_default = 0 WHERE is_default = 1")
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        sqlx::query("INSERT INTO models (id, name, model_ref, is_default) VALUES (?, ?, ?, 1)")
            .bind(entry.id.to_string())
            .bind(&entry.name)
            .bind(&entry.model_ref)
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn set_default(&self, model_id: &Uuid) -> Result<(), RepositoryError> {
        let mut tx = self
            .pool
            .writer
            .begin()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        sqlx::query("UPDATE models SET is_default = 0 WHERE is_default = 1")
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let result = sqlx::query("UPDATE models SET is_default = 1 WHERE id = ?")
            .bind(model_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        tx.commit()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        let row = sqlx::query("SELECT COUNT(*) as cnt FROM models")
            .fetch_one(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let count: i64 = row
            .try_get("cnt")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(count as u64)
    }
}
