//! SQLite account repository implementation.
//!
//! Implements `AccountRepository` from `parley-core` using sqlx with split
//! read/write pools: raw queries, private Row structs, reader for SELECTs,
//! writer for mutations.

use chrono::{DateTime, Utc};
use parley_core::repository::account::AccountRepository;
use parley_types::account::{Account, AuthToken};
use parley_types::error::RepositoryError;
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `AccountRepository`.
pub struct SqliteAccountRepository {
    pool: DatabasePool,
}

impl SqliteAccountRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to domain Account.
struct AccountRow {
    id: String,
    username: String,
    password_hash: String,
    created_at: String,
}

impl AccountRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            username: row.try_get("username")?,
            password_hash: row.try_get("password_hash")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_account(self) -> Result<Account, RepositoryError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| RepositoryError::Query(format!("invalid account id: {e}")))?;
        let created_at = parse_datetime(&self.created_at)?;

        Ok(Account {
            id,
            username: self.username,
            password_hash: self.password_hash,
            created_at,
        })
    }
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

fn map_insert_err(username: &str, e: sqlx::Error) -> RepositoryError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            RepositoryError::Conflict(username.to_string())
        }
        _ => RepositoryError::Query(e.to_string()),
    }
}

impl AccountRepository for SqliteAccountRepository {
    async fn create_account(&self, account: &Account) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO accounts (id, username, password_hash, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(account.id.to_string())
        .bind(&account.username)
        .bind(&account.password_hash)
        .bind(account.created_at.to_rfc3339())
        .execute(&self.pool.writer)
        .await
        .map_err(|e| map_insert_err(&account.username, e))?;

        Ok(())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM accounts WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let account_row = AccountRow::from_row(&row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(account_row.into_account()?))
            }
            None => Ok(None),
        }
    }

    async fn find_by_id(&self, account_id: &Uuid) -> Result<Option<Account>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM accounts WHERE id = ?")
            .bind(account_id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let account_row = AccountRow::from_row(&row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(account_row.into_account()?))
            }
            None => Ok(None),
        }
    }

    async fn count_accounts(&self) -> Result<u64, RepositoryError> {
        let row = sqlx::query("SELECT COUNT(*) as cnt FROM accounts")
            .fetch_one(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let count: i64 = row
            .try_get("cnt")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(count as u64)
    }

    async fn insert_token(&self, token: &AuthToken) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO auth_tokens (id, token_hash, account_id, created_at, last_used_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(token.id.to_string())
        .bind(&token.token_hash)
        .bind(token.account_id.to_string())
        .bind(token.created_at.to_rfc3339())
        .bind(token.last_used_at.map(|dt| dt.to_rfc3339()))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn find_account_by_token_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<Account>, RepositoryError> {
        let row = sqlx::query(
            r#"SELECT a.id, a.username, a.password_hash, a.created_at
               FROM accounts a
               JOIN auth_tokens t ON t.account_id = a.id
               WHERE t.token_hash = ?"#,
        )
        .bind(token_hash)
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let account_row = AccountRow::from_row(&row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(account_row.into_account()?))
            }
            None => Ok(None),
        }
    }

    async fn touch_token(&self, token_hash: &str) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE auth_tokens SET last_used_at = ? WHERE token_hash = ?")
            .bind(Utc::now().to_rfc3339())
            .bind(token_hash)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn delete_token(&self, token_hash: &str) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM auth_tokens WHERE token_hash = ?")
            .bind(token_hash)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // The TempDir rides along so the database files are cleaned up when
    // the test drops it.
    async fn test_pool() -> (DatabasePool, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        (DatabasePool::new(&url).await.unwrap(), dir)
    }

    fn make_account(username: &str) -> Account {
        Account {
            id: Uuid::now_v7(),
            username: username.to_string(),
            password_hash: "$argon2id$v=19$test".to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_and_find_account() {
        let (pool, _dir) = test_pool().await;
        let repo = SqliteAccountRepository::new(pool);
        let account = make_account("admin");
        repo.create_account(&account).await.unwrap();

        let by_name = repo.find_by_username("admin").await.unwrap().unwrap();
        assert_eq!(by_name.id, account.id);
        assert_eq!(by_name.password_hash, account.password_hash);

        let by_id = repo.find_by_id(&account.id).await.unwrap().unwrap();
        assert_eq!(by_id.username, "admin");

        assert!(repo.find_by_username("ghost").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_is_conflict() {
        let (pool, _dir) = test_pool().await;
        let repo = SqliteAccountRepository::new(pool);
        repo.create_account(&make_account("admin")).await.unwrap();

        let err = repo
            .create_account(&make_account("admin"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_count_accounts() {
        let (pool, _dir) = test_pool().await;
        let repo = SqliteAccountRepository::new(pool);
        assert_eq!(repo.count_accounts().await.unwrap(), 0);
        repo.create_account(&make_account("a")).await.unwrap();
        repo.create_account(&make_account("b")).await.unwrap();
        assert_eq!(repo.count_accounts().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_token_lifecycle() {
        let (pool, _dir) = test_pool().await;
        let repo = SqliteAccountRepository::new(pool);
        let account = make_account("admin");
        repo.create_account(&account).await.unwrap();

        let token = AuthToken {
            id: Uuid::now_v7(),
            token_hash: "abc123".to_string(),
            account_id: account.id,
            created_at: Utc::now(),
            last_used_at: None,
        };
        repo.insert_token(&token).await.unwrap();

        let resolved = repo
            .find_account_by_token_hash("abc123")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(resolved.id, account.id);

        repo.touch_token("abc123").await.unwrap();

        repo.delete_token("abc123").await.unwrap();
        assert!(repo
            .find_account_by_token_hash("abc123")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_unknown_token_resolves_to_none() {
        let (pool, _dir) = test_pool().await;
        let repo = SqliteAccountRepository::new(pool);
        assert!(repo
            .find_account_by_token_hash("nope")
            .await
            .unwrap()
            .is_none());
    }
}
