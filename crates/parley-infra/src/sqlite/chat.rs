//! SQLite chat repository implementation.
//!
//! Sessions and their append-only message logs. Session deletion removes
//! child message rows and the session row inside one writer transaction;
//! the schema carries no ON DELETE CASCADE.

use chrono::{DateTime, Utc};
use parley_core::repository::chat::ChatRepository;
use parley_types::chat::{ChatMessage, ChatSession, MessageRole};
use parley_types::error::RepositoryError;
use sqlx::Row;
use std::str::FromStr;
use uuid::Uuid;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `ChatRepository`.
pub struct SqliteChatRepository {
    pool: DatabasePool,
}

impl SqliteChatRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct SessionRow {
    id: String,
    account_id: String,
    title: String,
    created_at: String,
}

impl SessionRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            account_id: row.try_get("account_id")?,
            title: row.try_get("title")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_session(self) -> Result<ChatSession, RepositoryError> {
        Ok(ChatSession {
            id: parse_uuid(&self.id, "session id")?,
            account_id: parse_uuid(&self.account_id, "account id")?,
            title: self.title,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

struct MessageRow {
    id: String,
    session_id: String,
    role: String,
    content: String,
    created_at: String,
    model_id: Option<String>,
}

impl MessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            session_id: row.try_get("session_id")?,
            role: row.try_get("role")?,
            content: row.try_get("content")?,
            created_at: row.try_get("created_at")?,
            model_id: row.try_get("model_id")?,
        })
    }

    fn into_message(self) -> Result<ChatMessage, RepositoryError> {
        let role = MessageRole::from_str(&self.role)
            .map_err(|e| RepositoryError::Query(format!("invalid role: {e}")))?;
        let model_id = match self.model_id {
            Some(s) => Some(parse_uuid(&s, "model id")?),
            None => None,
        };

        Ok(ChatMessage {
            id: parse_uuid(&self.id, "message id")?,
            session_id: parse_uuid(&self.session_id, "session id")?,
            role,
            content: self.content,
            created_at: parse_datetime(&self.created_at)?,
            model_id,
        })
    }
}

fn parse_uuid(s: &str, what: &str) -> Result<Uuid, RepositoryError> {
    Uuid::parse_str(s).map_err(|e| RepositoryError::Query(format!("invalid {what}: {e}")))
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

impl ChatRepository for SqliteChatRepository {
    async fn create_session(&self, session: &ChatSession) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO chat_sessions (id, account_id, title, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(session.id.to_string())
        .bind(session.account_id.to_string())
        .bind(&session.title)
        .bind(session.created_at.to_rfc3339())
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn get_session(&self, session_id: &Uuid) -> Result<Option<ChatSession>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM chat_sessions WHERE id = ?")
            .bind(session_id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let session_row =
                    SessionRow::from_row(&row).map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(session_row.into_session()?))
            }
            None => Ok(None),
        }
    }

    async fn list_sessions(&self, account_id: &Uuid) -> Result<Vec<ChatSession>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM chat_sessions WHERE account_id = ? ORDER BY created_at DESC, id DESC",
        )
        .bind(account_id.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        rows.iter()
            .map(|row| {
                let session_row =
                    SessionRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
                session_row.into_session()
            })
            .collect()
    }

    async fn rename_session(&self, session_id: &Uuid, title: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE chat_sessions SET title = ? WHERE id = ?")
            .bind(title)
            .bind(session_id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn delete_session(&self, session_id: &Uuid) -> Result<(), RepositoryError> {
        let mut tx = self
            .pool
            .writer
            .begin()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        sqlx::query("DELETE FROM chat_messages WHERE session_id = ?")
            .bind(session_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let result = sqlx::query("DELETE FROM chat_sessions WHERE id = ?")
            .bind(session_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            // Rolls back the message delete on drop.
            return Err(RepositoryError::NotFound);
        }

        tx.commit()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn save_message(&self, message: &ChatMessage) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO chat_messages (id, session_id, role, content, created_at, model_id) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(message.id.to_string())
        .bind(message.session_id.to_string())
        .bind(message.role.to_string())
        .bind(&message.content)
        .bind(message.created_at.to_rfc3339())
        .bind(message.model_id.map(|id| id.to_string()))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn get_messages(&self, session_id: &Uuid) -> Result<Vec<ChatMessage>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM chat_messages WHERE session_id = ? ORDER BY created_at ASC, id ASC",
        )
        .bind(session_id.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        rows.iter()
            .map(|row| {
                let message_row =
                    MessageRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
                message_row.into_message()
            })
            .collect()
    }

    async fn count_messages(&self, session_id: &Uuid) -> Result<u64, RepositoryError> {
        let row = sqlx::query("SELECT COUNT(*) as cnt FROM chat_messages WHERE session_id = ?")
            .bind(session_id.to_string())
            .fetch_one(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let count: i64 = row
            .try_get("cnt")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_types::account::Account;

    // The TempDir rides along so the database files are cleaned up when
    // the test drops it.
    async fn test_pool() -> (DatabasePool, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        (DatabasePool::new(&url).await.unwrap(), dir)
    }

    async fn seed_account(pool: &DatabasePool) -> Uuid {
        let account = Account {
            id: Uuid::now_v7(),
            username: format!("user-{}", Uuid::now_v7()),
            password_hash: "hash".to_string(),
            created_at: Utc::now(),
        };
        sqlx::query(
            "INSERT INTO accounts (id, username, password_hash, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(account.id.to_string())
        .bind(&account.username)
        .bind(&account.password_hash)
        .bind(account.created_at.to_rfc3339())
        .execute(&pool.writer)
        .await
        .unwrap();
        account.id
    }

    async fn seed_model(pool: &DatabasePool) -> Uuid {
        let id = Uuid::now_v7();
        sqlx::query("INSERT INTO models (id, name, model_ref, is_default) VALUES (?, ?, ?, 1)")
            .bind(id.to_string())
            .bind("Test Model")
            .bind("anthropic.claude-sonnet-4-20250514-v1:0")
            .execute(&pool.writer)
            .await
            .unwrap();
        id
    }

    #[tokio::test]
    async fn test_create_and_get_session() {
        let (pool, _dir) = test_pool().await;
        let account_id = seed_account(&pool).await;
        let repo = SqliteChatRepository::new(pool);

        let session = ChatSession::new(account_id);
        repo.create_session(&session).await.unwrap();

        let loaded = repo.get_session(&session.id).await.unwrap().unwrap();
        assert_eq!(loaded.id, session.id);
        assert_eq!(loaded.account_id, account_id);
        assert_eq!(loaded.title, "New Chat");

        assert!(repo.get_session(&Uuid::now_v7()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_sessions_newest_first() {
        let (pool, _dir) = test_pool().await;
        let account_id = seed_account(&pool).await;
        let repo = SqliteChatRepository::new(pool);

        let mut ids = Vec::new();
        for i in 0..3 {
            let mut session = ChatSession::new(account_id);
            session.created_at = Utc::now() + chrono::Duration::seconds(i);
            repo.create_session(&session).await.unwrap();
            ids.push(session.id);
        }

        let listed = repo.list_sessions(&account_id).await.unwrap();
        assert_eq!(listed.len(), 3);
        assert_eq!(listed[0].id, ids[2]);
        assert_eq!(listed[2].id, ids[0]);
    }

    #[tokio::test]
    async fn test_list_sessions_scoped_to_account() {
        let (pool, _dir) = test_pool().await;
        let account_a = seed_account(&pool).await;
        let account_b = seed_account(&pool).await;
        let repo = SqliteChatRepository::new(pool);

        repo.create_session(&ChatSession::new(account_a)).await.unwrap();
        repo.create_session(&ChatSession::new(account_b)).await.unwrap();

        assert_eq!(repo.list_sessions(&account_a).await.unwrap().len(), 1);
        assert_eq!(repo.list_sessions(&account_b).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_rename_session() {
        let (pool, _dir) = test_pool().await;
        let account_id = seed_account(&pool).await;
        let repo = SqliteChatRepository::new(pool);

        let session = ChatSession::new(account_id);
        repo.create_session(&session).await.unwrap();

        repo.rename_session(&session.id, "Renamed").await.unwrap();
        let loaded = repo.get_session(&session.id).await.unwrap().unwrap();
        assert_eq!(loaded.title, "Renamed");

        let err = repo
            .rename_session(&Uuid::now_v7(), "nope")
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_delete_session_cascades_messages() {
        let (pool, _dir) = test_pool().await;
        let account_id = seed_account(&pool).await;
        let model_id = seed_model(&pool).await;
        let repo = SqliteChatRepository::new(pool);

        let session = ChatSession::new(account_id);
        repo.create_session(&session).await.unwrap();
        repo.save_message(&ChatMessage::user(session.id, "Hello".to_string()))
            .await
            .unwrap();
        repo.save_message(&ChatMessage::assistant(
            session.id,
            "Hi!".to_string(),
            model_id,
        ))
        .await
        .unwrap();

        assert_eq!(repo.count_messages(&session.id).await.unwrap(), 2);

        repo.delete_session(&session.id).await.unwrap();

        assert!(repo.get_session(&session.id).await.unwrap().is_none());
        assert_eq!(repo.count_messages(&session.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_unknown_session_is_not_found() {
        let (pool, _dir) = test_pool().await;
        let repo = SqliteChatRepository::new(pool);

        let err = repo.delete_session(&Uuid::now_v7()).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_messages_oldest_first_with_roles() {
        let (pool, _dir) = test_pool().await;
        let account_id = seed_account(&pool).await;
        let model_id = seed_model(&pool).await;
        let repo = SqliteChatRepository::new(pool);

        let session = ChatSession::new(account_id);
        repo.create_session(&session).await.unwrap();

        let mut user = ChatMessage::user(session.id, "Question".to_string());
        user.created_at = Utc::now();
        repo.save_message(&user).await.unwrap();

        let mut assistant = ChatMessage::assistant(session.id, "Answer".to_string(), model_id);
        assistant.created_at = user.created_at + chrono::Duration::seconds(1);
        repo.save_message(&assistant).await.unwrap();

        let messages = repo.get_messages(&session.id).await.unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, MessageRole::User);
        assert!(messages[0].model_id.is_none());
        assert_eq!(messages[1].role, MessageRole::Assistant);
        assert_eq!(messages[1].model_id, Some(model_id));
    }
}
