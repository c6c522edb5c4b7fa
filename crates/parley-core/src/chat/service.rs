//! Chat service orchestrating session administration and chat turns.
//!
//! `ChatService` owns the full turn pipeline: persist the user message,
//! resolve the effective model, invoke the provider with the session
//! history, persist the assistant reply, and title the session on its
//! first message. Session operations check ownership by comparing the
//! session's account id to the authenticated caller.

use parley_types::chat::{ChatMessage, ChatSession};
use parley_types::error::{SessionError, TurnError};
use parley_types::llm::Turn;
use parley_types::model::ModelEntry;
use tracing::{info, warn};
use uuid::Uuid;

use crate::chat::title::derive_title;
use crate::llm::provider::LlmProvider;
use crate::repository::chat::ChatRepository;
use crate::repository::model::ModelRepository;

/// Result of a successful chat turn.
#[derive(Debug, Clone)]
pub struct TurnReply {
    pub response: String,
    pub session_id: Uuid,
    pub model_id: Uuid,
}

/// Orchestrates session lifecycle, message persistence, and turn handling.
///
/// Generic over the repositories and the provider so parley-core never
/// depends on parley-infra.
pub struct ChatService<C: ChatRepository, M: ModelRepository, P: LlmProvider> {
    chat_repo: C,
    model_repo: M,
    provider: P,
}

impl<C: ChatRepository, M: ModelRepository, P: LlmProvider> ChatService<C, M, P> {
    pub fn new(chat_repo: C, model_repo: M, provider: P) -> Self {
        Self {
            chat_repo,
            model_repo,
            provider,
        }
    }

    // --- Session administration ---

    /// Create an empty session owned by `account_id`.
    pub async fn create_session(&self, account_id: Uuid) -> Result<ChatSession, SessionError> {
        let session = ChatSession::new(account_id);
        self.chat_repo.create_session(&session).await?;
        info!(session_id = %session.id, "Session created");
        Ok(session)
    }

    /// List the caller's sessions, newest first.
    pub async fn list_sessions(&self, account_id: &Uuid) -> Result<Vec<ChatSession>, SessionError> {
        Ok(self.chat_repo.list_sessions(account_id).await?)
    }

    /// Rename a session. Owner-only.
    pub async fn rename_session(
        &self,
        account_id: &Uuid,
        session_id: &Uuid,
        title: &str,
    ) -> Result<(), SessionError> {
        if title.trim().is_empty() {
            return Err(SessionError::EmptyTitle);
        }
        self.owned_session(account_id, session_id).await?;
        self.chat_repo.rename_session(session_id, title).await?;
        Ok(())
    }

    /// Delete a session and all of its messages. Owner-only.
    pub async fn delete_session(
        &self,
        account_id: &Uuid,
        session_id: &Uuid,
    ) -> Result<(), SessionError> {
        self.owned_session(account_id, session_id).await?;
        self.chat_repo.delete_session(session_id).await?;
        info!(session_id = %session_id, "Session deleted");
        Ok(())
    }

    /// Get a session's messages, oldest first. Owner-only.
    pub async fn get_messages(
        &self,
        account_id: &Uuid,
        session_id: &Uuid,
    ) -> Result<Vec<ChatMessage>, SessionError> {
        self.owned_session(account_id, session_id).await?;
        Ok(self.chat_repo.get_messages(session_id).await?)
    }

    /// Load a session and verify it belongs to the caller.
    async fn owned_session(
        &self,
        account_id: &Uuid,
        session_id: &Uuid,
    ) -> Result<ChatSession, SessionError> {
        let session = self
            .chat_repo
            .get_session(session_id)
            .await?
            .ok_or(SessionError::NotFound)?;
        if session.account_id != *account_id {
            warn!(session_id = %session_id, "Session access denied");
            return Err(SessionError::Forbidden);
        }
        Ok(session)
    }

    // --- Turn handling ---

    /// Submit one chat turn: persist the user message, invoke the model,
    /// persist the assistant reply.
    ///
    /// The user message is committed before the invocation; a provider
    /// failure leaves it in place without an assistant reply.
    #[tracing::instrument(name = "submit_turn", skip(self, text, model_id), fields(session_id = %session_id))]
    pub async fn submit_turn(
        &self,
        account_id: &Uuid,
        session_id: &Uuid,
        text: &str,
        model_id: Option<&Uuid>,
    ) -> Result<TurnReply, TurnError> {
        if text.trim().is_empty() {
            return Err(TurnError::EmptyMessage);
        }

        // Foreign sessions are indistinguishable from missing ones.
        let session = self
            .chat_repo
            .get_session(session_id)
            .await?
            .ok_or(TurnError::SessionNotFound)?;
        if session.account_id != *account_id {
            return Err(TurnError::SessionNotFound);
        }

        let first_message = self.chat_repo.count_messages(session_id).await? == 0;

        let user_message = ChatMessage::user(*session_id, text.to_string());
        self.chat_repo.save_message(&user_message).await?;

        if first_message {
            self.chat_repo
                .rename_session(session_id, &derive_title(text))
                .await?;
        }

        let model = self.resolve_model(model_id).await?;
        info!(model = %model.model_ref, "Invoking model");

        let history = self.chat_repo.get_messages(session_id).await?;
        let turns: Vec<Turn> = history
            .iter()
            .map(|m| Turn::new(m.role, m.content.clone()))
            .collect();

        let response = self.provider.invoke(&model.model_ref, &turns).await?;

        let assistant_message =
            ChatMessage::assistant(*session_id, response.clone(), model.id);
        self.chat_repo.save_message(&assistant_message).await?;

        Ok(TurnReply {
            response,
            session_id: *session_id,
            model_id: model.id,
        })
    }

    /// Resolve the effective model: explicit selection when it exists,
    /// else the registry default, else an error.
    async fn resolve_model(&self, model_id: Option<&Uuid>) -> Result<ModelEntry, TurnError> {
        if let Some(id) = model_id {
            if let Some(entry) = self.model_repo.get(id).await? {
                return Ok(entry);
            }
        }
        self.model_repo
            .get_default()
            .await?
            .ok_or(TurnError::NoModelAvailable)
    }
}
