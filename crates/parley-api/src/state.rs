//! Application state wiring all services together.
//!
//! Services are generic over repository/hasher/provider traits, but
//! AppState pins them to the concrete infra implementations. Handlers
//! receive the state explicitly through axum's `State` extractor; there
//! is no global database handle.

use std::sync::Arc;

use secrecy::SecretString;

use parley_core::chat::service::ChatService;
use parley_core::service::account::AccountService;
use parley_core::service::model::ModelRegistry;
use parley_infra::config::AppConfig;
use parley_infra::crypto::password::Argon2PasswordHasher;
use parley_infra::llm::bedrock::BedrockClient;
use parley_infra::sqlite::account::SqliteAccountRepository;
use parley_infra::sqlite::chat::SqliteChatRepository;
use parley_infra::sqlite::model::SqliteModelRepository;
use parley_infra::sqlite::pool::DatabasePool;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteChatService =
    ChatService<SqliteChatRepository, SqliteModelRepository, BedrockClient>;

pub type ConcreteAccountService = AccountService<SqliteAccountRepository, Argon2PasswordHasher>;

pub type ConcreteModelRegistry = ModelRegistry<SqliteModelRepository>;

/// Shared application state holding all services.
#[derive(Clone)]
pub struct AppState {
    pub chat_service: Arc<ConcreteChatService>,
    pub account_service: Arc<ConcreteAccountService>,
    pub model_registry: Arc<ConcreteModelRegistry>,
    pub db_pool: DatabasePool,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Initialize the application state: connect to the database and wire
    /// the services.
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        tokio::fs::create_dir_all(&config.data_dir).await?;

        let db_pool = DatabasePool::new(&config.database_url()).await?;

        let account_service = AccountService::new(
            SqliteAccountRepository::new(db_pool.clone()),
            Argon2PasswordHasher::new(),
        );

        let model_registry = ModelRegistry::new(SqliteModelRepository::new(db_pool.clone()));

        let api_key = match &config.bedrock_api_key {
            Some(key) => key.clone(),
            None => {
                tracing::warn!(
                    "PARLEY_BEDROCK_API_KEY not set, chat turns will fail until it is configured"
                );
                SecretString::from("")
            }
        };
        let provider = BedrockClient::new(api_key, config.bedrock_region.clone())
            .map_err(|e| anyhow::anyhow!("{e}"))?;

        let chat_service = ChatService::new(
            SqliteChatRepository::new(db_pool.clone()),
            SqliteModelRepository::new(db_pool.clone()),
            provider,
        );

        Ok(Self {
            chat_service: Arc::new(chat_service),
            account_service: Arc::new(account_service),
            model_registry: Arc::new(model_registry),
            db_pool,
            config: Arc::new(config),
        })
    }
}
