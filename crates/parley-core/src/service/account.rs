//! Account service: credential verification and admin bootstrap.

use chrono::Utc;
use parley_types::account::Account;
use parley_types::error::AccountError;
use tracing::info;
use uuid::Uuid;

use crate::repository::account::AccountRepository;
use crate::service::hash::PasswordHasher;

/// Manages accounts and login credential checks.
pub struct AccountService<R: AccountRepository, H: PasswordHasher> {
    repo: R,
    hasher: H,
}

impl<R: AccountRepository, H: PasswordHasher> AccountService<R, H> {
    pub fn new(repo: R, hasher: H) -> Self {
        Self { repo, hasher }
    }

    /// Access the account repository (used by the auth extractor).
    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Create a new account with a hashed password.
    pub async fn create_account(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Account, AccountError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(AccountError::InvalidUsername(
                "username must not be empty".to_string(),
            ));
        }

        let account = Account {
            id: Uuid::now_v7(),
            username: username.to_string(),
            password_hash: self.hasher.hash_password(password)?,
            created_at: Utc::now(),
        };
        self.repo.create_account(&account).await?;
        info!(username = %account.username, "Account created");
        Ok(account)
    }

    /// Verify login credentials.
    ///
    /// Unknown usernames and wrong passwords both collapse into
    /// `InvalidCredentials`.
    pub async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Account, AccountError> {
        let account = self
            .repo
            .find_by_username(username)
            .await?
            .ok_or(AccountError::InvalidCredentials)?;

        if !self.hasher.verify_password(password, &account.password_hash) {
            return Err(AccountError::InvalidCredentials);
        }
        Ok(account)
    }

    /// Seed an admin account when the store holds no accounts at all.
    ///
    /// Returns the created account, or `None` when accounts already exist.
    pub async fn bootstrap_admin(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<Account>, AccountError> {
        if self.repo.count_accounts().await? > 0 {
            return Ok(None);
        }
        let account = self.create_account(username, password).await?;
        info!(username = %username, "Bootstrap admin account seeded");
        Ok(Some(account))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_types::account::AuthToken;
    use parley_types::error::RepositoryError;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemAccountRepo {
        accounts: Mutex<Vec<Account>>,
        tokens: Mutex<Vec<AuthToken>>,
    }

    impl AccountRepository for MemAccountRepo {
        async fn create_account(&self, account: &Account) -> Result<(), RepositoryError> {
            let mut accounts = self.accounts.lock().unwrap();
            if accounts.iter().any(|a| a.username == account.username) {
                return Err(RepositoryError::Conflict(account.username.clone()));
            }
            accounts.push(account.clone());
            Ok(())
        }

        async fn find_by_username(
            &self,
            username: &str,
        ) -> Result<Option<Account>, RepositoryError> {
            Ok(self
                .accounts
                .lock()
                .unwrap()
                .iter()
                .find(|a| a.username == username)
                .cloned())
        }

        async fn find_by_id(&self, account_id: &Uuid) -> Result<Option<Account>, RepositoryError> {
            Ok(self
                .accounts
                .lock()
                .unwrap()
                .iter()
                .find(|a| a.id == *account_id)
                .cloned())
        }

        async fn count_accounts(&self) -> Result<u64, RepositoryError> {
            Ok(self.accounts.lock().unwrap().len() as u64)
        }

        async fn insert_token(&self, token: &AuthToken) -> Result<(), RepositoryError> {
            self.tokens.lock().unwrap().push(token.clone());
            Ok(())
        }

        async fn find_account_by_token_hash(
            &self,
            token_hash: &str,
        ) -> Result<Option<Account>, RepositoryError> {
            let account_id = self
                .tokens
                .lock()
                .unwrap()
                .iter()
                .find(|t| t.token_hash == token_hash)
                .map(|t| t.account_id);
            match account_id {
                Some(id) => self.find_by_id(&id).await,
                None => Ok(None),
            }
        }

        async fn touch_token(&self, _token_hash: &str) -> Result<(), RepositoryError> {
            Ok(())
        }

        async fn delete_token(&self, token_hash: &str) -> Result<(), RepositoryError> {
            self.tokens
                .lock()
                .unwrap()
                .retain(|t| t.token_hash != token_hash);
            Ok(())
        }
    }

    /// Reversed-string "hash" for tests; real hashing is in parley-infra.
    struct PlainHasher;

    impl PasswordHasher for PlainHasher {
        fn hash_password(&self, password: &str) -> Result<String, AccountError> {
            Ok(password.chars().rev().collect())
        }

        fn verify_password(&self, password: &str, hash: &str) -> bool {
            let rehashed: String = password.chars().rev().collect();
            rehashed == hash
        }
    }

    fn service() -> AccountService<MemAccountRepo, PlainHasher> {
        AccountService::new(MemAccountRepo::default(), PlainHasher)
    }

    #[tokio::test]
    async fn test_valid_credentials_accepted() {
        let service = service();
        service.create_account("admin", "hunter2").await.unwrap();

        let account = service.verify_credentials("admin", "hunter2").await.unwrap();
        assert_eq!(account.username, "admin");
    }

    #[tokio::test]
    async fn test_wrong_password_rejected() {
        let service = service();
        service.create_account("admin", "hunter2").await.unwrap();

        let err = service
            .verify_credentials("admin", "wrong")
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_unknown_username_rejected() {
        let service = service();
        let err = service
            .verify_credentials("ghost", "whatever")
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_duplicate_username_conflicts() {
        let service = service();
        service.create_account("admin", "a").await.unwrap();
        let err = service.create_account("admin", "b").await.unwrap_err();
        assert!(matches!(err, AccountError::UsernameConflict(_)));
    }

    #[tokio::test]
    async fn test_empty_username_rejected() {
        let service = service();
        let err = service.create_account("  ", "pw").await.unwrap_err();
        assert!(matches!(err, AccountError::InvalidUsername(_)));
    }

    #[tokio::test]
    async fn test_bootstrap_only_seeds_empty_store() {
        let service = service();
        let first = service.bootstrap_admin("admin", "pw").await.unwrap();
        assert!(first.is_some());

        let second = service.bootstrap_admin("admin2", "pw").await.unwrap();
        assert!(second.is_none());
        assert_eq!(service.repo.count_accounts().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_password_stored_hashed() {
        let service = service();
        let account = service.create_account("admin", "hunter2").await.unwrap();
        assert_ne!(account.password_hash, "hunter2");
    }
}
