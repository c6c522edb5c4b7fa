//! AccountRepository trait definition.
//!
//! Covers account rows and the bearer auth tokens issued at login.

use parley_types::account::{Account, AuthToken};
use parley_types::error::RepositoryError;
use uuid::Uuid;

/// Repository trait for account and auth token persistence.
pub trait AccountRepository: Send + Sync {
    /// Insert a new account. Fails with `Conflict` on a duplicate username.
    fn create_account(
        &self,
        account: &Account,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Look up an account by username.
    fn find_by_username(
        &self,
        username: &str,
    ) -> impl std::future::Future<Output = Result<Option<Account>, RepositoryError>> + Send;

    /// Look up an account by id.
    fn find_by_id(
        &self,
        account_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<Account>, RepositoryError>> + Send;

    /// Total number of accounts (bootstrap seeds an admin when zero).
    fn count_accounts(
        &self,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;

    /// Store a freshly issued auth token (hash only).
    fn insert_token(
        &self,
        token: &AuthToken,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Resolve a token hash to its owning account.
    fn find_account_by_token_hash(
        &self,
        token_hash: &str,
    ) -> impl std::future::Future<Output = Result<Option<Account>, RepositoryError>> + Send;

    /// Record token use (best effort; callers may ignore failures).
    fn touch_token(
        &self,
        token_hash: &str,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Revoke a token (logout).
    fn delete_token(
        &self,
        token_hash: &str,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
