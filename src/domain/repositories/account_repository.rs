//! Repository trait for account storage.

use crate::domain::account_filter::AccountFilter;
use crate::domain::entities::{Account, AccountDetails, AccountDraft};
use crate::error::AppError;
use async_trait::async_trait;
use uuid::Uuid;

/// Repository interface for accounts.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgAccountRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::memory::InMemoryAccountRepository`] - process-local store
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Inserts a fully built account.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the account number is already taken.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, account: Account) -> Result<Account, AppError>;

    /// Finds an account by its identifier.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, AppError>;

    /// Finds an account by its 10-digit number.
    async fn find_by_number(&self, account_number: &str) -> Result<Option<Account>, AppError>;

    /// Finds an account with its residents attached.
    ///
    /// Residents are ordered by last name, first name, then id.
    async fn find_details(&self, id: Uuid) -> Result<Option<AccountDetails>, AppError>;

    /// Lists every account.
    async fn list(&self) -> Result<Vec<Account>, AppError>;

    /// Overwrites the mutable fields of an account.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the account does not exist.
    async fn update(&self, id: Uuid, draft: AccountDraft) -> Result<Account, AppError>;

    /// Deletes an account and, by cascade, its residents.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the account does not exist.
    async fn delete(&self, id: Uuid) -> Result<(), AppError>;

    /// Evaluates a validated search.
    async fn search(&self, filter: &AccountFilter) -> Result<Vec<Account>, AppError>;

    /// Counts all accounts.
    async fn count(&self) -> Result<i64, AppError>;
}
