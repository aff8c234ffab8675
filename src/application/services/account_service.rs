//! Account management service.

use std::sync::Arc;

use serde_json::json;
use tokio_retry::RetryIf;
use tokio_retry::strategy::FixedInterval;
use uuid::Uuid;

use crate::domain::account_filter::{AccountFilter, AccountQuery};
use crate::domain::entities::{Account, AccountDetails, AccountDraft};
use crate::domain::repositories::AccountRepository;
use crate::error::AppError;
use crate::utils::account_number::AccountNumberGenerator;

/// Default number of insert attempts when the generated account number collides.
pub const DEFAULT_MAX_ATTEMPTS: usize = 5;

/// Service for creating, reading, updating and searching accounts.
///
/// Owns account number assignment: numbers are generated here, never taken
/// from the caller, and regenerated when storage reports a collision.
pub struct AccountService<R: AccountRepository + ?Sized> {
    repository: Arc<R>,
    generator: Arc<dyn AccountNumberGenerator>,
    max_attempts: usize,
}

impl<R: AccountRepository + ?Sized> AccountService<R> {
    /// Creates a new account service.
    ///
    /// `max_attempts` is clamped to at least one insert.
    pub fn new(
        repository: Arc<R>,
        generator: Arc<dyn AccountNumberGenerator>,
        max_attempts: usize,
    ) -> Self {
        Self {
            repository,
            generator,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Lists every account.
    pub async fn list_accounts(&self) -> Result<Vec<Account>, AppError> {
        self.repository.list().await
    }

    /// Retrieves an account by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no account has this id.
    pub async fn get_by_id(&self, id: Uuid) -> Result<Account, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Account not found", json!({ "id": id })))
    }

    /// Retrieves an account by its 10-digit number.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no account has this number.
    pub async fn get_by_number(&self, account_number: &str) -> Result<Account, AppError> {
        self.repository
            .find_by_number(account_number)
            .await?
            .ok_or_else(|| {
                AppError::not_found(
                    "Account not found",
                    json!({ "accountNumber": account_number }),
                )
            })
    }

    /// Retrieves an account together with its residents.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no account has this id.
    pub async fn get_details(&self, id: Uuid) -> Result<AccountDetails, AppError> {
        self.repository
            .find_details(id)
            .await?
            .ok_or_else(|| AppError::not_found("Account not found", json!({ "id": id })))
    }

    /// Creates an account with a freshly generated number.
    ///
    /// # Number Assignment
    ///
    /// A new number is generated for every insert attempt. A uniqueness
    /// conflict triggers a retry with a new number, up to `max_attempts`
    /// inserts in total. Any other error aborts immediately.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if every attempt collided.
    /// Returns [`AppError::Storage`] or [`AppError::Internal`] on database errors.
    pub async fn create_account(&self, draft: AccountDraft) -> Result<Account, AppError> {
        let id = Uuid::new_v4();
        let retries = FixedInterval::from_millis(0).take(self.max_attempts - 1);
        let draft = &draft;
        let mut attempt = 0;

        let created = RetryIf::start(
            retries,
            move || self.insert_with_new_number(id, draft),
            |e: &AppError| {
                attempt += 1;
                if e.is_conflict() {
                    tracing::warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        "Account number collision"
                    );
                    true
                } else {
                    false
                }
            },
        )
        .await?;

        tracing::info!(
            id = %created.id,
            account_number = %created.account_number,
            "Account created"
        );

        Ok(created)
    }

    async fn insert_with_new_number(
        &self,
        id: Uuid,
        draft: &AccountDraft,
    ) -> Result<Account, AppError> {
        let account = Account::from_draft(id, self.generator.generate(), draft);
        self.repository.create(account).await
    }

    /// Overwrites the mutable fields of an account.
    ///
    /// The account number is kept. Repeating the same update yields the same
    /// state.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the account does not exist.
    pub async fn update_account(&self, id: Uuid, draft: AccountDraft) -> Result<Account, AppError> {
        self.get_by_id(id).await?;
        self.repository.update(id, draft).await
    }

    /// Deletes an account and its residents.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the account does not exist, including
    /// on a second delete of the same id.
    pub async fn delete_account(&self, id: Uuid) -> Result<bool, AppError> {
        self.get_by_id(id).await?;
        self.repository.delete(id).await?;

        tracing::info!(id = %id, "Account deleted");
        Ok(true)
    }

    /// Searches accounts.
    ///
    /// The query is validated before storage is touched; an unknown sort
    /// field or out-of-range page never reaches the repository.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the query is invalid.
    pub async fn search_accounts(&self, query: AccountQuery) -> Result<Vec<Account>, AppError> {
        let filter = AccountFilter::from_query(query)?;
        self.repository.search(&filter).await
    }

    /// Counts all accounts.
    pub async fn count_accounts(&self) -> Result<i64, AppError> {
        self.repository.count().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockAccountRepository;
    use crate::utils::account_number::MockAccountNumberGenerator;
    use chrono::{TimeZone, Utc};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn draft() -> AccountDraft {
        AccountDraft {
            start_date: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            end_date: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            address: "Main St 1".to_string(),
            area: 50,
        }
    }

    fn sequential_generator() -> MockAccountNumberGenerator {
        let counter = AtomicUsize::new(0);
        let mut generator = MockAccountNumberGenerator::new();
        generator
            .expect_generate()
            .returning(move || format!("{:010}", counter.fetch_add(1, Ordering::SeqCst)));
        generator
    }

    fn service(repo: MockAccountRepository) -> AccountService<MockAccountRepository> {
        AccountService::new(
            Arc::new(repo),
            Arc::new(sequential_generator()),
            DEFAULT_MAX_ATTEMPTS,
        )
    }

    #[tokio::test]
    async fn test_create_account_assigns_generated_number() {
        let mut repo = MockAccountRepository::new();
        repo.expect_create().times(1).returning(Ok);

        let account = service(repo).create_account(draft()).await.unwrap();

        assert_eq!(account.account_number, "0000000000");
        assert_eq!(account.address, "Main St 1");
        assert_eq!(account.area, 50);
    }

    #[tokio::test]
    async fn test_create_account_retries_on_conflict() {
        let mut repo = MockAccountRepository::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();

        repo.expect_create().times(3).returning(move |account| {
            if seen.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(AppError::conflict("Account number already exists", json!({})))
            } else {
                Ok(account)
            }
        });

        let account = service(repo).create_account(draft()).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(account.account_number, "0000000002");
    }

    #[tokio::test]
    async fn test_create_account_gives_up_after_max_attempts() {
        let mut repo = MockAccountRepository::new();
        repo.expect_create()
            .times(DEFAULT_MAX_ATTEMPTS)
            .returning(|_| Err(AppError::conflict("Account number already exists", json!({}))));

        let result = service(repo).create_account(draft()).await;

        assert!(matches!(result, Err(AppError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_create_account_keeps_id_across_attempts() {
        let mut repo = MockAccountRepository::new();
        let first_id = Arc::new(std::sync::Mutex::new(None));
        let captured = first_id.clone();

        repo.expect_create().times(2).returning(move |account| {
            let mut slot = captured.lock().unwrap();
            match *slot {
                None => {
                    *slot = Some(account.id);
                    Err(AppError::conflict("dup", json!({})))
                }
                Some(id) => {
                    assert_eq!(id, account.id);
                    Ok(account)
                }
            }
        });

        assert!(service(repo).create_account(draft()).await.is_ok());
    }

    #[tokio::test]
    async fn test_create_account_does_not_retry_other_errors() {
        let mut repo = MockAccountRepository::new();
        repo.expect_create()
            .times(1)
            .returning(|_| Err(AppError::storage("Database is unavailable", json!({}))));

        let result = service(repo).create_account(draft()).await;

        assert!(matches!(result, Err(AppError::Storage { .. })));
    }

    #[tokio::test]
    async fn test_single_attempt_configuration() {
        let mut repo = MockAccountRepository::new();
        repo.expect_create()
            .times(1)
            .returning(|_| Err(AppError::conflict("dup", json!({}))));

        let service = AccountService::new(Arc::new(repo), Arc::new(sequential_generator()), 0);
        let result = service.create_account(draft()).await;

        assert!(result.unwrap_err().is_conflict());
    }

    #[tokio::test]
    async fn test_get_by_number_not_found() {
        let mut repo = MockAccountRepository::new();
        repo.expect_find_by_number()
            .withf(|n| n == "0123456789")
            .times(1)
            .returning(|_| Ok(None));

        let result = service(repo).get_by_number("0123456789").await;

        assert!(result.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_update_missing_account_skips_write() {
        let mut repo = MockAccountRepository::new();
        repo.expect_find_by_id().times(1).returning(|_| Ok(None));
        repo.expect_update().never();

        let result = service(repo).update_account(Uuid::new_v4(), draft()).await;

        assert!(result.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_delete_account_returns_true() {
        let mut repo = MockAccountRepository::new();
        let id = Uuid::new_v4();
        let existing = Account::from_draft(id, "0000000001".to_string(), &draft());

        repo.expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(existing.clone())));
        repo.expect_delete().times(1).returning(|_| Ok(()));

        assert!(service(repo).delete_account(id).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_missing_account_not_found() {
        let mut repo = MockAccountRepository::new();
        repo.expect_find_by_id().times(1).returning(|_| Ok(None));
        repo.expect_delete().never();

        let result = service(repo).delete_account(Uuid::new_v4()).await;

        assert!(result.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_search_with_unknown_sort_never_hits_storage() {
        let mut repo = MockAccountRepository::new();
        repo.expect_search().never();

        let result = service(repo)
            .search_accounts(AccountQuery {
                sort_by: Some("owner".to_string()),
                ..Default::default()
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_search_passes_validated_filter() {
        let mut repo = MockAccountRepository::new();
        repo.expect_search()
            .withf(|f| f.page == 2 && f.page_size == 5 && f.has_residents)
            .times(1)
            .returning(|_| Ok(vec![]));

        let result = service(repo)
            .search_accounts(AccountQuery {
                has_residents: Some(true),
                page: Some(2),
                page_size: Some(5),
                ..Default::default()
            })
            .await;

        assert!(result.unwrap().is_empty());
    }
}
