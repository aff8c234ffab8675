//! In-memory repository implementations.
//!
//! Both repositories share one [`InMemoryStore`] so that cascade deletes and
//! the resident → account reference check see a consistent view. The store
//! enforces the same rules as the PostgreSQL schema: unique account numbers,
//! existing parent account for residents, cascade on account deletion.
//!
//! Selected with `STORAGE_BACKEND=memory`; data lives for the lifetime of
//! the process.

use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::account_filter::AccountFilter;
use crate::domain::entities::{Account, AccountDetails, AccountDraft, Resident, ResidentDraft};
use crate::domain::repositories::{AccountRepository, ResidentRepository};
use crate::error::AppError;

#[derive(Debug, Default)]
struct Tables {
    accounts: Vec<Account>,
    residents: Vec<Resident>,
}

impl Tables {
    fn account_exists(&self, id: Uuid) -> bool {
        self.accounts.iter().any(|a| a.id == id)
    }

    fn residents_where(&self, predicate: impl Fn(&Resident) -> bool) -> Vec<Resident> {
        let mut residents: Vec<Resident> = self
            .residents
            .iter()
            .filter(|r| predicate(r))
            .cloned()
            .collect();

        residents.sort_by(|a, b| {
            a.last_name
                .cmp(&b.last_name)
                .then_with(|| a.first_name.cmp(&b.first_name))
                .then_with(|| a.id.cmp(&b.id))
        });

        residents
    }

    fn residents_of(&self, account_id: Uuid) -> Vec<Resident> {
        self.residents_where(|r| r.account_id == account_id)
    }

    /// Accounts ordered by number, matching the PostgreSQL default order.
    fn accounts_by_number(&self) -> Vec<&Account> {
        let mut accounts: Vec<&Account> = self.accounts.iter().collect();
        accounts.sort_by(|a, b| a.account_number.cmp(&b.account_number));
        accounts
    }

    fn details(&self, account: &Account) -> AccountDetails {
        AccountDetails {
            account: account.clone(),
            residents: self.residents_of(account.id),
        }
    }
}

fn missing_account(account_id: Uuid) -> AppError {
    AppError::bad_request(
        "Referenced account does not exist",
        json!({ "accountId": account_id }),
    )
}

/// Shared process-local storage for accounts and residents.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Account repository over an [`InMemoryStore`].
pub struct InMemoryAccountRepository {
    store: Arc<InMemoryStore>,
}

impl InMemoryAccountRepository {
    pub fn new(store: Arc<InMemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn create(&self, account: Account) -> Result<Account, AppError> {
        let mut tables = self.store.tables.write().await;

        if tables
            .accounts
            .iter()
            .any(|a| a.account_number == account.account_number)
        {
            return Err(AppError::conflict(
                "Account number already exists",
                json!({ "accountNumber": account.account_number }),
            ));
        }

        tables.accounts.push(account.clone());
        Ok(account)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, AppError> {
        let tables = self.store.tables.read().await;
        Ok(tables.accounts.iter().find(|a| a.id == id).cloned())
    }

    async fn find_by_number(&self, account_number: &str) -> Result<Option<Account>, AppError> {
        let tables = self.store.tables.read().await;
        Ok(tables
            .accounts
            .iter()
            .find(|a| a.account_number == account_number)
            .cloned())
    }

    async fn find_details(&self, id: Uuid) -> Result<Option<AccountDetails>, AppError> {
        let tables = self.store.tables.read().await;
        Ok(tables
            .accounts
            .iter()
            .find(|a| a.id == id)
            .map(|a| tables.details(a)))
    }

    async fn list(&self) -> Result<Vec<Account>, AppError> {
        let tables = self.store.tables.read().await;
        Ok(tables.accounts_by_number().into_iter().cloned().collect())
    }

    async fn update(&self, id: Uuid, draft: AccountDraft) -> Result<Account, AppError> {
        let mut tables = self.store.tables.write().await;

        let account = tables
            .accounts
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| AppError::not_found("Account not found", json!({ "id": id })))?;

        account.apply(draft);
        Ok(account.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let mut tables = self.store.tables.write().await;

        if !tables.account_exists(id) {
            return Err(AppError::not_found("Account not found", json!({ "id": id })));
        }

        tables.accounts.retain(|a| a.id != id);
        tables.residents.retain(|r| r.account_id != id);
        Ok(())
    }

    async fn search(&self, filter: &AccountFilter) -> Result<Vec<Account>, AppError> {
        let tables = self.store.tables.read().await;
        // Stable sort in `apply` keeps account number as the tie-breaker.
        let candidates = tables
            .accounts_by_number()
            .into_iter()
            .map(|a| tables.details(a))
            .collect();

        Ok(filter.apply(candidates))
    }

    async fn count(&self) -> Result<i64, AppError> {
        let tables = self.store.tables.read().await;
        Ok(tables.accounts.len() as i64)
    }
}

/// Resident repository over an [`InMemoryStore`].
pub struct InMemoryResidentRepository {
    store: Arc<InMemoryStore>,
}

impl InMemoryResidentRepository {
    pub fn new(store: Arc<InMemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ResidentRepository for InMemoryResidentRepository {
    async fn create(&self, resident: Resident) -> Result<Resident, AppError> {
        let mut tables = self.store.tables.write().await;

        if !tables.account_exists(resident.account_id) {
            return Err(missing_account(resident.account_id));
        }

        tables.residents.push(resident.clone());
        Ok(resident)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Resident>, AppError> {
        let tables = self.store.tables.read().await;
        Ok(tables.residents.iter().find(|r| r.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<Resident>, AppError> {
        let tables = self.store.tables.read().await;
        Ok(tables.residents_where(|_| true))
    }

    async fn update(&self, id: Uuid, draft: ResidentDraft) -> Result<Resident, AppError> {
        let mut tables = self.store.tables.write().await;

        if !tables.account_exists(draft.account_id) {
            return Err(missing_account(draft.account_id));
        }

        let resident = tables
            .residents
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| AppError::not_found("Resident not found", json!({ "id": id })))?;

        resident.apply(draft);
        Ok(resident.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let mut tables = self.store.tables.write().await;

        let before = tables.residents.len();
        tables.residents.retain(|r| r.id != id);

        if tables.residents.len() == before {
            return Err(AppError::not_found(
                "Resident not found",
                json!({ "id": id }),
            ));
        }

        Ok(())
    }

    async fn count(&self) -> Result<i64, AppError> {
        let tables = self.store.tables.read().await;
        Ok(tables.residents.len() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn repositories() -> (InMemoryAccountRepository, InMemoryResidentRepository) {
        let store = Arc::new(InMemoryStore::new());
        (
            InMemoryAccountRepository::new(store.clone()),
            InMemoryResidentRepository::new(store),
        )
    }

    fn account(number: &str) -> Account {
        Account::new(
            Uuid::new_v4(),
            number.to_string(),
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            "Main St".to_string(),
            50,
        )
    }

    fn resident_draft(account_id: Uuid, first: &str, last: &str) -> ResidentDraft {
        ResidentDraft {
            first_name: first.to_string(),
            last_name: last.to_string(),
            middle_name: None,
            birth_date: None,
            account_id,
        }
    }

    #[tokio::test]
    async fn test_duplicate_account_number_conflicts() {
        let (accounts, _) = repositories();

        accounts.create(account("0000000001")).await.unwrap();
        let result = accounts.create(account("0000000001")).await;

        assert!(matches!(result, Err(AppError::Conflict { .. })));
        assert_eq!(accounts.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_resident_requires_existing_account() {
        let (_, residents) = repositories();

        let result = residents
            .create(Resident::from_draft(
                Uuid::new_v4(),
                resident_draft(Uuid::new_v4(), "Ivan", "Petrov"),
            ))
            .await;

        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_account_delete_cascades_to_residents() {
        let (accounts, residents) = repositories();

        let created = accounts.create(account("0000000001")).await.unwrap();
        residents
            .create(Resident::from_draft(
                Uuid::new_v4(),
                resident_draft(created.id, "Ivan", "Petrov"),
            ))
            .await
            .unwrap();

        accounts.delete(created.id).await.unwrap();

        assert_eq!(residents.count().await.unwrap(), 0);
        assert!(accounts.find_details(created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_details_order_residents_by_name() {
        let (accounts, residents) = repositories();
        let created = accounts.create(account("0000000001")).await.unwrap();

        for (first, last) in [("Olga", "Sidorova"), ("Ivan", "Petrov"), ("Anna", "Petrov")] {
            residents
                .create(Resident::from_draft(
                    Uuid::new_v4(),
                    resident_draft(created.id, first, last),
                ))
                .await
                .unwrap();
        }

        let details = accounts.find_details(created.id).await.unwrap().unwrap();
        let names: Vec<&str> = details
            .residents
            .iter()
            .map(|r| r.first_name.as_str())
            .collect();

        assert_eq!(names, vec!["Anna", "Ivan", "Olga"]);
    }

    #[tokio::test]
    async fn test_list_orders_by_account_number() {
        let (accounts, _) = repositories();
        for number in ["0000000003", "0000000001", "0000000002"] {
            accounts.create(account(number)).await.unwrap();
        }

        let numbers: Vec<String> = accounts
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.account_number)
            .collect();

        assert_eq!(numbers, vec!["0000000001", "0000000002", "0000000003"]);
    }

    #[tokio::test]
    async fn test_update_missing_account_is_not_found() {
        let (accounts, _) = repositories();
        let a = account("0000000001");

        let result = accounts
            .update(
                a.id,
                AccountDraft {
                    start_date: a.start_date,
                    end_date: a.end_date,
                    address: a.address.clone(),
                    area: a.area,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete_resident_twice() {
        let (accounts, residents) = repositories();
        let created = accounts.create(account("0000000001")).await.unwrap();
        let resident = residents
            .create(Resident::from_draft(
                Uuid::new_v4(),
                resident_draft(created.id, "Ivan", "Petrov"),
            ))
            .await
            .unwrap();

        assert!(residents.delete(resident.id).await.is_ok());
        assert!(matches!(
            residents.delete(resident.id).await,
            Err(AppError::NotFound { .. })
        ));
    }
}
