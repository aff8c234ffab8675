//! Shared application state handed to every handler.

use sqlx::PgPool;
use std::sync::Arc;

use crate::application::services::{AccountService, ResidentService};
use crate::config::StorageBackend;
use crate::domain::repositories::{AccountRepository, ResidentRepository};
use crate::infrastructure::memory::{
    InMemoryAccountRepository, InMemoryResidentRepository, InMemoryStore,
};
use crate::infrastructure::persistence::{PgAccountRepository, PgResidentRepository};
use crate::utils::account_number::Sha256AccountNumberGenerator;

pub type DynAccountService = AccountService<dyn AccountRepository>;
pub type DynResidentService = ResidentService<dyn ResidentRepository>;

#[derive(Clone)]
pub struct AppState {
    pub account_service: Arc<DynAccountService>,
    pub resident_service: Arc<DynResidentService>,
    pub storage: StorageBackend,
}

impl AppState {
    /// Builds state from any pair of repositories.
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        residents: Arc<dyn ResidentRepository>,
        max_attempts: usize,
        storage: StorageBackend,
    ) -> Self {
        Self {
            account_service: Arc::new(AccountService::new(
                accounts,
                Arc::new(Sha256AccountNumberGenerator),
                max_attempts,
            )),
            resident_service: Arc::new(ResidentService::new(residents)),
            storage,
        }
    }

    /// State backed by PostgreSQL repositories sharing one pool.
    pub fn postgres(pool: PgPool, max_attempts: usize) -> Self {
        let pool = Arc::new(pool);

        Self::new(
            Arc::new(PgAccountRepository::new(pool.clone())),
            Arc::new(PgResidentRepository::new(pool)),
            max_attempts,
            StorageBackend::Postgres,
        )
    }

    /// State backed by a fresh process-local store.
    pub fn in_memory(max_attempts: usize) -> Self {
        let store = Arc::new(InMemoryStore::new());

        Self::new(
            Arc::new(InMemoryAccountRepository::new(store.clone())),
            Arc::new(InMemoryResidentRepository::new(store)),
            max_attempts,
            StorageBackend::Memory,
        )
    }
}
