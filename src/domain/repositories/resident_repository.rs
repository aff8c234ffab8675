//! Repository trait for resident storage.

use crate::domain::entities::{Resident, ResidentDraft};
use crate::error::AppError;
use async_trait::async_trait;
use uuid::Uuid;

/// Repository interface for residents.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgResidentRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::memory::InMemoryResidentRepository`] - process-local store
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResidentRepository: Send + Sync {
    /// Inserts a resident.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the referenced account does not exist.
    async fn create(&self, resident: Resident) -> Result<Resident, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Resident>, AppError>;

    async fn list(&self) -> Result<Vec<Resident>, AppError>;

    /// Overwrites every mutable field of a resident.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the resident does not exist.
    /// Returns [`AppError::Validation`] if the referenced account does not exist.
    async fn update(&self, id: Uuid, draft: ResidentDraft) -> Result<Resident, AppError>;

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the resident does not exist.
    async fn delete(&self, id: Uuid) -> Result<(), AppError>;

    async fn count(&self) -> Result<i64, AppError>;
}
