//! Resident management service.

use std::sync::Arc;

use serde_json::json;
use uuid::Uuid;

use crate::domain::entities::{Resident, ResidentDraft};
use crate::domain::repositories::ResidentRepository;
use crate::error::AppError;

/// Service for managing residents attached to accounts.
///
/// The reference to the parent account is checked by storage; a missing
/// account surfaces as [`AppError::Validation`].
pub struct ResidentService<R: ResidentRepository + ?Sized> {
    repository: Arc<R>,
}

impl<R: ResidentRepository + ?Sized> ResidentService<R> {
    /// Creates a new resident service.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Lists every resident.
    pub async fn list_residents(&self) -> Result<Vec<Resident>, AppError> {
        self.repository.list().await
    }

    /// Retrieves a resident by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no resident has this id.
    pub async fn get_resident(&self, id: Uuid) -> Result<Resident, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Resident not found", json!({ "id": id })))
    }

    /// Registers a resident at an account.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the account does not exist.
    pub async fn create_resident(&self, draft: ResidentDraft) -> Result<Resident, AppError> {
        let resident = self
            .repository
            .create(Resident::from_draft(Uuid::new_v4(), draft))
            .await?;

        tracing::info!(
            id = %resident.id,
            account_id = %resident.account_id,
            "Resident created"
        );

        Ok(resident)
    }

    /// Overwrites every mutable field of a resident, including its account.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the resident does not exist.
    /// Returns [`AppError::Validation`] if the new account does not exist.
    pub async fn update_resident(
        &self,
        id: Uuid,
        draft: ResidentDraft,
    ) -> Result<Resident, AppError> {
        self.get_resident(id).await?;
        self.repository.update(id, draft).await
    }

    /// Deletes a resident.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the resident does not exist.
    pub async fn delete_resident(&self, id: Uuid) -> Result<bool, AppError> {
        self.get_resident(id).await?;
        self.repository.delete(id).await?;

        tracing::info!(id = %id, "Resident deleted");
        Ok(true)
    }

    /// Counts all residents.
    pub async fn count_residents(&self) -> Result<i64, AppError> {
        self.repository.count().await
    }
}
