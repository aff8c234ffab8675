//! Handlers for resident endpoints.

use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::{StatusCode, header},
};
use uuid::Uuid;
use validator::Validate;

use crate::api::dto::resident::{ResidentRequest, ResidentResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Lists every resident.
///
/// # Endpoint
///
/// `GET /api/resident`
pub async fn list_residents_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<ResidentResponse>>, AppError> {
    let residents = state.resident_service.list_residents().await?;

    Ok(Json(residents.into_iter().map(Into::into).collect()))
}

/// Returns one resident.
///
/// # Endpoint
///
/// `GET /api/resident/{id}`
pub async fn get_resident_handler(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<ResidentResponse>, AppError> {
    let Path(id) = id?;
    let resident = state.resident_service.get_resident(id).await?;

    Ok(Json(resident.into()))
}

/// Registers a resident at an existing account.
///
/// # Endpoint
///
/// `POST /api/resident`
///
/// # Request Body
///
/// ```json
/// {
///   "firstName": "Ivan",
///   "lastName": "Petrov",
///   "middleName": "Sergeevich",
///   "birthDate": "1990-05-17",
///   "accountId": "6c1f0a1e-8f7b-4f7e-9d4e-0b1f6f2f8a11"
/// }
/// ```
///
/// # Errors
///
/// Returns 400 if validation fails or the account does not exist.
pub async fn create_resident_handler(
    State(state): State<AppState>,
    payload: Result<Json<ResidentRequest>, JsonRejection>,
) -> Result<(StatusCode, [(header::HeaderName, String); 1], Json<ResidentResponse>), AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let resident = state
        .resident_service
        .create_resident(payload.into_draft())
        .await?;

    let location = format!("/api/resident/{}", resident.id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(resident.into()),
    ))
}

/// Overwrites every field of a resident, including its account.
///
/// # Endpoint
///
/// `PUT /api/resident/{id}`
///
/// # Errors
///
/// Returns 400 if validation fails or the account does not exist.
/// Returns 404 if the resident does not exist.
pub async fn update_resident_handler(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<ResidentRequest>, JsonRejection>,
) -> Result<Json<ResidentResponse>, AppError> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    payload.validate()?;

    let resident = state
        .resident_service
        .update_resident(id, payload.into_draft())
        .await?;

    Ok(Json(resident.into()))
}

/// Deletes a resident.
///
/// # Endpoint
///
/// `DELETE /api/resident/{id}`
pub async fn delete_resident_handler(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let Path(id) = id?;
    state.resident_service.delete_resident(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
