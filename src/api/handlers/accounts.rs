//! Handlers for account endpoints.

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::{StatusCode, header},
};
use uuid::Uuid;
use validator::Validate;

use crate::api::dto::account::{
    AccountDetailsResponse, AccountRequest, AccountResponse, AccountSummary,
};
use crate::api::dto::filter::AccountFilterParams;
use crate::error::AppError;
use crate::state::AppState;

/// Lists every account as `{id, accountNumber}`.
///
/// # Endpoint
///
/// `GET /api/account`
pub async fn list_accounts_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<AccountSummary>>, AppError> {
    let accounts = state.account_service.list_accounts().await?;

    Ok(Json(accounts.into_iter().map(Into::into).collect()))
}

/// Looks up an account by its 10-digit number.
///
/// # Endpoint
///
/// `GET /api/account/{accountNumber}`
///
/// # Errors
///
/// Returns 404 if no account has this number.
pub async fn get_account_by_number_handler(
    State(state): State<AppState>,
    Path(account_number): Path<String>,
) -> Result<Json<AccountSummary>, AppError> {
    let account = state.account_service.get_by_number(&account_number).await?;

    Ok(Json(account.into()))
}

/// Returns an account with its residents.
///
/// # Endpoint
///
/// `GET /api/account/details/{id}`
///
/// # Errors
///
/// Returns 400 if `id` is not a UUID.
/// Returns 404 if the account does not exist.
pub async fn account_details_handler(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<AccountDetailsResponse>, AppError> {
    let Path(id) = id?;
    let details = state.account_service.get_details(id).await?;

    Ok(Json(details.into()))
}

/// Creates an account. The account number is generated by the server.
///
/// # Endpoint
///
/// `POST /api/account`
///
/// # Request Body
///
/// ```json
/// {
///   "startDate": "2024-01-01T00:00:00Z",
///   "endDate": "2025-01-01T00:00:00Z",
///   "address": "Main St 1, apt 4",
///   "area": 54
/// }
/// ```
///
/// # Errors
///
/// Returns 400 if validation fails.
/// Returns 409 if no free account number was found.
pub async fn create_account_handler(
    State(state): State<AppState>,
    payload: Result<Json<AccountRequest>, JsonRejection>,
) -> Result<(StatusCode, [(header::HeaderName, String); 1], Json<AccountResponse>), AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let account = state
        .account_service
        .create_account(payload.into_draft())
        .await?;

    let location = format!("/api/account/details/{}", account.id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(account.into()),
    ))
}

/// Overwrites the lease window, address and area of an account.
///
/// # Endpoint
///
/// `PUT /api/account/{id}`
///
/// # Errors
///
/// Returns 400 if `id` is not a UUID or validation fails.
/// Returns 404 if the account does not exist.
pub async fn update_account_handler(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<AccountRequest>, JsonRejection>,
) -> Result<Json<AccountResponse>, AppError> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    payload.validate()?;

    let account = state
        .account_service
        .update_account(id, payload.into_draft())
        .await?;

    Ok(Json(account.into()))
}

/// Deletes an account and its residents.
///
/// # Endpoint
///
/// `DELETE /api/account/{id}`
///
/// # Errors
///
/// Returns 404 if the account does not exist.
pub async fn delete_account_handler(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let Path(id) = id?;
    state.account_service.delete_account(id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Searches accounts with filters, sorting and pagination.
///
/// # Endpoint
///
/// `GET /api/account/filter?hasResidents=true&address=Main&sortBy=area&sortDirection=desc&page=1&pageSize=10`
///
/// # Errors
///
/// Returns 400 for an unknown `sortBy`/`sortDirection`, `page < 1`, a
/// `pageSize` outside 1-100, or an unparsable value.
pub async fn filter_accounts_handler(
    State(state): State<AppState>,
    params: Result<Query<AccountFilterParams>, QueryRejection>,
) -> Result<Json<Vec<AccountSummary>>, AppError> {
    let Query(params) = params?;
    let accounts = state.account_service.search_accounts(params.into()).await?;

    Ok(Json(accounts.into_iter().map(Into::into).collect()))
}
