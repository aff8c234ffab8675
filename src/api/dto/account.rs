//! DTOs for account endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::not_blank;
use super::resident::ResidentSummary;
use crate::domain::entities::{Account, AccountDetails, AccountDraft};

/// Request body for `POST /api/account` and `PUT /api/account/{id}`.
///
/// The account number is never accepted from the client.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_lease_window", skip_on_field_errors = false))]
pub struct AccountRequest {
    pub start_date: DateTime<Utc>,

    pub end_date: DateTime<Utc>,

    #[validate(length(min = 1, max = 200, message = "Address must be 1-200 characters"))]
    #[validate(custom(function = "not_blank"))]
    pub address: String,

    #[validate(range(min = 1, message = "Area must be greater than 0"))]
    pub area: i32,
}

fn validate_lease_window(request: &AccountRequest) -> Result<(), ValidationError> {
    if request.end_date <= request.start_date {
        let mut error = ValidationError::new("lease_window");
        error.message = Some("endDate must be after startDate".into());
        return Err(error);
    }

    Ok(())
}

impl AccountRequest {
    pub fn into_draft(self) -> AccountDraft {
        AccountDraft {
            start_date: self.start_date,
            end_date: self.end_date,
            address: self.address.trim().to_string(),
            area: self.area,
        }
    }
}

/// Flat account view used by list and search endpoints.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    pub id: Uuid,
    pub account_number: String,
}

impl From<Account> for AccountSummary {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            account_number: account.account_number,
        }
    }
}

/// Every stored field of an account.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub id: Uuid,
    pub account_number: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub address: String,
    pub area: i32,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            account_number: account.account_number,
            start_date: account.start_date,
            end_date: account.end_date,
            address: account.address,
            area: account.area,
        }
    }
}

/// Account with a shallow list of its residents.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDetailsResponse {
    #[serde(flatten)]
    pub account: AccountResponse,
    pub residents: Vec<ResidentSummary>,
}

impl From<AccountDetails> for AccountDetailsResponse {
    fn from(details: AccountDetails) -> Self {
        Self {
            account: details.account.into(),
            residents: details.residents.into_iter().map(Into::into).collect(),
        }
    }
}
