//! DTOs for resident endpoints.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::not_blank;
use crate::domain::entities::{Resident, ResidentDraft};

/// Request body for `POST /api/resident` and `PUT /api/resident/{id}`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_resident", skip_on_field_errors = false))]
pub struct ResidentRequest {
    #[validate(length(min = 1, max = 50, message = "First name must be 1-50 characters"))]
    #[validate(custom(function = "not_blank"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 50, message = "Last name must be 1-50 characters"))]
    #[validate(custom(function = "not_blank"))]
    pub last_name: String,

    #[validate(length(max = 100, message = "Middle name must be at most 100 characters"))]
    pub middle_name: Option<String>,

    pub birth_date: Option<NaiveDate>,

    pub account_id: Uuid,
}

fn validate_resident(request: &ResidentRequest) -> Result<(), ValidationError> {
    if let Some(birth_date) = request.birth_date
        && birth_date >= Utc::now().date_naive()
    {
        let mut error = ValidationError::new("birth_date");
        error.message = Some("birthDate must be in the past".into());
        return Err(error);
    }

    if request.account_id.is_nil() {
        let mut error = ValidationError::new("account_id");
        error.message = Some("accountId is required".into());
        return Err(error);
    }

    Ok(())
}

impl ResidentRequest {
    /// Converts the request into domain input. A blank middle name is
    /// stored as absent.
    pub fn into_draft(self) -> ResidentDraft {
        ResidentDraft {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            middle_name: self
                .middle_name
                .map(|m| m.trim().to_string())
                .filter(|m| !m.is_empty()),
            birth_date: self.birth_date,
            account_id: self.account_id,
        }
    }
}

/// Every stored field of a resident.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResidentResponse {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub middle_name: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub account_id: Uuid,
}

impl From<Resident> for ResidentResponse {
    fn from(r: Resident) -> Self {
        Self {
            id: r.id,
            first_name: r.first_name,
            last_name: r.last_name,
            middle_name: r.middle_name,
            birth_date: r.birth_date,
            account_id: r.account_id,
        }
    }
}

/// Identity fields of a resident, embedded in account details.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResidentSummary {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub middle_name: Option<String>,
}

impl From<Resident> for ResidentSummary {
    fn from(r: Resident) -> Self {
        Self {
            id: r.id,
            first_name: r.first_name,
            last_name: r.last_name,
            middle_name: r.middle_name,
        }
    }
}
