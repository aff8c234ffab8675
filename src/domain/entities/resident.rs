//! Resident entity representing a person attached to an account.

use chrono::NaiveDate;
use uuid::Uuid;

/// A person registered at exactly one account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resident {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub middle_name: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub account_id: Uuid,
}

impl Resident {
    /// Builds a resident from its mutable fields.
    pub fn from_draft(id: Uuid, draft: ResidentDraft) -> Self {
        Self {
            id,
            first_name: draft.first_name,
            last_name: draft.last_name,
            middle_name: draft.middle_name,
            birth_date: draft.birth_date,
            account_id: draft.account_id,
        }
    }

    /// Overwrites every mutable field with the draft values.
    pub fn apply(&mut self, draft: ResidentDraft) {
        self.first_name = draft.first_name;
        self.last_name = draft.last_name;
        self.middle_name = draft.middle_name;
        self.birth_date = draft.birth_date;
        self.account_id = draft.account_id;
    }
}

/// Mutable fields of a resident, used for creation and full updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResidentDraft {
    pub first_name: String,
    pub last_name: String,
    pub middle_name: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub account_id: Uuid,
}
