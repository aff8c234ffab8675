//! Account entity representing a dwelling unit in the ledger.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::resident::Resident;

/// A ledger account: one dwelling unit under a lease.
///
/// `account_number` is assigned once at creation and never changes. The lease
/// window invariant `end_date > start_date` is enforced by request validation
/// and by a check constraint in PostgreSQL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: Uuid,
    pub account_number: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub address: String,
    pub area: i32,
}

impl Account {
    /// Creates a new Account instance.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let account = Account::new(
    ///     Uuid::new_v4(),
    ///     "0123456789".to_string(),
    ///     start,
    ///     end,
    ///     "Main St 1".to_string(),
    ///     50,
    /// );
    /// ```
    pub fn new(
        id: Uuid,
        account_number: String,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
        address: String,
        area: i32,
    ) -> Self {
        Self {
            id,
            account_number,
            start_date,
            end_date,
            address,
            area,
        }
    }

    /// Builds an account from its mutable fields and a freshly assigned number.
    pub fn from_draft(id: Uuid, account_number: String, draft: &AccountDraft) -> Self {
        Self::new(
            id,
            account_number,
            draft.start_date,
            draft.end_date,
            draft.address.clone(),
            draft.area,
        )
    }

    /// Returns `true` if the lease covers `at` (both bounds inclusive).
    pub fn is_active_on(&self, at: DateTime<Utc>) -> bool {
        self.start_date <= at && at <= self.end_date
    }

    /// Overwrites every mutable field with the draft values.
    pub fn apply(&mut self, draft: AccountDraft) {
        self.start_date = draft.start_date;
        self.end_date = draft.end_date;
        self.address = draft.address;
        self.area = draft.area;
    }
}

/// Mutable fields of an account.
///
/// Used both for creation (the service adds id and number) and for updates,
/// which overwrite all four fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountDraft {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub address: String,
    pub area: i32,
}

/// An account together with the residents attached to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountDetails {
    pub account: Account,
    pub residents: Vec<Resident>,
}

impl AccountDetails {
    pub fn has_residents(&self) -> bool {
        !self.residents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn draft() -> AccountDraft {
        AccountDraft {
            start_date: at(2024, 1, 1),
            end_date: at(2025, 1, 1),
            address: "Main St".to_string(),
            area: 50,
        }
    }

    #[test]
    fn test_from_draft() {
        let id = Uuid::new_v4();
        let account = Account::from_draft(id, "0000000001".to_string(), &draft());

        assert_eq!(account.id, id);
        assert_eq!(account.account_number, "0000000001");
        assert_eq!(account.address, "Main St");
        assert_eq!(account.area, 50);
    }

    #[test]
    fn test_is_active_on_bounds_inclusive() {
        let account = Account::from_draft(Uuid::new_v4(), "0000000001".to_string(), &draft());

        assert!(account.is_active_on(at(2024, 1, 1)));
        assert!(account.is_active_on(at(2024, 6, 15)));
        assert!(account.is_active_on(at(2025, 1, 1)));
        assert!(!account.is_active_on(at(2023, 12, 31)));
        assert!(!account.is_active_on(at(2025, 1, 2)));
    }

    #[test]
    fn test_apply_overwrites_mutable_fields_only() {
        let mut account = Account::from_draft(Uuid::new_v4(), "0000000001".to_string(), &draft());
        let id = account.id;

        account.apply(AccountDraft {
            start_date: at(2030, 1, 1),
            end_date: at(2031, 1, 1),
            address: "Second Ave".to_string(),
            area: 75,
        });

        assert_eq!(account.id, id);
        assert_eq!(account.account_number, "0000000001");
        assert_eq!(account.address, "Second Ave");
        assert_eq!(account.area, 75);
        assert_eq!(account.start_date, at(2030, 1, 1));
    }
}
