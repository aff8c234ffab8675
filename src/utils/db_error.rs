//! Helpers for classifying database errors by constraint.

/// Unique constraint on `accounts.account_number`.
pub const ACCOUNT_NUMBER_CONSTRAINT: &str = "accounts_account_number_key";

/// Foreign key from `residents.account_id` to `accounts.id`.
pub const RESIDENT_ACCOUNT_CONSTRAINT: &str = "residents_account_id_fkey";

pub fn is_unique_violation_on(e: &sqlx::Error, constraint: &str) -> bool {
    let Some(db_err) = e.as_database_error() else {
        return false;
    };

    if !db_err.is_unique_violation() {
        return false;
    }

    db_err.constraint() == Some(constraint)
}

pub fn is_foreign_key_violation_on(e: &sqlx::Error, constraint: &str) -> bool {
    let Some(db_err) = e.as_database_error() else {
        return false;
    };

    if !db_err.is_foreign_key_violation() {
        return false;
    }

    db_err.constraint() == Some(constraint)
}
