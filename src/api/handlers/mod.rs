//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod accounts;
pub mod health;
pub mod residents;

pub use accounts::{
    account_details_handler, create_account_handler, delete_account_handler,
    filter_accounts_handler, get_account_by_number_handler, list_accounts_handler,
    update_account_handler,
};
pub use health::health_handler;
pub use residents::{
    create_resident_handler, delete_resident_handler, get_resident_handler,
    list_residents_handler, update_resident_handler,
};
