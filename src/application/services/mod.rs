//! Business logic services for the application layer.

pub mod account_service;
pub mod resident_service;

pub use account_service::AccountService;
pub use resident_service::ResidentService;
