//! Repository trait definitions for the domain layer.
//!
//! Traits define the storage contract; implementations live in
//! `crate::infrastructure`. Mock implementations are generated with `mockall`
//! for service tests.
//!
//! - [`AccountRepository`] - Accounts, account details and search
//! - [`ResidentRepository`] - Residents

pub mod account_repository;
pub mod resident_repository;

pub use account_repository::AccountRepository;
pub use resident_repository::ResidentRepository;

#[cfg(test)]
pub use account_repository::MockAccountRepository;
#[cfg(test)]
pub use resident_repository::MockResidentRepository;
