//! Core domain entities.
//!
//! - [`Account`] - A dwelling unit with lease window, address and area
//! - [`Resident`] - A person attached to one account
//!
//! Creation and update inputs are carried by the `*Draft` structs; identifiers
//! and account numbers are assigned by the services.

pub mod account;
pub mod resident;

pub use account::{Account, AccountDetails, AccountDraft};
pub use resident::{Resident, ResidentDraft};
