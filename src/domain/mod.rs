//! Domain layer: entities, search rules and repository contracts.
//!
//! - [`entities`] - Accounts and residents
//! - [`account_filter`] - Validated account search with in-memory evaluation
//! - [`repositories`] - Storage traits implemented by `crate::infrastructure`
//!
//! Nothing here depends on a concrete database.

pub mod account_filter;
pub mod entities;
pub mod repositories;
