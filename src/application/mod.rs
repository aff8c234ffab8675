//! Application layer services implementing business logic.
//!
//! Services coordinate repository calls, existence checks and account number
//! assignment, and give HTTP handlers and the admin CLI a uniform
//! `Result<T, AppError>` API.
//!
//! # Available Services
//!
//! - [`services::account_service::AccountService`] - Accounts, details and search
//! - [`services::resident_service::ResidentService`] - Residents

pub mod services;
