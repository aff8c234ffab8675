//! Utility functions shared across layers.
//!
//! - [`account_number`] - Account number generation
//! - [`db_error`] - Database constraint classification

pub mod account_number;
pub mod db_error;
