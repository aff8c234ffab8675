//! PostgreSQL repository implementations.
//!
//! Queries are built at runtime with `sqlx::query_as` and mapped through
//! private row structs, so the domain entities stay free of database derives.
//!
//! - [`PgAccountRepository`] - Accounts, details and filtered search
//! - [`PgResidentRepository`] - Residents

pub mod pg_account_repository;
pub mod pg_resident_repository;

pub use pg_account_repository::PgAccountRepository;
pub use pg_resident_repository::PgResidentRepository;
