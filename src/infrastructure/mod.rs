//! Infrastructure layer: concrete storage behind the domain repository traits.
//!
//! - [`persistence`] - PostgreSQL repositories
//! - [`memory`] - In-memory repositories sharing one store

pub mod memory;
pub mod persistence;
