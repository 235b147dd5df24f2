//! PostgreSQL adapters
//!
//! Implementations of repository traits using SeaORM and PostgreSQL.

pub mod improvement_repo;

#[cfg(test)]
mod integration_tests;

pub use improvement_repo::PostgresImprovementRepository;
