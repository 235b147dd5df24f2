//! SeaORM entities
//!
//! Table models for the relational backend. Conversions to and from domain
//! entities live in the postgres adapter.

pub mod improvements;
