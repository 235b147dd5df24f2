//! Flat-file adapters
//!
//! Local-disk implementations of repository traits.

pub mod improvement_repo;

pub use improvement_repo::FileImprovementRepository;
