//! Repository port traits
//!
//! These traits define the interface for data persistence.
//! Implementations are provided by adapters (flat files, PostgreSQL).

use async_trait::async_trait;

use crate::domain::entities::{Improvement, ImprovementId};
use crate::error::DomainError;

/// Repository for Improvement entities
///
/// Records are write-once through `add`: storing an id that already exists is
/// rejected with `DomainError::AlreadyExists` rather than overwriting it.
/// `replace` is the only way to change a stored record.
#[async_trait]
pub trait ImprovementRepository: Send + Sync {
    /// Store a single improvement
    async fn add(&self, improvement: &Improvement) -> Result<(), DomainError>;

    /// Store a batch, skipping ids that already exist. Returns how many were written.
    async fn add_all(&self, improvements: &[Improvement]) -> Result<usize, DomainError>;

    /// Get an improvement by id
    async fn get(&self, id: &ImprovementId) -> Result<Improvement, DomainError>;

    /// Get every stored improvement
    async fn get_all(&self) -> Result<Vec<Improvement>, DomainError>;

    /// Swap a stored improvement for a new version with the same id in one step.
    /// Fails with `DomainError::NotFound` if nothing is stored under that id.
    async fn replace(&self, improvement: &Improvement) -> Result<(), DomainError>;

    /// Remove an improvement
    async fn delete(&self, id: &ImprovementId) -> Result<(), DomainError>;
}
