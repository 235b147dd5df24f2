//! One-off migration for records stored before image extraction existed

use std::sync::Arc;

use crate::domain::entities::Improvement;
use crate::domain::ports::ImprovementRepository;
use crate::error::DomainError;

pub struct MigrationService<R>
where
    R: ImprovementRepository + ?Sized,
{
    repo: Arc<R>,
}

impl<R> MigrationService<R>
where
    R: ImprovementRepository + ?Sized,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Lift leading images out of stored summaries.
    ///
    /// Changed records are replaced under the same id. Returns how many were
    /// rewritten; running it again returns 0.
    pub async fn migrate_images(&self) -> Result<usize, DomainError> {
        let mut migrated = 0;

        for improvement in self.repo.get_all().await? {
            let Some(original) = improvement.original.reextract_image() else {
                continue;
            };

            let replacement = Improvement {
                original,
                ..improvement
            };
            self.repo.replace(&replacement).await?;

            tracing::info!(id = %replacement.id, "Migrated image for {}", replacement.original.link);
            migrated += 1;
        }

        Ok(migrated)
    }
}
