//! Flat-file adapter for ImprovementRepository
//!
//! One JSON document per improvement, named by its id, inside a single
//! directory. There is no locking; the service is the only writer.
//!
//! Documents are written to a hidden temp file first and only then published
//! under their id, so a reader never sees a half-written record and a failed
//! write never blocks a later retry.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::domain::entities::{Improvement, ImprovementId};
use crate::domain::ports::ImprovementRepository;
use crate::error::DomainError;

pub struct FileImprovementRepository {
    dir: PathBuf,
}

impl FileImprovementRepository {
    /// Open the store, creating the directory on first use
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, DomainError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).await.map_err(|e| {
            DomainError::Storage(format!("Failed to create {}: {}", dir.display(), e))
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: &ImprovementId) -> PathBuf {
        self.dir.join(id.to_string())
    }

    async fn read(&self, path: &Path) -> Result<Improvement, DomainError> {
        let bytes = fs::read(path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => DomainError::NotFound(path.display().to_string()),
            _ => DomainError::Storage(format!("Failed to read {}: {}", path.display(), e)),
        })?;

        serde_json::from_slice(&bytes).map_err(|e| {
            DomainError::Storage(format!(
                "{} is not a valid improvement: {}",
                path.display(),
                e
            ))
        })
    }

    /// Write a complete document to a fresh temp file in the store directory.
    /// On failure the temp file is removed before returning.
    async fn write_temp(&self, improvement: &Improvement) -> Result<PathBuf, DomainError> {
        let body = serde_json::to_vec_pretty(improvement)
            .map_err(|e| DomainError::Storage(e.to_string()))?;
        let tmp = self
            .dir
            .join(format!(".{}.{}.tmp", improvement.id, Uuid::new_v4()));

        let written = async {
            let mut file = fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&tmp)
                .await?;
            file.write_all(&body).await?;
            file.sync_all().await
        }
        .await;

        if let Err(e) = written {
            discard(&tmp).await;
            return Err(DomainError::Storage(format!(
                "Failed to write {}: {}",
                tmp.display(),
                e
            )));
        }
        Ok(tmp)
    }
}

/// Best-effort removal of a temp file
async fn discard(tmp: &Path) {
    if let Err(e) = fs::remove_file(tmp).await {
        if e.kind() != ErrorKind::NotFound {
            tracing::warn!("Failed to remove {}: {}", tmp.display(), e);
        }
    }
}

fn is_temp_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map_or(false, |name| name.starts_with('.'))
}

#[async_trait]
impl ImprovementRepository for FileImprovementRepository {
    async fn add(&self, improvement: &Improvement) -> Result<(), DomainError> {
        let path = self.path_for(&improvement.id);
        let tmp = self.write_temp(improvement).await?;

        // hard_link fails if the target exists, which keeps records write-once
        let published = fs::hard_link(&tmp, &path).await;
        discard(&tmp).await;
        published.map_err(|e| match e.kind() {
            ErrorKind::AlreadyExists => DomainError::AlreadyExists(improvement.id.to_string()),
            _ => DomainError::Storage(format!("Failed to create {}: {}", path.display(), e)),
        })?;

        tracing::info!("Saved {}", path.display());
        Ok(())
    }

    async fn add_all(&self, improvements: &[Improvement]) -> Result<usize, DomainError> {
        let mut written = 0;
        for improvement in improvements {
            match self.add(improvement).await {
                Ok(()) => written += 1,
                Err(DomainError::AlreadyExists(id)) => {
                    tracing::warn!("Refusing to overwrite existing improvement {}", id);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(written)
    }

    async fn get(&self, id: &ImprovementId) -> Result<Improvement, DomainError> {
        self.read(&self.path_for(id)).await.map_err(|e| match e {
            DomainError::NotFound(_) => DomainError::NotFound(id.to_string()),
            other => other,
        })
    }

    async fn get_all(&self) -> Result<Vec<Improvement>, DomainError> {
        let mut entries = fs::read_dir(&self.dir).await.map_err(|e| {
            DomainError::Storage(format!("Failed to list {}: {}", self.dir.display(), e))
        })?;

        let mut improvements = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| DomainError::Storage(e.to_string()))?
        {
            let path = entry.path();
            if is_temp_file(&path) {
                continue;
            }
            match self.read(&path).await {
                Ok(improvement) => improvements.push(improvement),
                Err(e) => tracing::warn!("Skipping {}: {}", path.display(), e),
            }
        }
        Ok(improvements)
    }

    async fn replace(&self, improvement: &Improvement) -> Result<(), DomainError> {
        let path = self.path_for(&improvement.id);
        let exists = fs::try_exists(&path).await.map_err(|e| {
            DomainError::Storage(format!("Failed to check {}: {}", path.display(), e))
        })?;
        if !exists {
            return Err(DomainError::NotFound(improvement.id.to_string()));
        }

        let tmp = self.write_temp(improvement).await?;
        if let Err(e) = fs::rename(&tmp, &path).await {
            discard(&tmp).await;
            return Err(DomainError::Storage(format!(
                "Failed to replace {}: {}",
                path.display(),
                e
            )));
        }

        tracing::info!("Replaced {}", path.display());
        Ok(())
    }

    async fn delete(&self, id: &ImprovementId) -> Result<(), DomainError> {
        let path = self.path_for(id);
        fs::remove_file(&path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => DomainError::NotFound(id.to_string()),
            _ => DomainError::Storage(format!("Failed to remove {}: {}", path.display(), e)),
        })
    }
}
