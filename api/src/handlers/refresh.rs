//! Refresh and maintenance handlers

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::domain::entities::Improvement;
use crate::error::AppError;
use crate::AppState;

/// GET /update
///
/// Runs one refresh cycle synchronously and returns what it created.
pub async fn update(State(state): State<AppState>) -> Result<Json<Vec<Improvement>>, AppError> {
    let created = state.refresh_service.refresh().await?;
    Ok(Json(created))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MigrateResponse {
    pub migrated: usize,
}

/// POST /migrate
pub async fn migrate(State(state): State<AppState>) -> Result<Json<MigrateResponse>, AppError> {
    let migrated = state.migration_service.migrate_images().await?;
    tracing::info!("Image migration rewrote {} records", migrated);
    Ok(Json(MigrateResponse { migrated }))
}
