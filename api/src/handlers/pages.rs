//! Page handlers
//!
//! HTML fragments for the htmx front page, plus JSON lookup by id.

use axum::extract::{Path, State};
use axum::response::Html;
use axum::Json;

use crate::domain::entities::{Improvement, ImprovementId};
use crate::error::AppError;
use crate::views::{render_improvements, render_index, render_originals};
use crate::AppState;

/// GET /
pub async fn index() -> Html<String> {
    Html(render_index())
}

/// GET /improvements
pub async fn list_improvements(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let improvements = state.repo.get_all().await?;
    Ok(Html(render_improvements(improvements)))
}

/// GET /originals
pub async fn list_originals(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let improvements = state.repo.get_all().await?;
    Ok(Html(render_originals(improvements)))
}

/// GET /improvements/:id
pub async fn get_improvement(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Improvement>, AppError> {
    let id: ImprovementId = id
        .parse()
        .map_err(|_| AppError::BadRequest(format!("{} is not a valid improvement id", id)))?;

    let improvement = state.repo.get(&id).await?;
    Ok(Json(improvement))
}
