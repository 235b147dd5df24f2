//! Direct rewrite handlers
//!
//! Pass-through endpoints for trying prompts by hand. Responses are plain text.

use axum::extract::{Query, State};
use serde::Deserialize;

use crate::error::AppError;
use crate::AppState;

/// Query for GET /improve-title
#[derive(Debug, Deserialize)]
pub struct ImproveTitleParams {
    pub content: String,
    /// Replaces the default editor prompt
    #[serde(default)]
    pub prompt: Option<String>,
}

/// Query for GET /improve-summary
#[derive(Debug, Deserialize)]
pub struct ImproveSummaryParams {
    pub original_title: String,
    pub new_title: String,
    pub original_summary: String,
    #[serde(default)]
    pub prompt: Option<String>,
}

/// GET /improve-title
///
/// Suggests candidates for `content`, then has the editor pick one.
pub async fn improve_title(
    State(state): State<AppState>,
    Query(params): Query<ImproveTitleParams>,
) -> Result<String, AppError> {
    let content = params.content.trim();
    if content.is_empty() {
        return Err(AppError::BadRequest("content must not be empty".to_string()));
    }

    let title = state
        .rewrite_service
        .rewrite_title(content, None, non_blank(&params.prompt))
        .await?;
    Ok(title)
}

/// GET /improve-summary
pub async fn improve_summary(
    State(state): State<AppState>,
    Query(params): Query<ImproveSummaryParams>,
) -> Result<String, AppError> {
    if params.new_title.trim().is_empty() {
        return Err(AppError::BadRequest("new_title must not be empty".to_string()));
    }

    let summary = state
        .rewrite_service
        .rewrite_summary(
            &params.original_title,
            &params.original_summary,
            &params.new_title,
            non_blank(&params.prompt),
        )
        .await?;
    Ok(summary)
}

fn non_blank(prompt: &Option<String>) -> Option<&str> {
    prompt.as_deref().filter(|p| !p.trim().is_empty())
}
