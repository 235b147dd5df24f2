//! HTTP handlers
//!
//! Axum request handlers for the API endpoints.

pub mod pages;
pub mod refresh;
pub mod rewrite;

pub use pages::{get_improvement, index, list_improvements, list_originals};
pub use refresh::{migrate, update};
pub use rewrite::{improve_summary, improve_title};
