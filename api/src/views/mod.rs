//! HTML views
//!
//! Server-rendered fragments consumed by htmx.

pub mod renderer;

pub use renderer::{render_improvements, render_index, render_originals};
