//! Domain entities
//!
//! Pure domain models representing core business concepts.
//! These are separate from the SeaORM entities in the `entity` module.

pub mod improvement;
pub mod original;

pub use improvement::{sort_newest_first, Improvement, ImprovementId};
pub use original::{parse_published, Original, OriginalId};
