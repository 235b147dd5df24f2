//! Domain ports (traits)
//!
//! Port traits define interfaces that the domain layer requires.
//! Adapters provide concrete implementations of these traits.

pub mod feed;
pub mod llm;
pub mod repositories;

pub use feed::{FeedSource, RawEntry};
pub use llm::{ChatMessage, ChatRole, LlmClient};
pub use repositories::ImprovementRepository;
