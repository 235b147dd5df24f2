//! Adapters layer
//!
//! Implementations of port traits for external systems.

pub mod file;
pub mod groq;
pub mod postgres;
pub mod rss;

pub use file::FileImprovementRepository;
pub use groq::GroqClient;
pub use postgres::PostgresImprovementRepository;
pub use rss::HttpFeedSource;
