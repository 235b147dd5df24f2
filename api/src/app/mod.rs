//! Application layer
//!
//! Contains use cases and service orchestration.
//! Services coordinate between domain entities and ports.

pub mod migration_service;
pub mod prompts;
pub mod refresh_service;
pub mod rewrite_service;

pub use migration_service::MigrationService;
pub use refresh_service::RefreshService;
pub use rewrite_service::RewriteService;
