//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `SessionRegistry` - Name to live session mapping with expiry
//! - `ContentRepository` - Notes and files keyed by session

mod content_repository;
mod session_registry;

pub use content_repository::{ContentRepository, ContentRepositoryError, PurgeSummary};
pub use session_registry::{Registration, SessionRegistry};
