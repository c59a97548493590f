//! In-memory adapters.
//!
//! - **InMemorySessionRegistry** - name to session map with per-name atomic claims
//! - **InMemoryContentRepository** - notes and files grouped by session
//!
//! Nothing survives a restart.

mod content_repository;
mod session_registry;

pub use content_repository::InMemoryContentRepository;
pub use session_registry::InMemorySessionRegistry;
