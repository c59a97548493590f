//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `memory` - Process-local registry and content store
//! - `postgres` - Durable registry and content store
//! - `expiry` - Background sweeper removing expired sessions
//! - `http` - REST API

pub mod expiry;
pub mod http;
pub mod memory;
pub mod postgres;

pub use expiry::{ExpirySweeper, ExpirySweeperConfig, SweepReport};
pub use memory::{InMemoryContentRepository, InMemorySessionRegistry};
pub use postgres::{PostgresContentRepository, PostgresSessionRegistry};
