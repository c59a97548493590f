//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors)
//! - `session` - Named, time-boxed workspaces
//! - `content` - Notes and files owned by a session

pub mod content;
pub mod foundation;
pub mod session;
