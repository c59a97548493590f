//! Jotz - Ephemeral named sessions for sharing notes and small files
//!
//! A session is claimed by name and lives for a fixed time. Anyone who
//! knows the name can read and edit its notes and files until it expires,
//! after which the sweeper removes the session together with its content.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
