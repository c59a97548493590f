//! Session expiry.
//!
//! Lookups already hide expired sessions; the sweeper reclaims their storage
//! and releases their names.

mod sweeper;

pub use sweeper::{ExpirySweeper, ExpirySweeperConfig, SweepReport};
