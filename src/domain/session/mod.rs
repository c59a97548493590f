//! Session domain module.
//!
//! A session is a named workspace with a fixed time-to-live. The name is the
//! only credential: whoever knows it can read and modify the workspace until
//! it expires and is swept.

mod aggregate;
mod errors;
mod name;

pub use aggregate::Session;
pub use errors::SessionError;
pub use name::{SessionName, MAX_NAME_LENGTH, RESERVED_NAMES};
