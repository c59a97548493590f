//! HTTP DTOs for session endpoints.
//!
//! These types decouple the HTTP API from domain types, allowing independent evolution.

use serde::{Deserialize, Serialize};

use crate::domain::session::Session;

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Request to create or join a session.
#[derive(Debug, Clone, Deserialize)]
pub struct ResolveSessionRequest {
    pub name: String,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Resolved session with the link to share.
#[derive(Debug, Clone, Serialize)]
pub struct ResolveSessionResponse {
    pub name: String,
    pub url: String,
    pub session_id: String,
    /// `true` when this request created the session.
    pub created: bool,
    pub created_at: String,
    pub expires_at: String,
}

impl ResolveSessionResponse {
    pub fn new(session: &Session, url: String, created: bool) -> Self {
        Self {
            name: session.name().to_string(),
            url,
            session_id: session.id().to_string(),
            created,
            created_at: session.created_at().to_rfc3339(),
            expires_at: session.expires_at().to_rfc3339(),
        }
    }
}

/// Entry of the live session index.
#[derive(Debug, Clone, Serialize)]
pub struct ActiveSessionResponse {
    pub name: String,
    pub created_at: String,
    pub expires_at: String,
}

impl From<&Session> for ActiveSessionResponse {
    fn from(session: &Session) -> Self {
        Self {
            name: session.name().to_string(),
            created_at: session.created_at().to_rfc3339(),
            expires_at: session.expires_at().to_rfc3339(),
        }
    }
}
