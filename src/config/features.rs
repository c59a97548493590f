//! Feature flags configuration

use serde::Deserialize;

/// Feature flags for enabling/disabling functionality
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureFlags {
    /// Enable request tracing
    #[serde(default = "default_enable_tracing")]
    pub enable_tracing: bool,

    /// Expose the live session listing and the bulk file download.
    /// Both reveal every live session name to any caller.
    #[serde(default)]
    pub enable_session_index: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            enable_tracing: default_enable_tracing(),
            enable_session_index: false,
        }
    }
}

fn default_enable_tracing() -> bool {
    true
}
