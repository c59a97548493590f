//! Session name value object.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::ValidationError;

/// Maximum length for a session name, in characters.
pub const MAX_NAME_LENGTH: usize = 128;

/// Names that collide with fixed HTTP routes.
pub const RESERVED_NAMES: [&str; 3] = ["session", "sessions", "health"];

/// Human-chosen, case-sensitive session name.
///
/// # Invariants
///
/// - Stored exactly as received, surrounding whitespace included
/// - Not blank, at most [`MAX_NAME_LENGTH`] characters
/// - Fits in one path segment once percent-encoded: no `/`, no control characters
/// - Not one of [`RESERVED_NAMES`]
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionName(String);

impl SessionName {
    /// Validates and wraps a requested name.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, ValidationError> {
        let name = raw.as_ref();

        if name.trim().is_empty() {
            return Err(ValidationError::empty_field("name"));
        }

        let len = name.chars().count();
        if len > MAX_NAME_LENGTH {
            return Err(ValidationError::too_long("name", MAX_NAME_LENGTH, len));
        }

        if let Some(bad) = name.chars().find(|c| *c == '/' || c.is_control()) {
            return Err(ValidationError::invalid_format(
                "name",
                format!("character {:?} is not allowed", bad),
            ));
        }

        if RESERVED_NAMES.contains(&name) {
            return Err(ValidationError::invalid_format(
                "name",
                format!("'{}' is reserved", name),
            ));
        }

        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for SessionName {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SessionName> for String {
    fn from(name: SessionName) -> Self {
        name.0
    }
}

impl AsRef<str> for SessionName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
