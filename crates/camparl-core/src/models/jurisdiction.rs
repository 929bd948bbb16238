//! Jurisdiction tag - scopes every natural key to a legislative body

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque scope slug, e.g. "ca-federal"
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(transparent)]
pub struct Jurisdiction(String);

impl Jurisdiction {
    /// Builds a jurisdiction tag, rejecting anything that isn't a lowercase slug
    pub fn new(raw: impl Into<String>) -> Result<Self, crate::CoreError> {
        let raw = raw.into();
        let valid = !raw.is_empty()
            && raw
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
        if valid {
            Ok(Self(raw))
        } else {
            Err(crate::CoreError::InvalidJurisdiction(raw))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The only jurisdiction this core models today.
    #[must_use]
    pub fn ca_federal() -> Self {
        Self("ca-federal".to_string())
    }
}

impl fmt::Display for Jurisdiction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_slug() {
        assert!(Jurisdiction::new("ca-federal").is_ok());
    }

    #[test]
    fn rejects_uppercase_and_spaces() {
        assert!(Jurisdiction::new("CA Federal").is_err());
        assert!(Jurisdiction::new("").is_err());
    }
}
