//! Bilingual text - the shared `{en, fr}` shape used across most entities

use serde::{Deserialize, Serialize};

/// A field that may be present in English, French, or both.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "jsonb")]
pub struct LocalizedText {
    pub en: Option<String>,
    pub fr: Option<String>,
}

impl LocalizedText {
    #[must_use]
    pub const fn new(en: Option<String>, fr: Option<String>) -> Self {
        Self { en, fr }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.en.as_deref().unwrap_or("").is_empty() && self.fr.as_deref().unwrap_or("").is_empty()
    }

    /// Prefers English, falls back to French, then empty.
    #[must_use]
    pub fn best(&self) -> &str {
        self.en
            .as_deref()
            .filter(|s| !s.is_empty())
            .or(self.fr.as_deref())
            .unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_when_both_blank() {
        assert!(LocalizedText::new(Some(String::new()), None).is_empty());
        assert!(LocalizedText::default().is_empty());
    }

    #[test]
    fn best_prefers_english() {
        let t = LocalizedText::new(Some("hello".into()), Some("bonjour".into()));
        assert_eq!(t.best(), "hello");
        let fr_only = LocalizedText::new(None, Some("bonjour".into()));
        assert_eq!(fr_only.best(), "bonjour");
    }
}
