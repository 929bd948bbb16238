//! Upstream bilingual field shape - `{en, fr}` - deserialized as-is. Missing
//! languages are never backfilled from the other at the adapter boundary;
//! that's the merger's job, and only across sources, never within one.

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Bilingual {
    pub en: Option<String>,
    pub fr: Option<String>,
}
