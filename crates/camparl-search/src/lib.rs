//! Hybrid keyword/vector search over bills, debates, and speeches.
//!
//! Keyword ranking comes straight from PostgreSQL's `ts_rank_cd` (already
//! normalized to `[0, 1)` by the repository layer). Vector similarity is
//! cosine similarity (`1 - cosine_distance`) against an optional query
//! embedding. When an embedding is supplied, the two scores are blended;
//! otherwise results fall back to keyword-only ranking.

mod error;

pub use error::SearchError;

use camparl_core::{Bill, Debate, Speech};
use camparl_db::Database;
use uuid::Uuid;

/// Weight given to the keyword score in hybrid mode; the similarity score
/// takes the remainder.
pub const KEYWORD_WEIGHT: f32 = 0.7;
pub const SIMILARITY_WEIGHT: f32 = 1.0 - KEYWORD_WEIGHT;

/// Default/maximum result counts, per the search contract.
pub const DEFAULT_LIMIT: i64 = 20;
pub const MAX_LIMIT: i64 = 100;

#[derive(Debug, Clone)]
pub struct SearchHit<T> {
    pub item: T,
    pub score: f32,
    pub snippet: String,
}

/// Combines a keyword score with an optional similarity score.
///
/// Returns the keyword score unchanged when no similarity score is
/// available - the "falls back to keyword-only" branch of the contract.
#[must_use]
pub fn hybrid_score(keyword_score: f32, similarity_score: Option<f32>) -> f32 {
    match similarity_score {
        Some(similarity) => KEYWORD_WEIGHT * keyword_score + SIMILARITY_WEIGHT * similarity,
        None => keyword_score,
    }
}

fn clamp_limit(limit: i64) -> i64 {
    limit.clamp(1, MAX_LIMIT)
}

pub struct SearchService<'a> {
    db: &'a Database,
}

impl<'a> SearchService<'a> {
    #[must_use]
    pub const fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Searches bills by keyword, optionally blending in vector similarity
    /// against `query_embedding` when one is supplied by the caller (the API
    /// layer decides whether/how to compute one; this crate never calls out
    /// to an embedding model itself).
    ///
    /// # Errors
    /// Returns `SearchError` if the underlying query fails.
    pub async fn search_bills(
        &self,
        jurisdiction: &str,
        query: &str,
        query_embedding: Option<&pgvector::Vector>,
        exclude_ids: &[Uuid],
        limit: i64,
        offset: i64,
    ) -> Result<Vec<SearchHit<Bill>>, SearchError> {
        let limit = clamp_limit(limit);
        let keyword_hits = self
            .db
            .bills()
            .search_by_content(jurisdiction, query, exclude_ids, limit, offset)
            .await?;

        let similarity_by_id = if let Some(embedding) = query_embedding {
            let similar = self
                .db
                .bills()
                .similar_by_embedding(jurisdiction, embedding, exclude_ids, limit)
                .await?;
            similar.into_iter().map(|(bill, score)| (bill.id, score)).collect()
        } else {
            std::collections::HashMap::new()
        };

        let mut hits: Vec<SearchHit<Bill>> = keyword_hits
            .into_iter()
            .map(|(bill, rank, snippet)| {
                let similarity = similarity_by_id.get(&bill.id).copied();
                let score = hybrid_score(rank, similarity);
                SearchHit { item: bill, score, snippet }
            })
            .collect();
        hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        Ok(hits)
    }

    /// # Errors
    /// Returns `SearchError` if the underlying query fails.
    pub async fn search_debates(
        &self,
        jurisdiction: &str,
        query: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<SearchHit<Debate>>, SearchError> {
        let limit = clamp_limit(limit);
        let hits = self.db.debates().search_by_content(jurisdiction, query, limit, offset).await?;
        Ok(hits
            .into_iter()
            .map(|(debate, rank, snippet)| SearchHit {
                item: debate,
                score: rank,
                snippet,
            })
            .collect())
    }

    /// # Errors
    /// Returns `SearchError` if the underlying query fails.
    pub async fn search_speeches(&self, query: &str, limit: i64, offset: i64) -> Result<Vec<SearchHit<Speech>>, SearchError> {
        let limit = clamp_limit(limit);
        let hits = self.db.speeches().search_by_content(query, limit, offset).await?;
        Ok(hits
            .into_iter()
            .map(|(speech, rank, snippet)| SearchHit {
                item: speech,
                score: rank,
                snippet,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hybrid_blends_both_scores() {
        let score = hybrid_score(0.8, Some(0.4));
        assert!((score - (0.7 * 0.8 + 0.3 * 0.4)).abs() < f32::EPSILON);
    }

    #[test]
    fn missing_similarity_falls_back_to_keyword_only() {
        assert!((hybrid_score(0.5, None) - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn clamp_limit_enforces_bounds() {
        assert_eq!(clamp_limit(0), 1);
        assert_eq!(clamp_limit(500), MAX_LIMIT);
        assert_eq!(clamp_limit(20), 20);
    }
}
