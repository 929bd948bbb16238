//! Core error types

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid jurisdiction tag: {0}")]
    InvalidJurisdiction(String),

    #[error("Invalid natural key: {0}")]
    InvalidNaturalKey(String),

    #[error("Bill not found: {0}")]
    BillNotFound(String),

    #[error("Politician not found: {0}")]
    PoliticianNotFound(String),

    #[error("Vote not found: {0}")]
    VoteNotFound(String),

    #[error("Committee not found: {0}")]
    CommitteeNotFound(String),

    #[error("Debate not found: {0}")]
    DebateNotFound(String),
}
