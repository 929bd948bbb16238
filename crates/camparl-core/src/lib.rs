//! Core domain types for the parliamentary data platform

mod error;
mod models;

pub use error::CoreError;
pub use models::*;
