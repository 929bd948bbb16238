//! Repository implementations

mod api_key;
mod bill;
mod committee;
mod debate;
mod fetch_log;
mod personalization;
mod politician;
mod scheduler;
mod vote;
mod vote_record;

pub use api_key::ApiKeyRepo;
pub use bill::BillRepo;
pub use committee::{CommitteeMeetingRepo, CommitteeRepo};
pub use debate::{DebateRepo, SpeechRepo};
pub use fetch_log::FetchLogRepo;
pub use personalization::{FeedTokenRepo, IgnoredBillRepo};
pub use politician::PoliticianRepo;
pub use scheduler::{FlowRunRepo, TaskRunRepo};
pub use vote::VoteRepo;
pub use vote_record::VoteRecordRepo;
