//! Domain models

mod api_key;
mod bill;
mod committee;
mod debate;
mod fetch_log;
mod flow_run;
mod jurisdiction;
mod localized_text;
mod personalization;
mod politician;
mod vote;
mod vote_record;

pub use api_key::ApiKey;
pub use bill::Bill;
pub use committee::{Committee, CommitteeMeeting};
pub use debate::{Debate, Speech};
pub use fetch_log::{FetchLog, FetchStatus};
pub use flow_run::{FlowRun, RunStatus, TaskRun};
pub use jurisdiction::Jurisdiction;
pub use localized_text::LocalizedText;
pub use personalization::{FeedToken, IgnoredBill};
pub use politician::Politician;
pub use vote::{Vote, VoteResult};
pub use vote_record::{VotePosition, VoteRecord};
