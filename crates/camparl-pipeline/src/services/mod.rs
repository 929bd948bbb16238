mod common;

pub mod bills;
pub mod committees;
pub mod debates;
pub mod politicians;
pub mod votes;

pub use bills::BillIngestService;
pub use committees::CommitteeIngestService;
pub use debates::DebateIngestService;
pub use politicians::PoliticianIngestService;
pub use votes::VoteIngestService;
