mod bills;
mod committees;
mod debates;
mod health;
mod politicians;
mod preferences;
mod search;
mod votes;

pub use bills::{get_bill, list_bills, search_bills};
pub use bills::{__path_get_bill, __path_list_bills, __path_search_bills};

pub use committees::{get_committee, list_committee_meetings, list_committees};
pub use committees::{__path_get_committee, __path_list_committee_meetings, __path_list_committees};

pub use debates::{get_debate, list_debates, list_speeches};
pub use debates::{__path_get_debate, __path_list_debates, __path_list_speeches};

pub use health::health;
pub use health::__path_health;

pub use politicians::{get_politician, list_politicians};
pub use politicians::{__path_get_politician, __path_list_politicians};

pub use preferences::{create_feed_token, ignore_bill, list_ignored, revoke_feed_token, unignore_bill};
pub use preferences::{__path_create_feed_token, __path_ignore_bill, __path_list_ignored, __path_revoke_feed_token, __path_unignore_bill};

pub use search::search;
pub use search::__path_search;

pub use votes::{get_vote, list_vote_records, list_votes};
pub use votes::{__path_get_vote, __path_list_vote_records, __path_list_votes};
