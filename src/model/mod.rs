pub mod api;
pub mod card;
pub mod election_guard;
pub mod session;
pub mod tally;
pub mod tracker;
pub mod trustee;
