#[macro_use]
extern crate rocket;

#[cfg(test)]
#[macro_use]
extern crate admin_test;

use rocket::{tokio::sync::Mutex, Build, Rocket};

use crate::{
    card::{CardReaderFairing, DynCardReader},
    config::ConfigFairing,
    logging::LoggerFairing,
    model::session::TallySession,
};

pub mod api;
pub mod card;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;

pub use config::Config;

/// The tally session currently open, if any. Holding the lock is what
/// serialises trustee announcements.
pub type ActiveSession = Mutex<Option<TallySession>>;

/// Build a rocket that reads trustee cards from the configured card service.
pub fn build() -> Rocket<Build> {
    rocket::build()
        .attach(ConfigFairing)
        .attach(CardReaderFairing)
        .attach(LoggerFairing)
        .manage(ActiveSession::default())
        .mount("/", api::routes())
}

/// Build a rocket around the given card reader, without loading any config.
pub fn rocket_with_card_reader(reader: DynCardReader) -> Rocket<Build> {
    rocket::build()
        .attach(LoggerFairing)
        .manage(reader)
        .manage(ActiveSession::default())
        .mount("/", api::routes())
}
