//! A simple CLI tool for replaying trustee announcements offline.
//! This drives the same tracker as the server, so its output matches what
//! the tally screens would have shown for the same sequence of cards.

use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io::BufReader;

use clap::{Arg, ArgAction, ArgMatches, Command};
use rocket::serde::json::serde_json;
use serde::Deserialize;

use eg_tally_admin::model::{
    api::{StartTally, TrusteeAnnouncement},
    session::{SessionError, TallySession},
    tracker::Announcement,
    trustee::TrusteeKey,
};

const PROGRAM_NAME: &str = "tally-replay";

const ABOUT_TEXT: &str = "Replay ElectionGuard trustee announcements and report the final roster.

EXIT CODES:
     0: Replayed successfully, threshold met.
   255: Replayed successfully, but the threshold was not met.
 Other: Error.";

const REPLAY_PATH: &str = "REPLAY_PATH";

const REPLAY_PATH_HELP: &str = "The path to a JSON replay file: the body of `POST /tally`\n\
plus an `announcements` list of `{id, data}` objects";

/// Construct the CLI configuration.
fn cli() -> Command {
    // Make the build dirty when the toml changes.
    include_str!("../Cargo.toml");

    clap::command!(PROGRAM_NAME).about(ABOUT_TEXT).arg(
        Arg::new(REPLAY_PATH)
            .help(REPLAY_PATH_HELP)
            .action(ArgAction::Set)
            .required(true),
    )
}

/// A replay file.
#[derive(Debug, Deserialize)]
struct Replay {
    #[serde(flatten)]
    start: StartTally,
    announcements: Vec<TrusteeAnnouncement>,
}

/// Errors that this program may produce.
#[derive(Debug, PartialEq, Eq)]
enum Error {
    /// IO error described by the inner message.
    IO(String),
    /// Failed to decode the replay file.
    Format(String),
    /// The replay describes an impossible session.
    Session(SessionError),
}

/// One announcement and what became of it.
#[derive(Debug, PartialEq, Eq)]
struct Step {
    trustee_id: String,
    outcome: Announcement,
    remaining: i64,
}

impl Display for Step {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.outcome {
            Announcement::Applied => write!(
                f,
                "Trustee {} announced ({} more required)",
                self.trustee_id,
                self.remaining.max(0)
            ),
            Announcement::UnknownTrustee => {
                write!(f, "Trustee {} is not enrolled, ignored", self.trustee_id)
            }
            Announcement::AlreadyComplete => {
                write!(f, "Trustee {} already announced, ignored", self.trustee_id)
            }
        }
    }
}

/// The result of a full replay.
#[derive(Debug, PartialEq, Eq)]
struct ReplayReport {
    steps: Vec<Step>,
    roster: Vec<TrusteeKey>,
    threshold_met: bool,
}

/// Run the replay.
fn replay(path: &str) -> Result<ReplayReport, Error> {
    // Load the file.
    let file = BufReader::new(File::open(path).map_err(|e| Error::IO(e.to_string()))?);
    let replay: Replay =
        serde_json::from_reader(file).map_err(|e| Error::Format(e.to_string()))?;

    let mut session = TallySession::new(replay.start.config, replay.start.trustee_ids)
        .map_err(Error::Session)?;
    let tracker = session.tracker_mut();

    let steps = replay
        .announcements
        .into_iter()
        .map(|announcement| {
            let outcome = tracker.announce_trustee(&announcement.id, announcement.data);
            Step {
                trustee_id: announcement.id,
                outcome,
                remaining: tracker.remaining_threshold(),
            }
        })
        .collect();

    Ok(ReplayReport {
        steps,
        roster: tracker.roster().to_vec(),
        threshold_met: tracker.is_threshold_met(),
    })
}

/// Run the replay, report the result, and return the exit code.
fn run(args: &ArgMatches) -> u8 {
    let path: &String = args.get_one(REPLAY_PATH).unwrap(); // Required argument is guaranteed to be present.
    match replay(path) {
        Ok(report) => {
            for step in &report.steps {
                println!("{step}");
            }
            println!("Final roster:");
            for trustee in &report.roster {
                println!("  {}: {:?}", trustee.id, trustee.status);
            }
            if report.threshold_met {
                println!("Threshold met.");
                0
            } else {
                println!("Threshold not met.");
                255
            }
        }
        Err(Error::IO(msg)) => {
            println!("IO error: {msg}");
            1
        }
        Err(Error::Format(msg)) => {
            println!("Invalid JSON: {msg}");
            1
        }
        Err(Error::Session(err)) => {
            println!("Invalid session: {err}");
            2
        }
    }
}

fn main() {
    let args = cli().get_matches();
    let exit_code = run(&args);
    std::process::exit(exit_code.into())
}
