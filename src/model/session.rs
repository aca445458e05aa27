use std::collections::HashSet;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::{
    election_guard::{ElectionGuardConfig, ElectionGuardStatus},
    tally::Tally,
    tracker::TrusteeThresholdTracker,
    trustee::{TrusteeId, TrusteeKey},
};

/// Reasons a tally session refuses a request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Threshold {threshold} is not between 1 and the number of trustees ({trustees})")]
    InvalidThreshold { threshold: u32, trustees: u32 },
    #[error("Expected {expected} trustee IDs, got {actual}")]
    WrongTrusteeCount { expected: u32, actual: usize },
    #[error("Trustee ID {0} appears more than once")]
    DuplicateTrustee(TrusteeId),
    #[error("Cannot record a tally: {remaining} more trustee announcement(s) required")]
    ThresholdNotMet { remaining: i64 },
}

/// Check that `ids` enrols exactly the configured number of distinct trustees.
fn check_trustee_ids<'a, I>(config: &ElectionGuardConfig, ids: I) -> Result<(), SessionError>
where
    I: IntoIterator<Item = &'a str>,
    I::IntoIter: ExactSizeIterator,
{
    let ids = ids.into_iter();
    if usize::try_from(config.number_of_trustees) != Ok(ids.len()) {
        return Err(SessionError::WrongTrusteeCount {
            expected: config.number_of_trustees,
            actual: ids.len(),
        });
    }
    let mut seen = HashSet::with_capacity(ids.len());
    for id in ids {
        if !seen.insert(id) {
            return Err(SessionError::DuplicateTrustee(id.to_string()));
        }
    }
    Ok(())
}

/// Everything the tally flow accumulates between starting and ending a
/// session. Owned by whoever drives the flow and dropped with it.
#[derive(Debug)]
pub struct TallySession {
    config: ElectionGuardConfig,
    started_at: DateTime<Utc>,
    tracker: TrusteeThresholdTracker,
    pub cast_ids: Vec<String>,
    pub spoiled_ids: Vec<String>,
    encrypted_ballot_paths: Vec<String>,
    tally: Option<Tally>,
}

impl TallySession {
    /// Start a session for the given config. Trustees default to the
    /// ceremony's numbering if no IDs are supplied.
    pub fn new(
        config: ElectionGuardConfig,
        trustee_ids: Option<Vec<TrusteeId>>,
    ) -> Result<Self, SessionError> {
        if !config.is_valid() {
            return Err(SessionError::InvalidThreshold {
                threshold: config.threshold,
                trustees: config.number_of_trustees,
            });
        }

        let trustee_ids = match trustee_ids {
            Some(ids) => {
                check_trustee_ids(&config, ids.iter().map(String::as_str))?;
                ids
            }
            None => config.trustee_ids().collect(),
        };

        let tracker = TrusteeThresholdTracker::with_trustees(config.threshold, trustee_ids);
        Ok(Self {
            config,
            started_at: Utc::now(),
            tracker,
            cast_ids: Vec::new(),
            spoiled_ids: Vec::new(),
            encrypted_ballot_paths: Vec::new(),
            tally: None,
        })
    }

    pub fn config(&self) -> &ElectionGuardConfig {
        &self.config
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn tracker(&self) -> &TrusteeThresholdTracker {
        &self.tracker
    }

    pub fn tracker_mut(&mut self) -> &mut TrusteeThresholdTracker {
        &mut self.tracker
    }

    /// Replace the tracked roster wholesale. The replacement must enrol the
    /// same number of distinct trustees as the session was started with.
    pub fn replace_roster(&mut self, roster: Vec<TrusteeKey>) -> Result<(), SessionError> {
        check_trustee_ids(&self.config, roster.iter().map(|key| key.id.as_str()))?;
        self.tracker.replace_roster(roster);
        Ok(())
    }

    pub fn encrypted_ballot_paths(&self) -> &[String] {
        &self.encrypted_ballot_paths
    }

    pub fn add_encrypted_ballot_path(&mut self, path: String) {
        self.encrypted_ballot_paths.push(path);
    }

    pub fn tally(&self) -> Option<&Tally> {
        self.tally.as_ref()
    }

    /// Record the decrypted tally. Only possible once enough trustees have
    /// announced; a later tally replaces an earlier one.
    pub fn set_tally(&mut self, tally: Tally) -> Result<(), SessionError> {
        if !self.tracker.is_threshold_met() {
            return Err(SessionError::ThresholdNotMet {
                remaining: self.tracker.remaining_threshold(),
            });
        }
        self.tally = Some(tally);
        Ok(())
    }

    pub fn status(&self) -> ElectionGuardStatus {
        if self.tally.is_some() {
            ElectionGuardStatus::Complete
        } else {
            ElectionGuardStatus::TallyVotes
        }
    }
}
