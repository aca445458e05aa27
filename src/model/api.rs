//! Request and response bodies for the HTTP API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{
    election_guard::{ElectionGuardConfig, ElectionGuardStatus},
    session::TallySession,
    tracker::{Announcement, TrusteeThresholdTracker},
    trustee::{CompletionStatus, TrusteeId, TrusteeKey},
};

/// Body of a request to start the tally flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartTally {
    pub config: ElectionGuardConfig,
    /// Enrolled trustees. Defaults to the ceremony's numbering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trustee_ids: Option<Vec<TrusteeId>>,
}

/// A trustee presenting their key share.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrusteeAnnouncement {
    pub id: TrusteeId,
    pub data: String,
}

/// The roster as shown to the front end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterView {
    pub trustees: Vec<TrusteeKey>,
    pub remaining_threshold: i64,
}

impl From<&TrusteeThresholdTracker> for RosterView {
    fn from(tracker: &TrusteeThresholdTracker) -> Self {
        Self {
            trustees: tracker.roster().to_vec(),
            remaining_threshold: tracker.remaining_threshold(),
        }
    }
}

/// The outcome of an announcement along with the resulting roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnouncementResult {
    pub outcome: Announcement,
    pub roster: RosterView,
}

/// Per-status trustee counts.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub complete: usize,
    pub incomplete: usize,
    pub error: usize,
    pub warning: usize,
}

impl From<&TrusteeThresholdTracker> for StatusCounts {
    fn from(tracker: &TrusteeThresholdTracker) -> Self {
        Self {
            complete: tracker.count(CompletionStatus::Complete),
            incomplete: tracker.count(CompletionStatus::Incomplete),
            error: tracker.count(CompletionStatus::Error),
            warning: tracker.count(CompletionStatus::Warning),
        }
    }
}

/// Overview of the running session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub status: ElectionGuardStatus,
    pub started_at: DateTime<Utc>,
    pub number_of_trustees: u32,
    pub threshold: u32,
    pub remaining_threshold: i64,
    pub threshold_met: bool,
    pub trustees: StatusCounts,
}

impl From<&TallySession> for SessionSummary {
    fn from(session: &TallySession) -> Self {
        let tracker = session.tracker();
        Self {
            status: session.status(),
            started_at: session.started_at(),
            number_of_trustees: session.config().number_of_trustees,
            threshold: tracker.threshold(),
            remaining_threshold: tracker.remaining_threshold(),
            threshold_met: tracker.is_threshold_met(),
            trustees: tracker.into(),
        }
    }
}

/// Ballots registered for the tally so far.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BallotRegistration {
    pub cast_ids: Vec<String>,
    pub spoiled_ids: Vec<String>,
    pub encrypted_ballot_paths: Vec<String>,
}

impl From<&TallySession> for BallotRegistration {
    fn from(session: &TallySession) -> Self {
        Self {
            cast_ids: session.cast_ids.clone(),
            spoiled_ids: session.spoiled_ids.clone(),
            encrypted_ballot_paths: session.encrypted_ballot_paths().to_vec(),
        }
    }
}
