use std::iter;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::model::trustee::{CompletionStatus, TrusteeId, TrusteeKey};

/// The effect of a single trustee announcement.
///
/// The tracker never fails; ignored announcements leave its state untouched
/// and are only distinguishable through this value.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Announcement {
    /// The trustee is now complete and the rest of the roster was reconciled.
    Applied,
    /// No trustee with this ID is enrolled.
    UnknownTrustee,
    /// The trustee had already announced.
    AlreadyComplete,
}

/// Tracks which trustees have announced their key shares and how many more
/// announcements the ceremony still needs.
///
/// Announcements must be applied one at a time; the tracker holds no locks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrusteeThresholdTracker {
    threshold: u32,
    remaining_threshold: i64,
    roster: Vec<TrusteeKey>,
}

impl TrusteeThresholdTracker {
    /// Start tracking the given roster, with the full threshold outstanding.
    pub fn new(threshold: u32, roster: Vec<TrusteeKey>) -> Self {
        Self {
            threshold,
            remaining_threshold: threshold.into(),
            roster,
        }
    }

    /// Start tracking a roster of incomplete trustees with the given IDs.
    pub fn with_trustees<I>(threshold: u32, ids: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<TrusteeId>,
    {
        let roster = ids.into_iter().map(|id| TrusteeKey::incomplete(id)).collect();
        Self::new(threshold, roster)
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Announcements still required. Drops below zero if trustees keep
    /// announcing after the threshold has been met.
    pub fn remaining_threshold(&self) -> i64 {
        self.remaining_threshold
    }

    pub fn is_threshold_met(&self) -> bool {
        self.remaining_threshold <= 0
    }

    pub fn roster(&self) -> &[TrusteeKey] {
        &self.roster
    }

    pub fn trustee(&self, id: &str) -> Option<&TrusteeKey> {
        self.roster.iter().find(|trustee| trustee.id == id)
    }

    /// Number of trustees currently in the given status.
    pub fn count(&self, status: CompletionStatus) -> usize {
        self.roster
            .iter()
            .filter(|trustee| trustee.status == status)
            .count()
    }

    /// Record that a trustee has presented their key share.
    ///
    /// The announcer becomes complete and every other outstanding trustee is
    /// re-marked: while announcements are still required, outstanding trustees
    /// are marked `Error` in roster order, one per required announcement; the
    /// rest are marked `Warning`. The resulting roster lists previously
    /// completed trustees first, then the announcer, then the outstanding
    /// trustees in their previous relative order.
    pub fn announce_trustee(&mut self, id: &str, data: impl Into<String>) -> Announcement {
        let position = match self.roster.iter().position(|trustee| trustee.id == id) {
            Some(position) => position,
            None => {
                warn!("Ignoring announcement for unknown trustee {id}");
                return Announcement::UnknownTrustee;
            }
        };
        if self.roster[position].is_complete() {
            warn!("Ignoring repeat announcement for trustee {id}");
            return Announcement::AlreadyComplete;
        }

        self.remaining_threshold -= 1;

        let mut roster = std::mem::take(&mut self.roster);
        let mut announcer = roster.remove(position);
        announcer.data = data.into();
        announcer.status = CompletionStatus::Complete;

        let (completed, missing): (Vec<_>, Vec<_>) =
            roster.into_iter().partition(TrusteeKey::is_complete);

        let mut required = self.remaining_threshold;
        let missing = missing.into_iter().map(|mut trustee| {
            if required > 0 {
                trustee.status = CompletionStatus::Error;
                required -= 1;
            } else {
                trustee.status = CompletionStatus::Warning;
            }
            trustee
        });

        self.roster = completed
            .into_iter()
            .chain(iter::once(announcer))
            .chain(missing)
            .collect();

        info!(
            "Trustee {id} announced, {} announcement(s) still required",
            self.remaining_threshold.max(0)
        );
        Announcement::Applied
    }

    /// Replace the whole roster. The remaining threshold is left as it is.
    pub fn replace_roster(&mut self, roster: Vec<TrusteeKey>) {
        self.roster = roster;
    }

    /// Overwrite the data and status of an enrolled trustee in place, without
    /// reconciling anyone else. Returns false if the trustee is unknown.
    pub fn update_trustee(&mut self, key: TrusteeKey) -> bool {
        match self.roster.iter_mut().find(|trustee| trustee.id == key.id) {
            Some(trustee) => {
                trustee.data = key.data;
                trustee.status = key.status;
                true
            }
            None => {
                warn!("Ignoring update for unknown trustee {}", key.id);
                false
            }
        }
    }

    /// Apply [`Self::update_trustee`] to each key in turn. Returns how many
    /// were applied.
    pub fn update_trustees<I>(&mut self, keys: I) -> usize
    where
        I: IntoIterator<Item = TrusteeKey>,
    {
        keys.into_iter()
            .map(|key| self.update_trustee(key))
            .filter(|applied| *applied)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    use CompletionStatus::*;

    fn five_trustees(threshold: u32) -> TrusteeThresholdTracker {
        TrusteeThresholdTracker::with_trustees(threshold, ["A", "B", "C", "D", "E"])
    }

    fn statuses(tracker: &TrusteeThresholdTracker) -> Vec<(&str, CompletionStatus)> {
        tracker
            .roster()
            .iter()
            .map(|trustee| (trustee.id.as_str(), trustee.status))
            .collect()
    }

    fn assert_sum_invariant(tracker: &TrusteeThresholdTracker, trustees: usize) {
        let total: usize = CompletionStatus::ALL
            .iter()
            .map(|status| tracker.count(*status))
            .sum();
        assert_eq!(total, trustees);
    }

    fn trustee_id(index: usize) -> String {
        format!("T{index}")
    }

    fn tracker_of(trustees: usize, threshold: u32) -> TrusteeThresholdTracker {
        TrusteeThresholdTracker::with_trustees(threshold, (0..trustees).map(trustee_id))
    }

    /// Announce `id` and check the outcome against the state beforehand.
    fn announce_and_check(tracker: &mut TrusteeThresholdTracker, id: &str) {
        let before = tracker.clone();
        let data = format!("share-{id}");
        let outcome = tracker.announce_trustee(id, data.clone());

        match before.trustee(id) {
            None => {
                assert_eq!(outcome, Announcement::UnknownTrustee);
                assert_eq!(*tracker, before);
            }
            Some(trustee) if trustee.is_complete() => {
                assert_eq!(outcome, Announcement::AlreadyComplete);
                assert_eq!(*tracker, before);
            }
            Some(_) => {
                assert_eq!(outcome, Announcement::Applied);
                let remaining = before.remaining_threshold() - 1;
                assert_eq!(tracker.remaining_threshold(), remaining);

                let (completed, missing): (Vec<_>, Vec<_>) = before
                    .roster()
                    .iter()
                    .filter(|trustee| trustee.id != id)
                    .partition(|trustee| trustee.is_complete());
                let expected: Vec<(&str, CompletionStatus)> = completed
                    .iter()
                    .map(|trustee| (trustee.id.as_str(), Complete))
                    .chain(iter::once((id, Complete)))
                    .chain(missing.iter().enumerate().map(|(i, trustee)| {
                        let status = if (i as i64) < remaining { Error } else { Warning };
                        (trustee.id.as_str(), status)
                    }))
                    .collect();
                assert_eq!(statuses(tracker), expected);
                assert_eq!(tracker.trustee(id).unwrap().data, data);
            }
        }

        assert_sum_invariant(tracker, before.roster().len());
        if tracker.is_threshold_met() {
            assert_eq!(tracker.count(Error), 0);
        }
    }

    fn orders(indices: &[usize]) -> Vec<Vec<usize>> {
        if indices.is_empty() {
            return vec![Vec::new()];
        }
        (0..indices.len())
            .flat_map(|i| {
                let mut rest = indices.to_vec();
                let first = rest.remove(i);
                orders(&rest).into_iter().map(move |mut order| {
                    order.insert(0, first);
                    order
                })
            })
            .collect()
    }

    #[test]
    fn every_announcement_order() {
        for trustees in 1..=5 {
            let indices: Vec<usize> = (0..trustees).collect();
            for threshold in 1..=trustees as u32 {
                for order in orders(&indices) {
                    let mut tracker = tracker_of(trustees, threshold);
                    for (step, &index) in order.iter().enumerate() {
                        announce_and_check(&mut tracker, &trustee_id(index));
                        announce_and_check(&mut tracker, &trustee_id(trustees));
                        for &done in &order[..=step] {
                            announce_and_check(&mut tracker, &trustee_id(done));
                        }
                    }
                    assert_eq!(tracker.count(Complete), trustees);
                    assert_eq!(
                        tracker.remaining_threshold(),
                        i64::from(threshold) - trustees as i64
                    );
                }
            }
        }
    }

    /// Roster size, threshold, and a sequence of announcements where indices
    /// past the roster are unknown trustees.
    fn announcement_sequence() -> impl Strategy<Value = (usize, u32, Vec<usize>)> {
        (1usize..=7).prop_flat_map(|trustees| {
            (
                Just(trustees),
                1..=trustees as u32,
                prop::collection::vec(0..trustees + 2, 0..24),
            )
        })
    }

    proptest! {
        #[test]
        fn announcements_keep_roster_consistent(
            (trustees, threshold, sequence) in announcement_sequence()
        ) {
            let mut tracker = tracker_of(trustees, threshold);
            let mut remaining = i64::from(threshold);
            for index in sequence {
                announce_and_check(&mut tracker, &trustee_id(index));
                prop_assert!(tracker.remaining_threshold() <= remaining);
                remaining = tracker.remaining_threshold();
            }
        }
    }

    #[test]
    fn unknown_trustee_is_ignored() {
        let mut tracker = five_trustees(2);
        let before = tracker.clone();
        assert_eq!(
            tracker.announce_trustee("Z", "share"),
            Announcement::UnknownTrustee
        );
        assert_eq!(tracker, before);

        // Still ignored once announcements are under way.
        tracker.announce_trustee("A", "share-a");
        let before = tracker.clone();
        assert_eq!(tracker.announce_trustee("", ""), Announcement::UnknownTrustee);
        assert_eq!(tracker, before);
    }

    #[test]
    fn repeat_announcement_is_ignored() {
        let mut tracker = five_trustees(2);
        assert_eq!(tracker.announce_trustee("A", "share-a"), Announcement::Applied);
        let before = tracker.clone();

        assert_eq!(
            tracker.announce_trustee("A", "other"),
            Announcement::AlreadyComplete
        );
        assert_eq!(tracker, before);
        assert_eq!(tracker.trustee("A").unwrap().data, "share-a");
    }

    #[test]
    fn first_announcement() {
        let mut tracker = five_trustees(2);
        tracker.announce_trustee("A", "share-a");

        assert_eq!(tracker.remaining_threshold(), 1);
        assert!(!tracker.is_threshold_met());
        assert_eq!(
            statuses(&tracker),
            vec![
                ("A", Complete),
                ("B", Error),
                ("C", Warning),
                ("D", Warning),
                ("E", Warning),
            ]
        );
        assert_eq!(tracker.trustee("A").unwrap().data, "share-a");
        assert_sum_invariant(&tracker, 5);
    }

    #[test]
    fn warning_trustee_can_still_announce() {
        let mut tracker = five_trustees(2);
        tracker.announce_trustee("A", "share-a");
        assert_eq!(tracker.announce_trustee("C", "share-c"), Announcement::Applied);

        assert_eq!(tracker.remaining_threshold(), 0);
        assert!(tracker.is_threshold_met());
        assert_eq!(
            statuses(&tracker),
            vec![
                ("A", Complete),
                ("C", Complete),
                ("B", Warning),
                ("D", Warning),
                ("E", Warning),
            ]
        );
        assert_sum_invariant(&tracker, 5);
    }

    #[test]
    fn error_trustee_can_still_announce() {
        let mut tracker = five_trustees(3);
        tracker.announce_trustee("C", "share-c");
        assert_eq!(
            statuses(&tracker),
            vec![
                ("C", Complete),
                ("A", Error),
                ("B", Error),
                ("D", Warning),
                ("E", Warning),
            ]
        );

        assert_eq!(tracker.announce_trustee("A", "share-a"), Announcement::Applied);
        assert_eq!(tracker.remaining_threshold(), 1);
        assert_eq!(
            statuses(&tracker),
            vec![
                ("C", Complete),
                ("A", Complete),
                ("B", Error),
                ("D", Warning),
                ("E", Warning),
            ]
        );
    }

    #[test]
    fn announcing_past_the_threshold() {
        let mut tracker = TrusteeThresholdTracker::with_trustees(1, ["A", "B", "C"]);
        tracker.announce_trustee("B", "share-b");
        assert_eq!(tracker.remaining_threshold(), 0);
        assert_eq!(
            statuses(&tracker),
            vec![("B", Complete), ("A", Warning), ("C", Warning)]
        );

        tracker.announce_trustee("C", "share-c");
        assert_eq!(tracker.remaining_threshold(), -1);
        assert!(tracker.is_threshold_met());
        assert_eq!(
            statuses(&tracker),
            vec![("B", Complete), ("C", Complete), ("A", Warning)]
        );
    }

    #[test]
    fn no_errors_once_threshold_met() {
        let mut tracker = five_trustees(2);
        for id in ["E", "D", "C", "B", "A"] {
            let was_met = tracker.is_threshold_met();
            tracker.announce_trustee(id, format!("share-{id}"));
            if was_met {
                assert_eq!(tracker.count(Error), 0);
            }
            assert_sum_invariant(&tracker, 5);
        }
        assert_eq!(tracker.count(Complete), 5);
        assert_eq!(tracker.remaining_threshold(), -3);
    }

    #[test]
    fn replace_and_update() {
        let mut tracker = five_trustees(2);
        tracker.announce_trustee("A", "share-a");

        tracker.replace_roster(vec![
            TrusteeKey::incomplete("X"),
            TrusteeKey::incomplete("Y"),
        ]);
        assert_eq!(tracker.remaining_threshold(), 1);
        assert_eq!(statuses(&tracker), vec![("X", Incomplete), ("Y", Incomplete)]);

        assert!(tracker.update_trustee(TrusteeKey::new("Y", "y", Warning)));
        assert!(!tracker.update_trustee(TrusteeKey::complete("Q", "q")));
        assert_eq!(statuses(&tracker), vec![("X", Incomplete), ("Y", Warning)]);
        assert_eq!(tracker.trustee("Y").unwrap().data, "y");

        let applied = tracker.update_trustees(vec![
            TrusteeKey::complete("Y", "y2"),
            TrusteeKey::complete("Q", "q"),
            TrusteeKey::new("X", "x", Error),
        ]);
        assert_eq!(applied, 2);
        assert_eq!(statuses(&tracker), vec![("X", Error), ("Y", Complete)]);
    }
}
