use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};

/// Where the ElectionGuard workflow has got to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(i8)]
pub enum ElectionGuardStatus {
    Error = -1,
    KeyCeremony = 0,
    TallyVotes = 1,
    Complete = 2,
}

/// ElectionGuard parameters agreed during the key ceremony.
///
/// Only `number_of_trustees` and `threshold` matter to the tally flow; the
/// rest are carried through for the cryptographic backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectionGuardConfig {
    pub number_of_selections: u32,
    pub number_of_trustees: u32,
    /// Minimum number of trustees needed to decrypt the tally.
    pub threshold: u32,
    pub number_of_encrypters: u32,
    pub subgroup_order: String,
    pub election_metadata: String,
    pub joint_public_key: String,
}

impl ElectionGuardConfig {
    /// Check the trustee parameters are usable.
    pub fn is_valid(&self) -> bool {
        self.threshold >= 1 && self.threshold <= self.number_of_trustees
    }

    /// Default trustee IDs, as numbered by the key ceremony.
    pub fn trustee_ids(&self) -> impl Iterator<Item = String> {
        (0..self.number_of_trustees).map(|index| index.to_string())
    }
}
