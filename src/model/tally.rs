use serde::{Deserialize, Serialize};

pub type TallyCount = u64;

/// Votes counted for a write-in candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteInCandidateTally {
    pub name: String,
    pub tally: TallyCount,
}

/// Results of a candidate contest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateVoteTally {
    /// One count per listed candidate, in ballot order.
    pub candidates: Vec<TallyCount>,
    pub write_ins: Vec<WriteInCandidateTally>,
}

/// Results of a yes/no contest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YesNoVoteTally {
    pub yes: TallyCount,
    pub no: TallyCount,
}

/// Results of one contest. Distinguished on the wire by shape alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContestTally {
    Candidate(CandidateVoteTally),
    YesNo(YesNoVoteTally),
}

/// The decrypted election tally, one entry per contest.
pub type Tally = Vec<ContestTally>;
