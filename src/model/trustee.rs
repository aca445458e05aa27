use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};

/// Opaque trustee identity, stable across the key ceremony.
pub type TrusteeId = String;

/// How far a trustee has got with announcing their key share.
///
/// Variants are declared worst to best, so the derived ordering can be used
/// to rank statuses. On the wire these are the integer codes the front end
/// already understands.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize_repr, Deserialize_repr,
)]
#[repr(i8)]
pub enum CompletionStatus {
    /// Still outstanding, but the threshold no longer depends on this trustee.
    Warning = -2,
    /// No longer needed for this round.
    Error = -1,
    /// Not yet announced.
    Incomplete = 0,
    /// Announced.
    Complete = 1,
}

impl CompletionStatus {
    /// Every status, worst first.
    pub const ALL: [CompletionStatus; 4] = [
        CompletionStatus::Warning,
        CompletionStatus::Error,
        CompletionStatus::Incomplete,
        CompletionStatus::Complete,
    ];
}

/// One trustee's key-ceremony contribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrusteeKey {
    /// Trustee identity.
    pub id: TrusteeId,
    /// Key-share material. Never interpreted here.
    pub data: String,
    /// Announcement status.
    pub status: CompletionStatus,
}

impl TrusteeKey {
    pub fn new(id: impl Into<TrusteeId>, data: impl Into<String>, status: CompletionStatus) -> Self {
        Self {
            id: id.into(),
            data: data.into(),
            status,
        }
    }

    /// A freshly enrolled trustee with no key data yet.
    pub fn incomplete(id: impl Into<TrusteeId>) -> Self {
        Self::new(id, String::new(), CompletionStatus::Incomplete)
    }

    /// A trustee whose key share has been announced.
    pub fn complete(id: impl Into<TrusteeId>, data: impl Into<String>) -> Self {
        Self::new(id, data, CompletionStatus::Complete)
    }

    pub fn is_complete(&self) -> bool {
        self.status == CompletionStatus::Complete
    }
}
