use serde::{Deserialize, Serialize};

use crate::model::trustee::TrusteeId;

/// Reply from the card service's `/card/read`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardStatus {
    pub present: bool,
    #[serde(default)]
    pub short_value: Option<String>,
    #[serde(default)]
    pub long_value_exists: Option<bool>,
}

/// Reply from the card service's `/card/read_long`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardLongValue {
    pub long_value: String,
}

/// Kinds of card the card service knows about.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardKind {
    Voter,
    Pollworker,
    Clerk,
    Trustee,
    New,
}

/// The short value written on every card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardShortValue {
    #[serde(rename = "t")]
    pub kind: CardKind,
    /// For trustee cards, the trustee ID.
    #[serde(rename = "h", default)]
    pub holder: Option<String>,
}

/// A trustee card as read from the reader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrusteeCard {
    pub id: TrusteeId,
    /// The trustee's key share, from the card's long value.
    pub data: String,
}
