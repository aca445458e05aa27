//! Access to trustee smartcards through the card service.

use log::error;
use reqwest::Client as HttpClient;
use rocket::{
    fairing::{Fairing, Info, Kind},
    serde::json::serde_json,
    Build, Rocket,
};
use thiserror::Error;

use crate::{
    model::card::{CardKind, CardLongValue, CardShortValue, CardStatus, TrusteeCard},
    Config,
};

/// Reasons a trustee card could not be read.
#[derive(Debug, Error)]
pub enum CardError {
    #[error("No card in the reader")]
    NoCard,
    #[error("Card is a {0:?} card, not a trustee card")]
    NotTrusteeCard(CardKind),
    #[error("Trustee card holds no key share")]
    MissingKeyData,
    #[error("Malformed card data: {0}")]
    Malformed(String),
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

/// Something that can read the trustee card currently in the reader.
#[rocket::async_trait]
pub trait CardReader: Send + Sync {
    async fn read_trustee(&self) -> Result<TrusteeCard, CardError>;
}

/// The card reader held in managed state.
pub type DynCardReader = Box<dyn CardReader>;

/// Interpret the card service's replies as a trustee card.
fn trustee_card(status: CardStatus, long_value: Option<String>) -> Result<TrusteeCard, CardError> {
    if !status.present {
        return Err(CardError::NoCard);
    }
    let short_value = status
        .short_value
        .ok_or_else(|| CardError::Malformed("card has no short value".to_string()))?;
    let short: CardShortValue =
        serde_json::from_str(&short_value).map_err(|e| CardError::Malformed(e.to_string()))?;
    if short.kind != CardKind::Trustee {
        return Err(CardError::NotTrusteeCard(short.kind));
    }
    let id = short
        .holder
        .ok_or_else(|| CardError::Malformed("trustee card has no trustee ID".to_string()))?;
    let data = long_value.ok_or(CardError::MissingKeyData)?;
    Ok(TrusteeCard { id, data })
}

/// Reads cards over HTTP from the card service.
pub struct HttpCardReader {
    client: HttpClient,
    base_uri: String,
}

impl HttpCardReader {
    pub fn new(config: &Config) -> Result<Self, CardError> {
        let client = HttpClient::builder()
            .timeout(config.card_timeout())
            .build()?;
        Ok(Self {
            client,
            base_uri: config.card_uri().to_string(),
        })
    }
}

#[rocket::async_trait]
impl CardReader for HttpCardReader {
    async fn read_trustee(&self) -> Result<TrusteeCard, CardError> {
        let status: CardStatus = self
            .client
            .get(format!("{}/card/read", self.base_uri))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let long_value = if status.present && status.long_value_exists == Some(true) {
            let long: CardLongValue = self
                .client
                .get(format!("{}/card/read_long", self.base_uri))
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?;
            Some(long.long_value)
        } else {
            None
        };

        trustee_card(status, long_value)
    }
}

/// A fairing that builds the HTTP card reader from the application config.
/// Must be attached after [`crate::config::ConfigFairing`].
pub struct CardReaderFairing;

#[rocket::async_trait]
impl Fairing for CardReaderFairing {
    fn info(&self) -> Info {
        Info {
            name: "Card reader",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, rocket: Rocket<Build>) -> rocket::fairing::Result {
        let reader = match rocket.state::<Config>().map(HttpCardReader::new) {
            Some(Ok(reader)) => reader,
            Some(Err(e)) => {
                error!("Failed to set up card reader: {e}");
                return Err(rocket);
            }
            None => {
                error!("Card reader needs the application config to be loaded first");
                return Err(rocket);
            }
        };

        let reader: DynCardReader = Box::new(reader);
        Ok(rocket.manage(reader))
    }
}

/// A card reader whose card is set by the test.
#[cfg(test)]
#[derive(Clone, Default)]
pub struct FakeCardReader {
    card: std::sync::Arc<std::sync::Mutex<Option<TrusteeCard>>>,
}

#[cfg(test)]
impl FakeCardReader {
    pub fn insert(&self, id: &str, data: &str) {
        *self.card.lock().unwrap() = Some(TrusteeCard {
            id: id.to_string(),
            data: data.to_string(),
        });
    }

    pub fn remove(&self) {
        *self.card.lock().unwrap() = None;
    }
}

#[cfg(test)]
#[rocket::async_trait]
impl CardReader for FakeCardReader {
    async fn read_trustee(&self) -> Result<TrusteeCard, CardError> {
        self.card.lock().unwrap().clone().ok_or(CardError::NoCard)
    }
}
