use log::{error, warn};
use rocket::{
    http::{Status, StatusClass},
    response::Responder,
    Request,
};
use thiserror::Error;

use crate::{card::CardError, model::session::SessionError};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Card(#[from] CardError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("{1}")]
    Status(Status, String),
}

impl Error {
    pub fn not_found(what: impl AsRef<str>) -> Self {
        Self::Status(Status::NotFound, format!("{} not found", what.as_ref()))
    }

    pub fn no_session() -> Self {
        Self::not_found("Tally session")
    }

    /// The HTTP status this error is reported as. An unreachable card service
    /// is unavailable; one that answers nonsense is a bad gateway.
    pub fn status(&self) -> Status {
        match self {
            Self::Card(CardError::NoCard)
            | Self::Card(CardError::NotTrusteeCard(_))
            | Self::Card(CardError::MissingKeyData) => Status::UnprocessableEntity,
            Self::Card(CardError::Transport(e)) if e.is_timeout() || e.is_connect() => {
                Status::ServiceUnavailable
            }
            Self::Card(CardError::Malformed(_)) | Self::Card(CardError::Transport(_)) => {
                Status::BadGateway
            }
            Self::Session(SessionError::ThresholdNotMet { .. }) => Status::Conflict,
            Self::Session(_) => Status::BadRequest,
            Self::Status(status, _) => *status,
        }
    }
}

impl<'r, 'o: 'r> Responder<'r, 'o> for Error {
    fn respond_to(self, _: &'r Request<'_>) -> rocket::response::Result<'o> {
        let status = self.status();
        if status.class() == StatusClass::ServerError {
            error!("{self}");
        } else {
            warn!("{self}");
        }
        Err(status)
    }
}
