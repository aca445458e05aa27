use crate::error::{Error, Result};
use crate::model::session::TallySession;

/// Return the open tally session, or 404 if there is none.
pub fn open_session(active: &mut Option<TallySession>) -> Result<&mut TallySession> {
    active.as_mut().ok_or_else(Error::no_session)
}
