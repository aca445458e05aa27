use log::{info, warn};
use rocket::{serde::json::Json, Route, State};

use crate::{
    api::common::open_session,
    card::DynCardReader,
    error::Result,
    logging::{log_roster, RequestId},
    model::{
        api::{AnnouncementResult, RosterView, TrusteeAnnouncement},
        session::TallySession,
        trustee::TrusteeKey,
    },
    ActiveSession,
};

pub fn routes() -> Vec<Route> {
    routes![
        get_trustees,
        replace_trustees,
        update_trustees,
        announce_trustee,
        announce_card,
    ]
}

#[get("/tally/trustees")]
pub async fn get_trustees(active: &State<ActiveSession>) -> Result<Json<RosterView>> {
    let mut active = active.lock().await;
    let session = open_session(&mut active)?;
    Ok(Json(session.tracker().into()))
}

/// Replace the roster wholesale. It must hold the session's number of
/// trustees, each ID once.
#[put("/tally/trustees", data = "<roster>", format = "json")]
pub async fn replace_trustees(
    roster: Json<Vec<TrusteeKey>>,
    active: &State<ActiveSession>,
    req_id: &RequestId,
) -> Result<Json<RosterView>> {
    let mut active = active.lock().await;
    let session = open_session(&mut active)?;
    session.replace_roster(roster.into_inner())?;
    log_roster(req_id, session.tracker());
    Ok(Json(session.tracker().into()))
}

#[patch("/tally/trustees", data = "<keys>", format = "json")]
pub async fn update_trustees(
    keys: Json<Vec<TrusteeKey>>,
    active: &State<ActiveSession>,
    req_id: &RequestId,
) -> Result<Json<RosterView>> {
    let mut active = active.lock().await;
    let session = open_session(&mut active)?;
    let requested = keys.len();
    let applied = session.tracker_mut().update_trustees(keys.into_inner());
    if applied < requested {
        warn!("req{req_id} applied {applied} of {requested} trustee updates");
    }
    log_roster(req_id, session.tracker());
    Ok(Json(session.tracker().into()))
}

/// Apply an announcement to the session and describe the result.
fn announce(
    session: &mut TallySession,
    announcement: TrusteeAnnouncement,
    req_id: &RequestId,
) -> AnnouncementResult {
    let outcome = session
        .tracker_mut()
        .announce_trustee(&announcement.id, announcement.data);
    log_roster(req_id, session.tracker());
    AnnouncementResult {
        outcome,
        roster: session.tracker().into(),
    }
}

#[post("/tally/trustees/announce", data = "<announcement>", format = "json")]
pub async fn announce_trustee(
    announcement: Json<TrusteeAnnouncement>,
    active: &State<ActiveSession>,
    req_id: &RequestId,
) -> Result<Json<AnnouncementResult>> {
    let mut active = active.lock().await;
    let session = open_session(&mut active)?;
    Ok(Json(announce(session, announcement.into_inner(), req_id)))
}

/// Read the trustee card in the reader and announce it. The session stays
/// locked for the whole read.
#[post("/tally/trustees/announce/card")]
pub async fn announce_card(
    reader: &State<DynCardReader>,
    active: &State<ActiveSession>,
    req_id: &RequestId,
) -> Result<Json<AnnouncementResult>> {
    let mut active = active.lock().await;
    let session = open_session(&mut active)?;
    let card = reader.read_trustee().await?;
    info!("req{req_id} read card for trustee {}", card.id);
    let announcement = TrusteeAnnouncement {
        id: card.id,
        data: card.data,
    };
    Ok(Json(announce(session, announcement, req_id)))
}
