use log::info;
use rocket::{http::Status, serde::json::Json, Route, State};

use crate::{
    api::common::open_session,
    error::{Error, Result},
    model::{
        api::{SessionSummary, StartTally},
        session::TallySession,
    },
    ActiveSession,
};

pub fn routes() -> Vec<Route> {
    routes![start_tally, get_tally, end_tally]
}

#[post("/tally", data = "<request>", format = "json")]
pub async fn start_tally(
    request: Json<StartTally>,
    active: &State<ActiveSession>,
) -> Result<Json<SessionSummary>> {
    let mut active = active.lock().await;
    if active.is_some() {
        return Err(Error::Status(
            Status::Conflict,
            "A tally session is already open".to_string(),
        ));
    }

    let StartTally {
        config,
        trustee_ids,
    } = request.into_inner();
    let session = TallySession::new(config, trustee_ids)?;
    info!(
        "Opened tally session: {} of {} trustees required",
        session.config().threshold,
        session.config().number_of_trustees
    );

    let summary = SessionSummary::from(&session);
    *active = Some(session);
    Ok(Json(summary))
}

#[get("/tally")]
pub async fn get_tally(active: &State<ActiveSession>) -> Result<Json<SessionSummary>> {
    let mut active = active.lock().await;
    let session = open_session(&mut active)?;
    Ok(Json(SessionSummary::from(&*session)))
}

#[delete("/tally")]
pub async fn end_tally(active: &State<ActiveSession>) -> Result<()> {
    let session = active.lock().await.take().ok_or_else(Error::no_session)?;
    info!(
        "Closed tally session opened at {} with status {:?}",
        session.started_at(),
        session.status()
    );
    Ok(())
}
