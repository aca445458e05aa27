use log::info;
use rocket::{serde::json::Json, Route, State};

use crate::{
    api::common::open_session, error::Result, model::api::BallotRegistration, ActiveSession,
};

pub fn routes() -> Vec<Route> {
    routes![get_ballots, set_cast_ids, set_spoiled_ids, add_encrypted_path]
}

#[get("/tally/ballots")]
pub async fn get_ballots(active: &State<ActiveSession>) -> Result<Json<BallotRegistration>> {
    let mut active = active.lock().await;
    let session = open_session(&mut active)?;
    Ok(Json(BallotRegistration::from(&*session)))
}

#[put("/tally/ballots/cast", data = "<ids>", format = "json")]
pub async fn set_cast_ids(ids: Json<Vec<String>>, active: &State<ActiveSession>) -> Result<()> {
    let mut active = active.lock().await;
    let session = open_session(&mut active)?;
    session.cast_ids = ids.into_inner();
    info!("Registered {} cast ballot(s)", session.cast_ids.len());
    Ok(())
}

#[put("/tally/ballots/spoiled", data = "<ids>", format = "json")]
pub async fn set_spoiled_ids(ids: Json<Vec<String>>, active: &State<ActiveSession>) -> Result<()> {
    let mut active = active.lock().await;
    let session = open_session(&mut active)?;
    session.spoiled_ids = ids.into_inner();
    info!("Registered {} spoiled ballot(s)", session.spoiled_ids.len());
    Ok(())
}

#[post("/tally/ballots/encrypted", data = "<path>", format = "json")]
pub async fn add_encrypted_path(path: Json<String>, active: &State<ActiveSession>) -> Result<()> {
    let mut active = active.lock().await;
    let session = open_session(&mut active)?;
    info!("Adding encrypted ballots from {}", path.as_str());
    session.add_encrypted_ballot_path(path.into_inner());
    Ok(())
}
