use log::info;
use rocket::{serde::json::Json, Route, State};

use crate::{
    api::common::open_session,
    error::{Error, Result},
    model::tally::Tally,
    ActiveSession,
};

pub fn routes() -> Vec<Route> {
    routes![set_result, get_result]
}

/// Record the decrypted tally. Rejected until enough trustees have announced.
#[put("/tally/result", data = "<tally>", format = "json")]
pub async fn set_result(tally: Json<Tally>, active: &State<ActiveSession>) -> Result<()> {
    let mut active = active.lock().await;
    let session = open_session(&mut active)?;
    session.set_tally(tally.into_inner())?;
    info!("Recorded tally for {} contest(s)", session.tally().map_or(0, Vec::len));
    Ok(())
}

#[get("/tally/result")]
pub async fn get_result(active: &State<ActiveSession>) -> Result<Json<Tally>> {
    let mut active = active.lock().await;
    let session = open_session(&mut active)?;
    session
        .tally()
        .cloned()
        .map(Json)
        .ok_or_else(|| Error::not_found("Tally result"))
}
