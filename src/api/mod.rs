use rocket::Route;

mod common;

pub mod ballots;
pub mod result;
pub mod session;
pub mod trustees;

pub fn routes() -> Vec<Route> {
    let mut routes = Vec::new();
    routes.extend(session::routes());
    routes.extend(trustees::routes());
    routes.extend(ballots::routes());
    routes.extend(result::routes());
    routes
}
