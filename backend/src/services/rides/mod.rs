//! # Ride Registry Module
//!
//! Rides are the anchor entity: templates, checks, schedules and documents
//! all hang off one. The ride category drives library filtering and report
//! headers.
//!
//! ## Registered routes
//!
//! * **`POST /api/rides/save`** — create a ride, or update one when the
//!   payload carries an id.
//! * **`GET /api/rides/{owner_id}`** — all rides of one owner, by name.
//! * **`GET /api/rides/{owner_id}/{ride_id}`** — a single ride.
//! * **`DELETE /api/rides/{ride_id}`** — hard delete, refused with 409
//!   while templates, checks, schedules or documents still reference the
//!   ride. Dependent records are never cascaded across domains.

mod delete;
pub mod get;
mod list;
pub mod save;

use actix_web::web::{delete, get, post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/rides";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/save", post().to(save::process))
        .route("/{owner_id}/{ride_id}", get().to(get::process))
        .route("/{owner_id}", get().to(list::process))
        .route("/{ride_id}", delete().to(delete::process))
}

pub use delete::{delete_ride, dependent_records};
pub use get::load_ride;
pub use list::list_rides;
pub use save::save_ride;
