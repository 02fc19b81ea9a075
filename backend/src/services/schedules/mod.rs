//! # Schedule Modules
//!
//! Independent date-stamped records per ride, each with a due date and an
//! advance-notice window that drive the current / due-soon / overdue badge.
//!
//! ## Registered routes
//!
//! * **`/api/schedules/inspections`** — external inspections (e.g. ADIPS).
//!   Due date is direct input; deletes are soft (`is_active = false`).
//! * **`/api/schedules/ndt`** — recurring NDT requirements. The due date is
//!   derived from the last inspection date plus the frequency in calendar
//!   months; deletes are hard.
//! * **`/api/maintenance`** — logged maintenance activity with an optional
//!   follow-up due date; deletes are hard.
//!
//! Each scope registers `POST /save`, `GET /{owner_id}/{ride_id}` and
//! `DELETE /{id}`.

pub mod inspections;
pub mod maintenance;
pub mod ndt;
pub mod status;

use actix_web::web::{delete, get, post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/schedules";
const MAINTENANCE_PATH: &str = "/api/maintenance";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .service(
            scope("/inspections")
                .route("/save", post().to(inspections::save_process))
                .route(
                    "/{owner_id}/{ride_id}",
                    get().to(inspections::list_process),
                )
                .route("/{id}", delete().to(inspections::delete_process)),
        )
        .service(
            scope("/ndt")
                .route("/save", post().to(ndt::save_process))
                .route("/{owner_id}/{ride_id}", get().to(ndt::list_process))
                .route("/{id}", delete().to(ndt::delete_process)),
        )
}

pub fn maintenance_routes() -> Scope {
    scope(MAINTENANCE_PATH)
        .route("/save", post().to(maintenance::save_process))
        .route("/{owner_id}/{ride_id}", get().to(maintenance::list_process))
        .route("/{id}", delete().to(maintenance::delete_process))
}

pub use status::{schedule_status, validate_notice_days};
