//! # Check Service Module
//!
//! The check lifecycle: fetch the active template for a ride, submit a
//! performed check against it, and read the history back.
//!
//! ## Registered routes
//!
//! * **`GET /api/checks/active-template/{owner_id}/{ride_id}/{frequency}`** —
//!   the single active, non-archived template for the scope, with items.
//!   404 when none exists (the caller is sent to the template builder).
//! * **`POST /api/checks/submit`** — record one performed check: one Check
//!   row plus one CheckResult row per template item, in one transaction,
//!   followed by a best-effort PDF snapshot into the document store.
//! * **`GET /api/checks/{owner_id}/{ride_id}`** — history, newest first,
//!   filterable by date range, free text, frequency and status.
//! * **`GET /api/checks/{owner_id}/{ride_id}/stats`** — aggregate counters
//!   and per-calendar-month pass rates.
//! * **`GET /api/checks/{owner_id}/{ride_id}/export/csv`** — history as a
//!   downloadable CSV, one row per check.

mod active_template;
mod export_csv;
pub mod history;
mod stats;
pub mod status;
pub mod submit;

use actix_web::web::{get, post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/checks";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/submit", post().to(submit::process))
        .route(
            "/active-template/{owner_id}/{ride_id}/{frequency}",
            get().to(active_template::process),
        )
        .route(
            "/{owner_id}/{ride_id}/export/csv",
            get().to(export_csv::process),
        )
        .route("/{owner_id}/{ride_id}/stats", get().to(stats::process))
        .route("/{owner_id}/{ride_id}", get().to(history::process))
}

pub use active_template::active_template;
pub use export_csv::checks_to_csv;
pub use history::{list_checks, HistoryFilter};
pub use stats::compute_stats;
pub use status::derive_status;
pub use submit::submit_check;
