//! # Report Jobs Module
//!
//! Long-running report generation, run off the request cycle on the
//! blocking thread pool and polled via `GET /api/jobs/{job_id}`.
//!
//! ## Registered routes
//!
//! * **`POST /api/reports/pdf`** — bulk PDF export of a date range, one
//!   page per check, written to the reports directory.
//! * **`POST /api/reports/email`** — renders the selected checks into one
//!   PDF in the outbox and records an `EmailDispatch` row for the external
//!   sender.

pub mod email;
pub mod export;
pub mod pdf;

use actix_web::web::{post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/reports";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/pdf", post().to(export::process))
        .route("/email", post().to(email::process))
}
