//! # Template Service Module
//!
//! Endpoints for building and managing check templates. A template is a
//! named, ordered list of check items scoped to one ride and one frequency
//! (preuse/daily/monthly/yearly).
//!
//! ## Registered routes
//!
//! * **`POST /api/templates/save`** — create a template, or rename an
//!   existing one and replace its items wholesale. New templates start
//!   inactive.
//! * **`GET /api/templates/{owner_id}/{ride_id}/{frequency}`** — list the
//!   templates for one ride and frequency, newest first, archived included.
//! * **`GET /api/templates/{template_id}/usage`** — advisory lookup of how
//!   many checks link to a template, consulted before destructive actions.
//! * **`POST /api/templates/{template_id}/activate`** — make a template the
//!   single active one in its (owner, ride, frequency) scope. Clearing the
//!   siblings and setting the target happens in one transaction.
//! * **`POST /api/templates/{template_id}/duplicate`** — deep-copy a
//!   template and its items; the copy is always inactive.
//! * **`POST /api/templates/{template_id}/archive`** — keep the template and
//!   its history but retire it from use.
//! * **`DELETE /api/templates/{template_id}`** — hard delete; items cascade.

mod activate;
mod archive;
mod delete;
mod duplicate;
pub mod list;
pub mod save;
mod usage;

use actix_web::web::{delete, get, post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/templates";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/save", post().to(save::process))
        .route(
            "/{owner_id}/{ride_id}/{frequency}",
            get().to(list::process),
        )
        .route("/{template_id}/usage", get().to(usage::process))
        .route("/{template_id}/activate", post().to(activate::process))
        .route("/{template_id}/duplicate", post().to(duplicate::process))
        .route("/{template_id}/archive", post().to(archive::process))
        .route("/{template_id}", delete().to(delete::process))
}

pub use activate::activate_template;
pub use archive::archive_template;
pub use delete::delete_template;
pub use duplicate::duplicate_template;
pub use list::{list_templates, load_template};
pub use save::save_template;
pub use usage::template_usage;
