//! Read-only check item library. Items are seeded at schema init and
//! browsed by the template builder; the service never writes them.

mod list;

use actix_web::web::{get, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/library";

pub fn configure_routes() -> Scope {
    scope(API_PATH).route("", get().to(list::process))
}

pub use list::list_library_items;
