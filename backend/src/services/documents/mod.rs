//! # Document Store Module
//!
//! Regulatory documents (certificates, insurance, manuals) and generated
//! check reports, stored on disk under
//! `{data_dir}/{owner_id}/{ride_id}/{category}/{filename}` with an MD5
//! content hash recorded per document.
//!
//! ## Registered routes
//!
//! * **`POST /api/documents/upload`** — multipart upload: a `json` field
//!   with the document metadata followed by the `file` field. The MD5 is
//!   computed while the file streams to disk.
//! * **`GET /api/documents/{document_id}/download`** — streams the stored
//!   file with a content type guessed from the filename.
//! * **`GET /api/documents/{owner_id}/{ride_id}`** — list, newest upload
//!   first, optionally narrowed with `?category=`.
//! * **`DELETE /api/documents/{document_id}`** — removes the row and the
//!   file; a file already gone is logged, not fatal.

mod delete;
mod download;
mod list;
pub mod upload;

use actix_web::web::{delete, get, post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/documents";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/upload", post().to(upload::process))
        .route("/{document_id}/download", get().to(download::process))
        .route("/{owner_id}/{ride_id}", get().to(list::process))
        .route("/{document_id}", delete().to(delete::process))
}

pub use delete::delete_document;
pub use list::list_documents;
pub use upload::{filename_component, record_stored_file, sanitize_filename};
