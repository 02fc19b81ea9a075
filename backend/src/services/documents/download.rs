use actix_files::NamedFile;
use actix_web::{web, HttpRequest, HttpResponse};
use mime_guess::from_path;

use crate::config::AppConfig;
use crate::db;
use crate::services::documents::list::load_document;
use crate::services::documents::upload::document_path;

/// Streams the stored file with a content type guessed from the filename.
pub async fn process(
    cfg: web::Data<AppConfig>,
    document_id: web::Path<String>,
    req: HttpRequest,
) -> HttpResponse {
    let conn = match db::open(&cfg.database_path) {
        Ok(conn) => conn,
        Err(e) => return HttpResponse::ServiceUnavailable().body(e),
    };
    let record = match load_document(&conn, &document_id) {
        Ok(record) => record,
        Err(e) => return HttpResponse::NotFound().body(e),
    };
    let path = document_path(
        &cfg.data_dir,
        &record.owner_id,
        &record.ride_id,
        &record.category,
        &record.filename,
    );
    match NamedFile::open(&path) {
        Ok(file) => file
            .set_content_type(from_path(&record.filename).first_or_octet_stream())
            .into_response(&req),
        Err(e) => HttpResponse::NotFound().body(format!(
            "Stored file missing for document {}: {}",
            record.id, e
        )),
    }
}
