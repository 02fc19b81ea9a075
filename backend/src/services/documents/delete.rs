use actix_web::web;
use log::warn;
use rusqlite::{params, Connection};
use std::fs;
use std::path::Path;

use crate::config::AppConfig;
use crate::db;
use crate::services::documents::list::load_document;
use crate::services::documents::upload::document_path;

pub async fn process(
    cfg: web::Data<AppConfig>,
    document_id: web::Path<String>,
) -> impl actix_web::Responder {
    let conn = match db::open(&cfg.database_path) {
        Ok(conn) => conn,
        Err(e) => return actix_web::HttpResponse::ServiceUnavailable().body(e),
    };
    match delete_document(&conn, &cfg.data_dir, &document_id) {
        Ok(()) => actix_web::HttpResponse::Ok().body("Document deleted"),
        Err(e) => actix_web::HttpResponse::BadRequest().body(e),
    }
}

/// Remove the document row and its file. A file that is already gone is
/// logged and ignored; the row removal is what counts.
pub fn delete_document(conn: &Connection, data_dir: &Path, document_id: &str) -> Result<(), String> {
    let record = load_document(conn, document_id)?;
    conn.execute("DELETE FROM documents WHERE id = ?1", params![document_id])
        .map_err(|e| e.to_string())?;

    let path = document_path(
        data_dir,
        &record.owner_id,
        &record.ride_id,
        &record.category,
        &record.filename,
    );
    if let Err(e) = fs::remove_file(&path) {
        warn!("document {} row deleted but file removal failed: {}", record.id, e);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::documents::upload::record_stored_file;

    #[test]
    fn delete_removes_row_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let stored = dir.path().join("owner-1/ride-1/certificates/cert.pdf");
        fs::create_dir_all(stored.parent().unwrap()).unwrap();
        fs::write(&stored, b"certificate body").unwrap();

        let conn = db::test_conn();
        let record = record_stored_file(
            &conn,
            "owner-1",
            "ride-1",
            "certificates",
            "cert.pdf",
            &stored,
        )
        .unwrap();

        delete_document(&conn, dir.path(), &record.id).unwrap();
        assert!(!stored.exists());
        assert!(load_document(&conn, &record.id).is_err());

        // Second delete: row already gone.
        assert!(delete_document(&conn, dir.path(), &record.id).is_err());
    }
}
