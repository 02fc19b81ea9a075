use actix_web::web;
use common::model::document::DocumentRecord;
use rusqlite::{params, Connection, Row};
use serde::Deserialize;

use crate::config::AppConfig;
use crate::db;

#[derive(Deserialize)]
pub struct ListQuery {
    pub category: Option<String>,
}

pub async fn process(
    cfg: web::Data<AppConfig>,
    path: web::Path<(String, String)>,
    query: web::Query<ListQuery>,
) -> impl actix_web::Responder {
    let (owner_id, ride_id) = path.into_inner();
    let conn = match db::open(&cfg.database_path) {
        Ok(conn) => conn,
        Err(e) => return actix_web::HttpResponse::ServiceUnavailable().body(e),
    };
    match list_documents(&conn, &owner_id, &ride_id, query.category.as_deref()) {
        Ok(documents) => actix_web::HttpResponse::Ok().json(documents),
        Err(e) => actix_web::HttpResponse::ServiceUnavailable().body(e),
    }
}

pub(crate) fn map_document_row(row: &Row) -> Result<DocumentRecord, rusqlite::Error> {
    Ok(DocumentRecord {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        ride_id: row.get(2)?,
        category: row.get(3)?,
        filename: row.get(4)?,
        content_md5: row.get(5)?,
        size_bytes: row.get::<_, i64>(6)? as u64,
        uploaded_at: db::parse_datetime(&row.get::<_, String>(7)?)
            .unwrap_or_else(|_| chrono::Utc::now()),
    })
}

pub(crate) const DOCUMENT_COLUMNS: &str =
    "id, owner_id, ride_id, category, filename, content_md5, size_bytes, uploaded_at";

/// Documents of one ride, newest upload first, optionally by category.
pub fn list_documents(
    conn: &Connection,
    owner_id: &str,
    ride_id: &str,
    category: Option<&str>,
) -> Result<Vec<DocumentRecord>, String> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {} FROM documents
             WHERE owner_id = ?1 AND ride_id = ?2 AND (?3 IS NULL OR category = ?3)
             ORDER BY uploaded_at DESC",
            DOCUMENT_COLUMNS
        ))
        .map_err(|e| e.to_string())?;
    let rows = stmt
        .query_map(params![owner_id, ride_id, category], |row| {
            map_document_row(row)
        })
        .map_err(|e| e.to_string())?;
    rows.collect::<Result<Vec<_>, _>>().map_err(|e| e.to_string())
}

/// One document row by id.
pub fn load_document(conn: &Connection, document_id: &str) -> Result<DocumentRecord, String> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {} FROM documents WHERE id = ?1",
            DOCUMENT_COLUMNS
        ))
        .map_err(|e| e.to_string())?;
    stmt.query_row(params![document_id], |row| map_document_row(row))
        .map_err(|_| "Document not found".to_string())
}
