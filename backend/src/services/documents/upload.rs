use actix_multipart::Multipart;
use actix_web::web;
use chrono::Utc;
use common::model::document::DocumentRecord;
use common::requests::DocumentUpload;
use futures_util::StreamExt;
use md5::Context;
use regex::Regex;
use rusqlite::{params, Connection};
use serde_json::from_slice;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::db;
use crate::services::rides;

pub async fn process(cfg: web::Data<AppConfig>, payload: Multipart) -> impl actix_web::Responder {
    match upload_document(&cfg, payload).await {
        Ok(record) => actix_web::HttpResponse::Ok().json(record),
        Err(e) => actix_web::HttpResponse::BadRequest().body(e),
    }
}

/// Reduce free text (e.g. a ride name) to a safe filename fragment:
/// anything outside letters, digits, dot, underscore and dash becomes a
/// single dash.
pub fn filename_component(text: &str) -> String {
    let re = Regex::new(r"[^A-Za-z0-9._-]+").expect("static pattern");
    re.replace_all(text.trim(), "-")
        .trim_matches('-')
        .to_string()
}

/// Validate a stored filename: letters, digits, spaces and `. _ ( ) -`,
/// no leading dot, no path separators, no traversal.
pub fn sanitize_filename(name: &str) -> Result<String, String> {
    let name = name.trim();
    if name.is_empty() {
        return Err("Filename must not be empty".to_string());
    }
    if name.contains("..") || name.contains('/') || name.contains('\\') {
        return Err("Filename must not contain path separators".to_string());
    }
    let re = Regex::new(r"^[\p{L}\p{N}][\p{L}\p{N} ._()-]*$").expect("static pattern");
    if !re.is_match(name) {
        return Err(format!("Filename contains unsupported characters: {}", name));
    }
    Ok(name.to_string())
}

/// Where a document lives on disk.
pub fn document_path(
    data_dir: &Path,
    owner_id: &str,
    ride_id: &str,
    category: &str,
    filename: &str,
) -> PathBuf {
    data_dir
        .join(owner_id)
        .join(ride_id)
        .join(category)
        .join(filename)
}

/// Accept a multipart upload: the `json` metadata field must precede the
/// `file` field. The MD5 hash is computed while the bytes stream to disk,
/// then the document row is inserted.
pub async fn upload_document(
    cfg: &AppConfig,
    mut payload: Multipart,
) -> Result<DocumentRecord, String> {
    let mut upload: Option<DocumentUpload> = None;
    let mut md5_hasher = Context::new();
    let mut size_bytes = 0u64;
    let mut stored_path: Option<PathBuf> = None;

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| e.to_string())?;
        let field_name = field
            .content_disposition()
            .and_then(|cd| cd.get_name().map(|n| n.to_string()));

        match field_name.as_deref() {
            Some("json") => {
                let mut bytes = Vec::new();
                while let Some(chunk) = field.next().await {
                    bytes.extend_from_slice(&chunk.map_err(|e| e.to_string())?);
                }
                let mut meta: DocumentUpload = from_slice(&bytes).map_err(|e| e.to_string())?;
                meta.filename = sanitize_filename(&meta.filename)?;
                if filename_component(&meta.category) != meta.category
                    || meta.category.is_empty()
                {
                    return Err(format!("Bad document category: {}", meta.category));
                }
                let conn = db::open(&cfg.database_path)?;
                rides::load_ride(&conn, &meta.ride_id)?;
                upload = Some(meta);
            }
            Some("file") => {
                let meta = upload
                    .as_ref()
                    .ok_or("Document metadata must be sent before the file")?;
                let path = document_path(
                    &cfg.data_dir,
                    &meta.owner_id,
                    &meta.ride_id,
                    &meta.category,
                    &meta.filename,
                );
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent).map_err(|e| e.to_string())?;
                }
                let file = File::create(&path).map_err(|e| e.to_string())?;
                let mut writer = BufWriter::new(file);
                while let Some(chunk) = field.next().await {
                    let chunk = chunk.map_err(|e| e.to_string())?;
                    md5_hasher.consume(&chunk);
                    size_bytes += chunk.len() as u64;
                    writer.write_all(&chunk).map_err(|e| e.to_string())?;
                }
                writer.flush().map_err(|e| e.to_string())?;
                stored_path = Some(path);
            }
            _ => {}
        }
    }

    let meta = upload.ok_or("Missing document metadata")?;
    if stored_path.is_none() {
        return Err("Missing file".to_string());
    }

    let conn = db::open(&cfg.database_path)?;
    insert_document(
        &conn,
        &meta.owner_id,
        &meta.ride_id,
        &meta.category,
        &meta.filename,
        &format!("{:x}", md5_hasher.finalize()),
        size_bytes,
    )
}

/// Register a file that already exists on disk (generated check report
/// snapshots) in the document store.
pub fn record_stored_file(
    conn: &Connection,
    owner_id: &str,
    ride_id: &str,
    category: &str,
    filename: &str,
    path: &Path,
) -> Result<DocumentRecord, String> {
    let bytes = fs::read(path).map_err(|e| e.to_string())?;
    insert_document(
        conn,
        owner_id,
        ride_id,
        category,
        filename,
        &format!("{:x}", md5::compute(&bytes)),
        bytes.len() as u64,
    )
}

fn insert_document(
    conn: &Connection,
    owner_id: &str,
    ride_id: &str,
    category: &str,
    filename: &str,
    content_md5: &str,
    size_bytes: u64,
) -> Result<DocumentRecord, String> {
    let record = DocumentRecord {
        id: Uuid::new_v4().to_string(),
        owner_id: owner_id.to_string(),
        ride_id: ride_id.to_string(),
        category: category.to_string(),
        filename: filename.to_string(),
        content_md5: content_md5.to_string(),
        size_bytes,
        uploaded_at: Utc::now(),
    };
    conn.execute(
        "INSERT INTO documents
         (id, owner_id, ride_id, category, filename, content_md5, size_bytes, uploaded_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            record.id,
            record.owner_id,
            record.ride_id,
            record.category,
            record.filename,
            record.content_md5,
            record.size_bytes as i64,
            db::datetime_to_sql(&record.uploaded_at)
        ],
    )
    .map_err(|e| e.to_string())?;
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_component_squashes_unsafe_runs() {
        assert_eq!(filename_component("Wild Mouse (Mk II)"), "Wild-Mouse-Mk-II");
        assert_eq!(filename_component("  Waltzer  "), "Waltzer");
        assert_eq!(filename_component("a/b\\c"), "a-b-c");
    }

    #[test]
    fn sanitize_accepts_ordinary_document_names() {
        assert!(sanitize_filename("insurance-2026.pdf").is_ok());
        assert!(sanitize_filename("ADIPS certificate (renewal).pdf").is_ok());
    }

    #[test]
    fn sanitize_rejects_traversal_and_separators() {
        assert!(sanitize_filename("../secrets.pdf").is_err());
        assert!(sanitize_filename("a/b.pdf").is_err());
        assert!(sanitize_filename("a\\b.pdf").is_err());
        assert!(sanitize_filename(".hidden").is_err());
        assert!(sanitize_filename("").is_err());
    }

    #[test]
    fn record_stored_file_hashes_the_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.pdf");
        fs::write(&path, b"not really a pdf").unwrap();

        let conn = db::test_conn();
        let record = record_stored_file(
            &conn,
            "owner-1",
            "ride-1",
            "check-reports",
            "report.pdf",
            &path,
        )
        .unwrap();
        assert_eq!(record.size_bytes, 16);
        assert_eq!(
            record.content_md5,
            format!("{:x}", md5::compute(b"not really a pdf"))
        );
    }
}
