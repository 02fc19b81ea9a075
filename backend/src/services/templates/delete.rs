use actix_web::web;
use rusqlite::{params, Connection};

use crate::config::AppConfig;
use crate::db;

pub async fn process(
    cfg: web::Data<AppConfig>,
    template_id: web::Path<String>,
) -> impl actix_web::Responder {
    let conn = match db::open(&cfg.database_path) {
        Ok(conn) => conn,
        Err(e) => return actix_web::HttpResponse::ServiceUnavailable().body(e),
    };
    match delete_template(&conn, &template_id) {
        Ok(()) => actix_web::HttpResponse::Ok().body("Template deleted"),
        Err(e) => actix_web::HttpResponse::BadRequest().body(e),
    }
}

/// Hard-delete a template. Item rows cascade; existing checks keep their
/// denormalized result rows and stay readable. Callers are expected to
/// consult `GET /{template_id}/usage` first — the lookup is advisory and
/// never blocks the delete.
pub fn delete_template(conn: &Connection, template_id: &str) -> Result<(), String> {
    let deleted = conn
        .execute("DELETE FROM templates WHERE id = ?1", params![template_id])
        .map_err(|e| e.to_string())?;
    if deleted == 0 {
        return Err("Template not found".to_string());
    }
    Ok(())
}
