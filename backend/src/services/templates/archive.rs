use actix_web::web;
use common::model::template::Template;
use rusqlite::{params, Connection};

use crate::config::AppConfig;
use crate::db;
use crate::services::templates::list;

pub async fn process(
    cfg: web::Data<AppConfig>,
    template_id: web::Path<String>,
) -> impl actix_web::Responder {
    let conn = match db::open(&cfg.database_path) {
        Ok(conn) => conn,
        Err(e) => return actix_web::HttpResponse::ServiceUnavailable().body(e),
    };
    match archive_template(&conn, &template_id) {
        Ok(template) => actix_web::HttpResponse::Ok().json(template),
        Err(e) => actix_web::HttpResponse::BadRequest().body(e),
    }
}

/// Retire a template from use while keeping it and its check history.
/// An archived template is never active.
pub fn archive_template(conn: &Connection, template_id: &str) -> Result<Template, String> {
    let updated = conn
        .execute(
            "UPDATE templates SET is_archived = 1, is_active = 0 WHERE id = ?1",
            params![template_id],
        )
        .map_err(|e| e.to_string())?;
    if updated == 0 {
        return Err("Template not found".to_string());
    }
    list::load_template(conn, template_id)
}
