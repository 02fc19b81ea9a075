use actix_web::web;
use common::model::check::TemplateUsage;
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
    match template_usage(&conn, &template_id) {
        Ok(usage) => actix_web::HttpResponse::Ok().json(usage),
        Err(e) => actix_web::HttpResponse::ServiceUnavailable().body(e),
    }
}

/// How many checks link to a template and when the first/last were
/// performed. Shown as a warning before archive/delete; purely advisory.
pub fn template_usage(conn: &Connection, template_id: &str) -> Result<TemplateUsage, String> {
    let (check_count, earliest, latest): (u32, Option<String>, Option<String>) = conn
        .query_row(
            "SELECT COUNT(*), MIN(check_date), MAX(check_date)
             FROM checks WHERE template_id = ?1",
            params![template_id],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )
        .map_err(|e| e.to_string())?;

    Ok(TemplateUsage {
        check_count,
        earliest_check: earliest.as_deref().map(db::parse_datetime).transpose()?,
        latest_check: latest.as_deref().map(db::parse_datetime).transpose()?,
    })
}
