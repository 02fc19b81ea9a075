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
    let mut conn = match db::open(&cfg.database_path) {
        Ok(conn) => conn,
        Err(e) => return actix_web::HttpResponse::ServiceUnavailable().body(e),
    };
    match activate_template(&mut conn, &template_id) {
        Ok(template) => actix_web::HttpResponse::Ok().json(template),
        Err(e) => actix_web::HttpResponse::BadRequest().body(e),
    }
}

/// Make one template the single active template in its (owner, ride,
/// frequency) scope.
///
/// Clearing the siblings and setting the target commit together, so the
/// "exactly one active" invariant holds even when a step fails. Archived
/// templates must be un-archived (duplicated or re-saved) before
/// activation.
pub fn activate_template(conn: &mut Connection, template_id: &str) -> Result<Template, String> {
    let tx = conn.transaction().map_err(|e| e.to_string())?;

    let (owner_id, ride_id, frequency, is_archived): (String, String, String, bool) = tx
        .query_row(
            "SELECT owner_id, ride_id, frequency, is_archived FROM templates WHERE id = ?1",
            params![template_id],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
        )
        .map_err(|_| "Template not found".to_string())?;

    if is_archived {
        return Err("An archived template cannot be activated".to_string());
    }

    tx.execute(
        "UPDATE templates SET is_active = 0
         WHERE owner_id = ?1 AND ride_id = ?2 AND frequency = ?3",
        params![owner_id, ride_id, frequency],
    )
    .map_err(|e| e.to_string())?;
    tx.execute(
        "UPDATE templates SET is_active = 1 WHERE id = ?1",
        params![template_id],
    )
    .map_err(|e| e.to_string())?;

    tx.commit().map_err(|e| e.to_string())?;
    list::load_template(conn, template_id)
}
