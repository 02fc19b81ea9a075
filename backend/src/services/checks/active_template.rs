use actix_web::web;
use common::model::template::{CheckFrequency, Template};
use rusqlite::{params, Connection};

use crate::config::AppConfig;
use crate::db;
use crate::services::templates::list;

pub async fn process(
    cfg: web::Data<AppConfig>,
    path: web::Path<(String, String, String)>,
) -> impl actix_web::Responder {
    let (owner_id, ride_id, frequency) = path.into_inner();
    let frequency = match CheckFrequency::parse(&frequency) {
        Some(f) => f,
        None => {
            return actix_web::HttpResponse::BadRequest()
                .body(format!("Unknown frequency: {}", frequency))
        }
    };
    let conn = match db::open(&cfg.database_path) {
        Ok(conn) => conn,
        Err(e) => return actix_web::HttpResponse::ServiceUnavailable().body(e),
    };
    match active_template(&conn, &owner_id, &ride_id, frequency) {
        Ok(Some(template)) => actix_web::HttpResponse::Ok().json(template),
        Ok(None) => actix_web::HttpResponse::NotFound()
            .body("No active template for this ride and frequency"),
        Err(e) => actix_web::HttpResponse::ServiceUnavailable().body(e),
    }
}

/// The single active, non-archived template for a scope, or `None` when
/// the operator has not set one up yet.
pub fn active_template(
    conn: &Connection,
    owner_id: &str,
    ride_id: &str,
    frequency: CheckFrequency,
) -> Result<Option<Template>, String> {
    let id: Option<String> = conn
        .query_row(
            "SELECT id FROM templates
             WHERE owner_id = ?1 AND ride_id = ?2 AND frequency = ?3
               AND is_active = 1 AND is_archived = 0",
            params![owner_id, ride_id, frequency.as_str()],
            |row| row.get(0),
        )
        .map(Some)
        .or_else(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => Ok(None),
            other => Err(other.to_string()),
        })?;

    match id {
        Some(id) => list::load_template(conn, &id).map(Some),
        None => Ok(None),
    }
}
